use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use utoipa::{IntoParams, ToSchema};

use crate::app::catalog_service::{CatalogService, ProductCreate, ProductPatch};
use crate::app::network_service::{NetworkService, NodeCreate, NodePatch, NodeWithLevel};
use crate::domain::contact::{Contact, ContactInput, ContactPatch};
use crate::domain::node::NodeLevel;

#[derive(Clone)]
pub struct AppState {
    pub network: NetworkService,
    pub catalog: CatalogService,
    pub pool: PgPool,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            network: NetworkService::new(pool.clone()),
            catalog: CatalogService::new(pool.clone()),
            pool,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        ApiResponse { success: true, data: Some(data), error: None }
    }

    pub fn err(message: impl Into<String>) -> Self {
        ApiResponse { success: false, data: None, error: Some(message.into()) }
    }
}

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::err(format!(
            "Invalid JSON body: {err} (expected: {expected})"
        ))),
    )
}

/// Deserializes a field that must distinguish "absent" from "explicit null":
/// absent -> `None`, null -> `Some(None)`, value -> `Some(Some(v))`.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NodeListQuery {
    /// Exact contact id the node owns.
    pub contact: Option<i64>,
    /// Country of the linked contact.
    pub country: Option<String>,
}

/// Full node representation for create and PUT: contact fields are nested and
/// required as a unit. `supplier` keeps the absent/null distinction: an
/// omitted key means "no supplier" on create and "leave unchanged" on update,
/// while an explicit null always detaches.
#[derive(Deserialize, Debug, ToSchema)]
pub struct NodeWriteRequest {
    pub name: String,
    pub level: NodeLevel,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub supplier: Option<Option<i64>>,
    pub contact: ContactInput,
}

impl From<NodeWriteRequest> for NodeCreate {
    fn from(req: NodeWriteRequest) -> Self {
        NodeCreate {
            name: req.name,
            level: req.level,
            supplier: req.supplier.flatten(),
            contact: req.contact,
        }
    }
}

impl From<NodeWriteRequest> for NodePatch {
    fn from(req: NodeWriteRequest) -> Self {
        NodePatch {
            name: Some(req.name),
            level: Some(req.level),
            supplier: req.supplier,
            contact: req.contact.into(),
        }
    }
}

/// Partial node update: absent fields are left unchanged; `supplier: null`
/// detaches the node from its supplier.
#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct NodePatchRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub level: Option<NodeLevel>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub supplier: Option<Option<i64>>,
    #[serde(default)]
    pub contact: Option<ContactPatch>,
}

impl From<NodePatchRequest> for NodePatch {
    fn from(req: NodePatchRequest) -> Self {
        NodePatch {
            name: req.name,
            level: req.level,
            supplier: req.supplier,
            contact: req.contact.unwrap_or_default(),
        }
    }
}

/// Node representation returned to callers: stored fields plus the computed
/// `hierarchy_level`. `debt` is present but never writable through the API.
#[derive(Serialize, Debug, ToSchema)]
pub struct NodeResponse {
    pub id: i64,
    pub name: String,
    pub contact: Contact,
    pub hierarchy_level: u32,
    pub supplier: Option<i64>,
    pub level: NodeLevel,
    #[schema(value_type = String)]
    pub debt: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<NodeWithLevel> for NodeResponse {
    fn from(view: NodeWithLevel) -> Self {
        let NodeWithLevel { node, hierarchy_level } = view;
        NodeResponse {
            id: node.id,
            name: node.name,
            contact: node.contact,
            hierarchy_level,
            supplier: node.supplier,
            level: node.level,
            debt: node.debt,
            created_at: node.created_at,
        }
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct ProductWriteRequest {
    pub name: String,
    pub model: String,
    pub market_date: NaiveDate,
    pub network_node: i64,
}

impl From<ProductWriteRequest> for ProductCreate {
    fn from(req: ProductWriteRequest) -> Self {
        ProductCreate {
            name: req.name,
            model: req.model,
            market_date: req.market_date,
            network_node: req.network_node,
        }
    }
}

impl From<ProductWriteRequest> for ProductPatch {
    fn from(req: ProductWriteRequest) -> Self {
        ProductPatch {
            name: Some(req.name),
            model: Some(req.model),
            market_date: Some(req.market_date),
            network_node: Some(req.network_node),
        }
    }
}

#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct ProductPatchRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub market_date: Option<NaiveDate>,
    #[serde(default)]
    pub network_node: Option<i64>,
}

impl From<ProductPatchRequest> for ProductPatch {
    fn from(req: ProductPatchRequest) -> Self {
        ProductPatch {
            name: req.name,
            model: req.model,
            market_date: req.market_date,
            network_node: req.network_node,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_supplier_distinguishes_absent_from_null() {
        let absent: NodePatchRequest = serde_json::from_str(r#"{"name":"X"}"#).unwrap();
        assert_eq!(absent.supplier, None);

        let null: NodePatchRequest = serde_json::from_str(r#"{"supplier":null}"#).unwrap();
        assert_eq!(null.supplier, Some(None));

        let set: NodePatchRequest = serde_json::from_str(r#"{"supplier":7}"#).unwrap();
        assert_eq!(set.supplier, Some(Some(7)));
    }

    fn put_body(extra: serde_json::Value) -> NodeWriteRequest {
        let mut body = serde_json::json!({
            "name": "Retail East",
            "level": "retail_network",
            "contact": {
                "email": "east@retail.example",
                "country": "Poland",
                "city": "Gdansk",
                "street": "Dluga",
                "building_number": "12"
            }
        });
        body.as_object_mut()
            .unwrap()
            .extend(extra.as_object().unwrap().clone());
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn put_body_maps_to_a_full_patch() {
        let patch: NodePatch = put_body(serde_json::json!({})).into();
        assert_eq!(patch.name.as_deref(), Some("Retail East"));
        assert_eq!(patch.level, Some(NodeLevel::RetailNetwork));
        // An omitted supplier key is left unchanged by the update.
        assert_eq!(patch.supplier, None);
        assert_eq!(patch.contact.city.as_deref(), Some("Gdansk"));
    }

    #[test]
    fn put_supplier_keeps_the_absent_null_distinction() {
        let patch: NodePatch = put_body(serde_json::json!({ "supplier": null })).into();
        assert_eq!(patch.supplier, Some(None), "explicit null must detach");

        let patch: NodePatch = put_body(serde_json::json!({ "supplier": 4 })).into();
        assert_eq!(patch.supplier, Some(Some(4)));
    }

    #[test]
    fn create_body_flattens_the_supplier() {
        let create: NodeCreate = put_body(serde_json::json!({})).into();
        assert_eq!(create.supplier, None);

        let create: NodeCreate = put_body(serde_json::json!({ "supplier": 4 })).into();
        assert_eq!(create.supplier, Some(4));
    }
}
