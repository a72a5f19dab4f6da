//! The node/contact composite writer.
//!
//! A node and its owned contact are one logical unit: the external
//! representation nests the contact inside the node, so create and update
//! synchronize both records inside a single transaction. All validation
//! (field rules and the supplier-depth invariant) runs before the
//! transaction begins; a violation fails the whole operation with nothing
//! persisted.

use sqlx::PgPool;
use tracing::info;

use crate::domain::contact::{ContactInput, ContactPatch};
use crate::domain::error::ServiceError;
use crate::domain::hierarchy;
use crate::domain::node::{self, NetworkNode, NodeLevel};
use crate::storage::{contacts, nodes};

/// Node fields plus the nested contact for a create.
#[derive(Debug, Clone)]
pub struct NodeCreate {
    pub name: String,
    pub level: NodeLevel,
    pub supplier: Option<i64>,
    pub contact: ContactInput,
}

/// Partial update. `supplier` distinguishes absent (leave unchanged) from an
/// explicit value, which may itself be null to detach the node from its
/// supplier.
#[derive(Debug, Clone, Default)]
pub struct NodePatch {
    pub name: Option<String>,
    pub level: Option<NodeLevel>,
    pub supplier: Option<Option<i64>>,
    pub contact: ContactPatch,
}

/// A node together with its computed hierarchy level, as reported to callers.
#[derive(Debug, Clone)]
pub struct NodeWithLevel {
    pub node: NetworkNode,
    pub hierarchy_level: u32,
}

#[derive(Clone)]
pub struct NetworkService {
    pool: PgPool,
}

impl NetworkService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_nodes(
        &self,
        contact: Option<i64>,
        country: Option<&str>,
    ) -> Result<Vec<NodeWithLevel>, ServiceError> {
        let listed = nodes::list(&self.pool, contact, country).await?;
        let edges = nodes::supplier_edges(&self.pool).await?;
        listed
            .into_iter()
            .map(|node| {
                let hierarchy_level = hierarchy::hierarchy_level(&edges, node.id)?;
                Ok(NodeWithLevel { node, hierarchy_level })
            })
            .collect()
    }

    pub async fn get_node(&self, id: i64) -> Result<NodeWithLevel, ServiceError> {
        let node = nodes::fetch(&self.pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("network node", id))?;
        let edges = nodes::supplier_edges(&self.pool).await?;
        let hierarchy_level = hierarchy::hierarchy_level(&edges, node.id)?;
        Ok(NodeWithLevel { node, hierarchy_level })
    }

    /// Creates the contact and the node as one transaction. `debt` is not an
    /// input; it always initializes to 0.
    pub async fn create_node(&self, input: NodeCreate) -> Result<NodeWithLevel, ServiceError> {
        node::validate_name(&input.name)?;
        input.contact.validate()?;
        self.ensure_supplier_exists(input.supplier).await?;

        let edges = nodes::supplier_edges(&self.pool).await?;
        let hierarchy_level = hierarchy::validate_assignment(&edges, None, input.supplier)?;

        let mut tx = self.pool.begin().await?;
        let contact = contacts::insert(&mut *tx, &input.contact).await?;
        let id = nodes::insert(&mut *tx, &input.name, contact.id, input.supplier, input.level).await?;
        let node = nodes::fetch(&mut *tx, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("network node", id))?;
        tx.commit().await?;

        info!(node_id = id, name = %node.name, "created network node");
        Ok(NodeWithLevel { node, hierarchy_level })
    }

    /// Updates the node and its linked contact in place. Fields absent from
    /// the patch are left unchanged; a supplier reassignment is re-validated
    /// against the depth invariant before commit.
    pub async fn update_node(&self, id: i64, patch: NodePatch) -> Result<NodeWithLevel, ServiceError> {
        if let Some(name) = &patch.name {
            node::validate_name(name)?;
        }
        patch.contact.validate()?;

        let existing = nodes::fetch(&self.pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("network node", id))?;

        let hierarchy_level = match patch.supplier {
            Some(new_supplier) => {
                self.ensure_supplier_exists(new_supplier).await?;
                let edges = nodes::supplier_edges(&self.pool).await?;
                hierarchy::validate_assignment(&edges, Some(id), new_supplier)?
            }
            None => {
                let edges = nodes::supplier_edges(&self.pool).await?;
                hierarchy::hierarchy_level(&edges, id)?
            }
        };

        let mut tx = self.pool.begin().await?;
        if !patch.contact.is_empty() {
            contacts::update_fields(&mut *tx, existing.contact.id, &patch.contact).await?;
        }
        nodes::update_fields(&mut *tx, id, patch.name.as_deref(), patch.level, patch.supplier).await?;
        let node = nodes::fetch(&mut *tx, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("network node", id))?;
        tx.commit().await?;

        info!(node_id = id, "updated network node");
        Ok(NodeWithLevel { node, hierarchy_level })
    }

    /// Deletes the node, its owned contact and (via the FK) its products.
    /// Nodes supplied by the deleted one keep existing with the reference
    /// cleared.
    pub async fn delete_node(&self, id: i64) -> Result<(), ServiceError> {
        let mut tx = self.pool.begin().await?;
        let contact_id = nodes::contact_id_of(&mut *tx, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("network node", id))?;
        nodes::delete(&mut *tx, id).await?;
        contacts::delete(&mut *tx, contact_id).await?;
        tx.commit().await?;

        info!(node_id = id, "deleted network node");
        Ok(())
    }

    /// Administrative bulk action; intentionally skips the access gate and
    /// all validation.
    pub async fn clear_debt(&self, ids: &[i64]) -> Result<u64, ServiceError> {
        let cleared = nodes::clear_debt(&self.pool, ids).await?;
        info!(targeted = ids.len(), cleared, "cleared supplier debt");
        Ok(cleared)
    }

    async fn ensure_supplier_exists(&self, supplier: Option<i64>) -> Result<(), ServiceError> {
        if let Some(supplier_id) = supplier {
            if !nodes::exists(&self.pool, supplier_id).await? {
                return Err(ServiceError::not_found("network node", supplier_id));
            }
        }
        Ok(())
    }
}
