//! End-to-end API test: provisions a clean schema, seeds employee tokens and
//! exercises the gated CRUD surface in-process.
//!
//! Requires a reachable Postgres via DATABASE_URL; skips otherwise.

use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use trade_network_api::storage::{employees, schema};
use trade_network_api::transport;
use trade_network_api::NetworkService;

const ACTIVE_TOKEN: &str = "test-token-active";
const INACTIVE_TOKEN: &str = "test-token-inactive";

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_api_flow() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping test_api_flow");
        return Ok(());
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    // Start from a clean slate.
    sqlx::query("DROP TABLE IF EXISTS products, network_nodes, contacts, employees CASCADE")
        .execute(&pool)
        .await?;
    schema::ensure_schema(&pool).await?;

    employees::create(&pool, "alice", ACTIVE_TOKEN, true).await?;
    employees::create(&pool, "bob", INACTIVE_TOKEN, false).await?;

    let app_state = transport::http::AppState::new(pool.clone());
    let router = transport::http::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let base_url = format!("http://127.0.0.1:{port}");
    let client = reqwest::Client::new();

    // --- Access gate ---
    let resp = client
        .get(format!("{base_url}/api/network-nodes"))
        .send()
        .await?;
    assert_eq!(resp.status(), 401, "missing token must be rejected");

    let resp = client
        .get(format!("{base_url}/api/products"))
        .bearer_auth(INACTIVE_TOKEN)
        .send()
        .await?;
    assert_eq!(resp.status(), 403, "inactive employee must be rejected");

    let resp = client
        .get(format!("{base_url}/api/network-nodes"))
        .bearer_auth("no-such-token")
        .send()
        .await?;
    assert_eq!(resp.status(), 401, "unknown token must be rejected");

    // --- Composite create: factory -> retail -> sole proprietor ---
    async fn create_node(
        client: &reqwest::Client,
        base_url: &str,
        body: serde_json::Value,
    ) -> Result<(reqwest::StatusCode, serde_json::Value), Box<dyn std::error::Error>> {
        let resp = client
            .post(format!("{base_url}/api/network-nodes"))
            .bearer_auth(ACTIVE_TOKEN)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.json::<serde_json::Value>().await?;
        Ok((status, body))
    }

    let (status, body) = create_node(
        &client,
        &base_url,
        json!({
            "name": "Electro Factory",
            "level": "factory",
            "contact": {
                "email": "factory@electro.example",
                "country": "Germany",
                "city": "Dresden",
                "street": "Werkstrasse",
                "building_number": "1"
            },
            // Must be ignored: debt is read-only on write.
            "debt": "999.99"
        }),
    )
    .await?;
    assert_eq!(status, 201, "factory create failed: {body}");
    let factory = &body["data"];
    let factory_id = factory["id"].as_i64().unwrap();
    let factory_contact_id = factory["contact"]["id"].as_i64().unwrap();
    assert_eq!(factory["hierarchy_level"], 0);
    assert_eq!(factory["debt"].as_str().unwrap().parse::<f64>()?, 0.0);
    assert_eq!(factory["contact"]["email"], "factory@electro.example");
    assert!(factory["created_at"].is_string());

    let (status, body) = create_node(
        &client,
        &base_url,
        json!({
            "name": "Retail North",
            "level": "retail_network",
            "supplier": factory_id,
            "contact": {
                "email": "north@retail.example",
                "country": "Germany",
                "city": "Hamburg",
                "street": "Hafenweg",
                "building_number": "22a"
            }
        }),
    )
    .await?;
    assert_eq!(status, 201, "retail create failed: {body}");
    let retail_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["hierarchy_level"], 1);

    let (status, body) = create_node(
        &client,
        &base_url,
        json!({
            "name": "Kiosk Schmidt",
            "level": "sole_proprietor",
            "supplier": retail_id,
            "contact": {
                "email": "schmidt@kiosk.example",
                "country": "Germany",
                "city": "Hamburg",
                "street": "Marktplatz",
                "building_number": "3"
            }
        }),
    )
    .await?;
    assert_eq!(status, 201, "sole proprietor create failed: {body}");
    let kiosk_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["hierarchy_level"], 2);

    // A fourth link in the chain breaks the depth invariant.
    let (status, body) = create_node(
        &client,
        &base_url,
        json!({
            "name": "Too Deep",
            "level": "sole_proprietor",
            "supplier": kiosk_id,
            "contact": {
                "email": "deep@kiosk.example",
                "country": "Germany",
                "city": "Hamburg",
                "street": "Marktplatz",
                "building_number": "4"
            }
        }),
    )
    .await?;
    assert_eq!(status, 400, "over-deep chain must be rejected: {body}");
    assert!(body["error"].as_str().unwrap().contains("3 nodes"));

    // Invalid email is a validation failure, not a write.
    let (status, _) = create_node(
        &client,
        &base_url,
        json!({
            "name": "Bad Contact",
            "level": "factory",
            "contact": {
                "email": "not-an-email",
                "country": "Germany",
                "city": "Berlin",
                "street": "Strasse",
                "building_number": "1"
            }
        }),
    )
    .await?;
    assert_eq!(status, 400);

    // A supplier reassignment that closes a loop is rejected.
    let resp = client
        .patch(format!("{base_url}/api/network-nodes/{factory_id}"))
        .bearer_auth(ACTIVE_TOKEN)
        .json(&json!({ "supplier": retail_id }))
        .send()
        .await?;
    assert_eq!(resp.status(), 400, "cycle-creating reassignment must fail");

    // --- Partial update semantics ---
    let resp = client
        .patch(format!("{base_url}/api/network-nodes/{retail_id}"))
        .bearer_auth(ACTIVE_TOKEN)
        .json(&json!({ "name": "Retail North-East", "contact": { "city": "Bremen" } }))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    let body = resp.json::<serde_json::Value>().await?;
    let node = &body["data"];
    assert_eq!(node["name"], "Retail North-East");
    assert_eq!(node["level"], "retail_network", "level must be unchanged");
    assert_eq!(node["supplier"], factory_id, "supplier must be unchanged");
    assert_eq!(node["contact"]["city"], "Bremen");
    assert_eq!(node["contact"]["street"], "Hafenweg", "other contact fields unchanged");
    let retail_contact_id = node["contact"]["id"].as_i64().unwrap();

    // --- Full replace ---
    // A PUT without a supplier key leaves the attachment alone.
    let resp = client
        .put(format!("{base_url}/api/network-nodes/{retail_id}"))
        .bearer_auth(ACTIVE_TOKEN)
        .json(&json!({
            "name": "Retail Nordost",
            "level": "retail_network",
            "contact": {
                "email": "nordost@retail.example",
                "country": "Germany",
                "city": "Leipzig",
                "street": "Messeallee",
                "building_number": "7"
            }
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    let body = resp.json::<serde_json::Value>().await?;
    let node = &body["data"];
    assert_eq!(node["name"], "Retail Nordost");
    assert_eq!(node["supplier"], factory_id, "omitted supplier must be kept");
    assert_eq!(node["hierarchy_level"], 1);
    assert_eq!(node["contact"]["city"], "Leipzig");
    assert_eq!(node["contact"]["street"], "Messeallee");
    assert_eq!(
        node["contact"]["id"].as_i64().unwrap(),
        retail_contact_id,
        "contact must be replaced in place, not re-created"
    );

    // An explicit null in a PUT body detaches the node.
    let resp = client
        .put(format!("{base_url}/api/network-nodes/{retail_id}"))
        .bearer_auth(ACTIVE_TOKEN)
        .json(&json!({
            "name": "Retail Nordost",
            "level": "retail_network",
            "supplier": null,
            "contact": {
                "email": "nordost@retail.example",
                "country": "Germany",
                "city": "Leipzig",
                "street": "Messeallee",
                "building_number": "7"
            }
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    let body = resp.json::<serde_json::Value>().await?;
    assert!(body["data"]["supplier"].is_null());
    assert_eq!(body["data"]["hierarchy_level"], 0);

    // Re-attach to the factory for the remaining scenarios.
    let resp = client
        .patch(format!("{base_url}/api/network-nodes/{retail_id}"))
        .bearer_auth(ACTIVE_TOKEN)
        .json(&json!({ "supplier": factory_id }))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    let body = resp.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["supplier"], factory_id);

    // Explicit null detaches the node from its supplier.
    let resp = client
        .patch(format!("{base_url}/api/network-nodes/{kiosk_id}"))
        .bearer_auth(ACTIVE_TOKEN)
        .json(&json!({ "supplier": null }))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    let body = resp.json::<serde_json::Value>().await?;
    assert!(body["data"]["supplier"].is_null());
    assert_eq!(body["data"]["hierarchy_level"], 0);

    // Re-attach for the remaining scenarios.
    let resp = client
        .patch(format!("{base_url}/api/network-nodes/{kiosk_id}"))
        .bearer_auth(ACTIVE_TOKEN)
        .json(&json!({ "supplier": retail_id }))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);

    // --- List filters ---
    let resp = client
        .get(format!("{base_url}/api/network-nodes?country=Germany"))
        .bearer_auth(ACTIVE_TOKEN)
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    let body = resp.json::<serde_json::Value>().await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let resp = client
        .get(format!("{base_url}/api/network-nodes?contact={factory_contact_id}"))
        .bearer_auth(ACTIVE_TOKEN)
        .send()
        .await?;
    let body = resp.json::<serde_json::Value>().await?;
    let filtered = body["data"].as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["id"], factory_id);

    // --- Products ---
    let resp = client
        .post(format!("{base_url}/api/products"))
        .bearer_auth(ACTIVE_TOKEN)
        .json(&json!({
            "name": "4K OLED TV",
            "model": "X-9000",
            "market_date": "2024-03-01",
            "network_node": kiosk_id
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), 201);
    let body = resp.json::<serde_json::Value>().await?;
    let product_id = body["data"]["id"].as_i64().unwrap();

    let resp = client
        .post(format!("{base_url}/api/products"))
        .bearer_auth(ACTIVE_TOKEN)
        .json(&json!({
            "name": "Orphan",
            "model": "O-1",
            "market_date": "2024-03-01",
            "network_node": 999_999
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), 404, "product for a missing node must fail");

    let resp = client
        .patch(format!("{base_url}/api/products/{product_id}"))
        .bearer_auth(ACTIVE_TOKEN)
        .json(&json!({ "model": "X-9000B" }))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    let body = resp.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["model"], "X-9000B");
    assert_eq!(body["data"]["name"], "4K OLED TV", "name must be unchanged");

    // --- Debt clearance bulk action (admin path, no gate) ---
    sqlx::query("UPDATE network_nodes SET debt = 120.50 WHERE id = ANY($1)")
        .bind(vec![factory_id, retail_id])
        .execute(&pool)
        .await?;
    let cleared = NetworkService::new(pool.clone())
        .clear_debt(&[factory_id])
        .await?;
    assert_eq!(cleared, 1);

    let resp = client
        .get(format!("{base_url}/api/network-nodes/{factory_id}"))
        .bearer_auth(ACTIVE_TOKEN)
        .send()
        .await?;
    let body = resp.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["debt"].as_str().unwrap().parse::<f64>()?, 0.0);

    let resp = client
        .get(format!("{base_url}/api/network-nodes/{retail_id}"))
        .bearer_auth(ACTIVE_TOKEN)
        .send()
        .await?;
    let body = resp.json::<serde_json::Value>().await?;
    assert_eq!(
        body["data"]["debt"].as_str().unwrap().parse::<f64>()?,
        120.50,
        "untargeted node must keep its debt"
    );

    // --- Cascades ---
    let resp = client
        .delete(format!("{base_url}/api/network-nodes/{kiosk_id}"))
        .bearer_auth(ACTIVE_TOKEN)
        .send()
        .await?;
    assert_eq!(resp.status(), 204);

    let resp = client
        .get(format!("{base_url}/api/products/{product_id}"))
        .bearer_auth(ACTIVE_TOKEN)
        .send()
        .await?;
    assert_eq!(resp.status(), 404, "products must be cascaded with the node");

    // Deleting the factory clears the retail node's supplier reference and
    // removes the owned contact.
    let resp = client
        .delete(format!("{base_url}/api/network-nodes/{factory_id}"))
        .bearer_auth(ACTIVE_TOKEN)
        .send()
        .await?;
    assert_eq!(resp.status(), 204);

    let resp = client
        .get(format!("{base_url}/api/network-nodes/{retail_id}"))
        .bearer_auth(ACTIVE_TOKEN)
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    let body = resp.json::<serde_json::Value>().await?;
    assert!(
        body["data"]["supplier"].is_null(),
        "dependents must be detached, not deleted"
    );

    let orphaned: i64 =
        sqlx::query_scalar("SELECT count(*) FROM contacts WHERE id = $1")
            .bind(factory_contact_id)
            .fetch_one(&pool)
            .await?;
    assert_eq!(orphaned, 0, "owned contact must be deleted with the node");

    Ok(())
}
