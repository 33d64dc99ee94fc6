//! Integration tests against a live replica set
//!
//! These tests require a running MongoDB replica set. Set
//! `MONGODB_TEST_URI` (e.g. `mongodb://localhost:27017/?replicaSet=rs0`).

use mongodb::bson::doc;
use quartz_mongo_connector::{ConnectionConfig, ConnectorBuilder};

fn test_uri() -> Option<String> {
    std::env::var("MONGODB_TEST_URI").ok()
}

#[tokio::test]
#[ignore] // Requires MongoDB replica set running
async fn test_connect_write_and_shutdown() {
    let Some(uri) = test_uri() else {
        eprintln!("Skipping test: MONGODB_TEST_URI not set");
        return;
    };

    let config = ConnectionConfig::builder("quartz_test")
        .uri(uri)
        .write_timeout_millis(5000)
        .verify_connectivity(true)
        .build();
    let connector = ConnectorBuilder::build(config).await.expect("build");

    let locks = connector
        .select_database("quartz_test")
        .collection::<mongodb::bson::Document>("locks");
    locks
        .insert_one(doc! { "type": "t", "keyName": "k", "instanceId": "test" })
        .await
        .expect("durable insert");
    locks
        .delete_many(doc! { "instanceId": "test" })
        .await
        .expect("cleanup");

    connector.shutdown().await;
}
