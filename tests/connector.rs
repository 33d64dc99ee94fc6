//! End-to-end connector build tests
//!
//! Clients are constructed lazily by the driver, so none of these tests
//! need a running cluster.

use mongodb::options::{Acknowledgment, ClientOptions, ServerAddress};
use quartz_mongo_connector::{
    ConnectionConfig, ConnectorBuilder, Error, StoreConfig, WriteConcernPolicy,
};
use std::time::Duration;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn local_client() -> mongodb::Client {
    let mut options = ClientOptions::default();
    options.hosts = vec![ServerAddress::Tcp {
        host: "localhost".to_string(),
        port: Some(27017),
    }];
    mongodb::Client::with_options(options).expect("client")
}

#[tokio::test]
async fn test_uri_only_build() {
    init_tracing();
    let config = ConnectionConfig::builder("jobsdb")
        .uri("mongodb://host1:27017/jobsdb")
        .write_timeout_millis(4000)
        .build();

    let connector = ConnectorBuilder::build(config).await.expect("build");
    assert!(!connector.is_reused());

    let concern = connector.write_concern().expect("write concern");
    assert!(WriteConcernPolicy::durable(4000).matches(concern));

    let db = connector.select_database("jobsdb");
    assert_eq!(db.name(), "jobsdb");
    let db_concern = db.write_concern().expect("database write concern");
    assert_eq!(db_concern.w, Some(Acknowledgment::Majority));
    assert_eq!(db_concern.journal, Some(true));
    assert_eq!(db_concern.w_timeout, Some(Duration::from_millis(4000)));

    connector.shutdown().await;
}

#[tokio::test]
async fn test_addresses_with_credentials_build() {
    init_tracing();
    let config = ConnectionConfig::builder("jobs")
        .addresses(["a:27017", "b:27017"])
        .credentials("u", "p")
        .build();

    let connector = ConnectorBuilder::build(config).await.expect("build");
    let concern = connector.write_concern().expect("write concern");
    assert!(WriteConcernPolicy::durable(0).matches(concern));
    connector.shutdown().await;
}

#[tokio::test]
async fn test_credentials_target_db_name_then_auth_db_name() {
    let config = ConnectionConfig::builder("jobs")
        .addresses(["a:27017", "b:27017"])
        .credentials("u", "p")
        .build();
    let source = ConnectorBuilder::validate(&config).unwrap();
    let options = ConnectorBuilder::client_options(&config, &source)
        .await
        .unwrap()
        .options;
    assert_eq!(
        options.credential.expect("credential").source.as_deref(),
        Some("jobs")
    );

    let config = ConnectionConfig::builder("jobs")
        .addresses(["a:27017", "b:27017"])
        .credentials("u", "p")
        .auth_db_name("admin")
        .build();
    let source = ConnectorBuilder::validate(&config).unwrap();
    let options = ConnectorBuilder::client_options(&config, &source)
        .await
        .unwrap()
        .options;
    assert_eq!(
        options.credential.expect("credential").source.as_deref(),
        Some("admin")
    );
}

#[tokio::test]
async fn test_address_order_preserved() {
    let config = ConnectionConfig::builder("jobs")
        .addresses(["c:3", "a:1", "b:2"])
        .build();
    let source = ConnectorBuilder::validate(&config).unwrap();
    let options = ConnectorBuilder::client_options(&config, &source)
        .await
        .unwrap()
        .options;
    let hosts: Vec<String> = options.hosts.iter().map(ToString::to_string).collect();
    assert_eq!(hosts, vec!["c:3", "a:1", "b:2"]);
}

#[tokio::test]
async fn test_external_client_with_addresses_fails() {
    let config = ConnectionConfig::builder("jobs")
        .client(local_client())
        .addresses(["a:27017"])
        .build();

    let err = ConnectorBuilder::build(config).await.unwrap_err();
    assert!(matches!(err, Error::ConflictingSource));
    assert!(err
        .to_string()
        .contains("configure either a client or connection parameters"));
}

#[tokio::test]
async fn test_external_client_reused_without_write_concern() {
    let client = local_client();
    let config = ConnectionConfig::builder("jobs").client(client).build();

    let connector = ConnectorBuilder::build(config).await.expect("build");
    assert!(connector.is_reused());
    assert!(connector.write_concern().is_none());
    connector.shutdown().await;
}

#[tokio::test]
async fn test_missing_trust_store_fails() {
    let config = ConnectionConfig::builder("jobs")
        .addresses(["a:27017"])
        .trust_store(StoreConfig::pem("/nonexistent"))
        .build();

    let err = ConnectorBuilder::build(config).await.unwrap_err();
    match err {
        Error::Store { source, .. } => {
            assert_eq!(
                source.expect("io source").kind(),
                std::io::ErrorKind::NotFound
            );
        }
        other => panic!("expected Store error, got {:?}", other),
    }
}

#[test]
fn test_no_uri_no_addresses_fails() {
    let config = ConnectionConfig::builder("jobs").build();
    let err = tokio_test::block_on(ConnectorBuilder::build(config)).unwrap_err();
    assert!(matches!(err, Error::MissingSource));
    assert!(err
        .to_string()
        .contains("at least one address or a URI must be specified"));
}

#[tokio::test]
async fn test_username_without_password_fails() {
    let config = ConnectionConfig::builder("jobs")
        .addresses(["a:27017"])
        .username("u")
        .build();
    let err = ConnectorBuilder::build(config).await.unwrap_err();
    assert!(matches!(err, Error::MissingPassword { .. }));
    assert!(err.is_config());
}

#[tokio::test]
async fn test_blank_store_paths_leave_tls_unset() {
    let config = ConnectionConfig::from_json(
        r#"{
            "dbName": "jobs",
            "addresses": ["a:27017"],
            "trustStore": { "path": "" },
            "keyStore": { "path": "   ", "password": "x" }
        }"#,
    )
    .unwrap();
    let source = ConnectorBuilder::validate(&config).unwrap();
    let options = ConnectorBuilder::client_options(&config, &source)
        .await
        .unwrap()
        .options;
    assert!(options.tls.is_none());
}

#[tokio::test]
async fn test_unreachable_cluster_fails_connectivity_check() {
    init_tracing();
    let config = ConnectionConfig::builder("jobs")
        .uri("mongodb://127.0.0.1:1/jobs?serverSelectionTimeoutMS=200&connectTimeoutMS=200")
        .verify_connectivity(true)
        .build();

    let err = ConnectorBuilder::build(config).await.unwrap_err();
    assert!(matches!(err, Error::Driver { .. }));
}
