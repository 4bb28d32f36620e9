use affili_core::{ClientConfig, ServiceKey, ServiceRegistry};
use fake_service_impl::FakeConnector;
use serde_json::json;
use std::sync::Arc;


fn registry(connector: &FakeConnector) -> ServiceRegistry<FakeConnector> {
    ServiceRegistry::with_connector(connector.clone(), ClientConfig::new("publisher", "secret"))
}

#[tokio::test]
async fn test_same_key_returns_same_dispatcher() {
    let connector = FakeConnector::new(&[]);
    let registry = registry(&connector);

    let first = registry.dispatcher_for(ServiceKey::Statistics).await;
    let second = registry.dispatcher_for(ServiceKey::Statistics).await;

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.endpoint(), "/V2.0/PublisherStatistics.svc");
}

#[tokio::test]
async fn test_different_keys_return_different_dispatchers() {
    let connector = FakeConnector::new(&[]);
    let registry = registry(&connector);

    let statistics = registry.dispatcher_for(ServiceKey::Statistics).await;
    let inbox = registry.dispatcher_for(ServiceKey::Inbox).await;

    assert!(!Arc::ptr_eq(&statistics, &inbox));
    assert_eq!(inbox.endpoint(), "/V2.0/PublisherInbox.svc");
}

#[tokio::test]
async fn test_dispatchers_connect_lazily() {
    let connector = FakeConnector::new(&["GetPayments"]);
    let registry = registry(&connector);

    let dispatcher = registry.dispatcher_for(ServiceKey::Account).await;
    assert!(connector.connects().is_empty());

    dispatcher.actions().await.unwrap();
    dispatcher.actions().await.unwrap();
    assert_eq!(connector.connects(), ["/V2.0/AccountService.svc"]);
}

#[tokio::test]
async fn test_dispatchers_keep_their_token() {
    let connector = FakeConnector::new(&["GetPayments"]).respond(
        "GetPayments",
        json!({ "GetPaymentsResponse": { "Payments": { "Payment": [] } } }),
    );
    let registry = registry(&connector);

    let payments = registry
        .invoke(ServiceKey::Account, "get_payments", json!({}))
        .await
        .unwrap();
    registry
        .invoke(ServiceKey::Account, "get_payments", json!({}))
        .await
        .unwrap();

    assert_eq!(payments, json!([]));
    assert_eq!(connector.logons(), 1);
    assert_eq!(connector.calls().len(), 2);
}
