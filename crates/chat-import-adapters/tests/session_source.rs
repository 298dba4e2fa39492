use chat_import_adapters::{ImportAdapterConfig, WalletConnectSessionSource};
use chat_import_core::{Account, PortError, SessionEventSource, MAINNET_NAMESPACE};

#[tokio::test]
async fn settled_sessions_reach_every_subscriber() {
    let source = WalletConnectSessionSource::new(4);
    assert_eq!(source.settle_json(r#"{"topic":"none","accounts":[]}"#).expect("settle"), 0);

    let mut first = source.subscribe();
    let mut second = source.subscribe();
    let delivered = source
        .settle_json(r#"{"topic":"abc","accounts":[{"namespace":"eip155:1","address":"0xAAA"}]}"#)
        .expect("settle");
    assert_eq!(delivered, 2);

    for rx in [&mut first, &mut second] {
        let session = rx.recv().await.expect("session delivered");
        assert_eq!(session.topic, "abc");
        assert_eq!(session.accounts, vec![Account::new("eip155:1", "0xAAA")]);
    }

    drop(second);
    assert_eq!(source.subscriber_count(), 1);
}

#[test]
fn malformed_session_payload_is_rejected() {
    let source = WalletConnectSessionSource::default();
    let err = source.settle_json("{not json").expect_err("invalid payload");
    assert!(matches!(err, PortError::Validation(_)));
}

#[test]
fn config_defaults_and_env_overrides() {
    let defaults = ImportAdapterConfig::default();
    assert_eq!(defaults.required_namespace, MAINNET_NAMESPACE);
    assert_eq!(defaults.session_channel_capacity, 16);

    std::env::set_var("CHAT_IMPORT_REQUIRED_NAMESPACE", "eip155:10");
    std::env::set_var("CHAT_IMPORT_RANDOM_NAMESPACE", "  ");
    std::env::set_var("CHAT_IMPORT_SESSION_CAPACITY", "not-a-number");
    let cfg = ImportAdapterConfig::from_env();
    std::env::set_var("CHAT_IMPORT_RANDOM_NAMESPACE", "eip155:8453");
    let random_override = ImportAdapterConfig::from_env();
    std::env::remove_var("CHAT_IMPORT_REQUIRED_NAMESPACE");
    std::env::remove_var("CHAT_IMPORT_RANDOM_NAMESPACE");
    std::env::remove_var("CHAT_IMPORT_SESSION_CAPACITY");

    assert_eq!(cfg.required_namespace, "eip155:10");
    assert_eq!(cfg.session_channel_capacity, 16);
    let options = cfg.coordinator_options();
    assert_eq!(options.required_namespace, "eip155:10");
    assert_eq!(options.random_account_namespace, MAINNET_NAMESPACE);
    assert_eq!(random_override.random_account_namespace, "eip155:8453");
}
