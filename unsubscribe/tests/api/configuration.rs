use unsubscribe::configuration::get_configuration;

#[tokio::test]
async fn local_configuration_targets_dynamo_db_local() {
    let configuration = get_configuration()
        .await
        .expect("Failed to read configuration.");

    assert!(configuration.database.use_local);
    assert_eq!(
        configuration.database.table_name,
        "millhouse-subscriptions-local"
    );
    assert_eq!(configuration.application.stage, "local");
}

#[tokio::test]
async fn local_configuration_inherits_the_base_settings() {
    let configuration = get_configuration()
        .await
        .expect("Failed to read configuration.");

    assert_eq!(configuration.application.allowed_origin, "*");
    assert_eq!(configuration.telemetry.dataset_name, "millhouse-unsubscribe");
}
