// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证配置读取、默认值回退与覆写
// ==========================================

mod test_helpers;

use procurement_tracker::config::{
    config_keys, ConfigError, ConfigManager, EngineConfigReader, EngineSettings,
};
use procurement_tracker::domain::schema::{lift_fields, order_fields, FieldSchema};
use procurement_tracker::domain::stage::StageTable;
use procurement_tracker::domain::types::Collection;
use test_helpers::{create_test_db, insert_config, open_test_connection};

#[tokio::test]
async fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[tokio::test]
async fn test_settings_default_when_db_empty() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    let settings = EngineSettings::load(&config).await.expect("load settings");
    assert_eq!(settings, EngineSettings::default());
}

#[tokio::test]
async fn test_tolerance_and_prefix_override() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_config(&conn, config_keys::RECONCILE_TOLERANCE, "0.05").unwrap();
    insert_config(&conn, config_keys::KEY_MATCH_PREFIXES, r#"["indent", "PO"]"#).unwrap();
    insert_config(&conn, config_keys::SNAPSHOT_SKEW_LIMIT_SECS, "60").unwrap();

    let config = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    assert_eq!(config.get_reconcile_tolerance().await.unwrap(), 0.05);
    assert_eq!(
        config.get_key_match_prefixes().await.unwrap(),
        vec!["indent".to_string(), "PO".to_string()]
    );
    assert_eq!(config.get_snapshot_skew_limit_secs().await.unwrap(), 60);
}

#[tokio::test]
async fn test_field_schema_override() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_config(
        &conn,
        config_keys::ORDER_FIELD_SCHEMA,
        r#"{"order_key": 2, "rate": 7}"#,
    )
    .unwrap();

    let config = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    let schema = config.get_field_schema(Collection::Orders).await.unwrap();
    assert_eq!(schema.position(order_fields::ORDER_KEY), Some(2));
    assert_eq!(schema.position(order_fields::RATE), Some(7));

    // 其他集合仍为默认
    let lift = config.get_field_schema(Collection::Lift).await.unwrap();
    assert_eq!(lift, FieldSchema::default_lift());
}

#[tokio::test]
async fn test_stage_table_override() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    let stages = format!(
        r#"[
            {{"code": "RECEIPT", "label": "收货", "trigger_field": "{}", "completion_field": "{}"}},
            {{"code": "LAB_TEST", "label": "化验", "trigger_field": "{}", "completion_field": "{}"}}
        ]"#,
        lift_fields::RECEIPT_PLANNED,
        lift_fields::RECEIPT_ACTUAL,
        lift_fields::LAB_PLANNED,
        lift_fields::LAB_ACTUAL,
    );
    config
        .set_config_value(config_keys::LIFT_STAGE_TABLE, &stages)
        .unwrap();

    let table = config.get_lift_stage_table().await.unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(1).map(|s| s.code.as_str()), Some("LAB_TEST"));
}

#[tokio::test]
async fn test_empty_stage_table_rejected() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    config
        .set_config_value(config_keys::LIFT_STAGE_TABLE, "[]")
        .unwrap();

    let result = config.get_lift_stage_table().await;
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}

#[tokio::test]
async fn test_invalid_json_reported_with_key() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    config
        .set_config_value(config_keys::MATERIAL_FIELD_SCHEMA, "{not json")
        .unwrap();

    match config.get_field_schema(Collection::Materials).await {
        Err(ConfigError::InvalidValue { key, .. }) => {
            assert_eq!(key, config_keys::MATERIAL_FIELD_SCHEMA)
        }
        other => panic!("expected InvalidValue, got {:?}", other),
    }
    assert!(EngineSettings::load(&config).await.is_err());
}

#[tokio::test]
async fn test_header_rows_per_collection() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    config
        .set_config_value(config_keys::LIFT_HEADER_ROWS, "2")
        .unwrap();
    config
        .set_config_value(config_keys::REFERENCE_HEADER_ROWS, "0")
        .unwrap();

    let settings = EngineSettings::load(&config).await.unwrap();
    assert_eq!(settings.header_rows(Collection::Lift), 2);
    assert_eq!(settings.header_rows(Collection::Orders), 0);
    assert_eq!(settings.header_rows(Collection::Materials), 0);
    assert_eq!(settings.stage_table, StageTable::default_lift());
}

#[tokio::test]
async fn test_values_persist_across_managers() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    {
        let config = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
        config
            .set_config_value(config_keys::RECONCILE_TOLERANCE, "0.02")
            .unwrap();
    }

    let config = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    assert_eq!(
        config.get_config_value(config_keys::RECONCILE_TOLERANCE).unwrap(),
        Some("0.02".to_string())
    );
    assert!(config.get_config_value("missing_key").unwrap().is_none());
}
