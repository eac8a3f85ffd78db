// ==========================================
// 采购全流程跟踪系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::engine_config_trait::EngineConfigReader;
use crate::config::error::{ConfigError, ConfigResult};
use crate::config::settings::{DEFAULT_HEADER_ROWS, DEFAULT_SNAPSHOT_SKEW_LIMIT_SECS};
use crate::db::{configure_sqlite_connection, init_config_schema, open_sqlite_connection};
use crate::domain::schema::FieldSchema;
use crate::domain::stage::StageTable;
use crate::domain::types::Collection;
use crate::engine::reconciliation::DEFAULT_TOLERANCE;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const RECONCILE_TOLERANCE: &str = "reconcile_tolerance";
    pub const KEY_MATCH_PREFIXES: &str = "key_match_prefixes";
    pub const LIFT_FIELD_SCHEMA: &str = "lift_field_schema";
    pub const ORDER_FIELD_SCHEMA: &str = "order_field_schema";
    pub const MATERIAL_FIELD_SCHEMA: &str = "material_field_schema";
    pub const LIFT_STAGE_TABLE: &str = "lift_stage_table";
    pub const LIFT_HEADER_ROWS: &str = "lift_header_rows";
    pub const REFERENCE_HEADER_ROWS: &str = "reference_header_rows";
    pub const SNAPSHOT_SKEW_LIMIT_SECS: &str = "snapshot_skew_limit_secs";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 打开配置库（不存在的表会被创建）
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_config_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ConfigError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            init_config_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    /// 读取 global scope 的配置值
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取并解析标量配置,缺失时返回默认值
    fn get_parsed_or<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.clone(),
                message: e.to_string(),
            }),
        }
    }

    /// 读取并解析 JSON 配置,缺失时返回默认值
    fn get_json_or<T: DeserializeOwned>(&self, key: &str, default: T) -> ConfigResult<T> {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => serde_json::from_str(&raw).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.clone(),
                message: e.to_string(),
            }),
        }
    }
}

#[async_trait]
impl EngineConfigReader for ConfigManager {
    async fn get_reconcile_tolerance(&self) -> ConfigResult<f64> {
        let value = self.get_parsed_or(config_keys::RECONCILE_TOLERANCE, DEFAULT_TOLERANCE)?;
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: config_keys::RECONCILE_TOLERANCE.to_string(),
                value: value.to_string(),
                message: "容差必须为非负有限数".to_string(),
            });
        }
        Ok(value)
    }

    async fn get_key_match_prefixes(&self) -> ConfigResult<Vec<String>> {
        self.get_json_or(config_keys::KEY_MATCH_PREFIXES, Vec::new())
    }

    async fn get_field_schema(&self, collection: Collection) -> ConfigResult<FieldSchema> {
        match collection {
            Collection::Lift => {
                self.get_json_or(config_keys::LIFT_FIELD_SCHEMA, FieldSchema::default_lift())
            }
            Collection::Orders => {
                self.get_json_or(config_keys::ORDER_FIELD_SCHEMA, FieldSchema::default_orders())
            }
            Collection::Materials => self.get_json_or(
                config_keys::MATERIAL_FIELD_SCHEMA,
                FieldSchema::default_materials(),
            ),
        }
    }

    async fn get_lift_stage_table(&self) -> ConfigResult<StageTable> {
        self.get_json_or(config_keys::LIFT_STAGE_TABLE, StageTable::default_lift())
    }

    async fn get_header_rows(&self, collection: Collection) -> ConfigResult<usize> {
        let key = if collection.is_reference() {
            config_keys::REFERENCE_HEADER_ROWS
        } else {
            config_keys::LIFT_HEADER_ROWS
        };
        self.get_parsed_or(key, DEFAULT_HEADER_ROWS)
    }

    async fn get_snapshot_skew_limit_secs(&self) -> ConfigResult<i64> {
        self.get_parsed_or(
            config_keys::SNAPSHOT_SKEW_LIMIT_SECS,
            DEFAULT_SNAPSHOT_SKEW_LIMIT_SECS,
        )
    }
}
