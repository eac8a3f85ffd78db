// ==========================================
// 采购全流程跟踪系统 - 引擎设置
// ==========================================
// 职责: 配置读取结果的物化形式（纯数据,刷新管道直接消费）
// ==========================================

use crate::config::engine_config_trait::EngineConfigReader;
use crate::config::error::ConfigResult;
use crate::domain::schema::FieldSchema;
use crate::domain::stage::StageTable;
use crate::domain::types::Collection;
use crate::engine::reconciliation::DEFAULT_TOLERANCE;
use serde::{Deserialize, Serialize};

/// 默认快照采集间隔上限（秒）
pub const DEFAULT_SNAPSHOT_SKEW_LIMIT_SECS: i64 = 900;

/// 默认表头行数
pub const DEFAULT_HEADER_ROWS: usize = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub tolerance: f64,
    pub key_match_prefixes: Vec<String>,
    pub lift_schema: FieldSchema,
    pub order_schema: FieldSchema,
    pub material_schema: FieldSchema,
    pub stage_table: StageTable,
    pub lift_header_rows: usize,
    pub order_header_rows: usize,
    pub material_header_rows: usize,
    pub snapshot_skew_limit_secs: i64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            key_match_prefixes: Vec::new(),
            lift_schema: FieldSchema::default_lift(),
            order_schema: FieldSchema::default_orders(),
            material_schema: FieldSchema::default_materials(),
            stage_table: StageTable::default_lift(),
            lift_header_rows: DEFAULT_HEADER_ROWS,
            order_header_rows: DEFAULT_HEADER_ROWS,
            material_header_rows: DEFAULT_HEADER_ROWS,
            snapshot_skew_limit_secs: DEFAULT_SNAPSHOT_SKEW_LIMIT_SECS,
        }
    }
}

impl EngineSettings {
    /// 从配置读取器加载全部设置
    pub async fn load(reader: &dyn EngineConfigReader) -> ConfigResult<Self> {
        Ok(Self {
            tolerance: reader.get_reconcile_tolerance().await?,
            key_match_prefixes: reader.get_key_match_prefixes().await?,
            lift_schema: reader.get_field_schema(Collection::Lift).await?,
            order_schema: reader.get_field_schema(Collection::Orders).await?,
            material_schema: reader.get_field_schema(Collection::Materials).await?,
            stage_table: reader.get_lift_stage_table().await?,
            lift_header_rows: reader.get_header_rows(Collection::Lift).await?,
            order_header_rows: reader.get_header_rows(Collection::Orders).await?,
            material_header_rows: reader.get_header_rows(Collection::Materials).await?,
            snapshot_skew_limit_secs: reader.get_snapshot_skew_limit_secs().await?,
        })
    }

    pub fn header_rows(&self, collection: Collection) -> usize {
        match collection {
            Collection::Lift => self.lift_header_rows,
            Collection::Orders => self.order_header_rows,
            Collection::Materials => self.material_header_rows,
        }
    }

    /// 阶段表引用了位置表中不存在的字段（这些字段恒视为缺省）
    pub fn unmapped_stage_fields(&self) -> Vec<String> {
        self.stage_table
            .iter()
            .flat_map(|spec| [&spec.trigger_field, &spec.completion_field])
            .filter(|field| self.lift_schema.position(field).is_none())
            .cloned()
            .collect()
    }
}
