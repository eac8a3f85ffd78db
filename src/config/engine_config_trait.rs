// ==========================================
// 采购全流程跟踪系统 - 引擎配置读取 Trait
// ==========================================
// 职责: 定义刷新管道所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::error::ConfigResult;
use crate::domain::schema::FieldSchema;
use crate::domain::stage::StageTable;
use crate::domain::types::Collection;
use async_trait::async_trait;

// ==========================================
// EngineConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait EngineConfigReader: Send + Sync {
    // ===== 对账配置 =====

    /// 获取对账容差
    ///
    /// # 默认值
    /// - 0.01
    async fn get_reconcile_tolerance(&self) -> ConfigResult<f64>;

    /// 获取键匹配的额外已知前缀
    ///
    /// # 默认值
    /// - []（仅剥离字母前缀）
    async fn get_key_match_prefixes(&self) -> ConfigResult<Vec<String>>;

    // ===== 位置表与阶段表 =====

    /// 获取指定数据集合的位置表
    ///
    /// # 默认值
    /// - FieldSchema::default_lift / default_orders / default_materials
    async fn get_field_schema(&self, collection: Collection) -> ConfigResult<FieldSchema>;

    /// 获取提货/账务流程阶段表
    ///
    /// # 默认值
    /// - StageTable::default_lift（六阶段）
    async fn get_lift_stage_table(&self) -> ConfigResult<StageTable>;

    // ===== 快照配置 =====

    /// 获取快照顶部需跳过的表头行数
    ///
    /// # 默认值
    /// - 1
    async fn get_header_rows(&self, collection: Collection) -> ConfigResult<usize>;

    /// 获取同一次刷新内各快照采集时刻允许的最大间隔（秒）
    ///
    /// # 默认值
    /// - 900
    async fn get_snapshot_skew_limit_secs(&self) -> ConfigResult<i64>;
}
