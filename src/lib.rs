// ==========================================
// 采购全流程跟踪系统 - 核心库
// ==========================================
// 职责: 由外部表格快照推断记录阶段,并与订单 / 物料规格对账
// 技术栈: Rust + SQLite（配置存储）
// 系统定位: 派生状态只读计算,每次刷新从零重建
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录、阶段、位置表
pub mod domain;

// 抽取层 - 快照解析与字段抽取
pub mod extractor;

// 引擎层 - 阶段推断、键匹配、对账
pub mod engine;

// 刷新管道 - 拉取与编排
pub mod pipeline;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Collection, MismatchCategory, Stage};

// 领域实体
pub use domain::{
    FieldSchema, MaterialSpec, MismatchCounts, MismatchReport, OrderRecord, ProcurementRecord,
    ReconciliationSummary, ReferenceCollection, ReferenceStatus, StageSpec, StageTable,
    TabularSnapshot,
};

// 抽取
pub use extractor::{DateDecoder, DecodedDate, ExtractError, FieldExtractor};

// 引擎
pub use engine::{KeyMatcher, ReconciliationEngine, StageDelayCalculator, StageResolver};

// 管道
pub use pipeline::{
    FileSnapshotSource, PipelineError, RefreshOutcome, RefreshPipeline, SnapshotSource,
};

// 配置
pub use config::{ConfigManager, EngineConfigReader, EngineSettings};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "采购全流程跟踪系统";
