// ==========================================
// 采购全流程跟踪系统 - 领域模型层
// ==========================================
// 职责: 定义记录、阶段、位置表、对账结果
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod reconciliation;
pub mod record;
pub mod schema;
pub mod stage;
pub mod types;

// 重导出核心类型
pub use reconciliation::{
    Composition, CompositionCheck, MismatchCounts, MismatchReport, QuantityCheck, RateCheck,
    ReconciliationSummary, ReferenceCollection, ReferenceStatus,
};
pub use record::{Cell, MaterialSpec, OrderRecord, ProcurementRecord, RawRow, TabularSnapshot};
pub use schema::{lift_fields, material_fields, order_fields, FieldSchema};
pub use stage::{StageSpec, StageTable};
pub use types::{Collection, MismatchCategory, Stage};
