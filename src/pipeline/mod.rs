// ==========================================
// 采购全流程跟踪系统 - 刷新管道层
// ==========================================
// 职责: 拉取快照 → 抽取 → 阶段推断 → 对账
// 红线: 不持久化派生状态,每次刷新从零重建
// ==========================================

pub mod error;
pub mod refresh;
pub mod source;

pub use error::{PipelineError, PipelineResult};
pub use refresh::{
    RecordStage, RefreshOutcome, RefreshPipeline, SnapshotSkew, SnapshotStamp, StageTally,
};
pub use source::{FileSnapshotSource, InMemorySnapshotSource, SnapshotSource};
