// ==========================================
// 采购全流程跟踪系统 - 引擎层
// ==========================================
// 职责: 阶段推断、键匹配、对账、延误计算
// 红线: 纯计算,不做 I/O,不读取系统时间
// ==========================================

pub mod delay;
pub mod key_matcher;
pub mod reconciliation;
pub mod stage_resolver;

// 重导出核心引擎
pub use delay::{StageDelay, StageDelayCalculator};
pub use key_matcher::{KeyIndex, KeyMatch, KeyMatcher, MatchRule};
pub use reconciliation::{exceeds_tolerance, ReconciliationEngine, DEFAULT_TOLERANCE};
pub use stage_resolver::{FieldPresence, StageResolver};
