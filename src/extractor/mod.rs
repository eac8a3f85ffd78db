// ==========================================
// 采购全流程跟踪系统 - 抽取层
// ==========================================
// 职责: 外部表格快照 → 类型化记录
// 支持: CSV / Excel / JSON 表格
// ==========================================

pub mod date_decoder;
pub mod error;
pub mod field_extractor;
pub mod numeric;
pub mod snapshot_parser;

// 重导出核心类型
pub use date_decoder::{DateDecoder, DecodedDate};
pub use error::{ExtractError, ExtractResult};
pub use field_extractor::FieldExtractor;
pub use snapshot_parser::{
    CsvSnapshotParser, ExcelSnapshotParser, JsonSnapshotParser, SnapshotParser,
    UniversalSnapshotParser,
};
