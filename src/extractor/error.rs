// ==========================================
// 采购全流程跟踪系统 - 抽取层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 注: 单元格级别的脏数据不产生错误,一律降级为缺省值
// ==========================================

use thiserror::Error;

/// 抽取层错误类型
#[derive(Error, Debug)]
pub enum ExtractError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv/.json）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 快照结构错误 =====
    #[error("快照不是表格结构: {0}")]
    NotTabular(String),

    // ===== 位置表错误 =====
    #[error("位置表缺少必填字段 ({table}): {fields:?}")]
    SchemaMissingFields { table: String, fields: Vec<String> },

    // ===== 数据源错误 =====
    #[error("数据源不可用 ({collection}): {message}")]
    SourceUnavailable { collection: String, message: String },
}

impl From<std::io::Error> for ExtractError {
    fn from(err: std::io::Error) -> Self {
        ExtractError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ExtractError {
    fn from(err: csv::Error) -> Self {
        ExtractError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ExtractError {
    fn from(err: calamine::Error) -> Self {
        ExtractError::ExcelParseError(err.to_string())
    }
}

impl From<serde_json::Error> for ExtractError {
    fn from(err: serde_json::Error) -> Self {
        ExtractError::NotTabular(err.to_string())
    }
}

/// Result 类型别名
pub type ExtractResult<T> = Result<T, ExtractError>;
