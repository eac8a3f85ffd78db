// ==========================================
// 采购全流程跟踪系统 - 快照解析器
// ==========================================
// 支持: CSV (.csv) / Excel (.xlsx/.xls) / JSON 表格 (.json)
// 输出: 按位置寻址的原始行（不解析列名,表头行由调用方跳过）
// 红线: 非表格结构是唯一的硬错误
// ==========================================

use crate::domain::record::{Cell, RawRow, TabularSnapshot};
use crate::extractor::error::{ExtractError, ExtractResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::path::Path;

// ==========================================
// SnapshotParser Trait
// ==========================================
pub trait SnapshotParser: Send + Sync {
    /// 解析文件为表格快照
    fn parse_snapshot(&self, file_path: &Path) -> ExtractResult<TabularSnapshot>;
}

/// 检查文件存在及扩展名
fn check_file(path: &Path, allowed: &[&str]) -> ExtractResult<()> {
    if !path.exists() {
        return Err(ExtractError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if !allowed.contains(&ext.as_str()) {
        return Err(ExtractError::UnsupportedFormat(ext));
    }
    Ok(())
}

/// 跳过完全空白的行,保留原始行号
fn push_row(rows: &mut Vec<RawRow>, row: RawRow) {
    if !row.is_blank() {
        rows.push(row);
    }
}

// ==========================================
// CSV 解析器
// ==========================================
pub struct CsvSnapshotParser;

impl SnapshotParser for CsvSnapshotParser {
    fn parse_snapshot(&self, file_path: &Path) -> ExtractResult<TabularSnapshot> {
        check_file(file_path, &["csv"])?;

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut rows = Vec::new();
        for (row_index, result) in reader.records().enumerate() {
            let record = result?;
            let values: Vec<&str> = record.iter().collect();
            push_row(&mut rows, RawRow::from_texts(row_index, &values));
        }

        Ok(TabularSnapshot::new(rows))
    }
}

// ==========================================
// Excel 解析器（读取第一个工作表）
// ==========================================
pub struct ExcelSnapshotParser;

impl SnapshotParser for ExcelSnapshotParser {
    fn parse_snapshot(&self, file_path: &Path) -> ExtractResult<TabularSnapshot> {
        check_file(file_path, &["xlsx", "xls"])?;

        let mut workbook = open_workbook_auto(file_path)?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ExtractError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = Vec::new();
        for (row_index, data_row) in range.rows().enumerate() {
            let values: Vec<String> = data_row.iter().map(|cell| cell.to_string()).collect();
            push_row(&mut rows, RawRow::from_texts(row_index, &values));
        }

        Ok(TabularSnapshot::new(rows))
    }
}

// ==========================================
// JSON 表格解析器
// ==========================================
// 接受三种结构:
// 1. {"table": {"rows": [{"c": [{"v": .., "f": ..}, null]}]}}（可带 JSONP 包装）
// 2. {"rows": [...]}（同上,无 table 外层）
// 3. [[..], [..]]（二维数组）
pub struct JsonSnapshotParser;

#[derive(Debug, Deserialize)]
struct JsonTable {
    rows: Vec<JsonRow>,
}

#[derive(Debug, Deserialize)]
struct JsonRow {
    #[serde(default)]
    c: Vec<Option<JsonCell>>,
}

#[derive(Debug, Deserialize)]
struct JsonCell {
    #[serde(default)]
    v: Value,
    #[serde(default)]
    f: Option<String>,
}

impl JsonSnapshotParser {
    /// 解析 JSON 文本
    pub fn parse_str(&self, text: &str) -> ExtractResult<TabularSnapshot> {
        let body = Self::strip_jsonp(text);
        let value: Value = serde_json::from_str(body)?;

        let table_value = match value {
            Value::Object(mut obj) => {
                if let Some(table) = obj.remove("table") {
                    table
                } else if obj.contains_key("rows") {
                    Value::Object(obj)
                } else {
                    return Err(ExtractError::NotTabular(
                        "JSON 对象缺少 table/rows 字段".to_string(),
                    ));
                }
            }
            Value::Array(items) => return Self::from_matrix(items),
            other => {
                return Err(ExtractError::NotTabular(format!(
                    "期望对象或数组,实际为 {}",
                    Self::kind_of(&other)
                )))
            }
        };

        let table: JsonTable = serde_json::from_value(table_value)?;
        let mut rows = Vec::with_capacity(table.rows.len());
        for (row_index, row) in table.rows.into_iter().enumerate() {
            let cells = row
                .c
                .into_iter()
                .map(|cell| match cell {
                    Some(cell) => Cell::with_formatted(Self::scalar_text(&cell.v), cell.f),
                    None => Cell::empty(),
                })
                .collect();
            push_row(&mut rows, RawRow::new(row_index, cells));
        }

        Ok(TabularSnapshot::new(rows))
    }

    /// 二维数组
    fn from_matrix(items: Vec<Value>) -> ExtractResult<TabularSnapshot> {
        let mut rows = Vec::with_capacity(items.len());
        for (row_index, item) in items.into_iter().enumerate() {
            let Value::Array(values) = item else {
                return Err(ExtractError::NotTabular(format!(
                    "第 {} 行不是数组",
                    row_index
                )));
            };
            let cells = values
                .iter()
                .map(|v| Cell::with_formatted(Self::scalar_text(v), None))
                .collect();
            push_row(&mut rows, RawRow::new(row_index, cells));
        }
        Ok(TabularSnapshot::new(rows))
    }

    /// 去掉 `callback(...);` 形式的 JSONP 包装
    fn strip_jsonp(text: &str) -> &str {
        let trimmed = text.trim();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            return trimmed;
        }
        match (trimmed.find('('), trimmed.rfind(')')) {
            (Some(start), Some(end)) if start < end => &trimmed[start + 1..end],
            _ => trimmed,
        }
    }

    fn scalar_text(value: &Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => Some(other.to_string()),
        }
    }

    fn kind_of(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl SnapshotParser for JsonSnapshotParser {
    fn parse_snapshot(&self, file_path: &Path) -> ExtractResult<TabularSnapshot> {
        check_file(file_path, &["json"])?;
        let text = std::fs::read_to_string(file_path)?;
        self.parse_str(&text)
    }
}

// ==========================================
// 通用解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalSnapshotParser;

impl SnapshotParser for UniversalSnapshotParser {
    fn parse_snapshot(&self, file_path: &Path) -> ExtractResult<TabularSnapshot> {
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvSnapshotParser.parse_snapshot(file_path),
            "xlsx" | "xls" => ExcelSnapshotParser.parse_snapshot(file_path),
            "json" => JsonSnapshotParser.parse_snapshot(file_path),
            _ => Err(ExtractError::UnsupportedFormat(ext)),
        }
    }
}
