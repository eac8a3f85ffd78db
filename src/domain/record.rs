// ==========================================
// 采购全流程跟踪系统 - 记录领域模型
// ==========================================
// 职责: 原始位置行 / 快照 / 规范化后的三类记录
// 红线: 记录每次刷新整体重建,不做原地修改
// ==========================================

use crate::extractor::numeric::parse_float;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// Cell - 单元格
// ==========================================
// 原始值与格式化显示值均可缺省
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub raw: Option<String>,       // 原始值
    pub formatted: Option<String>, // 格式化显示值
}

impl Cell {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            formatted: None,
        }
    }

    pub fn with_formatted(raw: Option<String>, formatted: Option<String>) -> Self {
        Self { raw, formatted }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// 取文本：优先原始值，原始值为空时退回格式化值
    pub fn text(&self) -> Option<&str> {
        fn pick(v: &Option<String>) -> Option<&str> {
            v.as_deref().map(str::trim).filter(|s| !s.is_empty())
        }
        pick(&self.raw).or_else(|| pick(&self.formatted))
    }
}

// ==========================================
// RawRow - 按位置寻址的原始行
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub row_index: usize, // 在快照中的零基行号（回写接口按此定位）
    pub cells: Vec<Cell>,
}

impl RawRow {
    pub fn new(row_index: usize, cells: Vec<Cell>) -> Self {
        Self { row_index, cells }
    }

    /// 由纯文本列构建（空串视为缺省）
    pub fn from_texts<S: AsRef<str>>(row_index: usize, values: &[S]) -> Self {
        let cells = values
            .iter()
            .map(|v| {
                let v = v.as_ref();
                if v.is_empty() {
                    Cell::empty()
                } else {
                    Cell::new(v)
                }
            })
            .collect();
        Self { row_index, cells }
    }

    pub fn cell(&self, position: usize) -> Option<&Cell> {
        self.cells.get(position)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.text().is_none())
    }
}

// ==========================================
// TabularSnapshot - 表格快照
// ==========================================
// 一次外部数据源物化的结果（矩阵,无列名保证）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabularSnapshot {
    pub rows: Vec<RawRow>,
}

impl TabularSnapshot {
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 丢弃顶部若干行（表头）
    pub fn skip_header_rows(mut self, count: usize) -> Self {
        let count = count.min(self.rows.len());
        self.rows.drain(..count);
        self
    }
}

// ==========================================
// ProcurementRecord - 提货/账务记录
// ==========================================
// 不变量: id 非空（抽取阶段过滤）
// fields 只保存非空值：空串即"缺省"，字面量 "0" 即"存在"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcurementRecord {
    pub id: String,                      // 提货单号
    pub order_key: String,               // 来源订单号（跨表匹配用）
    pub material_name: String,           // 物料名称（自由文本）
    pub row_index: usize,                // 源行号
    pub fields: BTreeMap<String, String>, // 字段名 → 原始文本
}

impl ProcurementRecord {
    pub fn value(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn has_value(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// 数值读取，缺省或无法解析均返回 0.0
    pub fn number(&self, field: &str) -> f64 {
        self.value(field).and_then(parse_float).unwrap_or(0.0)
    }

    /// 正数读取（缺省或 ≤ 0 返回 None）
    pub fn positive_number(&self, field: &str) -> Option<f64> {
        let n = self.number(field);
        if n > 0.0 {
            Some(n)
        } else {
            None
        }
    }
}

// ==========================================
// OrderRecord - 订单参考数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_key: String,
    pub rate: f64,             // 订单单价（缺省为 0）
    pub expected_alumina: f64, // 订单约定氧化铝含量（%）
    pub expected_iron: f64,    // 订单约定铁含量（%）
    pub row_index: usize,
}

// ==========================================
// MaterialSpec - 物料规格参考数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    pub material_name: String,
    pub alumina: f64, // 氧化铝（%）
    pub iron: f64,    // 铁（%）
    pub ap: f64,      // 显气孔率 AP（%）
    pub row_index: usize,
}
