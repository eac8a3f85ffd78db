// ==========================================
// 采购全流程跟踪系统 - 领域类型定义
// ==========================================
// 职责: 阶段、对账类别、数据集合等枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 流程阶段 (Stage)
// ==========================================
// 严格全序: S1 < S2 < ... < Sn < COMPLETED
// At(i) 中的 i 为阶段表中的零基下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    At(usize), // 进行中的阶段
    Completed, // 全部阶段已完成
}

impl Stage {
    /// 初始阶段（S1）
    pub fn initial() -> Self {
        Stage::At(0)
    }

    /// 阶段下标（COMPLETED 返回 None）
    pub fn index(&self) -> Option<usize> {
        match self {
            Stage::At(idx) => Some(*idx),
            Stage::Completed => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Stage::Completed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::At(idx) => write!(f, "S{}", idx + 1),
            Stage::Completed => write!(f, "COMPLETED"),
        }
    }
}

// ==========================================
// 对账差异类别 (Mismatch Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MismatchCategory {
    Rate,        // 单价不符
    Quantity,    // 数量不符
    Composition, // 成分不符
}

impl MismatchCategory {
    pub const ALL: [MismatchCategory; 3] = [
        MismatchCategory::Rate,
        MismatchCategory::Quantity,
        MismatchCategory::Composition,
    ];

    /// 从字符串解析类别
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "RATE" => Some(MismatchCategory::Rate),
            "QUANTITY" => Some(MismatchCategory::Quantity),
            "COMPOSITION" => Some(MismatchCategory::Composition),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            MismatchCategory::Rate => "RATE",
            MismatchCategory::Quantity => "QUANTITY",
            MismatchCategory::Composition => "COMPOSITION",
        }
    }

    /// 国际化文案键
    pub fn i18n_key(&self) -> &'static str {
        match self {
            MismatchCategory::Rate => "mismatch.rate",
            MismatchCategory::Quantity => "mismatch.quantity",
            MismatchCategory::Composition => "mismatch.composition",
        }
    }
}

impl fmt::Display for MismatchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 数据集合 (Collection)
// ==========================================
// 外部表格数据源中的三张表
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Collection {
    Lift,      // 提货/账务表
    Orders,    // 订单表
    Materials, // 物料规格表
}

impl Collection {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Collection::Lift => "LIFT",
            Collection::Orders => "ORDERS",
            Collection::Materials => "MATERIALS",
        }
    }

    /// 是否为参考数据（订单 / 物料规格）
    pub fn is_reference(&self) -> bool {
        !matches!(self, Collection::Lift)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}
