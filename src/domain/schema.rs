// ==========================================
// 采购全流程跟踪系统 - 字段位置表
// ==========================================
// 职责: 字段名 → 零基列位置 的声明式映射
// 红线: 调用方一律按字段名寻址,不在调用处写列号
// ==========================================
// 注: 外部表格无列名保证,位置表需与数据源列顺序保持一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// 字段名常量
// ==========================================

/// 提货/账务表字段
pub mod lift_fields {
    pub const LIFT_ID: &str = "lift_id";
    pub const ORDER_KEY: &str = "order_key";
    pub const VENDOR_NAME: &str = "vendor_name";
    pub const MATERIAL_NAME: &str = "material_name";
    pub const LIFTED_QTY: &str = "lifted_qty";
    pub const PRICE: &str = "price";
    pub const LIFT_DATE: &str = "lift_date";

    // 收货
    pub const RECEIPT_PLANNED: &str = "receipt_planned";
    pub const RECEIPT_ACTUAL: &str = "receipt_actual";
    pub const ACTUAL_QTY: &str = "actual_qty";

    // 化验
    pub const LAB_PLANNED: &str = "lab_planned";
    pub const LAB_ACTUAL: &str = "lab_actual";
    pub const ALUMINA: &str = "alumina";
    pub const IRON: &str = "iron";
    pub const AP: &str = "ap";

    // 开票
    pub const BILL_PLANNED: &str = "bill_planned";
    pub const BILL_ACTUAL: &str = "bill_actual";

    // 审核
    pub const AUDIT_PLANNED: &str = "audit_planned";
    pub const AUDIT_ACTUAL: &str = "audit_actual";

    // 整改
    pub const RECTIFY_PLANNED: &str = "rectify_planned";
    pub const RECTIFY_ACTUAL: &str = "rectify_actual";

    // 入账
    pub const TALLY_PLANNED: &str = "tally_planned";
    pub const TALLY_ACTUAL: &str = "tally_actual";
}

/// 订单表字段
pub mod order_fields {
    pub const ORDER_KEY: &str = "order_key";
    pub const VENDOR_NAME: &str = "vendor_name";
    pub const MATERIAL_NAME: &str = "material_name";
    pub const RATE: &str = "rate";
    pub const EXPECTED_ALUMINA: &str = "expected_alumina";
    pub const EXPECTED_IRON: &str = "expected_iron";
}

/// 物料规格表字段
pub mod material_fields {
    pub const MATERIAL_NAME: &str = "material_name";
    pub const ALUMINA: &str = "alumina";
    pub const IRON: &str = "iron";
    pub const AP: &str = "ap";
}

// ==========================================
// FieldSchema - 位置表
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSchema {
    positions: BTreeMap<String, usize>,
}

impl FieldSchema {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        Self {
            positions: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn position(&self, field: &str) -> Option<usize> {
        self.positions.get(field).copied()
    }

    /// 按列位置升序遍历 (字段名, 位置)
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .positions
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        entries.sort_by_key(|(_, pos)| *pos);
        entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// 返回位置表中缺失的必填字段
    pub fn missing_fields<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .filter(|f| !self.positions.contains_key(**f))
            .copied()
            .collect()
    }

    // ===== 默认位置表 =====

    /// 提货/账务表默认位置表
    pub fn default_lift() -> Self {
        use lift_fields::*;
        Self::new([
            (LIFT_ID, 0),
            (ORDER_KEY, 1),
            (VENDOR_NAME, 2),
            (MATERIAL_NAME, 3),
            (LIFTED_QTY, 4),
            (PRICE, 5),
            (LIFT_DATE, 6),
            (RECEIPT_PLANNED, 7),
            (RECEIPT_ACTUAL, 8),
            (ACTUAL_QTY, 9),
            (LAB_PLANNED, 10),
            (LAB_ACTUAL, 11),
            (ALUMINA, 12),
            (IRON, 13),
            (AP, 14),
            (BILL_PLANNED, 15),
            (BILL_ACTUAL, 16),
            (AUDIT_PLANNED, 17),
            (AUDIT_ACTUAL, 18),
            (RECTIFY_PLANNED, 19),
            (RECTIFY_ACTUAL, 20),
            (TALLY_PLANNED, 21),
            (TALLY_ACTUAL, 22),
        ])
    }

    /// 订单表默认位置表
    pub fn default_orders() -> Self {
        use order_fields::*;
        Self::new([
            (ORDER_KEY, 0),
            (VENDOR_NAME, 1),
            (MATERIAL_NAME, 2),
            (RATE, 3),
            (EXPECTED_ALUMINA, 4),
            (EXPECTED_IRON, 5),
        ])
    }

    /// 物料规格表默认位置表
    pub fn default_materials() -> Self {
        use material_fields::*;
        Self::new([(MATERIAL_NAME, 0), (ALUMINA, 1), (IRON, 2), (AP, 3)])
    }
}
