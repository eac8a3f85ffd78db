// ==========================================
// 采购全流程跟踪系统 - 对账结果模型
// ==========================================
// 职责: 单记录差异报告 / 汇总计数 / 参考数据可用性
// 红线: 对账结果不落库,每次刷新重新计算
// ==========================================

use crate::domain::types::MismatchCategory;
use serde::{Deserialize, Serialize};

// ==========================================
// ReferenceCollection - 参考数据输入
// ==========================================
// 拉取失败时为 Unavailable,对应检查降级为零命中
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceCollection<T> {
    Loaded(Vec<T>),
    Unavailable { reason: String },
}

impl<T> ReferenceCollection<T> {
    pub fn entries(&self) -> &[T] {
        match self {
            ReferenceCollection::Loaded(items) => items,
            ReferenceCollection::Unavailable { .. } => &[],
        }
    }

    pub fn status(&self) -> ReferenceStatus {
        match self {
            ReferenceCollection::Loaded(items) => ReferenceStatus::Available { rows: items.len() },
            ReferenceCollection::Unavailable { reason } => ReferenceStatus::Unavailable {
                reason: reason.clone(),
            },
        }
    }
}

// ==========================================
// ReferenceStatus - 参考数据可用性
// ==========================================
// 用于区分"无差异"与"参考数据缺失导致无法检测"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceStatus {
    Available { rows: usize },
    Unavailable { reason: String },
}

impl ReferenceStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, ReferenceStatus::Available { .. })
    }
}

// ==========================================
// 各项检查明细
// ==========================================

/// 单价检查明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateCheck {
    pub matched_order_key: String,
    pub record_price: f64,
    pub order_rate: f64,
    pub delta: f64,
}

/// 数量检查明细（记录内部比较）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityCheck {
    pub lifted_qty: f64,
    pub actual_qty: f64,
    pub delta: f64,
}

/// 成分三元组（氧化铝 / 铁 / AP）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub alumina: f64,
    pub iron: f64,
    pub ap: f64,
}

impl Composition {
    pub fn values(&self) -> [f64; 3] {
        [self.alumina, self.iron, self.ap]
    }

    /// 逐项绝对差
    pub fn abs_delta(&self, other: &Composition) -> Composition {
        Composition {
            alumina: (self.alumina - other.alumina).abs(),
            iron: (self.iron - other.iron).abs(),
            ap: (self.ap - other.ap).abs(),
        }
    }
}

/// 成分检查明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionCheck {
    pub matched_material: String,
    pub expected: Composition,
    pub actual: Composition,
    pub delta: Composition,
}

// ==========================================
// MismatchReport - 单记录差异报告
// ==========================================
// 三项检查互相独立;被跳过的检查明细为 None 且不计差异
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MismatchReport {
    pub record_id: String,
    pub rate_mismatch: bool,
    pub quantity_mismatch: bool,
    pub composition_mismatch: bool,
    pub rate: Option<RateCheck>,
    pub quantity: Option<QuantityCheck>,
    pub composition: Option<CompositionCheck>,
}

impl MismatchReport {
    pub fn new(record_id: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            rate_mismatch: false,
            quantity_mismatch: false,
            composition_mismatch: false,
            rate: None,
            quantity: None,
            composition: None,
        }
    }

    pub fn is_mismatch(&self, category: MismatchCategory) -> bool {
        match category {
            MismatchCategory::Rate => self.rate_mismatch,
            MismatchCategory::Quantity => self.quantity_mismatch,
            MismatchCategory::Composition => self.composition_mismatch,
        }
    }

    pub fn has_any_mismatch(&self) -> bool {
        self.rate_mismatch || self.quantity_mismatch || self.composition_mismatch
    }

    pub fn categories(&self) -> Vec<MismatchCategory> {
        MismatchCategory::ALL
            .into_iter()
            .filter(|c| self.is_mismatch(*c))
            .collect()
    }
}

// ==========================================
// MismatchCounts - 汇总计数
// ==========================================
// 一条记录可同时计入多个类别
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MismatchCounts {
    pub rate: usize,
    pub quantity: usize,
    pub composition: usize,
}

impl MismatchCounts {
    pub fn record(&mut self, report: &MismatchReport) {
        self.rate += usize::from(report.rate_mismatch);
        self.quantity += usize::from(report.quantity_mismatch);
        self.composition += usize::from(report.composition_mismatch);
    }

    pub fn get(&self, category: MismatchCategory) -> usize {
        match category {
            MismatchCategory::Rate => self.rate,
            MismatchCategory::Quantity => self.quantity,
            MismatchCategory::Composition => self.composition,
        }
    }

    /// 三类计数之和（通知角标）
    pub fn total(&self) -> usize {
        self.rate + self.quantity + self.composition
    }
}

impl<'a> FromIterator<&'a MismatchReport> for MismatchCounts {
    fn from_iter<I: IntoIterator<Item = &'a MismatchReport>>(iter: I) -> Self {
        let mut counts = MismatchCounts::default();
        for report in iter {
            counts.record(report);
        }
        counts
    }
}

// ==========================================
// ReconciliationSummary - 一次对账的完整输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub reports: Vec<MismatchReport>,
    pub counts: MismatchCounts,
    pub order_status: ReferenceStatus,
    pub material_status: ReferenceStatus,
}

impl ReconciliationSummary {
    pub fn report_for(&self, record_id: &str) -> Option<&MismatchReport> {
        self.reports.iter().find(|r| r.record_id == record_id)
    }

    /// 是否存在参考数据缺失（计数可能偏低）
    pub fn is_degraded(&self) -> bool {
        !self.order_status.is_available() || !self.material_status.is_available()
    }
}
