// ==========================================
// 采购全流程跟踪系统 - 对账引擎
// ==========================================
// 职责: 提货记录 ↔ 订单 / 物料规格 三项独立核对
// - 单价: 记录单价 vs 匹配订单单价
// - 数量: 提货数量 vs 实收数量（记录内部）
// - 成分: 化验结果 vs 匹配物料规格（氧化铝 / 铁 / AP）
// 红线: 参考数据缺失只降级为零命中,不报错
// ==========================================

use crate::domain::reconciliation::{
    Composition, CompositionCheck, MismatchCounts, MismatchReport, QuantityCheck, RateCheck,
    ReconciliationSummary, ReferenceCollection,
};
use crate::domain::record::{MaterialSpec, OrderRecord, ProcurementRecord};
use crate::domain::schema::lift_fields;
use crate::engine::key_matcher::{KeyIndex, KeyMatcher};

/// 默认容差（三项检查共用）
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// 浮点比较余量：50.01 - 50 在 f64 中略小于 0.01,边界需按"含等于"处理
const DELTA_EPSILON: f64 = 1e-9;

/// 差值是否达到容差（含等于）
pub fn exceeds_tolerance(delta: f64, tolerance: f64) -> bool {
    delta + DELTA_EPSILON >= tolerance
}

// ==========================================
// ReconciliationEngine
// ==========================================
#[derive(Debug, Clone)]
pub struct ReconciliationEngine {
    tolerance: f64,
    matcher: KeyMatcher,
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE, KeyMatcher::new())
    }
}

impl ReconciliationEngine {
    pub fn new(tolerance: f64, matcher: KeyMatcher) -> Self {
        Self { tolerance, matcher }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// 对一批记录执行对账（主入口）
    ///
    /// # 参数
    /// - records: 提货/账务记录
    /// - orders: 订单参考数据（可能不可用）
    /// - materials: 物料规格参考数据（可能不可用）
    pub fn reconcile(
        &self,
        records: &[ProcurementRecord],
        orders: &ReferenceCollection<OrderRecord>,
        materials: &ReferenceCollection<MaterialSpec>,
    ) -> ReconciliationSummary {
        let order_entries = orders.entries();
        let order_keys: Vec<&str> = order_entries.iter().map(|o| o.order_key.as_str()).collect();
        let order_index = self.matcher.index(&order_keys);

        let material_entries = materials.entries();
        let material_names: Vec<&str> = material_entries
            .iter()
            .map(|m| m.material_name.as_str())
            .collect();

        let reports: Vec<MismatchReport> = records
            .iter()
            .map(|record| {
                self.check_record(
                    record,
                    &order_index,
                    order_entries,
                    &material_names,
                    material_entries,
                )
            })
            .collect();

        let counts: MismatchCounts = reports.iter().collect();

        ReconciliationSummary {
            reports,
            counts,
            order_status: orders.status(),
            material_status: materials.status(),
        }
    }

    fn check_record(
        &self,
        record: &ProcurementRecord,
        order_index: &KeyIndex,
        orders: &[OrderRecord],
        material_names: &[&str],
        materials: &[MaterialSpec],
    ) -> MismatchReport {
        let mut report = MismatchReport::new(record.id.clone());

        let matched_order = order_index.find(&record.order_key).map(|m| &orders[m.index]);
        if let Some(check) = self.check_rate(record, matched_order) {
            report.rate_mismatch = exceeds_tolerance(check.delta, self.tolerance);
            report.rate = Some(check);
        }

        if let Some(check) = self.check_quantity(record) {
            report.quantity_mismatch = exceeds_tolerance(check.delta, self.tolerance);
            report.quantity = Some(check);
        }

        let matched_material =
            KeyMatcher::find_exact(&record.material_name, material_names).map(|idx| &materials[idx]);
        if let Some(check) = self.check_composition(record, matched_material) {
            report.composition_mismatch = self.is_composition_mismatch(&check);
            report.composition = Some(check);
        }

        report
    }

    // ==========================================
    // 单项检查（跳过时返回 None）
    // ==========================================

    /// 单价检查：任一侧单价缺省或 ≤ 0 时跳过
    pub fn check_rate(
        &self,
        record: &ProcurementRecord,
        order: Option<&OrderRecord>,
    ) -> Option<RateCheck> {
        let order = order?;
        let record_price = record.positive_number(lift_fields::PRICE)?;
        if order.rate <= 0.0 {
            return None;
        }

        Some(RateCheck {
            matched_order_key: order.order_key.clone(),
            record_price,
            order_rate: order.rate,
            delta: (record_price - order.rate).abs(),
        })
    }

    /// 数量检查：提货数量或实收数量缺省或 ≤ 0 时跳过
    pub fn check_quantity(&self, record: &ProcurementRecord) -> Option<QuantityCheck> {
        let lifted_qty = record.positive_number(lift_fields::LIFTED_QTY)?;
        let actual_qty = record.positive_number(lift_fields::ACTUAL_QTY)?;

        Some(QuantityCheck {
            lifted_qty,
            actual_qty,
            delta: (lifted_qty - actual_qty).abs(),
        })
    }

    /// 成分检查：物料名称未匹配时跳过；缺省成分按 0 计
    pub fn check_composition(
        &self,
        record: &ProcurementRecord,
        spec: Option<&MaterialSpec>,
    ) -> Option<CompositionCheck> {
        let spec = spec?;
        let expected = Composition {
            alumina: spec.alumina,
            iron: spec.iron,
            ap: spec.ap,
        };
        let actual = Composition {
            alumina: record.number(lift_fields::ALUMINA),
            iron: record.number(lift_fields::IRON),
            ap: record.number(lift_fields::AP),
        };

        Some(CompositionCheck {
            matched_material: spec.material_name.clone(),
            delta: actual.abs_delta(&expected),
            expected,
            actual,
        })
    }

    /// 成分差异判定：至少一项差值达到容差,且六个值中至少一个非零
    pub fn is_composition_mismatch(&self, check: &CompositionCheck) -> bool {
        let any_delta = check
            .delta
            .values()
            .iter()
            .any(|d| exceeds_tolerance(*d, self.tolerance));
        let any_nonzero = check
            .expected
            .values()
            .iter()
            .chain(check.actual.values().iter())
            .any(|v| *v != 0.0);

        any_delta && any_nonzero
    }
}
