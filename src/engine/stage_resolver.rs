// ==========================================
// 采购全流程跟踪系统 - 阶段推断引擎
// ==========================================
// 职责: 由成对的 触发/完成 字段推断记录当前所处阶段
// 红线: 无状态、无副作用、不读取系统时间
// ==========================================
// 规则:
// 1. 全部阶段的完成字段均有值 → COMPLETED
// 2. 自后向前扫描,首个"已触发且未完成"的阶段即当前阶段
// 3. 均未命中 → S1（即使 S1 已完成,见 is_current_stage_completed）
// ==========================================

use crate::domain::record::ProcurementRecord;
use crate::domain::stage::StageTable;
use crate::domain::types::Stage;

// ==========================================
// FieldPresence - 字段有无判定
// ==========================================
pub trait FieldPresence {
    fn has_value(&self, field: &str) -> bool;
}

impl FieldPresence for ProcurementRecord {
    fn has_value(&self, field: &str) -> bool {
        ProcurementRecord::has_value(self, field)
    }
}

// ==========================================
// StageResolver
// ==========================================
#[derive(Debug, Clone)]
pub struct StageResolver {
    table: StageTable,
}

impl StageResolver {
    pub fn new(table: StageTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &StageTable {
        &self.table
    }

    /// 推断当前阶段
    pub fn resolve<R: FieldPresence + ?Sized>(&self, record: &R) -> Stage {
        // === 规则 1: 全部完成 ===
        if self
            .table
            .iter()
            .all(|spec| record.has_value(&spec.completion_field))
        {
            return Stage::Completed;
        }

        // === 规则 2: 自后向前找已触发未完成的阶段 ===
        let current = self.table.iter().enumerate().rev().find(|(_, spec)| {
            record.has_value(&spec.trigger_field) && !record.has_value(&spec.completion_field)
        });

        // === 规则 3: 回退到 S1 ===
        match current {
            Some((idx, _)) => Stage::At(idx),
            None => Stage::initial(),
        }
    }

    /// 指定阶段的完成字段是否有值（COMPLETED 恒为 true）
    pub fn is_stage_completed<R: FieldPresence + ?Sized>(&self, record: &R, stage: Stage) -> bool {
        match self.table.spec_for(stage) {
            Some(spec) => record.has_value(&spec.completion_field),
            None => true,
        }
    }

    /// 推断出的阶段本身是否已完成
    ///
    /// 规则 3 的回退可能返回一个已完成的 S1,调用方需借此区分
    pub fn is_current_stage_completed<R: FieldPresence + ?Sized>(&self, record: &R) -> bool {
        self.is_stage_completed(record, self.resolve(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::StageSpec;
    use std::collections::HashSet;

    struct Fields(HashSet<&'static str>);

    impl FieldPresence for Fields {
        fn has_value(&self, field: &str) -> bool {
            self.0.contains(field)
        }
    }

    fn fields(names: &[&'static str]) -> Fields {
        Fields(names.iter().copied().collect())
    }

    fn three_stage_resolver() -> StageResolver {
        StageResolver::new(
            StageTable::new(vec![
                StageSpec::new("A", "a", "t1", "c1"),
                StageSpec::new("B", "b", "t2", "c2"),
                StageSpec::new("C", "c", "t3", "c3"),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_all_completed() {
        let resolver = three_stage_resolver();
        assert_eq!(resolver.resolve(&fields(&["c1", "c2", "c3"])), Stage::Completed);
    }

    #[test]
    fn test_nothing_triggered_falls_back_to_first() {
        let resolver = three_stage_resolver();
        assert_eq!(resolver.resolve(&fields(&[])), Stage::At(0));
    }

    #[test]
    fn test_most_advanced_open_stage_wins() {
        let resolver = three_stage_resolver();
        let record = fields(&["t1", "t2", "t3", "c1"]);
        assert_eq!(resolver.resolve(&record), Stage::At(2));
    }

    #[test]
    fn test_first_stage_completed_fallback_is_flagged() {
        let resolver = three_stage_resolver();
        let record = fields(&["t1", "c1"]);
        assert_eq!(resolver.resolve(&record), Stage::At(0));
        assert!(resolver.is_current_stage_completed(&record));

        let record = fields(&["t1"]);
        assert!(!resolver.is_current_stage_completed(&record));
    }

    #[test]
    fn test_completed_without_triggers() {
        // 完成字段齐全即 COMPLETED,与触发字段无关
        let resolver = three_stage_resolver();
        let record = fields(&["c1", "c2", "c3"]);
        assert!(resolver.is_stage_completed(&record, Stage::Completed));
        assert_eq!(resolver.resolve(&record), Stage::Completed);
    }
}
