// ==========================================
// 采购全流程跟踪系统 - 阶段延误计算
// ==========================================
// 职责: 当前阶段自触发时刻起的已耗时长（展示用派生值）
// 红线: 当前时刻由调用方传入,不在此读取系统时间
// ==========================================

use crate::domain::record::ProcurementRecord;
use crate::domain::stage::StageTable;
use crate::domain::types::Stage;
use crate::extractor::date_decoder::DateDecoder;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 阶段延误
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDelay {
    pub stage: Stage,
    pub triggered_at: NaiveDateTime,
    pub elapsed_secs: i64,
}

impl StageDelay {
    pub fn elapsed(&self) -> Duration {
        Duration::seconds(self.elapsed_secs)
    }

    /// 已耗天数（向下取整）
    pub fn elapsed_days(&self) -> i64 {
        self.elapsed().num_days()
    }
}

pub struct StageDelayCalculator;

impl StageDelayCalculator {
    /// 计算当前阶段延误
    ///
    /// # 返回
    /// - None: 已完成 / 触发字段缺省 / 触发字段不是可解析的日期
    pub fn delay(
        record: &ProcurementRecord,
        stage: Stage,
        table: &StageTable,
        now: NaiveDateTime,
    ) -> Option<StageDelay> {
        if stage.is_completed() {
            return None;
        }
        let spec = table.spec_for(stage)?;
        let raw = record.value(&spec.trigger_field)?;
        let triggered_at = DateDecoder::decode(raw).timestamp()?;

        Some(StageDelay {
            stage,
            triggered_at,
            elapsed_secs: now.signed_duration_since(triggered_at).num_seconds().max(0),
        })
    }
}
