// ==========================================
// 采购全流程跟踪系统 - 刷新管道
// ==========================================
// 流程:
// 1. 并发拉取 提货 / 订单 / 物料规格 三份快照,记录各自采集时刻
// 2. 跳过表头,按位置表抽取类型化记录
// 3. 逐记录推断阶段,整批对账
// 4. 检查快照采集间隔（仅告警,不拒绝）
// 红线: 提货快照失败 → 错误; 参考数据失败 → 降级为不可用状态;
//       任一快照不是表格结构 → 错误
// ==========================================

use crate::config::settings::EngineSettings;
use crate::domain::reconciliation::{ReconciliationSummary, ReferenceCollection};
use crate::domain::record::{ProcurementRecord, TabularSnapshot};
use crate::domain::stage::StageTable;
use crate::domain::types::{Collection, Stage};
use crate::engine::delay::{StageDelay, StageDelayCalculator};
use crate::engine::key_matcher::KeyMatcher;
use crate::engine::reconciliation::ReconciliationEngine;
use crate::engine::stage_resolver::StageResolver;
use crate::extractor::error::{ExtractError, ExtractResult};
use crate::extractor::field_extractor::FieldExtractor;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::source::SnapshotSource;
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use futures::future::join3;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

// ==========================================
// 刷新结果
// ==========================================

/// 单份快照的采集信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotStamp {
    pub collection: Collection,
    pub captured_at: DateTime<Utc>,
    pub rows: usize, // 跳过表头后的行数
    pub available: bool,
}

/// 同一次刷新内快照采集时刻的最大间隔
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSkew {
    pub skew_secs: i64,
    pub limit_secs: i64,
    pub exceeded: bool,
}

impl SnapshotSkew {
    /// 仅统计成功拉取的快照
    pub fn measure(stamps: &[SnapshotStamp], limit_secs: i64) -> Self {
        let times: Vec<DateTime<Utc>> = stamps
            .iter()
            .filter(|s| s.available)
            .map(|s| s.captured_at)
            .collect();

        let skew_secs = match (times.iter().min(), times.iter().max()) {
            (Some(earliest), Some(latest)) => latest.signed_duration_since(*earliest).num_seconds(),
            _ => 0,
        };

        Self {
            skew_secs,
            limit_secs,
            exceeded: skew_secs > limit_secs,
        }
    }
}

/// 单条记录的阶段推断结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordStage {
    pub record_id: String,
    pub stage: Stage,
    pub stage_code: String,
    /// 推断阶段本身已完成（S1 回退时可能为 true）
    pub current_stage_completed: bool,
    pub delay: Option<StageDelay>,
}

/// 各阶段记录数（含零计数阶段,按阶段顺序）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTally {
    pub stage: Stage,
    pub code: String,
    pub count: usize,
}

/// 一次刷新的完整输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshOutcome {
    pub refresh_id: String,
    pub snapshots: Vec<SnapshotStamp>,
    pub snapshot_skew: SnapshotSkew,
    pub records: Vec<ProcurementRecord>,
    pub stages: Vec<RecordStage>,
    pub stage_tally: Vec<StageTally>,
    pub summary: ReconciliationSummary,
}

impl RefreshOutcome {
    pub fn stage_of(&self, record_id: &str) -> Option<Stage> {
        self.stages
            .iter()
            .find(|s| s.record_id == record_id)
            .map(|s| s.stage)
    }

    pub fn snapshot(&self, collection: Collection) -> Option<&SnapshotStamp> {
        self.snapshots.iter().find(|s| s.collection == collection)
    }

    pub fn tally_of(&self, stage: Stage) -> usize {
        self.stage_tally
            .iter()
            .find(|t| t.stage == stage)
            .map(|t| t.count)
            .unwrap_or(0)
    }
}

// ==========================================
// RefreshPipeline
// ==========================================
pub struct RefreshPipeline<S: SnapshotSource + ?Sized> {
    source: Arc<S>,
    settings: EngineSettings,
    extractor: FieldExtractor,
    resolver: StageResolver,
    engine: ReconciliationEngine,
}

impl<S: SnapshotSource + ?Sized> RefreshPipeline<S> {
    /// 创建刷新管道
    ///
    /// # 错误
    /// - 位置表缺少必填字段
    pub fn new(source: Arc<S>, settings: EngineSettings) -> PipelineResult<Self> {
        let extractor = FieldExtractor::new(
            settings.lift_schema.clone(),
            settings.order_schema.clone(),
            settings.material_schema.clone(),
        )?;

        let unmapped = settings.unmapped_stage_fields();
        if !unmapped.is_empty() {
            warn!(fields = ?unmapped, "阶段表引用了位置表中不存在的字段,这些字段恒视为缺省");
        }

        let resolver = StageResolver::new(settings.stage_table.clone());
        let engine = ReconciliationEngine::new(
            settings.tolerance,
            KeyMatcher::with_known_prefixes(&settings.key_match_prefixes),
        );

        Ok(Self {
            source,
            settings,
            extractor,
            resolver,
            engine,
        })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn stage_table(&self) -> &StageTable {
        self.resolver.table()
    }

    /// 执行一次完整刷新（主入口）
    pub async fn refresh(&self) -> PipelineResult<RefreshOutcome> {
        let refresh_id = Uuid::new_v4().to_string();

        // === 步骤 1: 并发拉取 ===
        let (lift, orders, materials) = join3(
            self.fetch_stamped(Collection::Lift),
            self.fetch_stamped(Collection::Orders),
            self.fetch_stamped(Collection::Materials),
        )
        .await;

        // === 步骤 2: 抽取 ===
        let (lift_result, lift_captured_at) = lift;
        let lift_snapshot = lift_result
            .map_err(PipelineError::LiftUnavailable)?
            .skip_header_rows(self.settings.header_rows(Collection::Lift));
        let records = self.extractor.extract_lift_records(&lift_snapshot);

        let (order_result, orders_captured_at) = orders;
        let (order_refs, order_rows) =
            self.load_reference(&refresh_id, Collection::Orders, order_result, |snapshot| {
                self.extractor.extract_orders(snapshot)
            })?;

        let (material_result, materials_captured_at) = materials;
        let (material_refs, material_rows) = self.load_reference(
            &refresh_id,
            Collection::Materials,
            material_result,
            |snapshot| self.extractor.extract_materials(snapshot),
        )?;

        let snapshots = vec![
            SnapshotStamp {
                collection: Collection::Lift,
                captured_at: lift_captured_at,
                rows: lift_snapshot.len(),
                available: true,
            },
            SnapshotStamp {
                collection: Collection::Orders,
                captured_at: orders_captured_at,
                rows: order_rows,
                available: matches!(order_refs, ReferenceCollection::Loaded(_)),
            },
            SnapshotStamp {
                collection: Collection::Materials,
                captured_at: materials_captured_at,
                rows: material_rows,
                available: matches!(material_refs, ReferenceCollection::Loaded(_)),
            },
        ];

        // === 步骤 3: 快照间隔检查 ===
        let snapshot_skew =
            SnapshotSkew::measure(&snapshots, self.settings.snapshot_skew_limit_secs);
        if snapshot_skew.exceeded {
            warn!(
                refresh_id = %refresh_id,
                skew_secs = snapshot_skew.skew_secs,
                limit_secs = snapshot_skew.limit_secs,
                "快照采集间隔超出上限,对账结果可能混用了不同时刻的数据"
            );
        }

        // === 步骤 4: 阶段推断 + 对账 ===
        let now = lift_captured_at.with_timezone(&Local).naive_local();
        let stages = self.resolve_stages(&records, now);
        let stage_tally = self.tally(&stages);
        let summary = self.engine.reconcile(&records, &order_refs, &material_refs);

        info!(
            refresh_id = %refresh_id,
            records = records.len(),
            rate = summary.counts.rate,
            quantity = summary.counts.quantity,
            composition = summary.counts.composition,
            total = summary.counts.total(),
            degraded = summary.is_degraded(),
            "刷新完成"
        );

        Ok(RefreshOutcome {
            refresh_id,
            snapshots,
            snapshot_skew,
            records,
            stages,
            stage_tally,
            summary,
        })
    }

    /// 逐记录推断阶段
    ///
    /// # 参数
    /// - now: 延误计算的参照时刻
    pub fn resolve_stages(&self, records: &[ProcurementRecord], now: NaiveDateTime) -> Vec<RecordStage> {
        let table = self.resolver.table();
        records
            .iter()
            .map(|record| {
                let stage = self.resolver.resolve(record);
                RecordStage {
                    record_id: record.id.clone(),
                    stage,
                    stage_code: table.code_of(stage).to_string(),
                    current_stage_completed: self.resolver.is_current_stage_completed(record),
                    delay: StageDelayCalculator::delay(record, stage, table, now),
                }
            })
            .collect()
    }

    fn tally(&self, stages: &[RecordStage]) -> Vec<StageTally> {
        let table = self.resolver.table();
        (0..table.len())
            .map(Stage::At)
            .chain(std::iter::once(Stage::Completed))
            .map(|stage| StageTally {
                stage,
                code: table.code_of(stage).to_string(),
                count: stages.iter().filter(|s| s.stage == stage).count(),
            })
            .collect()
    }

    async fn fetch_stamped(
        &self,
        collection: Collection,
    ) -> (ExtractResult<TabularSnapshot>, DateTime<Utc>) {
        let result = self.source.fetch(collection).await;
        (result, Utc::now())
    }

    /// 参考数据: 拉取失败时转为 Unavailable 并告警; 非表格内容直接报错
    fn load_reference<T>(
        &self,
        refresh_id: &str,
        collection: Collection,
        result: ExtractResult<TabularSnapshot>,
        extract: impl FnOnce(&TabularSnapshot) -> Vec<T>,
    ) -> PipelineResult<(ReferenceCollection<T>, usize)> {
        match result {
            Ok(snapshot) => {
                let snapshot = snapshot.skip_header_rows(self.settings.header_rows(collection));
                let rows = snapshot.len();
                Ok((ReferenceCollection::Loaded(extract(&snapshot)), rows))
            }
            Err(source @ ExtractError::NotTabular(_)) => {
                Err(PipelineError::ReferenceNotTabular { collection, source })
            }
            Err(e) => {
                warn!(
                    refresh_id = %refresh_id,
                    collection = %collection,
                    error = %e,
                    "参考数据不可用,相关对账项降级为零命中"
                );
                Ok((
                    ReferenceCollection::Unavailable {
                        reason: e.to_string(),
                    },
                    0,
                ))
            }
        }
    }
}
