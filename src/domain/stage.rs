// ==========================================
// 采购全流程跟踪系统 - 阶段表
// ==========================================
// 职责: 有序的 (触发字段, 完成字段) 阶段配置
// 红线: 阶段拓扑是数据,不是分支代码
// ==========================================

use crate::domain::schema::lift_fields;
use crate::domain::types::Stage;
use serde::{Deserialize, Serialize};

// ==========================================
// StageSpec - 单个阶段定义
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSpec {
    pub code: String,             // 阶段代码（如 RECEIPT）
    pub label: String,            // 显示名称
    pub trigger_field: String,    // 触发字段：非空即进入本阶段
    pub completion_field: String, // 完成字段：非空即本阶段完成
}

impl StageSpec {
    pub fn new(
        code: impl Into<String>,
        label: impl Into<String>,
        trigger_field: impl Into<String>,
        completion_field: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            trigger_field: trigger_field.into(),
            completion_field: completion_field.into(),
        }
    }
}

// ==========================================
// StageTable - 有序阶段表（非空）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StageTable {
    stages: Vec<StageSpec>,
}

impl StageTable {
    /// 构建阶段表，空列表返回 None
    pub fn new(stages: Vec<StageSpec>) -> Option<Self> {
        if stages.is_empty() {
            None
        } else {
            Some(Self { stages })
        }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// 非空由构造保证
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn first(&self) -> &StageSpec {
        &self.stages[0]
    }

    pub fn get(&self, index: usize) -> Option<&StageSpec> {
        self.stages.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StageSpec> {
        self.stages.iter()
    }

    /// 取阶段对应的定义（COMPLETED 返回 None）
    pub fn spec_for(&self, stage: Stage) -> Option<&StageSpec> {
        stage.index().and_then(|idx| self.stages.get(idx))
    }

    /// 按阶段代码查找（忽略大小写）
    pub fn stage_by_code(&self, code: &str) -> Option<Stage> {
        self.stages
            .iter()
            .position(|s| s.code.eq_ignore_ascii_case(code.trim()))
            .map(Stage::At)
    }

    /// 阶段显示代码（COMPLETED 固定为 "COMPLETED"）
    pub fn code_of(&self, stage: Stage) -> &str {
        match self.spec_for(stage) {
            Some(spec) => spec.code.as_str(),
            None => "COMPLETED",
        }
    }

    /// 默认提货/账务流程: 收货 → 化验 → 开票 → 审核 → 整改 → 入账
    pub fn default_lift() -> Self {
        use lift_fields::*;
        Self {
            stages: vec![
                StageSpec::new("RECEIPT", "收货", RECEIPT_PLANNED, RECEIPT_ACTUAL),
                StageSpec::new("LAB_TEST", "化验", LAB_PLANNED, LAB_ACTUAL),
                StageSpec::new("BILLING", "开票", BILL_PLANNED, BILL_ACTUAL),
                StageSpec::new("AUDIT", "审核", AUDIT_PLANNED, AUDIT_ACTUAL),
                StageSpec::new("RECTIFICATION", "整改", RECTIFY_PLANNED, RECTIFY_ACTUAL),
                StageSpec::new("FINAL_ENTRY", "入账", TALLY_PLANNED, TALLY_ACTUAL),
            ],
        }
    }
}

impl<'de> Deserialize<'de> for StageTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let stages = Vec::<StageSpec>::deserialize(deserializer)?;
        StageTable::new(stages).ok_or_else(|| serde::de::Error::custom("stage table is empty"))
    }
}

impl<'a> IntoIterator for &'a StageTable {
    type Item = &'a StageSpec;
    type IntoIter = std::slice::Iter<'a, StageSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.stages.iter()
    }
}
