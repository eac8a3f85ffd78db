// ==========================================
// 采购全流程跟踪系统 - 快照数据源
// ==========================================
// 职责: 按数据集合拉取一份完整的表格快照
// 实现: 文件数据源（CSV / Excel / JSON）、内存数据源
// ==========================================

use crate::domain::record::TabularSnapshot;
use crate::domain::types::Collection;
use crate::extractor::error::{ExtractError, ExtractResult};
use crate::extractor::snapshot_parser::{SnapshotParser, UniversalSnapshotParser};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

// ==========================================
// SnapshotSource Trait
// ==========================================
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// 拉取指定集合的完整快照（不跳过表头）
    async fn fetch(&self, collection: Collection) -> ExtractResult<TabularSnapshot>;
}

// ==========================================
// FileSnapshotSource - 文件数据源
// ==========================================
// 未登记路径的集合视为数据源不可用
#[derive(Debug, Clone, Default)]
pub struct FileSnapshotSource {
    paths: HashMap<Collection, PathBuf>,
}

impl FileSnapshotSource {
    pub fn new(lift: impl Into<PathBuf>) -> Self {
        Self::default().with_path(Collection::Lift, lift)
    }

    pub fn with_path(mut self, collection: Collection, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(collection, path.into());
        self
    }

    pub fn path_of(&self, collection: Collection) -> Option<&PathBuf> {
        self.paths.get(&collection)
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    async fn fetch(&self, collection: Collection) -> ExtractResult<TabularSnapshot> {
        let path = self
            .path_of(collection)
            .cloned()
            .ok_or_else(|| ExtractError::SourceUnavailable {
                collection: collection.to_string(),
                message: "未配置快照文件".to_string(),
            })?;

        // 文件解析为阻塞 I/O
        tokio::task::spawn_blocking(move || UniversalSnapshotParser.parse_snapshot(&path))
            .await
            .map_err(|e| ExtractError::SourceUnavailable {
                collection: collection.to_string(),
                message: e.to_string(),
            })?
    }
}

// ==========================================
// InMemorySnapshotSource - 内存数据源
// ==========================================
// 用于嵌入调用方已持有的快照（以及测试）
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotSource {
    snapshots: HashMap<Collection, TabularSnapshot>,
    failures: HashMap<Collection, String>,
}

impl InMemorySnapshotSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(mut self, collection: Collection, snapshot: TabularSnapshot) -> Self {
        self.failures.remove(&collection);
        self.snapshots.insert(collection, snapshot);
        self
    }

    /// 模拟拉取失败
    pub fn with_failure(mut self, collection: Collection, message: impl Into<String>) -> Self {
        self.snapshots.remove(&collection);
        self.failures.insert(collection, message.into());
        self
    }
}

#[async_trait]
impl SnapshotSource for InMemorySnapshotSource {
    async fn fetch(&self, collection: Collection) -> ExtractResult<TabularSnapshot> {
        if let Some(snapshot) = self.snapshots.get(&collection) {
            return Ok(snapshot.clone());
        }

        let message = self
            .failures
            .get(&collection)
            .cloned()
            .unwrap_or_else(|| "未提供快照".to_string());
        Err(ExtractError::SourceUnavailable {
            collection: collection.to_string(),
            message,
        })
    }
}
