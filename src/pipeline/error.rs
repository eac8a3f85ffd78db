// ==========================================
// 采购全流程跟踪系统 - 刷新管道错误类型
// ==========================================
// 注: 参考数据（订单 / 物料规格）拉取失败不属于错误,降级为不可用状态;
//     但返回内容不是表格结构时仍直接失败
// ==========================================

use crate::config::error::ConfigError;
use crate::domain::types::Collection;
use crate::extractor::error::ExtractError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// 提货快照无法降级,直接失败
    #[error("提货快照不可用: {0}")]
    LiftUnavailable(#[source] ExtractError),

    /// 参考快照返回了非表格内容（登录页、错误对象等）
    #[error("参考快照 {collection} 不是表格结构: {source}")]
    ReferenceNotTabular {
        collection: Collection,
        #[source]
        source: ExtractError,
    },

    #[error("抽取失败: {0}")]
    Extract(#[from] ExtractError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
