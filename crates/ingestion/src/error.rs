//! Ingestion 错误类型

use contracts::ContractError;
use thiserror::Error;

/// Ingestion 错误
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 交接队列已关闭（消费端已退出）
    #[error("hand-off queue closed, chunk {seq} dropped")]
    QueueClosed {
        /// 未能入队的数据块序号
        seq: u64,
    },

    /// 数据源错误（启动阶段）
    #[error(transparent)]
    Source(#[from] ContractError),
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;
