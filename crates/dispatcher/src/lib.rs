//! # Dispatcher
//!
//! 消息投递模块（pipeline 的消费端）。
//!
//! 负责：
//! - 从 hand-off 队列逐个消费 `Chunk`
//! - 跨 chunk 边界重组 UTF-8 文本
//! - 单次投递到 Notifier，失败不重试
//! - 每次投递后冷却 `flush_interval`，限制外发速率

pub mod assembler;
pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod notifiers;

pub use assembler::Utf8Assembler;
pub use contracts::{Chunk, DispatchTarget, Notifier};
pub use dispatcher::{DeliveryOutcome, Dispatcher, DispatcherConfig};
pub use error::DispatcherError;
pub use metrics::{DeliveryMetrics, DeliverySnapshot};
pub use notifiers::{
    create_notifier, ConfiguredNotifier, LogNotifier, WebhookNotifier, WebhookPayload,
};
