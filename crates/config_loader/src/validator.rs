//! 配置校验模块
//!
//! 校验规则：
//! - source.path 必填
//! - target.endpoint / target.topic 必填
//! - webhook endpoint 必须是 http(s) URL
//! - 0 < chunk_size <= MAX_CHUNK_SIZE
//! - ingest_interval_secs > 0, flush_interval_secs >= 0，且都能表示为 Duration

use std::time::Duration;

use contracts::{ContractError, NotifierKind, TailConfig, MAX_CHUNK_SIZE};

/// 校验 TailConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &TailConfig) -> Result<(), ContractError> {
    validate_source(config)?;
    validate_target(config)?;
    validate_intervals(config)?;
    Ok(())
}

/// 校验被追踪的文件配置
fn validate_source(config: &TailConfig) -> Result<(), ContractError> {
    match &config.source.path {
        Some(path) if !path.as_os_str().is_empty() => {}
        _ => return Err(ContractError::missing_field("source.path")),
    }

    if config.source.chunk_size == 0 {
        return Err(ContractError::config_validation(
            "source.chunk_size",
            "chunk_size must be > 0",
        ));
    }
    if config.source.chunk_size > MAX_CHUNK_SIZE {
        return Err(ContractError::config_validation(
            "source.chunk_size",
            format!(
                "chunk_size must be <= {MAX_CHUNK_SIZE}, got {}",
                config.source.chunk_size
            ),
        ));
    }
    Ok(())
}

/// 校验投递目标
fn validate_target(config: &TailConfig) -> Result<(), ContractError> {
    let target = &config.target;

    if target.endpoint.trim().is_empty() {
        return Err(ContractError::missing_field("target.endpoint"));
    }
    if target.topic.trim().is_empty() {
        return Err(ContractError::missing_field("target.topic"));
    }

    if config.delivery.notifier == NotifierKind::Webhook
        && !(target.endpoint.starts_with("http://") || target.endpoint.starts_with("https://"))
    {
        return Err(ContractError::config_validation(
            "target.endpoint",
            format!(
                "webhook endpoint must be an http(s) URL, got '{}'",
                target.endpoint
            ),
        ));
    }
    Ok(())
}

/// 校验两个循环的节拍
fn validate_intervals(config: &TailConfig) -> Result<(), ContractError> {
    let ingest = config.source.ingest_interval_secs;
    if !ingest.is_finite() || ingest <= 0.0 {
        return Err(ContractError::config_validation(
            "source.ingest_interval_secs",
            format!("ingest_interval_secs must be > 0, got {ingest}"),
        ));
    }
    if Duration::try_from_secs_f64(ingest).is_err() {
        return Err(ContractError::config_validation(
            "source.ingest_interval_secs",
            format!("ingest_interval_secs is out of range, got {ingest}"),
        ));
    }

    let flush = config.delivery.flush_interval_secs;
    if !flush.is_finite() || flush < 0.0 {
        return Err(ContractError::config_validation(
            "delivery.flush_interval_secs",
            format!("flush_interval_secs must be >= 0, got {flush}"),
        ));
    }
    if Duration::try_from_secs_f64(flush).is_err() {
        return Err(ContractError::config_validation(
            "delivery.flush_interval_secs",
            format!("flush_interval_secs is out of range, got {flush}"),
        ));
    }
    Ok(())
}
