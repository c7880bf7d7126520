//! 管道指标收集模块
//!
//! 通过 `metrics` facade 记录 watcher / dispatcher 的运行指标，
//! 并提供内存中的在线统计 (`RunningStats`) 用于输出摘要。

use metrics::{counter, gauge, histogram};

/// 记录一次文件轮询
///
/// 每次 watcher 迭代调用，`bytes_read` 为 0 表示文件未增长。
pub fn record_poll(bytes_read: usize) {
    counter!("chattail_polls_total").increment(1);
    if bytes_read == 0 {
        counter!("chattail_idle_polls_total").increment(1);
    }
}

/// 记录读取到的数据块
pub fn record_chunk_read(bytes: usize, offset: u64) {
    counter!("chattail_chunks_read_total").increment(1);
    counter!("chattail_bytes_read_total").increment(bytes as u64);
    histogram!("chattail_chunk_size_bytes").record(bytes as f64);
    gauge!("chattail_read_offset").set(offset as f64);
}

/// 记录读取错误
pub fn record_read_error() {
    counter!("chattail_read_errors_total").increment(1);
}

/// 记录交接队列深度
pub fn record_queue_depth(depth: usize) {
    gauge!("chattail_queue_depth").set(depth as f64);
}

/// 记录一次投递尝试
pub fn record_delivery(notifier: &str, success: bool, bytes: usize, latency_ms: f64) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "chattail_deliveries_total",
        "notifier" => notifier.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    if success {
        counter!(
            "chattail_bytes_delivered_total",
            "notifier" => notifier.to_string()
        )
        .increment(bytes as u64);
    }

    histogram!(
        "chattail_delivery_latency_ms",
        "notifier" => notifier.to_string()
    )
    .record(latency_ms);
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// 最小值
    pub fn min(&self) -> f64 {
        self.min
    }

    /// 最大值
    pub fn max(&self) -> f64 {
        self.max
    }

    /// 摘要
    pub fn summary(&self) -> StatsSummary {
        StatsSummary::from(self)
    }
}
