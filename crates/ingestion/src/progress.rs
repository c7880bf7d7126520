//! 进度指示 trait
//!
//! 纯观测用途，不影响控制流。

/// 本次轮询的活动状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// 文件未增长
    Idle,
    /// 本次轮询读到了数据
    Reading,
}

/// 进度上报 trait
///
/// watcher 每次迭代调用一次 `report`，传入活动状态与累计读取字节数。
pub trait ProgressReporter: Send {
    /// 上报一次进度
    fn report(&mut self, activity: Activity, total_bytes: u64);
}

/// 不输出任何内容的上报器
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&mut self, _activity: Activity, _total_bytes: u64) {}
}

/// 旋转指示符
///
/// 每次调用前进一帧（`| / - \`）；读到数据时显示 `R`，但帧序照常前进。
#[derive(Debug, Clone, Default)]
pub struct Spinner {
    idx: usize,
}

impl Spinner {
    const GLYPHS: [char; 4] = ['|', '/', '-', '\\'];

    /// 读到数据时显示的字符
    pub const READING: char = 'R';

    /// 创建新的旋转指示符
    pub fn new() -> Self {
        Self::default()
    }

    /// 取下一帧
    pub fn next_frame(&mut self, activity: Activity) -> char {
        let glyph = Self::GLYPHS[self.idx];
        self.idx = (self.idx + 1) % Self::GLYPHS.len();
        match activity {
            Activity::Idle => glyph,
            Activity::Reading => Self::READING,
        }
    }
}
