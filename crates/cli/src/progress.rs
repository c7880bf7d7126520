//! Console progress line on stderr

use std::io::Write;

use ingestion::{Activity, ProgressReporter, Spinner};

/// Redraws `[<glyph>] <n> bytes read` in place after every poll
#[derive(Debug, Default)]
pub struct ConsoleProgress {
    spinner: Spinner,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&mut self, activity: Activity, total_bytes: u64) {
        let line = render(self.spinner.next_frame(activity), total_bytes);
        let mut stderr = std::io::stderr().lock();
        // Progress output is best effort
        let _ = stderr.write_all(line.as_bytes());
        let _ = stderr.flush();
    }
}

fn render(glyph: char, total_bytes: u64) -> String {
    format!("\r[{glyph}] {total_bytes} bytes read")
}
