use std::io;
use std::sync::Mutex;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// The bar log lines must be printed above, if one is on screen.
static ACTIVE_BAR: Mutex<Option<ProgressBar>> = Mutex::new(None);

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

pub struct ScanBar {
    bar: ProgressBar,
}

impl ScanBar {
    /// Shows a progress bar for the duration of a scan. A hidden bar is
    /// returned when `visible` is false, so callers need no special casing.
    pub fn start(visible: bool) -> Self {
        if !visible {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.blue} {msg} [{bar:30.cyan/blue}] {pos}/{len} ports ({eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .tick_strings(TICK_STRINGS)
        .progress_chars("━╸ ");
        bar.set_style(style);
        bar.set_message(format!("{}", "Probing".bold()));
        bar.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut active) = ACTIVE_BAR.lock() {
            *active = Some(bar.clone());
        }
        Self { bar }
    }

    /// Handle for the progress callback, which runs on worker threads.
    pub fn handle(&self) -> ProgressBar {
        self.bar.clone()
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
        if let Ok(mut active) = ACTIVE_BAR.lock() {
            *active = None;
        }
    }
}

pub fn report_scan_progress(bar: &ProgressBar, completed: usize, total: usize) {
    bar.set_length(total as u64);
    bar.set_position(completed as u64);
}

/// Routes formatted log lines around the active progress bar.
pub struct SpinnerWriter {
    to_stderr: bool,
}

impl SpinnerWriter {
    pub fn new(to_stderr: bool) -> Self {
        Self { to_stderr }
    }
}

impl io::Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let msg = String::from_utf8_lossy(buf);
        let msg: &str = msg.trim_end_matches('\n');
        let active: Option<ProgressBar> = ACTIVE_BAR
            .lock()
            .ok()
            .and_then(|bar| bar.as_ref().cloned());
        match active {
            Some(bar) => bar.println(msg),
            None if self.to_stderr => eprintln!("{msg}"),
            None => println!("{msg}"),
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
