use crate::ui::theme;
use crate::ui::Icons;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::{Duration, Instant};

/// Progress bar for a batch import; hidden when stdout is not a terminal
pub struct ImportProgress {
    pb: ProgressBar,
    started: Instant,
}

impl ImportProgress {
    pub fn new(total_files: usize) -> Self {
        let pb = if console::Term::stdout().is_term() && !crate::output::is_quiet() {
            let pb = ProgressBar::new(total_files as u64);
            if let Ok(style) =
                ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("=> "));
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            ProgressBar::hidden()
        };
        Self {
            pb,
            started: Instant::now(),
        }
    }

    pub fn set_file(&self, name: &str) {
        self.pb.set_message(format!("Importing: {}", name));
    }

    pub fn inc(&self) {
        self.pb.inc(1);
    }

    pub fn abandon(&self) {
        self.pb.abandon();
    }

    pub fn finish_with_summary(&self, files: usize, bytes: u64) {
        self.pb.finish_and_clear();
        println!(
            "{} {}",
            Icons::CHECK.style(theme().success.clone()),
            format!("Imported in {}", HumanDuration(self.started.elapsed()))
                .style(theme().success.clone())
        );
        println!(
            "  {} {}  {} {}",
            Icons::FILE.style(theme().info.clone()),
            files,
            Icons::PACKAGE.style(theme().info.clone()),
            crate::ui::human_bytes(bytes)
        );
    }
}
