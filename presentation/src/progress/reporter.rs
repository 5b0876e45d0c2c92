//! Progress reporting for fusion runs and the answer stream

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use tutor_application::ProgressNotifier;
use tutor_domain::util::preview;
use tutor_domain::{FusionPhase, Query};

const QUERY_PREVIEW: usize = 48;

/// Reports progress with progress bars on stderr
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
    answer_spinner: Mutex<Option<(ProgressBar, usize)>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
            answer_spinner: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn phase_label(phase: FusionPhase) -> String {
        let step = match phase {
            FusionPhase::Diversify => 1,
            FusionPhase::Retrieve => 2,
            FusionPhase::Fuse => 3,
            FusionPhase::Assemble => 4,
        };
        format!("Step {}: {}", step, phase.display_name())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: FusionPhase, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(Self::phase_label(phase));
        pb.set_message("Starting...");

        if let Ok(mut slot) = self.phase_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_query_complete(&self, _phase: FusionPhase, query: &Query, success: bool) {
        if let Ok(slot) = self.phase_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let text = preview(query.text(), QUERY_PREVIEW);
            let status = if success {
                format!("{} {}", "v".green(), text)
            } else {
                format!("{} {}", "x".red(), text)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, phase: FusionPhase) {
        if let Ok(mut slot) = self.phase_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(format!("{} done", phase.display_name().green()));
        }
    }

    fn on_answer_start(&self) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix("Answer");
        pb.set_message("waiting for first token...");
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.answer_spinner.lock() {
            *slot = Some((pb, 0));
        }
    }

    fn on_answer_chunk(&self, chunk: &str) {
        if let Ok(mut slot) = self.answer_spinner.lock()
            && let Some((pb, bytes)) = slot.as_mut()
        {
            *bytes += chunk.len();
            pb.set_message(format!("{} bytes", bytes));
        }
    }

    fn on_answer_end(&self) {
        if let Ok(mut slot) = self.answer_spinner.lock()
            && let Some((pb, _)) = slot.take()
        {
            pb.finish_and_clear();
        }
    }
}

/// Simple text-based progress on stderr (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: FusionPhase, total_tasks: usize) {
        eprintln!(
            "{} {} ({} tasks)",
            "->".cyan(),
            ProgressReporter::phase_label(phase).bold(),
            total_tasks
        );
    }

    fn on_query_complete(&self, _phase: FusionPhase, query: &Query, success: bool) {
        let text = preview(query.text(), QUERY_PREVIEW);
        if success {
            eprintln!("  {} {}", "v".green(), text);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), text);
        }
    }

    fn on_phase_complete(&self, _phase: FusionPhase) {}

    fn on_answer_start(&self) {
        eprintln!("{} {}", "->".cyan(), "Generating answer".bold());
    }
}
