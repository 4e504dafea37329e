// modgrab/src/progress.rs
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use modgrab_common::event::{ProgressEvent, ProgressSink};

/// Renders core progress events with indicatif: one bar per phase (a spinner
/// when the phase's total is open-ended), per-item messages printed above it.
pub struct ProgressReporter {
    multi: MultiProgress,
    current: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            current: Mutex::new(None),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ProgressReporter {
    fn emit(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::PhaseStarted { phase, total } => {
                let bar = match total {
                    Some(total) => {
                        let bar = ProgressBar::new(total as u64);
                        bar.set_style(
                            ProgressStyle::with_template("{msg:<24} [{bar:40}] {pos}/{len}")
                                .unwrap()
                                .progress_chars("=> "),
                        );
                        bar
                    }
                    None => {
                        let bar = ProgressBar::new_spinner();
                        bar.set_style(
                            ProgressStyle::with_template("{spinner} {msg:<24} {pos}").unwrap(),
                        );
                        bar.enable_steady_tick(Duration::from_millis(120));
                        bar
                    }
                };
                bar.set_message(phase.label());
                *self.current.lock().unwrap() = Some(self.multi.add(bar));
            }
            ProgressEvent::Advanced { message, .. } => {
                let current = self.current.lock().unwrap();
                if let Some(bar) = current.as_ref() {
                    if !message.is_empty() {
                        bar.println(&message);
                    }
                    bar.inc(1);
                }
            }
            ProgressEvent::PhaseFinished { .. } => {
                if let Some(bar) = self.current.lock().unwrap().take() {
                    bar.finish_and_clear();
                }
            }
        }
    }
}
