use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use pepfold::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Renders engine progress events on a single stderr bar.
///
/// Phases show as a spinner; the simulation task switches to a step bar. A task that
/// finishes early (cancellation) keeps its actual position.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    #[cfg(test)]
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), target)
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    pb_guard.reset();
                    pb_guard.set_length(0);
                    pb_guard.set_style(Self::spinner_style());
                    pb_guard.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb_guard.set_message(name.to_string());
                }
                Progress::PhaseFinish => {
                    pb_guard.disable_steady_tick();
                    pb_guard.finish_with_message("✓ Done");
                }
                Progress::TaskStart { total_steps } => {
                    pb_guard.disable_steady_tick();
                    pb_guard.reset();
                    pb_guard.set_length(total_steps);
                    pb_guard.set_position(0);
                    pb_guard.set_style(Self::bar_style());
                    pb_guard.set_message("Folding");
                }
                Progress::TaskIncrement => {
                    pb_guard.inc(1);
                }
                Progress::TaskFinish => {
                    let complete = pb_guard.position() >= pb_guard.length().unwrap_or(0);
                    if complete {
                        pb_guard.finish_with_message("✓ Folded");
                    } else {
                        pb_guard.abandon_with_message("Stopped");
                    }
                }
                Progress::Message(msg) => {
                    if !pb_guard.is_finished() {
                        pb_guard.println(format!("  {}", msg));
                    } else {
                        pb_guard.set_message(msg);
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<12} [{bar:40.cyan/blue}] {pos}/{len} steps ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = CliProgressHandler::hidden();
        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.length(), Some(0));
        assert!(pb.is_finished());
    }

    #[test]
    fn simulation_events_drive_the_step_bar() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Preparation",
        });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.message(), "Preparation");
            assert!(!pb.is_finished());
        }
        callback(Progress::PhaseFinish);

        callback(Progress::TaskStart { total_steps: 3 });
        for _ in 0..3 {
            callback(Progress::TaskIncrement);
        }
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.length(), Some(3));
            assert_eq!(pb.position(), 3);
        }

        callback(Progress::TaskFinish);
        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
        assert_eq!(pb.message(), "✓ Folded");
    }

    #[test]
    fn early_finish_keeps_the_reached_position() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(Progress::TaskStart { total_steps: 10 });
        callback(Progress::TaskIncrement);
        callback(Progress::TaskFinish);

        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
        assert_eq!(pb.length(), Some(10));
        assert_eq!(pb.position(), 1);
        assert_eq!(pb.message(), "Stopped");
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart {
                name: "Thread Test",
            });
            callback(Progress::TaskIncrement);
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
        assert_eq!(pb.message(), "✓ Done");
    }
}
