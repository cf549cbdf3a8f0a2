use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::application::{StudioEvent, StudioObserver};

/// Renders the loading state as a spinner on stderr.
///
/// Output text is left to the caller, which prints it once the submit
/// returns.
pub struct TerminalObserver {
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalObserver {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn start(&self) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message("Thinking...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(spinner);
        }
    }

    fn stop(&self) {
        if let Some(spinner) = self.spinner.lock().ok().and_then(|mut slot| slot.take()) {
            spinner.finish_and_clear();
        }
    }
}

impl Default for TerminalObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl StudioObserver for TerminalObserver {
    fn on_event(&self, event: &StudioEvent) {
        match event {
            StudioEvent::LoadingChanged(true) => self.start(),
            StudioEvent::LoadingChanged(false) => self.stop(),
            _ => {}
        }
    }
}
