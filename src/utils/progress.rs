//! Progress indicators for the CLI

use indicatif::{ProgressBar, ProgressStyle};

/// Create a spinner with consistent styling
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    pb
}

/// Spinner when `visible`, otherwise a hidden bar for quiet mode
pub fn spinner_or_hidden(message: &str, visible: bool) -> ProgressBar {
    if visible {
        create_spinner(message)
    } else {
        ProgressBar::hidden()
    }
}
