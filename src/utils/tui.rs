use std::future::Future;

use indicatif::{ProgressBar, ProgressStyle};

pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["-", "\\", "|", "/"])
            .template("{msg} {spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// Await `work` behind a spinner, clearing it once done.
pub async fn with_spinner<F: Future>(message: &str, work: F) -> F::Output {
    let spinner = create_spinner(message);
    let output = work.await;
    spinner.finish_and_clear();
    output
}
