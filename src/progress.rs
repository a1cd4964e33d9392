//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements
//! [`ProgressCallback`] to display visual progress in the terminal:
//! a spinner while directories are walked and a bar while candidate
//! files are hashed. Both render on stderr so reports on stdout stay
//! machine-readable.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Progress callback for duplicate finding phases.
///
/// Implement this trait to receive progress updates during
/// the duplicate detection pipeline.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase (e.g., "walking", "hashing")
    /// * `total` - Total number of items to process (0 if unknown)
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Current item number (1-based)
    /// * `path` - Path being processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when a phase completes.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase
    fn on_phase_end(&self, phase: &str);

    /// Called to update the progress message.
    ///
    /// # Arguments
    ///
    /// * `message` - The new message to display
    fn on_message(&self, _message: &str) {}
}

/// Progress reporter using indicatif.
///
/// Manages one spinner for the walking phase and one bar for the
/// hashing phase. In quiet mode every callback is a no-op.
pub struct Progress {
    multi: MultiProgress,
    walking: Mutex<Option<ProgressBar>>,
    hashing: Mutex<Option<ProgressBar>>,
    prefix: Mutex<String>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupescan::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            walking: Mutex::new(None),
            hashing: Mutex::new(None),
            prefix: Mutex::new(String::new()),
            quiet,
        }
    }

    /// Create a style for the walking phase (spinner).
    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    /// Create a style for the hashing phase (progress bar with throughput).
    fn hashing_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} {per_sec} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        match phase {
            "walking" => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::walking_style());
                pb.set_message("Walking directory");
                pb.enable_steady_tick(Duration::from_millis(100));
                let mut walking = self.walking.lock().unwrap();
                *walking = Some(pb);
            }
            "hashing" => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::hashing_style());
                pb.set_message("Hashing");
                let mut hashing = self.hashing.lock().unwrap();
                *hashing = Some(pb);
            }
            _ => {
                // Unknown phase: show a default bar, nothing to store
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::hashing_style());
                pb.set_message(phase.to_string());
            }
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }

        let prefix = self.prefix.lock().unwrap();
        let display_msg = if prefix.is_empty() {
            truncate_path(path, 30)
        } else {
            format!("{}: {}", *prefix, truncate_path(path, 30))
        };

        // Update the active progress bar. Completion counts arrive out
        // of order from parallel workers; the bar only moves forward.
        if let Some(ref pb) = *self.hashing.lock().unwrap() {
            pb.set_position((current as u64).max(pb.position()));
            pb.set_message(display_msg);
        } else if let Some(ref pb) = *self.walking.lock().unwrap() {
            pb.set_position((current as u64).max(pb.position()));
            pb.set_message(display_msg);
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }

        match phase {
            "walking" => {
                if let Some(pb) = self.walking.lock().unwrap().take() {
                    pb.finish_with_message("Walking complete");
                }
            }
            "hashing" => {
                if let Some(pb) = self.hashing.lock().unwrap().take() {
                    pb.finish_with_message("Hashing complete");
                }
            }
            _ => {}
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }

        *self.prefix.lock().unwrap() = message.to_string();

        if let Some(ref pb) = *self.hashing.lock().unwrap() {
            pb.set_message(message.to_string());
        } else if let Some(ref pb) = *self.walking.lock().unwrap() {
            pb.set_message(message.to_string());
        }
    }
}

/// Truncate a path for display in the progress bar.
///
/// Keeps the file name, or the tail of the file name if even that is
/// too long. Counts chars, not bytes, so lossy Unicode names are safe.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len >= max_len {
        let keep = max_len.saturating_sub(3);
        let tail: String = file_name.chars().skip(name_len - keep).collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_path_unchanged() {
        assert_eq!(truncate_path("src/main.rs", 30), "src/main.rs");
    }

    #[test]
    fn test_truncate_long_path_keeps_file_name() {
        let path = "/a/very/deeply/nested/directory/tree/photo.jpg";
        assert_eq!(truncate_path(path, 30), ".../photo.jpg");
    }

    #[test]
    fn test_truncate_very_long_file_name() {
        let path = "/tmp/an_extraordinarily_long_file_name_that_never_ends.bin";
        let result = truncate_path(path, 20);
        assert!(result.starts_with("..."));
        assert_eq!(result.chars().count(), 20);
    }

    #[test]
    fn test_truncate_multibyte_file_name() {
        let path = "/tmp/très_longue_série_de_données_éparpillées.csv";
        let result = truncate_path(path, 20);
        assert!(result.starts_with("..."));
        assert_eq!(result.chars().count(), 20);
    }

    #[test]
    fn test_quiet_progress_is_inert() {
        let progress = Progress::new(true);
        progress.on_phase_start("walking", 0);
        progress.on_progress(1, "/some/file");
        progress.on_message("Walking /some");
        progress.on_phase_end("walking");
        assert!(progress.walking.lock().unwrap().is_none());
    }

    #[test]
    fn test_bar_never_moves_backward() {
        let progress = Progress::new(false);
        progress.on_phase_start("hashing", 10);

        progress.on_progress(5, "/late/finisher");
        progress.on_progress(3, "/early/finisher");
        {
            let guard = progress.hashing.lock().unwrap();
            assert_eq!(guard.as_ref().unwrap().position(), 5);
        }

        progress.on_phase_end("hashing");
    }

    #[test]
    fn test_hashing_phase_lifecycle() {
        let progress = Progress::new(false);
        progress.on_phase_start("hashing", 10);
        assert!(progress.hashing.lock().unwrap().is_some());
        progress.on_progress(5, "/some/file");
        progress.on_phase_end("hashing");
        assert!(progress.hashing.lock().unwrap().is_none());
    }
}
