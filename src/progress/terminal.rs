use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::ProgressSink;
use crate::scheduler::RunSummary;
use crate::work::{CompletionEvent, Outcome};

const BAR_TEMPLATE: &str = "{spinner:.blue} {wide_msg} {bar:40.magenta/blue} {pos}/{len}";

/// Live spinner and progress bar on stderr, with one line per finished
/// repository printed above the bar.
///
/// When either stream is not a terminal the per-repository lines go to
/// stdout as plain lines, so piped output still lists every result. The
/// bar itself is hidden when stderr is not a terminal.
pub struct TerminalProgress {
    bar: ProgressBar,
    quiet: bool,
    plain_lines: bool,
}

impl TerminalProgress {
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(0)
        };

        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ");
        bar.set_style(style);

        let plain_lines = prints_plain_lines(bar.is_hidden(), Term::stdout().is_term());
        Self {
            bar,
            quiet,
            plain_lines,
        }
    }

    fn completion_line(event: &CompletionEvent) -> String {
        match &event.outcome {
            Outcome::Success => format!("{} {}", style("✓").green(), event.item),
            Outcome::Failure(kind) => format!(
                "{} {} {}",
                style("✗").red(),
                event.item,
                style(format!("({kind})")).dim()
            ),
        }
    }
}

impl ProgressSink for TerminalProgress {
    fn started(&mut self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar
            .set_message(format!("Cleaning repos... 0/{total} complete"));
        if !self.bar.is_hidden() {
            self.bar.enable_steady_tick(Duration::from_millis(100));
        }
    }

    fn item_completed(&mut self, event: &CompletionEvent) {
        if self.quiet {
            return;
        }
        let line = Self::completion_line(event);
        if self.plain_lines {
            println!("{line}");
        } else {
            self.bar.println(line);
        }
    }

    fn advanced(&mut self, completed: usize, total: usize, _fraction: f64) {
        self.bar.set_position(completed as u64);
        self.bar
            .set_message(format!("Cleaning repos... {completed}/{total} complete"));
    }

    fn finished(&mut self, _summary: &RunSummary) {
        self.bar.finish_and_clear();
    }
}

/// Completion lines bypass the bar whenever it is hidden or stdout is
/// redirected, so `reposweep | tee log` still captures them.
fn prints_plain_lines(bar_hidden: bool, stdout_is_term: bool) -> bool {
    bar_hidden || !stdout_is_term
}
