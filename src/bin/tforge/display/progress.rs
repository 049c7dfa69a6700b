use std::io::{self, Write};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

const TICKS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Step reporter on stderr; every method is a no-op when not interactive.
pub struct Progress {
    state: Option<Steps>,
}

struct Steps {
    spinner: Option<ProgressBar>,
    started: Instant,
    step_started: Instant,
    done: usize,
    total: usize,
    failed: usize,
}

impl Progress {
    pub fn new(interactive: bool, total_steps: usize) -> Self {
        let now = Instant::now();
        let state = interactive.then(|| Steps {
            spinner: None,
            started: now,
            step_started: now,
            done: 0,
            total: total_steps,
            failed: 0,
        });
        Self { state }
    }

    pub fn step(&mut self, description: &str) {
        let Some(steps) = &mut self.state else {
            return;
        };
        steps.clear();
        steps.done += 1;
        steps.step_started = Instant::now();
        steps.spinner = Some(spinner(format!(
            "[{}/{}] {}...",
            steps.done, steps.total, description
        )));
    }

    pub fn complete_step(&mut self, description: &str, substeps: &[&str]) {
        let Some(steps) = &mut self.state else {
            return;
        };
        steps.clear();
        let elapsed = steps.step_started.elapsed().as_secs_f64();
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "  \x1b[32m✓\x1b[0m {:<44} {:>5.1}s", description, elapsed);
        for substep in substeps {
            let _ = writeln!(stderr, "      \x1b[2m·\x1b[0m {}", substep);
        }
    }

    pub fn fail_step(&mut self, description: &str, reason: &str) {
        let Some(steps) = &mut self.state else {
            return;
        };
        steps.clear();
        steps.failed += 1;
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "  \x1b[31m✗\x1b[0m {}", description);
        let _ = writeln!(stderr, "      \x1b[2m·\x1b[0m {}", reason);
    }

    pub fn finish(self) {
        if let Some(mut steps) = self.state {
            steps.clear();
            print_footer(steps.started.elapsed(), steps.failed);
        }
    }
}

impl Steps {
    fn clear(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

fn spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        bar.set_style(style.tick_chars(TICKS));
    }
    bar.enable_steady_tick(Duration::from_millis(80));
    bar.set_message(message);
    bar
}

fn print_footer(elapsed: Duration, failed: usize) {
    let mut stderr = io::stderr().lock();
    let total = format!("Total: {:.2}s", elapsed.as_secs_f64());

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "  \x1b[2m╺{}╸\x1b[0m", "━".repeat(54));
    let _ = writeln!(stderr);
    if failed == 0 {
        let _ = writeln!(stderr, "  \x1b[32m✓\x1b[0m {:<14} {:>35}", "Forge complete", total);
    } else {
        let _ = writeln!(
            stderr,
            "  \x1b[31m✗\x1b[0m {:<14} {:>35}",
            format!("{} failed", failed),
            total
        );
    }
    let _ = writeln!(stderr);
}
