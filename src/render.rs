//! The renderer port and a plain line-oriented reference implementation.
//! All markup, styling, and interaction live behind this boundary; the
//! reducer only pushes ordered mutations through it.

use colored::Colorize;

use crate::format;
use crate::models::{Mood, NodeId, Outcome, ReportNode, TestState};

/// Ordered mutations the reducer pushes at its display collaborator.
pub trait Renderer {
    /// A new suite node was appended under `parent`.
    fn append_suite_node(&mut self, parent: NodeId, node: &ReportNode);
    /// The node just appended became the current insertion point.
    fn push_container(&mut self, node: &ReportNode);
    /// The current insertion point closed; returns it, if any was open.
    fn pop_container(&mut self) -> Option<NodeId>;
    /// A closed container received its derived classification.
    fn set_container_status(&mut self, node: &ReportNode, outcome: Outcome);
    /// A test node was appended into `container`.
    fn append_test_node(&mut self, container: NodeId, node: &ReportNode);
    fn update_counters(&mut self, passes: u64, failures: u64);
    fn update_duration(&mut self, seconds: f64);
    fn set_mood(&mut self, mood: Mood);
}

/// Streams the report as indented lines on stdout, keeping the latest
/// aggregate values for a final summary.
pub struct PlainRenderer {
    open: Vec<NodeId>,
    hide_passed: bool,
    passes: u64,
    failures: u64,
    seconds: f64,
    mood: Mood,
    /// Full titles of failed leaves, replayed in the summary.
    failed: Vec<String>,
}

impl PlainRenderer {
    pub fn new(hide_passed: bool) -> Self {
        Self {
            open: Vec::new(),
            hide_passed,
            passes: 0,
            failures: 0,
            seconds: 0.0,
            mood: Mood::Neutral,
            failed: Vec::new(),
        }
    }

    fn indent(&self) -> String {
        "  ".repeat(self.open.len())
    }

    /// Print the aggregate footer once the stream is done.
    pub fn finish(&self) {
        println!();
        let mood = match self.mood {
            Mood::Happy => "☺ ",
            Mood::Sad => "☹ ",
            Mood::Neutral => "",
        };
        println!(
            "  {}{} {}",
            mood,
            format!("{} passing", self.passes).green(),
            format!("({:.2}s)", self.seconds).dimmed()
        );
        if self.failures > 0 {
            println!("  {}", format!("{} failing", self.failures).red());
            println!();
            for title in &self.failed {
                println!("  {} {}", "✘".red(), title);
            }
        }
    }
}

impl Renderer for PlainRenderer {
    fn append_suite_node(&mut self, _parent: NodeId, _node: &ReportNode) {}

    fn push_container(&mut self, node: &ReportNode) {
        if !node.title.is_empty() {
            println!("{}{}", self.indent(), node.title.bold());
        }
        self.open.push(node.id);
    }

    fn pop_container(&mut self) -> Option<NodeId> {
        self.open.pop()
    }

    fn set_container_status(&mut self, _node: &ReportNode, _outcome: Outcome) {
        // Headers were already streamed; a line log has nothing to repaint.
    }

    fn append_test_node(&mut self, _container: NodeId, node: &ReportNode) {
        let Some(detail) = node.detail.as_ref() else {
            return;
        };
        match detail.state {
            TestState::Passed => {
                if self.hide_passed {
                    return;
                }
                let duration = detail
                    .duration_ms
                    .map(|ms| format!(" ({ms}ms)"))
                    .unwrap_or_default();
                println!(
                    "{}{} {}{}",
                    self.indent(),
                    detail.state.icon().green(),
                    node.title,
                    duration.dimmed()
                );
            }
            TestState::Pending => {
                println!(
                    "{}{} {}",
                    self.indent(),
                    detail.state.icon().cyan(),
                    node.title.dimmed()
                );
            }
            TestState::Failed => {
                self.failed.push(node.full_title.clone());
                println!(
                    "{}{} {}",
                    self.indent(),
                    detail.state.icon().red(),
                    node.title.red()
                );
                if let Some(err) = detail.err.as_ref() {
                    let indent = format!("{}    ", self.indent());
                    for line in format::error_summary(err).lines() {
                        println!("{indent}{}", line.dimmed());
                    }
                }
            }
        }
    }

    fn update_counters(&mut self, passes: u64, failures: u64) {
        self.passes = passes;
        self.failures = failures;
    }

    fn update_duration(&mut self, seconds: f64) {
        self.seconds = seconds;
    }

    fn set_mood(&mut self, mood: Mood) {
        self.mood = mood;
    }
}
