use serde::{Deserialize, Serialize};

/// Terminal state of a single test as decided by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestState {
    #[default]
    Pending,
    Passed,
    Failed,
}

impl TestState {
    pub fn icon(&self) -> &'static str {
        match self {
            TestState::Pending => "◌",
            TestState::Passed => "✔",
            TestState::Failed => "✘",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TestState::Passed | TestState::Failed)
    }
}

/// Derived pass/fail classification: tests at insertion, suites when they close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
}

/// Duration bucket relative to the runner's slow threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Fast,
    Medium,
    Slow,
}

impl Speed {
    pub fn label(&self) -> &'static str {
        match self {
            Speed::Fast => "fast",
            Speed::Medium => "medium",
            Speed::Slow => "slow",
        }
    }
}

/// Overall classification of the run. Sad is sticky: one failure at any
/// point keeps the run sad through the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mood {
    #[default]
    Neutral,
    Happy,
    Sad,
}
