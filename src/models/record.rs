use std::fmt;

use serde::{Deserialize, Serialize};

use super::status::TestState;

/// Identity of a suite as reported by the runner.
#[derive(Debug, Clone, Default)]
pub struct SuiteInfo {
    pub title: String,
    /// The runner's implicit top-level suite; never rendered.
    pub root: bool,
    /// Dot/space-joined ancestry path, used for replay filtering.
    pub full_title: String,
}

/// Kind of reported check: a real test, or a before/after hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    #[default]
    Test,
    Hook,
}

/// A test outcome as reported by the runner.
#[derive(Debug, Clone, Default)]
pub struct TestInfo {
    pub title: String,
    pub full_title: String,
    pub duration_ms: Option<u64>,
    /// None until the runner decided (pending tests never decide).
    pub state: Option<TestState>,
    pub pending: bool,
    pub slow_ms: Option<u64>,
    /// Raw source text of the test body, pre-cleaning.
    pub source: Option<String>,
    pub kind: TestKind,
    pub err: Option<ErrorRecord>,
}

/// Whatever failure detail the runner supplied; nothing is required to be
/// populated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorRecord {
    #[serde(default)]
    pub message: String,
    pub stack: Option<String>,
    pub source_url: Option<String>,
    pub line: Option<u32>,
}

impl ErrorRecord {
    /// Display form of a record with no usable content.
    pub const GENERIC_TAG: &'static str = "Error";
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str(Self::GENERIC_TAG)
        } else {
            write!(f, "{}: {}", Self::GENERIC_TAG, self.message)
        }
    }
}
