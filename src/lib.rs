//! spyglass reduces a test runner's lifecycle event stream into a nested,
//! incrementally updated report: a suite/test tree with derived pass/fail
//! classification, aggregate counters, replay links, and cleaned test
//! source.
//!
//! The core is [`report::Report`] driven through
//! [`report::handle_runner_event`]; it pushes every tree and counter
//! mutation through the [`render::Renderer`] port. The [`runner`] module
//! adapts an external runner process (or stdin) into the typed event
//! stream.

pub mod config;
pub mod format;
pub mod models;
pub mod nav;
pub mod render;
pub mod report;
pub mod runner;

pub use models::{
    ErrorRecord, Mood, NodeId, NodeKind, Outcome, ReportNode, ReportTree, Speed, SuiteInfo,
    TestInfo, TestKind, TestState,
};
pub use render::{PlainRenderer, Renderer};
pub use report::{Report, RunStats, RunnerEvent, handle_runner_event, system_clock};
