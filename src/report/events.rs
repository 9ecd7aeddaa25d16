use crate::models::{ErrorRecord, SuiteInfo, TestInfo};
use crate::render::Renderer;
use crate::report::Report;

/// Lifecycle events in the order the runner emits them. A closed set
/// dispatched by `match`, so no handler can be skipped or reordered.
#[derive(Debug)]
pub enum RunnerEvent {
    RunStarted,
    SuiteStarted(SuiteInfo),
    SuiteFinished(SuiteInfo),
    TestFinished(TestInfo),
    TestPassed(TestInfo),
    TestFailed { test: TestInfo, err: ErrorRecord },
    RunFinished,
}

/// Apply one runner event to the report, forwarding the resulting tree and
/// counter mutations to the renderer. Handlers run to completion before the
/// caller may deliver the next event.
pub fn handle_runner_event(report: &mut Report, event: RunnerEvent, renderer: &mut dyn Renderer) {
    match event {
        RunnerEvent::RunStarted => report.on_run_started(),
        RunnerEvent::SuiteStarted(suite) => report.on_suite_started(suite, renderer),
        RunnerEvent::SuiteFinished(suite) => report.on_suite_finished(&suite, renderer),
        RunnerEvent::TestFinished(test) => report.on_test_finished(test, renderer),
        RunnerEvent::TestPassed(_) => report.on_test_passed(renderer),
        RunnerEvent::TestFailed { test, err } => report.on_test_failed(test, err, renderer),
        RunnerEvent::RunFinished => report.on_run_finished(renderer),
    }
}
