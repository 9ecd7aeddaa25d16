//! Generated event scripts exercising the reducer's structural invariants.

use proptest::prelude::*;

use spyglass::nav::NavContext;
use spyglass::report::{Report, RunnerEvent, handle_runner_event, system_clock};
use spyglass::{
    Mood, NodeId, NodeKind, Outcome, Renderer, ReportNode, ReportTree, SuiteInfo, TestInfo,
    TestKind, TestState,
};

/// Renderer that swallows every mutation; the properties only inspect the
/// reducer's own state.
#[derive(Default)]
struct NullRenderer {
    open: Vec<NodeId>,
}

impl Renderer for NullRenderer {
    fn append_suite_node(&mut self, _parent: NodeId, _node: &ReportNode) {}
    fn push_container(&mut self, node: &ReportNode) {
        self.open.push(node.id);
    }
    fn pop_container(&mut self) -> Option<NodeId> {
        self.open.pop()
    }
    fn set_container_status(&mut self, _node: &ReportNode, _outcome: Outcome) {}
    fn append_test_node(&mut self, _container: NodeId, _node: &ReportNode) {}
    fn update_counters(&mut self, _passes: u64, _failures: u64) {}
    fn update_duration(&mut self, _seconds: f64) {}
    fn set_mood(&mut self, _mood: Mood) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Op {
    Open,
    Close,
    Pass,
    Fail,
    Pending,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Open),
        Just(Op::Close),
        Just(Op::Pass),
        Just(Op::Fail),
        Just(Op::Pending),
    ]
}

/// Scripts of balanced suite/close pairs with tests sprinkled inside.
fn balanced_script() -> impl Strategy<Value = Vec<Op>> {
    let tests = proptest::collection::vec(
        prop_oneof![Just(Op::Pass), Just(Op::Fail), Just(Op::Pending)],
        0..4,
    );
    tests.prop_recursive(4, 48, 4, |inner| {
        proptest::collection::vec(inner, 0..4).prop_map(|groups| {
            let mut ops = Vec::new();
            for group in groups {
                ops.push(Op::Open);
                ops.extend(group);
                ops.push(Op::Close);
            }
            ops
        })
    })
}

fn suite_info(index: usize) -> SuiteInfo {
    SuiteInfo {
        title: format!("suite {index}"),
        root: false,
        full_title: format!("suite {index}"),
    }
}

fn test_event(index: usize, op: Op) -> Vec<RunnerEvent> {
    let info = |state: Option<TestState>, pending: bool| TestInfo {
        title: format!("test {index}"),
        full_title: format!("test {index}"),
        duration_ms: Some(5),
        state,
        pending,
        slow_ms: Some(75),
        source: None,
        kind: TestKind::Test,
        err: None,
    };
    match op {
        Op::Pass => vec![
            RunnerEvent::TestPassed(info(Some(TestState::Passed), false)),
            RunnerEvent::TestFinished(info(Some(TestState::Passed), false)),
        ],
        Op::Fail => vec![
            RunnerEvent::TestFailed {
                test: info(Some(TestState::Failed), false),
                err: Default::default(),
            },
            RunnerEvent::TestFinished(info(Some(TestState::Failed), false)),
        ],
        Op::Pending => vec![RunnerEvent::TestFinished(info(None, true))],
        Op::Open | Op::Close => Vec::new(),
    }
}

fn apply(report: &mut Report, renderer: &mut NullRenderer, ops: &[Op]) -> (u64, u64, u64) {
    let mut passes = 0;
    let mut fails = 0;
    let mut terminal = 0;
    for (i, &op) in ops.iter().enumerate() {
        match op {
            Op::Open => {
                handle_runner_event(report, RunnerEvent::SuiteStarted(suite_info(i)), renderer);
            }
            Op::Close => {
                handle_runner_event(report, RunnerEvent::SuiteFinished(suite_info(i)), renderer);
            }
            op => {
                match op {
                    Op::Pass => {
                        passes += 1;
                        terminal += 1;
                    }
                    Op::Fail => {
                        fails += 1;
                        terminal += 1;
                    }
                    _ => {}
                }
                for event in test_event(i, op) {
                    handle_runner_event(report, event, renderer);
                }
            }
        }
    }
    (passes, fails, terminal)
}

/// True if any test in the subtree rooted at `id` failed.
fn subtree_has_failed_test(tree: &ReportTree, id: NodeId) -> bool {
    let Some(node) = tree.get(id) else {
        return false;
    };
    if node.kind == NodeKind::Test && node.outcome == Some(Outcome::Fail) {
        return true;
    }
    node.children
        .iter()
        .any(|&child| subtree_has_failed_test(tree, child))
}

proptest! {
    /// Counters track terminal results exactly, and mood follows failures,
    /// for arbitrary (even unbalanced) scripts.
    #[test]
    fn counters_and_mood_track_terminal_events(
        ops in proptest::collection::vec(op_strategy(), 0..48)
    ) {
        let mut report = Report::new(NavContext::parse("/t"), system_clock());
        let mut renderer = NullRenderer::default();
        handle_runner_event(&mut report, RunnerEvent::RunStarted, &mut renderer);
        let (passes, fails, terminal) = apply(&mut report, &mut renderer, &ops);
        handle_runner_event(&mut report, RunnerEvent::RunFinished, &mut renderer);

        prop_assert_eq!(report.stats.passes(), passes);
        prop_assert_eq!(report.stats.failures(), fails);
        prop_assert_eq!(report.stats.passes() + report.stats.failures(), terminal);
        let expected = if fails > 0 { Mood::Sad } else { Mood::Happy };
        prop_assert_eq!(report.stats.mood(), expected);
    }

    /// Balanced scripts always return to depth zero, classify every suite,
    /// and classify a suite failed exactly when its subtree holds a failed
    /// test.
    #[test]
    fn balanced_scripts_restore_depth_and_classify(ops in balanced_script()) {
        let mut report = Report::new(NavContext::parse("/t"), system_clock());
        let mut renderer = NullRenderer::default();
        handle_runner_event(&mut report, RunnerEvent::RunStarted, &mut renderer);
        apply(&mut report, &mut renderer, &ops);
        handle_runner_event(&mut report, RunnerEvent::RunFinished, &mut renderer);

        prop_assert_eq!(report.depth(), 0);
        for (id, _) in report.tree.walk() {
            let Some(node) = report.tree.get(id) else { continue };
            if node.kind == NodeKind::Suite {
                let expected = if subtree_has_failed_test(&report.tree, id) {
                    Outcome::Fail
                } else {
                    Outcome::Pass
                };
                prop_assert_eq!(node.outcome, Some(expected));
            }
        }
    }

    /// Malformed scripts never lose a terminal result: every pass/fail pair
    /// lands as a test node somewhere in the tree.
    #[test]
    fn no_result_is_lost(ops in proptest::collection::vec(op_strategy(), 0..48)) {
        let mut report = Report::new(NavContext::parse("/t"), system_clock());
        let mut renderer = NullRenderer::default();
        handle_runner_event(&mut report, RunnerEvent::RunStarted, &mut renderer);
        let (_, _, terminal) = apply(&mut report, &mut renderer, &ops);
        let pendings = ops.iter().filter(|&&op| op == Op::Pending).count() as u64;
        handle_runner_event(&mut report, RunnerEvent::RunFinished, &mut renderer);

        let test_nodes = report
            .tree
            .walk()
            .iter()
            .filter(|&&(id, _)| {
                report.tree.get(id).is_some_and(|n| n.kind == NodeKind::Test)
            })
            .count() as u64;
        prop_assert_eq!(test_nodes, terminal + pendings);
    }
}
