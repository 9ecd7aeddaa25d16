//! The stateful reducer: one [`Report`] per reporting session turns the
//! runner's event stream into a nested result tree plus aggregate counters,
//! pushing each mutation at the renderer as it happens.

pub mod events;
pub mod stats;

pub use events::{RunnerEvent, handle_runner_event};
pub use stats::{Clock, RunStats, system_clock};

use crate::format;
use crate::models::{
    ErrorRecord, Mood, NodeId, NodeKind, Outcome, ReportTree, SuiteInfo, TestDetail, TestInfo,
    TestKind, TestState,
};
use crate::nav::{self, NavContext};
use crate::render::Renderer;

/// Label for the synthetic container that collects stray results.
pub const ORPHAN_LABEL: &str = "ORPHAN TESTS";

pub struct Report {
    pub tree: ReportTree,
    pub stats: RunStats,
    nav: NavContext,
    /// Open containers, top = current insertion point. The arena root sits
    /// at the bottom until an unbalanced close pops it.
    stack: Vec<NodeId>,
    /// Set once the first stray result forced a synthetic container; never
    /// created twice.
    orphan: Option<NodeId>,
}

impl Report {
    pub fn new(nav: NavContext, clock: Clock) -> Self {
        let tree = ReportTree::new();
        let stack = vec![tree.root()];
        Self {
            tree,
            stats: RunStats::new(clock),
            nav,
            stack,
            orphan: None,
        }
    }

    /// Current suite nesting depth (the root container is excluded).
    pub fn depth(&self) -> usize {
        self.stack.len().saturating_sub(1)
    }

    pub(crate) fn on_run_started(&mut self) {
        self.tree = ReportTree::new();
        self.stack = vec![self.tree.root()];
        self.orphan = None;
        self.stats.start();
    }

    pub(crate) fn on_suite_started(&mut self, suite: SuiteInfo, renderer: &mut dyn Renderer) {
        if suite.root {
            return;
        }
        let parent = self.ensure_container(renderer);
        let id = self
            .tree
            .add_child(parent, NodeKind::Suite, suite.title, suite.full_title);
        if let Some(node) = self.tree.get_mut(id) {
            node.replay_url = Some(nav::grep_url(&self.nav, &node.full_title));
        }
        if let Some(node) = self.tree.get(id) {
            renderer.append_suite_node(parent, node);
            renderer.push_container(node);
        }
        self.stack.push(id);
    }

    pub(crate) fn on_suite_finished(&mut self, suite: &SuiteInfo, renderer: &mut dyn Renderer) {
        if suite.root {
            return;
        }
        let Some(id) = self.stack.pop() else {
            tracing::debug!("suite close with no open container, ignoring");
            return;
        };
        renderer.pop_container();
        if id == self.tree.root() {
            return;
        }

        // Sub-suites were classified when they closed, so checking direct
        // children covers arbitrarily deep failures.
        let failed = self.tree.get(id).is_some_and(|node| {
            node.children.iter().any(|&child| {
                self.tree
                    .get(child)
                    .is_some_and(|c| c.outcome == Some(Outcome::Fail))
            })
        });
        let outcome = if failed { Outcome::Fail } else { Outcome::Pass };
        if let Some(node) = self.tree.get_mut(id) {
            node.outcome = Some(outcome);
        }
        if let Some(node) = self.tree.get(id) {
            renderer.set_container_status(node, outcome);
        }
    }

    pub(crate) fn on_test_finished(&mut self, test: TestInfo, renderer: &mut dyn Renderer) {
        renderer.update_duration(self.stats.elapsed_seconds());

        let container = self.ensure_container(renderer);

        let state = if test.pending {
            TestState::Pending
        } else if test.state == Some(TestState::Passed) {
            TestState::Passed
        } else {
            TestState::Failed
        };

        let detail = TestDetail {
            state,
            duration_ms: test.duration_ms,
            speed: state
                .is_terminal()
                .then(|| format::speed_of(test.duration_ms, test.slow_ms)),
            source: match state {
                TestState::Pending => None,
                _ => test.source.as_deref().map(format::clean),
            },
            err: test.err,
        };

        let id = self
            .tree
            .add_child(container, NodeKind::Test, test.title, test.full_title);
        if let Some(node) = self.tree.get_mut(id) {
            node.outcome = Some(match state {
                TestState::Failed => Outcome::Fail,
                _ => Outcome::Pass,
            });
            if state != TestState::Pending {
                node.replay_url = Some(nav::grep_url(&self.nav, &node.full_title));
            }
            node.detail = Some(detail);
        }
        if let Some(node) = self.tree.get(id) {
            renderer.append_test_node(container, node);
        }
    }

    pub(crate) fn on_test_passed(&mut self, renderer: &mut dyn Renderer) {
        self.stats.record_pass();
        renderer.update_counters(self.stats.passes(), self.stats.failures());
    }

    pub(crate) fn on_test_failed(
        &mut self,
        mut test: TestInfo,
        err: ErrorRecord,
        renderer: &mut dyn Renderer,
    ) {
        self.stats.record_fail();
        renderer.update_counters(self.stats.passes(), self.stats.failures());
        renderer.set_mood(Mood::Sad);
        test.err = Some(err);
        // Hook failures never get a paired test-end event; insert the leaf
        // here so the failing hook still shows up in the tree.
        if test.kind == TestKind::Hook {
            self.on_test_finished(test, renderer);
        }
    }

    pub(crate) fn on_run_finished(&mut self, renderer: &mut dyn Renderer) {
        self.stats.finish();
        if self.stats.mood() == Mood::Happy {
            renderer.set_mood(Mood::Happy);
        }
    }

    /// Top of the container stack, materializing the orphan container when a
    /// result arrives with nothing open.
    fn ensure_container(&mut self, renderer: &mut dyn Renderer) -> NodeId {
        if let Some(&top) = self.stack.last() {
            return top;
        }
        let id = match self.orphan {
            Some(id) => id,
            None => {
                let root = self.tree.root();
                let id = self.tree.add_child(
                    root,
                    NodeKind::Suite,
                    ORPHAN_LABEL.to_string(),
                    ORPHAN_LABEL.to_string(),
                );
                if let Some(node) = self.tree.get(id) {
                    renderer.append_suite_node(root, node);
                }
                tracing::debug!("created orphan container for stray results");
                self.orphan = Some(id);
                id
            }
        };
        if let Some(node) = self.tree.get(id) {
            renderer.push_container(node);
        }
        self.stack.push(id);
        id
    }
}
