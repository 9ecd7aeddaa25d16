use super::record::ErrorRecord;
use super::status::{Outcome, Speed, TestState};

pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The hidden container every root-level node hangs off.
    Report,
    Suite,
    Test,
}

#[derive(Debug, Clone)]
pub struct ReportNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub kind: NodeKind,
    pub title: String,
    pub full_title: String,
    /// Pass/fail classification; set at insertion for tests, at close for suites.
    pub outcome: Option<Outcome>,
    /// "Run only this node" link. Absent for pending tests and the orphan container.
    pub replay_url: Option<String>,
    /// Leaf payload carried only by test nodes.
    pub detail: Option<TestDetail>,
}

#[derive(Debug, Clone, Default)]
pub struct TestDetail {
    pub state: TestState,
    pub duration_ms: Option<u64>,
    /// Absent for pending tests.
    pub speed: Option<Speed>,
    /// Cleaned source text of the test body.
    pub source: Option<String>,
    pub err: Option<ErrorRecord>,
}

/// Arena-backed report tree. Node 0 is the hidden report container.
#[derive(Debug)]
pub struct ReportTree {
    nodes: Vec<ReportNode>,
}

impl ReportTree {
    pub fn new() -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.push_node(NodeKind::Report, String::new(), String::new(), None);
        tree
    }

    /// The hidden container all root-level nodes hang off.
    pub fn root(&self) -> NodeId {
        0
    }

    /// Add a child node under a parent, preserving insertion order. Returns
    /// the node id.
    pub fn add_child(
        &mut self,
        parent_id: NodeId,
        kind: NodeKind,
        title: String,
        full_title: String,
    ) -> NodeId {
        let id = self.push_node(kind, title, full_title, Some(parent_id));
        if let Some(parent) = self.nodes.get_mut(parent_id) {
            parent.children.push(id);
        }
        id
    }

    fn push_node(
        &mut self,
        kind: NodeKind,
        title: String,
        full_title: String,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(ReportNode {
            id,
            parent,
            children: Vec::new(),
            kind,
            title,
            full_title,
            outcome: None,
            replay_url: None,
            detail: None,
        });
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&ReportNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut ReportNode> {
        self.nodes.get_mut(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth-first walk in event order, paired with nesting depth. The
    /// hidden root is excluded; its children sit at depth 0.
    pub fn walk(&self) -> Vec<(NodeId, usize)> {
        let mut result = Vec::new();
        if let Some(root) = self.nodes.first() {
            for &child_id in &root.children {
                self.collect(child_id, 0, &mut result);
            }
        }
        result
    }

    fn collect(&self, id: NodeId, depth: usize, result: &mut Vec<(NodeId, usize)>) {
        result.push((id, depth));
        if let Some(node) = self.nodes.get(id) {
            for &child_id in &node.children {
                self.collect(child_id, depth + 1, result);
            }
        }
    }

    /// Collect all test node ids classified as failed.
    pub fn failed_tests(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Test && n.outcome == Some(Outcome::Fail))
            .map(|n| n.id)
            .collect()
    }
}

impl Default for ReportTree {
    fn default() -> Self {
        Self::new()
    }
}
