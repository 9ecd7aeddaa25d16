pub mod record;
pub mod status;
pub mod tree;

pub use record::{ErrorRecord, SuiteInfo, TestInfo, TestKind};
pub use status::{Mood, Outcome, Speed, TestState};
pub use tree::{NodeId, NodeKind, ReportNode, ReportTree, TestDetail};
