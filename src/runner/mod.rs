pub mod ndjson;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::report::RunnerEvent;

pub use ndjson::{CommandSource, StdinSource, parse_line};

/// A source of decoded runner lifecycle events.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Stream events over the channel, in emission order, until the
    /// underlying stream ends.
    async fn stream(&self, tx: mpsc::UnboundedSender<RunnerEvent>) -> Result<()>;

    /// Display name for this source (e.g., "command").
    fn name(&self) -> &str;
}

/// Pick the source for this invocation: a configured runner command, or our
/// own stdin when none is given.
pub fn select(command: Option<String>, workspace: PathBuf) -> Arc<dyn EventSource> {
    match command {
        Some(command) => Arc::new(CommandSource::new(command, workspace)),
        None => Arc::new(StdinSource),
    }
}
