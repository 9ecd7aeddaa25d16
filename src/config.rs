use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

/// How to obtain the event stream.
#[derive(Debug, Default, Deserialize)]
pub struct RunnerConfig {
    /// Command line of an NDJSON-emitting runner. When absent, events are
    /// read from stdin.
    /// Example: "node ./scripts/run-tests.js"
    pub command: Option<String>,
}

/// Seeds for the navigation context and the hide-passed flag.
#[derive(Debug, Default, Deserialize)]
pub struct ViewConfig {
    /// Location string of the form `/path?query#fragment` used for replay
    /// links. Defaults to "/".
    pub location: Option<String>,
    #[serde(default)]
    pub hide_passed: bool,
}

impl Config {
    /// Load `spyglass.toml` from the workspace root, falling back to defaults
    /// if absent or invalid.
    pub fn load(workspace: &Path) -> Self {
        let path = workspace.join("spyglass.toml");
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        toml::from_str(&content).unwrap_or_default()
    }
}
