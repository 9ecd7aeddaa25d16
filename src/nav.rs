//! Explicit navigation context: replay links and the persisted hide-passed
//! flag. Nothing here reads ambient location state; the context is a value
//! handed in by the host.

use std::sync::LazyLock;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;

/// Characters a query component leaves unescaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Where the report lives in its host page: path, query (`?…` or empty),
/// fragment (`#…` or empty).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavContext {
    pub path: String,
    pub query: String,
    pub fragment: String,
}

impl NavContext {
    /// Split a location string of the form `/path?query#fragment`.
    pub fn parse(location: &str) -> Self {
        let (rest, fragment) = match location.find('#') {
            Some(i) => (&location[..i], location[i..].to_string()),
            None => (location, String::new()),
        };
        let (path, query) = match rest.find('?') {
            Some(i) => (rest[..i].to_string(), rest[i..].to_string()),
            None => (rest.to_string(), String::new()),
        };
        Self {
            path,
            query,
            fragment,
        }
    }
}

static GREP_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[?&]grep=[^&\s]*").unwrap());

/// Build a link that reruns only the node named by `pattern`, replacing any
/// grep parameter already present in the query.
pub fn grep_url(nav: &NavContext, pattern: &str) -> String {
    let mut query = nav.query.clone();
    if !query.is_empty() {
        query = GREP_PARAM_RE.replace_all(&query, "").into_owned();
        if let Some(rest) = query.strip_prefix('&') {
            query = format!("?{rest}");
        }
    }

    let encoded = utf8_percent_encode(pattern, COMPONENT);
    if query.is_empty() {
        format!("{}?grep={}", nav.path, encoded)
    } else {
        format!("{}{}&grep={}", nav.path, query, encoded)
    }
}

/// Fragment marker encoding the one persisted UI bit.
pub const HIDE_PASSED_MARKER: &str = "hide_passed";

/// Where fragment rewrites land when the hide-passed flag changes.
pub trait PersistenceSink {
    fn write_fragment(&mut self, fragment: &str);
}

/// Whether passed tests are hidden. Initialized from the location fragment,
/// persisted back through a [`PersistenceSink`] on change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HidePassed {
    enabled: bool,
}

impl HidePassed {
    /// Read the initial state from the navigation context.
    pub fn from_nav(nav: &NavContext) -> Self {
        Self {
            enabled: nav.fragment.contains(HIDE_PASSED_MARKER),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the flag and persist the new value.
    pub fn toggle(&mut self, sink: &mut dyn PersistenceSink) {
        self.set(!self.enabled, sink);
    }

    pub fn set(&mut self, enabled: bool, sink: &mut dyn PersistenceSink) {
        self.enabled = enabled;
        let fragment = if enabled {
            format!("#{HIDE_PASSED_MARKER}")
        } else {
            "#".to_string()
        };
        sink.write_fragment(&fragment);
    }
}
