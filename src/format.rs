//! Pure text helpers: speed classification, error summaries, and source
//! cleanup. No state; everything here is driven by the reducer.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{ErrorRecord, Speed};

/// Classify a duration against the runner's slow threshold. The medium
/// cutoff is half the threshold; both comparisons are strict, so a test
/// landing exactly on the threshold is medium. A test lacking a duration
/// or a threshold counts as fast.
pub fn speed_of(duration_ms: Option<u64>, slow_ms: Option<u64>) -> Speed {
    let (Some(duration), Some(slow)) = (duration_ms, slow_ms) else {
        return Speed::Fast;
    };
    let medium = slow / 2;
    if duration > slow {
        Speed::Slow
    } else if duration > medium {
        Speed::Medium
    } else {
        Speed::Fast
    }
}

/// Summarize a failure for display. Prefers the stack trace, falls back to
/// the record's display form, and never returns an empty string.
pub fn error_summary(err: &ErrorRecord) -> String {
    let stack = err.stack.as_deref().filter(|s| !s.is_empty());
    let mut text = match stack {
        Some(stack) => stack.to_string(),
        None => err.to_string(),
    };

    if !err.message.is_empty() && !text.contains(&err.message) {
        text = format!("{}\n{}", err.message, text);
    }

    if text == ErrorRecord::GENERIC_TAG {
        text = err.message.clone();
    }

    if stack.is_none()
        && let (Some(url), Some(line)) = (err.source_url.as_deref(), err.line)
    {
        text.push_str(&format!("\n({url}:{line})"));
    }

    if text.is_empty() {
        text = ErrorRecord::GENERIC_TAG.to_string();
    }
    text
}

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^function\s*\w*\s*\([^)]*\)\s*\{|^\([^)]*\)\s*=>\s*\{?").unwrap()
});
static FOOTER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+\}$").unwrap());

/// Strip runner syntax artifacts and common indentation from test source.
///
/// Line endings are normalized first, then a leading BOM, a leading
/// function or arrow header, and a trailing lone brace are removed. Common
/// indentation is measured on the first line only (a run of tabs wins over
/// spaces) and exactly that run is stripped from every line. Idempotent
/// once no artifacts remain.
pub fn clean(source: &str) -> String {
    let mut text = source
        .replace("\r\n", "\n")
        .replace(['\r', '\u{2028}', '\u{2029}'], "\n");
    if let Some(rest) = text.strip_prefix('\u{feff}') {
        text = rest.to_string();
    }
    let text = HEADER_RE.replace(&text, "");
    let text = FOOTER_RE.replace(&text, "");

    let first = text.strip_prefix('\n').unwrap_or(&text);
    let spaces = first.len() - first.trim_start_matches(' ').len();
    let tabs = first.len() - first.trim_start_matches('\t').len();
    let (ch, count) = if tabs > 0 { ('\t', tabs) } else { (' ', spaces) };

    let dedented = if count > 0 {
        // Lines indented less than the first keep what they have.
        let indent = Regex::new(&format!("(?m)^{ch}{{{count}}}")).unwrap();
        indent.replace_all(&text, "").into_owned()
    } else {
        text.into_owned()
    };

    dedented.trim().to_string()
}
