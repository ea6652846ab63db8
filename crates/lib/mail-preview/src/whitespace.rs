//! Whitespace normalization for preview text.

use std::sync::LazyLock;

use regex::Regex;

/// A newline followed by two or more further newlines, allowing
/// whitespace-only lines in between.
static BLANK_LINE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:\s*\n){2,}").expect("blank line pattern must compile"));

/// Two or more consecutive tabs/spaces.
static SPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\t ]{2,}").expect("space run pattern must compile"));

/// Collapse excess whitespace.
///
/// Runs of three or more blank lines collapse to exactly one blank line
/// first, computed over the original text; runs of two or more tabs/spaces
/// then collapse to a single space over that result. The two passes are
/// order dependent.
pub fn clean_all_whitespace(text: &str) -> String {
    let collapsed = BLANK_LINE_RUNS.replace_all(text, "\n\n");
    SPACE_RUNS.replace_all(&collapsed, " ").into_owned()
}
