//! Pulling an HTML document out of free-form model output.

use once_cell::sync::Lazy;
use regex::Regex;

static HTML_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```html\n(.*?)\n```").expect("valid regex"));
static BARE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```\n(.*?)\n```").expect("valid regex"));

const DOCTYPE: &str = "<!DOCTYPE html>";

/// Extract the HTML document from `output`.
///
/// Tries an `html`-tagged fenced block first, then an untagged one, then the
/// raw output if it carries a doctype. Returns `None` when none applies or
/// the result is blank.
pub fn html_document(output: &str) -> Option<String> {
    let fenced = HTML_FENCE
        .captures(output)
        .or_else(|| BARE_FENCE.captures(output))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    let html = match fenced {
        Some(html) => html,
        None if output.contains(DOCTYPE) => output.to_string(),
        None => return None,
    };
    (!html.trim().is_empty()).then_some(html)
}
