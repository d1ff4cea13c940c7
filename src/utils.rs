//! Utility functions for string shaping and file system checks.
//!
//! - Keyword slugification for output filenames
//! - Title-casing for display headings
//! - String truncation for log previews
//! - Output directory validation

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs as stdfs;
use std::io;
use tokio::fs;
use tracing::{info, instrument};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Turn a keyword into the stem of an output filename.
///
/// Each run of whitespace becomes a single hyphen. Nothing else is touched,
/// so case and punctuation survive.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify_keyword("ai   tools"), "ai-tools");
/// ```
pub fn slugify_keyword(keyword: &str) -> String {
    WHITESPACE_RUN.replace_all(keyword, "-").into_owned()
}

/// Upper-case the first character of every whitespace-separated word.
///
/// Separators are kept as they are. Used for headings only; machine-readable
/// fields keep the raw keyword.
pub fn title_case(s: &str) -> String {
    s.split_inclusive(char::is_whitespace).map(upcase).collect()
}

/// Capitalize the first character of a string.
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (backing off to a char
/// boundary) with `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> io::Result<()> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_keyword() {
        assert_eq!(slugify_keyword("gardening"), "gardening");
        assert_eq!(slugify_keyword("web development"), "web-development");
        assert_eq!(slugify_keyword("ai \t  tools\nnow"), "ai-tools-now");
        assert_eq!(slugify_keyword("C++ Tips"), "C++-Tips");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("best gardening tools"), "Best Gardening Tools");
        assert_eq!(title_case("gardening AI"), "Gardening AI");
        assert_eq!(title_case(""), "");
        assert_eq!(title_case("élan vital"), "Élan Vital");
        assert_eq!(title_case("ai\ttools"), "Ai\tTools");
        assert_eq!(title_case("ai\n tools  now"), "Ai\n Tools  Now");
    }

    #[test]
    fn test_upcase() {
        assert_eq!(upcase("hello"), "Hello");
        assert_eq!(upcase(""), "");
        assert_eq!(upcase("a"), "A");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        let result = truncate_for_log("ééé", 3);
        assert!(result.starts_with('é'));
        assert!(result.ends_with("(+4 bytes)"));
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a/b");
        let nested = nested.to_str().unwrap();
        ensure_writable_dir(nested).await.unwrap();
        assert!(std::path::Path::new(nested).is_dir());
    }
}
