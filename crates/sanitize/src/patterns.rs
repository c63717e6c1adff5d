//! Injection pattern tables shared by validation and sanitization.
//!
//! The same pattern set backs both the hard reject gate and the best-effort
//! cleanup pass, so content that would fail validation can never survive a
//! cleanup pass untouched. These are enumerated blocklists: defense-in-depth
//! against hostile address text, not a substitute for parameterized queries
//! at the storage boundary.

use once_cell::sync::Lazy;
use regex::Regex;

/// A named detection pattern.
pub(crate) struct InjectionPattern {
    /// Short description used in log output when the pattern fires
    pub(crate) description: &'static str,
    pub(crate) pattern: Regex,
}

fn detect(description: &'static str, re: &str) -> InjectionPattern {
    InjectionPattern {
        description,
        pattern: Regex::new(re).unwrap(),
    }
}

/// SQL token sequences that fail validation outright.
pub(crate) static SQL_PATTERNS: Lazy<Vec<InjectionPattern>> = Lazy::new(|| {
    vec![
        detect("SELECT..FROM", r"(?i)select\s+.*\s+from"),
        detect("INSERT INTO", r"(?i)insert\s+into"),
        detect("UPDATE..SET", r"(?i)update\s+.*\s+set"),
        detect("DELETE FROM", r"(?i)delete\s+from"),
        detect("DROP TABLE", r"(?i)drop\s+table"),
        detect("UNION SELECT", r"(?i)union\s+select"),
        detect("terminator with line comment", r";\s*--"),
        detect("terminator with block comment", r";\s*/\*"),
        detect("numeric tautology", r"(?i)'\s*or\s+\d+\s*=\s*\d+"),
        detect("quoted tautology", r"(?i)'\s*or\s+'\w+'\s*=\s*'\w+"),
    ]
});

/// Markup and script markers that fail validation outright.
pub(crate) static XSS_PATTERNS: Lazy<Vec<InjectionPattern>> = Lazy::new(|| {
    vec![
        detect("script tag", r"(?i)<script[^>]*>"),
        detect("javascript: URI", r"(?i)javascript:"),
        detect("onload handler", r"(?i)onload\s*="),
        detect("onerror handler", r"(?i)onerror\s*="),
        detect("onclick handler", r"(?i)onclick\s*="),
        detect("onmouseover handler", r"(?i)onmouseover\s*="),
        detect("iframe tag", r"(?i)<iframe[^>]*>"),
    ]
});

/// SQL spans deleted (not just flagged) during cleanup.
pub(crate) static SQL_REMOVALS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)select\s+.*\s+from.*",
        r"(?i)insert\s+into.*",
        r"(?i)update\s+.*\s+set.*",
        r"(?i)delete\s+from.*",
        r"(?i)drop\s+table.*",
        r"(?i)union\s+select.*",
        r";\s*--.*",
        r";\s*/\*.*?\*/",
        r"(?i)'\s*or\s+.*",
        r"--.*",
        r"/\*.*?\*/",
    ]
    .iter()
    .map(|re| Regex::new(re).unwrap())
    .collect()
});

/// Script bodies and event-handler attributes deleted during cleanup.
/// These span newlines, hence the `s` flag.
pub(crate) static SCRIPT_REMOVALS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?is)<script[^>]*>.*?</script>",
        r#"(?is)javascript:[^"']*"#,
        r#"(?is)on\w+\s*=\s*["'][^"']*["']"#,
        r"(?is)<iframe[^>]*>.*?</iframe>",
    ]
    .iter()
    .map(|re| Regex::new(re).unwrap())
    .collect()
});

/// Runs of whitespace, collapsed to single spaces during cleanup.
pub(crate) static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Anything that looks like an HTML tag.
pub(crate) static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
