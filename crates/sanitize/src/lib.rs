//! Address input validation and sanitization.
//!
//! Two independent passes with different philosophies:
//!
//! - [`validate_address`] is a hard gate: it rejects input that is too short,
//!   too long, content-free, or that matches a known SQL-injection or XSS
//!   pattern. Nothing is modified.
//! - [`sanitize_address`] is best-effort salvage: it strips markup, escapes
//!   entities, and deletes recognized injection spans, failing only when the
//!   remainder is unusable.
//!
//! Both passes draw on the same pattern tables in [`patterns`], so input that
//! would be rejected can never slip through cleanup untouched.
//!
//! # Example
//!
//! ```
//! use courier_sanitize::{sanitize_address, validate_address};
//!
//! assert!(validate_address("221B Baker Street, London"));
//! assert!(!validate_address("'; DROP TABLE users; --"));
//!
//! let clean = sanitize_address("123 Main St<script>alert('xss')</script>").unwrap();
//! assert!(clean.starts_with("123 Main St"));
//! assert!(!clean.contains("<script>"));
//! ```

mod error;
mod patterns;

pub use error::{Result, SanitizeError};

use patterns::{HTML_TAG, SCRIPT_REMOVALS, SQL_PATTERNS, SQL_REMOVALS, WHITESPACE_RUN, XSS_PATTERNS};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Minimum address length after trimming.
pub const MIN_ADDRESS_LEN: usize = 3;

/// Maximum address length.
pub const MAX_ADDRESS_LEN: usize = 500;

/// Above this length an address must show some character variety.
const LONG_ADDRESS_LEN: usize = 100;

/// Distinct lowercase characters required of a long address. Defends against
/// repeated-character padding like "AAAA...".
const MIN_DISTINCT_CHARS: usize = 5;

/// Checks whether an address passes the validation gate.
///
/// Rejects input that trims to fewer than 3 or more than 500 characters,
/// long input with almost no character variety, input matching a known
/// injection pattern, input without any alphanumeric character, and input
/// that is purely digits (addresses need letters).
pub fn validate_address(raw: &str) -> bool {
    let address = raw.trim();
    let len = address.chars().count();

    if len < MIN_ADDRESS_LEN || len > MAX_ADDRESS_LEN {
        return false;
    }

    if len > LONG_ADDRESS_LEN {
        let distinct: HashSet<char> = address.to_lowercase().chars().collect();
        if distinct.len() < MIN_DISTINCT_CHARS {
            return false;
        }
    }

    if contains_malicious_content(address) {
        return false;
    }

    if !address.chars().any(|c| c.is_ascii_alphanumeric()) {
        return false;
    }

    // Just a house number is not an address
    if address.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    true
}

/// Reduces an address to a safe form, deleting recognized injection spans.
///
/// Pipeline: trim, strip control characters (tab/newline/carriage-return
/// survive), collapse whitespace runs, strip HTML tags, entity-encode the
/// remainder, delete SQL and script spans, trim again.
///
/// Fails when the input is empty or the result falls outside the
/// [`MIN_ADDRESS_LEN`]..=[`MAX_ADDRESS_LEN`] bound, so callers get an explicit
/// error rather than a silently empty string.
pub fn sanitize_address(raw: &str) -> Result<String> {
    if raw.is_empty() {
        return Err(SanitizeError::Empty);
    }

    let mut sanitized: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect();

    sanitized = WHITESPACE_RUN.replace_all(&sanitized, " ").into_owned();
    sanitized = HTML_TAG.replace_all(&sanitized, "").into_owned();
    sanitized = escape_html(&sanitized);

    for re in SQL_REMOVALS.iter() {
        sanitized = re.replace_all(&sanitized, "").into_owned();
    }
    for re in SCRIPT_REMOVALS.iter() {
        sanitized = re.replace_all(&sanitized, "").into_owned();
    }

    let sanitized = sanitized.trim();
    let len = sanitized.chars().count();

    if len < MIN_ADDRESS_LEN {
        return Err(SanitizeError::TooShort);
    }
    if len > MAX_ADDRESS_LEN {
        return Err(SanitizeError::TooLong);
    }

    debug!(raw, cleaned = sanitized, "sanitized address");
    Ok(sanitized.to_string())
}

/// Checks the input against both pattern tables, logging what fired.
fn contains_malicious_content(text: &str) -> bool {
    for p in SQL_PATTERNS.iter() {
        if p.pattern.is_match(text) {
            warn!(pattern = p.description, "detected SQL injection pattern");
            return true;
        }
    }

    for p in XSS_PATTERNS.iter() {
        if p.pattern.is_match(text) {
            warn!(pattern = p.description, "detected XSS pattern");
            return true;
        }
    }

    false
}

/// Entity-encodes `&`, `<`, `>`, and both quote characters.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
