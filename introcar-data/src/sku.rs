//! SKU normalization and list-field parsing shared by the jobs.

/// Suffixes that mark variants of the same base part.
pub const KNOWN_SUFFIXES: &[&str] = &["-X", "-A", "-U", ".01", ".02"];

/// Normalize a SKU for matching: trim, uppercase, then strip one known
/// variant suffix if present.
///
/// Only the first matching suffix in [`KNOWN_SUFFIXES`] is removed, so
/// `"FOO-A-X"` becomes `"FOO-A"`, not `"FOO"`.
pub fn normalize_sku(sku: &str) -> String {
    let upper = sku.trim().to_uppercase();
    for suffix in KNOWN_SUFFIXES {
        if let Some(stripped) = upper.strip_suffix(suffix) {
            return stripped.to_string();
        }
    }
    upper
}

/// Split a pipe-delimited list, trimming each segment and dropping empty ones.
///
/// Duplicates are kept in source order.
pub fn split_pipe_list(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Concatenate the ASCII digits of a chassis code and parse them.
///
/// Returns `None` when the code has no digits or the digits overflow `u64`.
pub fn extract_digits(code: &str) -> Option<u64> {
    let digits: String = code.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
#[path = "tests/sku_tests.rs"]
mod tests;
