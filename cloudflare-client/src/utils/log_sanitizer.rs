//! Log sanitization utilities
//!
//! Keeps response bodies (certificates, worker scripts, billing data) and
//! credentials from being fully exposed in debug/error logs.

/// Maximum number of bytes of a body included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of leading characters of a secret left visible.
const SECRET_VISIBLE_PREFIX: usize = 4;

/// Largest char boundary `<= index` (`str::floor_char_boundary` needs Rust 1.91).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    (0..=index).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

/// Truncate a body for logging, noting the original size when cut.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Mask a credential, keeping only a short prefix.
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(SECRET_VISIBLE_PREFIX).collect();
    if secret.chars().count() <= SECRET_VISIBLE_PREFIX * 2 {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}
