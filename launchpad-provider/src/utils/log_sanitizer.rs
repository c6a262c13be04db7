//! Log sanitization utilities
//!
//! Keeps response bodies and API tokens from being written to logs in full.

/// Maximum number of bytes of a body included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of trailing characters of a secret left visible.
const SECRET_VISIBLE_SUFFIX: usize = 4;

fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Truncate a string for safe logging, noting the original length.
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

/// Mask a credential, keeping only its last few characters: `****abcd`.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= SECRET_VISIBLE_SUFFIX * 2 {
        return "****".to_string();
    }
    let suffix: String = chars[chars.len() - SECRET_VISIBLE_SUFFIX..].iter().collect();
    format!("****{suffix}")
}
