//! Admin key check for note creation.
//!
//! Reading notes and saving existing ones is open to anyone with the link;
//! only creating a new note requires the admin key.

/// Compare a presented key against the configured one without an early exit
/// on the first differing byte.
pub fn admin_key_matches(presented: Option<&str>, expected: &str) -> bool {
    let Some(presented) = presented else {
        return false;
    };
    let (a, b) = (presented.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_key_matching() {
        assert!(admin_key_matches(Some("secret"), "secret"));
        assert!(!admin_key_matches(Some("secreT"), "secret"));
        assert!(!admin_key_matches(Some("secret-but-longer"), "secret"));
        assert!(!admin_key_matches(Some(""), "secret"));
        assert!(!admin_key_matches(None, "secret"));
    }
}
