//! Unique test data built on ULIDs so parallel tests never share identities.

use ulid::Ulid;

/// A unique string in the format `{prefix}-{ulid}`.
///
/// ```
/// use client_test_support::unique::unique_str;
///
/// let a = unique_str("guest");
/// assert_ne!(a, unique_str("guest"));
/// assert!(a.starts_with("guest-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// A unique email address in the format `{prefix}-{ulid}@example.test`.
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new())
}

/// A unique username suitable for the login form (lowercase, no `@`).
pub fn unique_username(prefix: &str) -> String {
    unique_str(prefix).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_email_has_expected_shape() {
        let email = unique_email("host");
        let parts: Vec<&str> = email.split('@').collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1], "example.test");
        assert!(parts[0].starts_with("host-"));
    }

    #[test]
    fn unique_username_is_lowercase() {
        let name = unique_username("Guest");
        assert_eq!(name, name.to_lowercase());
        assert_ne!(name, unique_username("Guest"));
    }
}
