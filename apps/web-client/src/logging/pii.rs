use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Regex patterns for redacting secrets and personal data from log output.
pub struct PiiRegexRegistry;

impl PiiRegexRegistry {
    /// Standard email addresses
    pub fn email() -> &'static Regex {
        static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
        });
        &EMAIL_REGEX
    }

    /// Three-segment JWTs (`eyJ...` header)
    pub fn jwt() -> &'static Regex {
        static JWT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"eyJ[A-Za-z0-9_-]*\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]*").unwrap()
        });
        &JWT_REGEX
    }

    /// Opaque base64url-like runs of 24 or more characters
    pub fn opaque_token() -> &'static Regex {
        static OPAQUE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9_+/-]{24,}={0,2}").unwrap()
        });
        &OPAQUE_REGEX
    }
}

/// Masks emails (first character of the local part kept) and replaces tokens
/// with placeholders. JWTs go first so their segments are not half-matched.
pub fn redact(input: &str) -> String {
    let jwt_redacted = PiiRegexRegistry::jwt().replace_all(input, "[REDACTED_JWT]");

    let email_redacted =
        PiiRegexRegistry::email().replace_all(&jwt_redacted, |caps: &regex::Captures| {
            let full = &caps[0];
            match full.find('@') {
                Some(0) | None => full.to_string(),
                Some(at) => {
                    let first = full[..at].chars().next().map(String::from).unwrap_or_default();
                    format!("{first}***{}", &full[at..])
                }
            }
        });

    PiiRegexRegistry::opaque_token()
        .replace_all(&email_redacted, "[REDACTED_TOKEN]")
        .to_string()
}

/// Short, non-reversible label for a token: first six characters and length.
pub fn token_fingerprint(token: &str) -> String {
    let prefix: String = token.chars().take(6).collect();
    format!("{prefix}…({} chars)", token.chars().count())
}

/// Display wrapper that redacts on format.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
