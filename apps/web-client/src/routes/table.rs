//! Which roles each application path requires.

use crate::auth::Role;

/// Host dashboard: hosts and admins.
pub const HOST_ROLES: &[Role] = &[Role::Host, Role::Admin];
/// Customer dashboard: any signed-in user.
pub const SIGNED_IN_ROLES: &[Role] = &[Role::Customer, Role::Host, Role::Admin];

const SIGNED_IN_PREFIXES: &[&str] = &["/my-bookings", "/bookings", "/profile"];

/// Roles allowed to open `location`, or `None` for public paths.
pub fn required_roles(location: &str) -> Option<&'static [Role]> {
    let path = location.split(['?', '#']).next().unwrap_or(location);
    if has_prefix(path, "/host") {
        return Some(HOST_ROLES);
    }
    if SIGNED_IN_PREFIXES.iter().any(|p| has_prefix(path, p)) {
        return Some(SIGNED_IN_ROLES);
    }
    None
}

/// Segment-aware prefix match: `/host` matches `/host/x` but not `/hostels`.
fn has_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_paths() {
        assert_eq!(required_roles("/host/dashboard"), Some(HOST_ROLES));
        assert_eq!(required_roles("/host"), Some(HOST_ROLES));
        assert_eq!(required_roles("/hostels"), None);
    }

    #[test]
    fn customer_paths() {
        assert_eq!(required_roles("/my-bookings?success=true"), Some(SIGNED_IN_ROLES));
        assert_eq!(required_roles("/profile"), Some(SIGNED_IN_ROLES));
        assert_eq!(required_roles("/bookings/4"), Some(SIGNED_IN_ROLES));
    }

    #[test]
    fn public_paths() {
        for path in ["/", "/login", "/register", "/properties/3", "/search?search=Diani", "/blog"] {
            assert_eq!(required_roles(path), None, "{path}");
        }
    }
}
