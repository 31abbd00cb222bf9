//! Route authorization gate.
//!
//! A UX convenience only: claims are decoded without signature checks, so the
//! API's own 401/403 answers remain the authority.

use super::navigator::Destination;
use crate::auth::{Role, SessionClaims};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Session still loading; render a neutral placeholder and do not navigate.
    Pending,
    Render,
    Redirect(Destination),
}

/// Decide whether a view guarded by `allowed` may render at `location`.
pub fn authorize(
    loading: bool,
    user: Option<&SessionClaims>,
    allowed: &[Role],
    location: &str,
) -> GateDecision {
    if loading {
        return GateDecision::Pending;
    }
    match user {
        None => GateDecision::Redirect(Destination::login_from(location)),
        Some(claims) if claims.has_any_role(allowed) => GateDecision::Render,
        Some(_) => GateDecision::Redirect(Destination::Home),
    }
}
