use crate::auth::SessionClaims;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Uninitialized,
    /// Reading stored credentials at startup.
    Checking,
    Authenticated(SessionClaims),
    Anonymous,
}

impl SessionState {
    pub fn user(&self) -> Option<&SessionClaims> {
        match self {
            SessionState::Authenticated(claims) => Some(claims),
            _ => None,
        }
    }

    /// True until the startup check has settled; route decisions wait on this.
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Uninitialized | SessionState::Checking)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}
