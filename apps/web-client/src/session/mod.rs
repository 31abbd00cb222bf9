//! Tab-wide session: who is signed in, and the state machine that gets there.
//!
//! `Uninitialized -> Checking -> {Authenticated, Anonymous}`; afterwards login,
//! logout and refresh move between `Authenticated` and `Anonymous`.

pub mod builder;
pub mod context;
pub mod shared;
pub mod state;

pub use builder::{build_session, SessionBuilder};
pub use context::SessionContext;
pub use shared::SessionShared;
pub use state::SessionState;
