//! Navigation targets and the role-based route gate.

pub mod gate;
pub mod navigator;
pub mod table;

pub use gate::{authorize, GateDecision};
pub use navigator::{Destination, Navigator, RecordingNavigator, TracingNavigator};
pub use table::required_roles;
