use parking_lot::Mutex;
use tracing::info;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// Where the application should go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The login entry point, remembering where the user was headed.
    Login { from: Option<String> },
    Home,
    Path(String),
}

impl Destination {
    pub fn login() -> Self {
        Destination::Login { from: None }
    }

    pub fn login_from(location: &str) -> Self {
        Destination::Login {
            from: Some(location.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Destination::Login { .. } => LOGIN_PATH,
            Destination::Home => HOME_PATH,
            Destination::Path(path) => path,
        }
    }

    /// Location to return to after a successful login.
    pub fn return_to(&self) -> Option<&str> {
        match self {
            Destination::Login { from } => from.as_deref(),
            _ => None,
        }
    }
}

/// Performs navigation side effects. The session and the request pipeline
/// call this; nothing else should.
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: Destination);
}

/// Logs every navigation. Default for headless use.
#[derive(Debug, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, destination: Destination) {
        info!(
            to = destination.path(),
            return_to = destination.return_to(),
            "navigation requested"
        );
    }
}

/// Remembers every navigation, for tests and for callers that act on them later.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Destination>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<Destination> {
        self.history.lock().clone()
    }

    pub fn last(&self) -> Option<Destination> {
        self.history.lock().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.history.lock().len()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: Destination) {
        self.history.lock().push(destination);
    }
}
