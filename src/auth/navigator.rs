use std::sync::Mutex;

use crate::routes::Route;

/// Navigation callback handed to the request wrapper
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Remembers every navigation; the CLI inspects it after a command runs.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<Route> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Route> {
        self.history.lock().ok().and_then(|h| h.last().cloned())
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!("navigate to {}", route);
        if let Ok(mut history) = self.history.lock() {
            history.push(route);
        }
    }
}
