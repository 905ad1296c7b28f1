use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{normalize_base_url, ApiClient};
use crate::auth::{guard, FileTokenStore, GuardOutcome, Navigator, RecordingNavigator, SessionStore};
use crate::config::config;
use crate::routes::Route;

/// Non-secret CLI bookkeeping kept next to `tokens.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliState {
    pub last_identifier: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
}

impl CliState {
    pub fn record_login(&mut self, identifier: &str) {
        self.last_identifier = Some(identifier.to_string());
        self.last_login = Some(Utc::now());
    }
}

pub fn get_state_dir() -> anyhow::Result<PathBuf> {
    let state_dir = config().state_dir()?;
    if !state_dir.exists() {
        fs::create_dir_all(&state_dir)?;
    }
    Ok(state_dir)
}

pub fn load_cli_state() -> anyhow::Result<CliState> {
    let state_file = get_state_dir()?.join("cli.json");
    if !state_file.exists() {
        return Ok(CliState::default());
    }

    let content = fs::read_to_string(state_file)?;
    let state: CliState = serde_json::from_str(&content)?;
    Ok(state)
}

pub fn save_cli_state(state: &CliState) -> anyhow::Result<()> {
    let state_file = get_state_dir()?.join("cli.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(state_file, content)?;
    Ok(())
}

/// Everything a command needs to talk to the backend
pub struct CliContext {
    pub client: ApiClient,
    pub navigator: Arc<RecordingNavigator>,
}

impl CliContext {
    /// Restore the persisted session and, if a token survived, the user
    pub async fn connect() -> anyhow::Result<Self> {
        let base_url = normalize_base_url(&config().api.base_url)?;
        let store = Arc::new(FileTokenStore::in_dir(&get_state_dir()?));
        let session = Arc::new(SessionStore::restore(base_url, store).await?);
        let navigator = Arc::new(RecordingNavigator::new());
        let client = ApiClient::new(session, navigator.clone() as Arc<dyn Navigator>)?;
        client.hydrate_session().await;
        Ok(Self { client, navigator })
    }

    pub fn session(&self) -> &SessionStore {
        self.client.session()
    }

    /// Apply the route guard before running a command for `route`
    pub async fn enter(&self, route: Route) -> anyhow::Result<()> {
        match guard(&route, &self.session().session().await) {
            GuardOutcome::Render(_) => Ok(()),
            GuardOutcome::Redirect(to) => {
                self.navigator.navigate(to.clone());
                Err(anyhow::anyhow!(
                    "{} requires login (redirected to {}). Run 'mdir auth login <username>' first",
                    route,
                    to
                ))
            }
        }
    }

    /// Turn a navigation recorded during the command into a hint
    pub fn login_hint(&self) -> Option<String> {
        match self.navigator.last() {
            Some(Route::Login) => Some("Session expired. Run 'mdir auth login <username>' to sign in again".to_string()),
            _ => None,
        }
    }
}
