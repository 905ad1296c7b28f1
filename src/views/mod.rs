//! View models: the state each screen holds and the transitions it allows.
//! Every fetch a view makes runs inside its [`ViewScope`], so results that
//! arrive after the view closed are discarded instead of applied.

pub mod admin;
pub mod connection;
pub mod directory;
pub mod expert_detail;
pub mod login;
pub mod password_reset;
pub mod profile;
pub mod registration;

use std::future::Future;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::ApiError;

/// Heading shown instead of directory content to unverified accounts
pub const PENDING_TITLE: &str = "Account Pending Verification";
pub const PENDING_MESSAGE: &str = "Your account is awaiting verification by an administrator. \
    You can browse experts once your membership has been confirmed. \
    In the meantime, make sure your profile is complete.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ViewState<T> {
    Loading,
    Error(String),
    Ready(T),
}

impl<T> ViewState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

/// Lifetime of a mounted view. Closing (or dropping) it cancels every
/// request still running under it.
#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle that can close the scope from elsewhere (e.g. a signal handler)
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn close(&self) {
        self.token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn run<T, F>(&self, fut: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let result = tokio::select! {
            biased;
            _ = self.token.cancelled() => return Err(ApiError::Cancelled),
            result = fut => result,
        };
        if self.is_closed() {
            return Err(ApiError::Cancelled);
        }
        result
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Yes/no prompt before destructive actions
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool + Send + Sync> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn run_passes_results_through_while_open() {
        let scope = ViewScope::new();
        let value = scope.run(async { Ok::<_, ApiError>(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn closing_cancels_in_flight_work() {
        let scope = ViewScope::new();
        let token = scope.token();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let result = scope
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, ApiError>(())
            })
            .await;
        assert!(matches!(result, Err(ApiError::Cancelled)));
        assert!(scope.is_closed());
    }

    #[tokio::test]
    async fn dropping_a_scope_cancels_its_token() {
        let scope = ViewScope::new();
        let token = scope.token();
        drop(scope);
        assert!(token.is_cancelled());
    }

    #[test]
    fn closures_confirm() {
        let yes = |_: &str| true;
        let no = |_: &str| false;
        assert!(yes.confirm("Delete?"));
        assert!(!no.confirm("Delete?"));
    }
}
