use super::session::Session;
use crate::routes::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Render(Route),
    Redirect(Route),
}

/// Gate a route on session state alone. Role and status restrictions are
/// left to the destination view.
pub fn guard(route: &Route, session: &Session) -> GuardOutcome {
    if route.is_protected() && session.user.is_none() {
        GuardOutcome::Redirect(Route::Login)
    } else {
        GuardOutcome::Render(route.clone())
    }
}
