//! Front-end route surface. Unknown paths fall back to `/`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    Faq,
    Feedback,
    Login,
    Register,
    RegisterComplete,
    ForgotPassword,
    ResetPassword,
    Profile,
    Experts,
    Expert(i64),
    Admin,
    User(i64),
    Dashboard,
    Logout,
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["about"] => Route::About,
            ["faq"] => Route::Faq,
            ["feedback"] => Route::Feedback,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["register", "complete"] => Route::RegisterComplete,
            ["forgot-password"] => Route::ForgotPassword,
            ["reset-password"] => Route::ResetPassword,
            ["profile"] => Route::Profile,
            ["experts"] => Route::Experts,
            ["expert", id] => id.parse().map(Route::Expert).unwrap_or(Route::Home),
            ["admin"] => Route::Admin,
            ["user", id] => id.parse().map(Route::User).unwrap_or(Route::Home),
            ["dashboard"] => Route::Dashboard,
            ["logout"] => Route::Logout,
            _ => Route::Home,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::About => "/about".to_string(),
            Route::Faq => "/faq".to_string(),
            Route::Feedback => "/feedback".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::RegisterComplete => "/register/complete".to_string(),
            Route::ForgotPassword => "/forgot-password".to_string(),
            Route::ResetPassword => "/reset-password".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::Experts => "/experts".to_string(),
            Route::Expert(id) => format!("/expert/{}", id),
            Route::Admin => "/admin".to_string(),
            Route::User(id) => format!("/user/{}", id),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Logout => "/logout".to_string(),
        }
    }

    /// Views that require a logged-in user
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::Profile
                | Route::Experts
                | Route::Expert(_)
                | Route::Admin
                | Route::User(_)
                | Route::Dashboard
        )
    }

    /// Views that additionally re-check the admin role themselves
    pub fn requires_admin(&self) -> bool {
        matches!(self, Route::Admin | Route::User(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
