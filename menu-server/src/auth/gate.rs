//! Admin gate state machine
//!
//! ```text
//! Unauthenticated --sign in ok--> Authenticated --sign out--> Unauthenticated
//!        ^                                                        |
//!        +--------------- sign in failed (error message) ---------+
//! ```
//!
//! The gate never decides whether a session is valid; it only reacts to
//! what the `AuthProvider` reported.

use serde::Serialize;

use super::{AuthError, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    Unauthenticated,
    Authenticated,
}

/// Where the client should navigate next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/admin/login",
            Route::Dashboard => "/admin/dashboard",
        }
    }
}

impl Serialize for Route {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.path())
    }
}

/// What the client renders after a gate transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateView {
    pub state: GateState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Route>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AdminGate {
    state: GateState,
    email: Option<String>,
    error: Option<String>,
}

impl Default for AdminGate {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Unauthenticated,
            email: None,
            error: None,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Page load: an existing session goes straight to the dashboard,
    /// anything else is sent to the login page.
    pub fn on_mount(&mut self, session: Option<&Session>) -> GateView {
        self.error = None;
        match session {
            Some(session) => self.authenticate(session),
            None => self.reset(),
        }
    }

    /// Credentials were submitted. Failure keeps the visitor on the login
    /// page with a user-facing message.
    pub fn on_sign_in(&mut self, result: Result<&Session, &AuthError>) -> GateView {
        match result {
            Ok(session) => {
                self.error = None;
                self.authenticate(session)
            }
            Err(err) => {
                self.state = GateState::Unauthenticated;
                self.email = None;
                self.error = Some(sign_in_message(err).to_string());
                self.view(None)
            }
        }
    }

    pub fn on_sign_out(&mut self) -> GateView {
        self.error = None;
        self.reset()
    }

    fn authenticate(&mut self, session: &Session) -> GateView {
        self.state = GateState::Authenticated;
        self.email = Some(session.email.clone());
        self.view(Some(Route::Dashboard))
    }

    fn reset(&mut self) -> GateView {
        self.state = GateState::Unauthenticated;
        self.email = None;
        self.view(Some(Route::Login))
    }

    fn view(&self, redirect: Option<Route>) -> GateView {
        GateView {
            state: self.state,
            redirect,
            error: self.error.clone(),
            email: self.email.clone(),
        }
    }
}

fn sign_in_message(err: &AuthError) -> &'static str {
    match err {
        AuthError::InvalidCredentials => "Invalid email or password",
        AuthError::Unavailable(_) => "Sign-in is temporarily unavailable, please try again",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            token: "t".into(),
            email: "owner@cafein.test".into(),
            expires_at: i64::MAX,
        }
    }

    #[test]
    fn mount_without_session_redirects_to_login() {
        let mut gate = AdminGate::new();
        let view = gate.on_mount(None);
        assert_eq!(view.state, GateState::Unauthenticated);
        assert_eq!(view.redirect, Some(Route::Login));
        assert!(view.error.is_none());
    }

    #[test]
    fn mount_with_session_goes_to_dashboard() {
        let mut gate = AdminGate::new();
        let view = gate.on_mount(Some(&session()));
        assert_eq!(gate.state(), GateState::Authenticated);
        assert_eq!(view.redirect, Some(Route::Dashboard));
        assert_eq!(view.email.as_deref(), Some("owner@cafein.test"));
    }

    #[test]
    fn failed_sign_in_stays_with_message() {
        let mut gate = AdminGate::new();
        let view = gate.on_sign_in(Err(&AuthError::InvalidCredentials));
        assert_eq!(view.state, GateState::Unauthenticated);
        assert_eq!(view.redirect, None);
        assert_eq!(view.error.as_deref(), Some("Invalid email or password"));
        assert_eq!(gate.error(), Some("Invalid email or password"));
    }

    #[test]
    fn successful_sign_in_clears_previous_error() {
        let mut gate = AdminGate::new();
        gate.on_sign_in(Err(&AuthError::InvalidCredentials));
        let view = gate.on_sign_in(Ok(&session()));
        assert_eq!(view.state, GateState::Authenticated);
        assert_eq!(view.redirect, Some(Route::Dashboard));
        assert!(view.error.is_none());
    }

    #[test]
    fn sign_out_returns_to_login() {
        let mut gate = AdminGate::new();
        gate.on_mount(Some(&session()));
        let view = gate.on_sign_out();
        assert_eq!(view.state, GateState::Unauthenticated);
        assert_eq!(view.redirect, Some(Route::Login));
        assert!(view.email.is_none());
    }

    #[test]
    fn view_serializes_route_paths() {
        let mut gate = AdminGate::new();
        let json = serde_json::to_value(gate.on_mount(None)).unwrap();
        assert_eq!(json["state"], "unauthenticated");
        assert_eq!(json["redirect"], "/admin/login");
        assert!(json.get("error").is_none());
    }
}
