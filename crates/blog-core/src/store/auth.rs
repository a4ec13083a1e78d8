//! Auth state container.

use crate::domain::{Credentials, User, mask_email};

use super::status::{Operation, RequestError, RequestStatus};
use super::{Action, Store};

/// Status of each auth request kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthRequests {
    pub sign_up: RequestStatus,
    pub sign_in: RequestStatus,
    pub sign_out: RequestStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    /// True while a sign up or sign in is in flight. Sign out does not set it.
    pub loading: bool,
    pub error: Option<String>,
    pub requests: AuthRequests,
}

/// Actions understood by [`reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    SignUpPending,
    SignUpFulfilled { user: Option<User> },
    SignUpRejected { message: String },
    SignInPending,
    SignInFulfilled { user: User },
    SignInRejected { message: String },
    SignOutPending,
    SignOutFulfilled,
    SignOutRejected { message: String },
    /// Session change reported by the auth service.
    SetUser { user: Option<User> },
    ClearError,
}

impl AuthAction {
    pub fn name(&self) -> &'static str {
        match self {
            AuthAction::SignUpPending => "auth/signUp/pending",
            AuthAction::SignUpFulfilled { .. } => "auth/signUp/fulfilled",
            AuthAction::SignUpRejected { .. } => "auth/signUp/rejected",
            AuthAction::SignInPending => "auth/signIn/pending",
            AuthAction::SignInFulfilled { .. } => "auth/signIn/fulfilled",
            AuthAction::SignInRejected { .. } => "auth/signIn/rejected",
            AuthAction::SignOutPending => "auth/signOut/pending",
            AuthAction::SignOutFulfilled => "auth/signOut/fulfilled",
            AuthAction::SignOutRejected { .. } => "auth/signOut/rejected",
            AuthAction::SetUser { .. } => "auth/setUser",
            AuthAction::ClearError => "auth/clearError",
        }
    }
}

/// Apply one action to the auth container.
pub fn reduce(state: &mut AuthState, action: AuthAction) {
    match action {
        AuthAction::SignUpPending => {
            state.loading = true;
            state.error = None;
            state.requests.sign_up = RequestStatus::Pending;
        }
        AuthAction::SignUpFulfilled { user } => {
            state.loading = false;
            state.user = user;
            state.requests.sign_up = RequestStatus::Succeeded;
        }
        AuthAction::SignUpRejected { message } => {
            state.loading = false;
            state.requests.sign_up = RequestStatus::Failed(message.clone());
            state.error = Some(message);
        }
        AuthAction::SignInPending => {
            state.loading = true;
            state.error = None;
            state.requests.sign_in = RequestStatus::Pending;
        }
        AuthAction::SignInFulfilled { user } => {
            state.loading = false;
            state.user = Some(user);
            state.requests.sign_in = RequestStatus::Succeeded;
        }
        AuthAction::SignInRejected { message } => {
            state.loading = false;
            state.requests.sign_in = RequestStatus::Failed(message.clone());
            state.error = Some(message);
        }
        AuthAction::SignOutPending => {
            state.requests.sign_out = RequestStatus::Pending;
        }
        AuthAction::SignOutFulfilled => {
            state.user = None;
            state.requests.sign_out = RequestStatus::Succeeded;
        }
        AuthAction::SignOutRejected { message } => {
            // The user stays set even though the remote session may already be gone.
            state.requests.sign_out = RequestStatus::Failed(message.clone());
            state.error = Some(message);
        }
        AuthAction::SetUser { user } => {
            state.user = user;
            state.error = None;
        }
        AuthAction::ClearError => {
            state.error = None;
        }
    }
}

impl Store {
    /// Register an account. The user is stored when the service returns one.
    pub async fn sign_up(&self, credentials: &Credentials) -> Result<Option<User>, RequestError> {
        self.dispatch(AuthAction::SignUpPending);
        tracing::debug!(email = %mask_email(&credentials.email), "Signing up");

        match self.auth.sign_up(credentials).await {
            Ok(outcome) => {
                self.dispatch(AuthAction::SignUpFulfilled {
                    user: outcome.user.clone(),
                });
                Ok(outcome.user)
            }
            Err(err) => Err(self.reject(Operation::SignUp, &err, |message| {
                AuthAction::SignUpRejected { message }
            })),
        }
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<User, RequestError> {
        self.dispatch(AuthAction::SignInPending);
        tracing::debug!(email = %mask_email(&credentials.email), "Signing in");

        match self.auth.sign_in(credentials).await {
            Ok(session) => {
                tracing::info!(user_id = %session.user.id, "Signed in");
                self.dispatch(AuthAction::SignInFulfilled {
                    user: session.user.clone(),
                });
                Ok(session.user)
            }
            Err(err) => Err(self.reject(Operation::SignIn, &err, |message| {
                AuthAction::SignInRejected { message }
            })),
        }
    }

    pub async fn sign_out(&self) -> Result<(), RequestError> {
        self.dispatch(AuthAction::SignOutPending);

        match self.auth.sign_out().await {
            Ok(()) => {
                tracing::info!("Signed out");
                self.dispatch(AuthAction::SignOutFulfilled);
                Ok(())
            }
            Err(err) => Err(self.reject(Operation::SignOut, &err, |message| {
                AuthAction::SignOutRejected { message }
            })),
        }
    }

    /// Mirror a session change reported by the auth service.
    pub fn set_user(&self, user: Option<User>) {
        self.dispatch(AuthAction::SetUser { user });
    }

    pub fn clear_auth_error(&self) {
        self.dispatch(AuthAction::ClearError);
    }
}

impl From<AuthAction> for Action {
    fn from(action: AuthAction) -> Self {
        Action::Auth(action)
    }
}
