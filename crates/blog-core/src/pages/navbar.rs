use std::sync::Arc;

use crate::store::Store;

use super::Navigation;

/// Links the navigation bar shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavLinks {
    SignedIn { email: String },
    SignedOut,
}

pub struct NavBar {
    store: Arc<Store>,
}

impl NavBar {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn links(&self) -> NavLinks {
        match self.store.auth_state().user {
            Some(user) => NavLinks::SignedIn { email: user.email },
            None => NavLinks::SignedOut,
        }
    }

    /// Sign out and go to sign in. On failure nothing moves.
    pub async fn sign_out(&self) -> Option<Navigation> {
        match self.store.sign_out().await {
            Ok(()) => Some(Navigation::SignIn),
            Err(e) => {
                tracing::error!(error = %e, "Sign out failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Credentials;
    use crate::error::BackendError;
    use crate::store::StoreConfig;
    use crate::testing::FakeBackend;

    #[tokio::test]
    async fn test_sign_out_flow() {
        let backend = FakeBackend::new();
        let store = Arc::new(backend.store(StoreConfig::default()));
        let nav = NavBar::new(store.clone());
        assert_eq!(nav.links(), NavLinks::SignedOut);

        store
            .sign_in(&Credentials::new("e@example.com", "pw"))
            .await
            .unwrap();
        assert_eq!(
            nav.links(),
            NavLinks::SignedIn {
                email: "e@example.com".to_string()
            }
        );

        backend.fail("sign_out", BackendError::Connection("offline".to_string()));
        assert_eq!(nav.sign_out().await, None);
        assert!(matches!(nav.links(), NavLinks::SignedIn { .. }));

        backend.recover("sign_out");
        assert_eq!(nav.sign_out().await, Some(Navigation::SignIn));
        assert_eq!(nav.links(), NavLinks::SignedOut);
    }
}
