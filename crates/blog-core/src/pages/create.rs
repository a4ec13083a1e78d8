use std::sync::Arc;

use crate::domain::NewPost;
use crate::store::Store;

use super::Navigation;

/// "Create post" form.
pub struct CreatePostForm {
    store: Arc<Store>,
    pub title: String,
    pub content: String,
    error: Option<String>,
}

impl CreatePostForm {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            title: String::new(),
            content: String::new(),
            error: None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submit the form. Returns where to go on success.
    pub async fn submit(&mut self) -> Option<Navigation> {
        self.error = None;

        if let Err(e) = NewPost::new(self.title.as_str(), self.content.as_str()) {
            self.error = Some(e.to_string());
            return None;
        }

        match self.store.create_post(&self.title, &self.content).await {
            Ok(_) => Some(Navigation::Home),
            Err(e) => {
                tracing::error!(error = %e, "Create post failed");
                self.error = Some(e.message().to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FIELDS_REQUIRED;
    use crate::error::BackendError;
    use crate::store::StoreConfig;
    use crate::testing::FakeBackend;

    fn form() -> (FakeBackend, CreatePostForm) {
        let backend = FakeBackend::new();
        let store = Arc::new(backend.store(StoreConfig::default()));
        (backend, CreatePostForm::new(store))
    }

    #[tokio::test]
    async fn test_blank_fields_are_refused() {
        let (backend, mut form) = form();
        form.title = "Title".to_string();
        form.content = "   ".to_string();

        assert_eq!(form.submit().await, None);
        assert_eq!(form.error(), Some(FIELDS_REQUIRED));
        assert!(backend.rows().is_empty());
    }

    #[tokio::test]
    async fn test_successful_submit_goes_home() {
        let (backend, mut form) = form();
        form.title = "Hello".to_string();
        form.content = "World".to_string();

        assert_eq!(form.submit().await, Some(Navigation::Home));
        assert_eq!(form.error(), None);
        assert_eq!(backend.rows()[0].title, "Hello");
    }

    #[tokio::test]
    async fn test_backend_failure_is_shown() {
        let (backend, mut form) = form();
        backend.fail("insert", BackendError::Unauthenticated);
        form.title = "Hello".to_string();
        form.content = "World".to_string();

        assert_eq!(form.submit().await, None);
        assert_eq!(form.error(), Some("Failed to create post: Not signed in"));
    }
}
