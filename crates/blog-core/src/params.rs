//! Route parameter validation.
//!
//! A [`ParamValidator`] checks that every expected route parameter is present
//! and non-empty, and publishes the result through a watch channel. The
//! published value only changes when the derived result differs structurally
//! from the previous one, so subscribers never see redundant updates.

use std::collections::BTreeMap;

use tokio::sync::watch;

use crate::error::DomainError;

pub type ParamMap = BTreeMap<String, String>;

/// Parameters supplied by the router: path segments and the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    pub path: ParamMap,
    pub query: ParamMap,
}

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path.insert(name.into(), value.into());
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }
}

/// The published "validated or error" view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedParams {
    values: ParamMap,
    error: Option<String>,
}

impl ValidatedParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn values(&self) -> &ParamMap {
        &self.values
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

pub struct ParamValidator {
    expected: Vec<String>,
    source: RouteParams,
    published: watch::Sender<ValidatedParams>,
}

impl ParamValidator {
    pub fn new<I, S>(expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            expected: expected.into_iter().map(Into::into).collect(),
            source: RouteParams::default(),
            published: watch::Sender::new(ValidatedParams::default()),
        }
    }

    /// Derive the validated mapping from `params` without publishing anything.
    pub fn validate(&self, params: &RouteParams) -> Result<ParamMap, DomainError> {
        let mut validated = ParamMap::new();
        let mut missing = Vec::new();

        for name in &self.expected {
            match params.path.get(name) {
                Some(value) if !value.is_empty() => {
                    validated.insert(name.clone(), value.clone());
                }
                _ => missing.push(name.as_str()),
            }
        }

        if !missing.is_empty() {
            return Err(DomainError::Validation(format!(
                "Missing required parameters: {}",
                missing.join(", ")
            )));
        }

        Ok(validated)
    }

    /// Take new route parameters and re-derive. Returns whether the published
    /// view changed.
    pub fn sync(&mut self, params: RouteParams) -> bool {
        self.source = params;
        self.publish()
    }

    /// Re-derive from the last parameters seen, whether or not they changed.
    pub fn force_refresh(&mut self) -> bool {
        tracing::debug!(expected = ?self.expected, "Forced parameter re-validation");
        self.publish()
    }

    pub fn current(&self) -> ValidatedParams {
        self.published.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ValidatedParams> {
        self.published.subscribe()
    }

    /// The `refresh` query parameter, passed through unvalidated.
    pub fn refresh(&self) -> Option<&str> {
        self.source.query.get("refresh").map(String::as_str)
    }

    fn publish(&self) -> bool {
        // A failed validation resets the published values instead of keeping stale ones.
        let next = match self.validate(&self.source) {
            Ok(values) => ValidatedParams {
                values,
                error: None,
            },
            Err(err) => ValidatedParams {
                values: ParamMap::new(),
                error: Some(err.to_string()),
            },
        };

        self.published.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        })
    }
}
