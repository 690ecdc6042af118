use axum::http::StatusCode;
use log::{debug, warn};
use serde_json::{json, Value};
use thiserror::Error;
use url::{ParseError, Url};

use crate::logic::catalog::PatternCatalog;
use crate::logic::registry::IdRegistry;
use crate::model::{IdentifierClass, MockResponse, PathParams};
use crate::store::{FixtureError, FixtureStore};

/// Number of catalog patterns echoed back when a path matches nothing.
const SAMPLE_PATTERN_COUNT: usize = 5;

/// Why a path could not be answered with its fixture. The display strings are the
/// `error` values clients see.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No mock mapping for endpoint")]
    UnmappedRoute,
    #[error("{} '{}' not found", .class.label(), .value)]
    UnknownIdentifier {
        class: IdentifierClass,
        param: String,
        value: String,
    },
    #[error("Mock file not found: {fixture}")]
    MissingFixture { fixture: String },
    #[error("Mock file could not be loaded: {fixture}")]
    UnreadableFixture {
        fixture: String,
        #[source]
        source: FixtureError,
    },
}

impl ResolveError {
    pub fn status(&self) -> StatusCode {
        match self {
            ResolveError::UnknownIdentifier { .. } => StatusCode::NOT_FOUND,
            ResolveError::UnmappedRoute
            | ResolveError::MissingFixture { .. }
            | ResolveError::UnreadableFixture { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Base for resolving bare paths; only its path is ever read back.
const RELATIVE_BASE: &str = "http://mock-director.local/";

/// Reduce a path or full URL to its path component. Scheme, authority, query and fragment
/// are dropped. Input that is neither an absolute URL nor rooted at `/` yields an empty path.
pub fn endpoint_path(raw: &str) -> String {
    let parsed = match Url::parse(raw) {
        Err(ParseError::RelativeUrlWithoutBase) if raw.starts_with('/') => {
            Url::parse(RELATIVE_BASE).and_then(|base| base.join(raw))
        }
        other => other,
    };

    parsed.map(|url| url.path().to_string()).unwrap_or_default()
}

/// Answers request paths from the fixture store, rejecting identifiers the registry does not know.
#[derive(Debug)]
pub struct Resolver<S> {
    catalog: PatternCatalog,
    registry: IdRegistry,
    store: S,
}

impl<S: FixtureStore> Resolver<S> {
    pub fn new(catalog: PatternCatalog, registry: IdRegistry, store: S) -> Self {
        Self {
            catalog,
            registry,
            store,
        }
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &IdRegistry {
        &self.registry
    }

    /// Resolve a path (or full URL) to a status and JSON body. Never fails: every outcome,
    /// including unmapped routes and unknown identifiers, is an error document.
    pub async fn resolve(&self, raw_path: &str) -> MockResponse {
        match self.try_resolve(raw_path).await {
            Ok(body) => MockResponse::ok(body),
            Err(err) => {
                match &err {
                    ResolveError::UnknownIdentifier { param, .. } => {
                        debug!("{}: rejected '{}': {}", raw_path, param, err)
                    }
                    ResolveError::UnreadableFixture { source, .. } => {
                        warn!("{}: {} ({})", raw_path, err, source)
                    }
                    _ => warn!("{}: {}", raw_path, err),
                }
                MockResponse::new(err.status(), self.error_body(&err, raw_path))
            }
        }
    }

    pub async fn try_resolve(&self, raw_path: &str) -> Result<Value, ResolveError> {
        let path = endpoint_path(raw_path);
        let resolved = self
            .catalog
            .resolve_match(&path)
            .ok_or(ResolveError::UnmappedRoute)?;

        self.validate_params(&resolved.params)?;

        let fixture = &resolved.entry.fixture;
        debug!("{} matched {} -> {}", path, resolved.entry.pattern, fixture);

        match self.store.load(fixture).await {
            Ok(Some(document)) => Ok(document),
            Ok(None) => Err(ResolveError::MissingFixture {
                fixture: fixture.clone(),
            }),
            Err(source) => Err(ResolveError::UnreadableFixture {
                fixture: fixture.clone(),
                source,
            }),
        }
    }

    /// Check parameters in extraction order, stopping at the first unknown identifier.
    /// Placeholders without an identifier class are not checked.
    pub fn validate_params(&self, params: &PathParams) -> Result<(), ResolveError> {
        for (name, value) in params.iter() {
            let Some(class) = IdentifierClass::for_placeholder(name) else {
                continue;
            };

            if !self.registry.is_valid(class, value) {
                return Err(ResolveError::UnknownIdentifier {
                    class,
                    param: name.to_string(),
                    value: value.to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn error_body(&self, err: &ResolveError, endpoint: &str) -> Value {
        match err {
            ResolveError::UnmappedRoute => json!({
                "error": err.to_string(),
                "endpoint": endpoint,
                "availablePatterns": self.catalog.sample_patterns(SAMPLE_PATTERN_COUNT),
            }),
            ResolveError::UnknownIdentifier { .. } => json!({
                "error": err.to_string(),
                "endpoint": endpoint,
                "status": "NOT_FOUND",
            }),
            ResolveError::MissingFixture { .. } | ResolveError::UnreadableFixture { .. } => json!({
                "error": err.to_string(),
                "endpoint": endpoint,
            }),
        }
    }
}
