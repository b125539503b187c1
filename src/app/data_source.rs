//! Data-source selection and bootstrap.
//!
//! `get_data_source` is the process-wide entry point: configuration is
//! inspected exactly once and every caller for the lifetime of the process
//! receives the same adapter instance. The application must always be able
//! to render with *some* adapter, so an unconfigured environment falls back
//! to the Mock adapter with a warning instead of failing.

use crate::infra::config;
use crate::storage::{DataSourceAdapter, FirestoreAdapter, MockAdapter, SheetsAdapter};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// The closed set of backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Firestore,
    Sheets,
    Mock,
}

/// Explicit construction input for [`create_data_source`].
#[derive(Debug, Clone)]
pub struct DataSourceConfig {
    pub source: SourceKind,
    pub api_url: Option<String>,
    pub project_id: Option<String>,
    pub school_id: Option<String>,
    pub api_key: Option<String>,
}

impl DataSourceConfig {
    pub fn mock() -> Self {
        Self {
            source: SourceKind::Mock,
            api_url: None,
            project_id: None,
            school_id: None,
            api_key: None,
        }
    }

    pub fn sheets(api_url: impl Into<String>) -> Self {
        Self {
            source: SourceKind::Sheets,
            api_url: Some(api_url.into()),
            ..Self::mock()
        }
    }

    pub fn firestore(project_id: impl Into<String>, school_id: impl Into<String>) -> Self {
        Self {
            source: SourceKind::Firestore,
            project_id: Some(project_id.into()),
            school_id: Some(school_id.into()),
            ..Self::mock()
        }
    }
}

// The in-flight initialization is memoized, not just its result: concurrent
// first callers all await the same cell and converge on one instance.
static DATA_SOURCE: OnceCell<Arc<dyn DataSourceAdapter>> = OnceCell::const_new();

/// Returns the configured data source, constructing it on first use.
///
/// Selection priority: explicit mock flag, explicit Firestore flag, a
/// non-placeholder Sheets URL, then the Mock fallback. Subsequent calls
/// return the cached instance without re-reading the environment.
pub async fn get_data_source() -> Arc<dyn DataSourceAdapter> {
    DATA_SOURCE
        .get_or_init(|| async { select_from_env() })
        .await
        .clone()
}

/// Resolves the selection priority without constructing an adapter.
pub fn select_kind_from_env() -> SourceKind {
    if config::use_mock_data() {
        SourceKind::Mock
    } else if config::use_firestore() {
        SourceKind::Firestore
    } else if config::sheets_api_url()
        .map(|url| !config::is_placeholder_url(&url))
        .unwrap_or(false)
    {
        SourceKind::Sheets
    } else {
        SourceKind::Mock
    }
}

fn select_from_env() -> Arc<dyn DataSourceAdapter> {
    dotenv::dotenv().ok();

    match select_kind_from_env() {
        SourceKind::Firestore => {
            log::info!("Using FirestoreAdapter for data source");
            Arc::new(FirestoreAdapter::new(
                config::firebase_project_id().unwrap_or_default(),
                config::school_id(),
                config::firebase_api_key(),
            ))
        }
        SourceKind::Sheets => {
            log::info!("Using SheetsAdapter for data source");
            Arc::new(SheetsAdapter::new(
                config::sheets_api_url().unwrap_or_default(),
            ))
        }
        SourceKind::Mock => {
            if config::use_mock_data() {
                log::info!("Using MockAdapter for data source");
            } else {
                log::warn!("No data source configured. Using MockAdapter as fallback.");
            }
            Arc::new(MockAdapter::new())
        }
    }
}

/// Direct, un-cached construction for callers that already know the backend
/// (tests needing isolated instances, embedders with their own config).
pub fn create_data_source(config: &DataSourceConfig) -> Arc<dyn DataSourceAdapter> {
    match config.source {
        SourceKind::Mock => Arc::new(MockAdapter::new()),
        SourceKind::Sheets => Arc::new(SheetsAdapter::new(
            config.api_url.clone().unwrap_or_default(),
        )),
        SourceKind::Firestore => Arc::new(FirestoreAdapter::new(
            config.project_id.clone().unwrap_or_default(),
            config.school_id.clone().unwrap_or_else(config::school_id),
            config.api_key.clone(),
        )),
    }
}
