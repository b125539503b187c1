pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;

// Convenience re-exports (keeps call-sites clean)
pub use app::data_source::{
    create_data_source, get_data_source, select_kind_from_env, DataSourceConfig, SourceKind,
};
pub use domain::model::{ApiResponse, DashboardStats, Student};
pub use domain::seating::{
    OptimizationRequest, OptimizationResult, SeatAssignment, SeatingConstraints,
};
pub use storage::{
    DataSourceAdapter, FirestoreAdapter, HealthReport, HealthStatus, MockAdapter, SheetsAdapter,
};
