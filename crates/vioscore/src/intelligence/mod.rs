pub mod report;
pub mod schema;
pub mod scoring;
pub mod snapshot;

pub use report::{build_report, ReportBuilder, ReportError, ReportNode, NOT_APPLICABLE};
pub use schema::{IntelligenceSchema, RegionKind, SchemaError, SchemaRow};
pub use scoring::{
    aggregate_health, score_category, score_health_categories, ScoreError, HEALTH_DAMPENING,
};
pub use snapshot::{SnapshotError, Table, TableError, TableProvider, TableSnapshot};

/// Primary score table; attribute columns there are addressed by their
/// schema name rather than the Dutch alias.
pub const PRIMARY_TABLE: &str = "health_vioscore_table";

/// Table holding the intelligence data model itself.
pub const SCHEMA_TABLE: &str = "intelligence_data_model";

/// Every table the report pipeline reads. The snapshot refuses to start
/// without all of them.
pub const REQUIRED_TABLES: &[&str] = &[
    PRIMARY_TABLE,
    SCHEMA_TABLE,
    "all_gemeente_data_view",
    "world_data",
    "weather_data",
];
