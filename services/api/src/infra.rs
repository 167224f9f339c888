use metrics_exporter_prometheus::PrometheusHandle;
use std::fs::File;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use vioscore::intelligence::{
    IntelligenceSchema, SnapshotError, Table, TableProvider, TableSnapshot, SCHEMA_TABLE,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) intelligence: Arc<IntelligenceState>,
}

/// Immutable snapshot plus the schema parsed out of it, shared by every
/// request. Replacing the data means publishing a whole new instance.
pub(crate) struct IntelligenceState {
    pub(crate) snapshot: TableSnapshot,
    pub(crate) schema: IntelligenceSchema,
}

impl IntelligenceState {
    pub(crate) fn from_snapshot(snapshot: TableSnapshot) -> Result<Self, vioscore::error::AppError> {
        let schema = IntelligenceSchema::from_table(snapshot.table(SCHEMA_TABLE)?)?;
        Ok(Self { snapshot, schema })
    }
}

/// Reads `<dir>/<table_name>.csv` per dataset. Stands in for the upstream
/// database exports; the fetch mechanism itself is outside this service.
pub(crate) struct CsvTableProvider {
    dir: PathBuf,
}

impl CsvTableProvider {
    pub(crate) fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl TableProvider for CsvTableProvider {
    fn fetch(&self, table_name: &str) -> Result<Table, SnapshotError> {
        let path = self.dir.join(format!("{table_name}.csv"));
        let file = File::open(&path).map_err(|source| SnapshotError::Fetch {
            table: table_name.to_string(),
            source: Box::new(source),
        })?;
        Table::from_csv(table_name, file).map_err(|source| SnapshotError::Fetch {
            table: table_name.to_string(),
            source: Box::new(source),
        })
    }
}
