use std::collections::HashMap;
use std::fmt;
use std::io::Read;

/// Column every dataset keys its rows by.
pub const REGION_CODE_COLUMN: &str = "region_code";

/// A named dataset with one row per region. Cells are kept as strings and
/// parsed on demand, matching how the upstream exports arrive.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self, TableError> {
        let name = name.into();
        for row in &rows {
            if row.len() != columns.len() {
                return Err(TableError::RaggedRow {
                    table: name,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Self { name, columns, rows })
    }

    pub fn from_csv<R: Read>(name: impl Into<String>, reader: R) -> Result<Self, TableError> {
        let name = name.into();
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = csv_reader
            .headers()
            .map_err(|source| TableError::Csv {
                table: name.clone(),
                source,
            })?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record.map_err(|source| TableError::Csv {
                table: name.clone(),
                source,
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Self::new(name, columns, rows)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_index(&self, column: &str) -> Result<usize, TableError> {
        self.columns
            .iter()
            .position(|candidate| candidate == column)
            .ok_or_else(|| TableError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// The single row for a region. Zero or multiple matches are typed
    /// errors rather than a silent first-row pick.
    pub fn region_row(&self, region_code: &str) -> Result<&[String], TableError> {
        let key = self.column_index(REGION_CODE_COLUMN)?;
        let mut matches = self.rows.iter().filter(|row| row[key] == region_code);

        let row = matches.next().ok_or_else(|| TableError::RegionNotFound {
            table: self.name.clone(),
            region_code: region_code.to_string(),
        })?;
        if matches.next().is_some() {
            return Err(TableError::AmbiguousRegion {
                table: self.name.clone(),
                region_code: region_code.to_string(),
            });
        }
        Ok(row)
    }

    pub fn cell(&self, column: &str, region_code: &str) -> Result<&str, TableError> {
        let index = self.column_index(column)?;
        let row = self.region_row(region_code)?;
        Ok(&row[index])
    }

    pub fn number(&self, column: &str, region_code: &str) -> Result<f64, TableError> {
        let raw = self.cell(column, region_code)?;
        raw.trim()
            .parse::<f64>()
            .map_err(|_| TableError::InvalidNumber {
                table: self.name.clone(),
                column: column.to_string(),
                value: raw.to_string(),
            })
    }
}

#[derive(Debug)]
pub enum TableError {
    MissingColumn { table: String, column: String },
    RegionNotFound { table: String, region_code: String },
    AmbiguousRegion { table: String, region_code: String },
    InvalidNumber { table: String, column: String, value: String },
    RaggedRow { table: String, expected: usize, found: usize },
    Csv { table: String, source: csv::Error },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::MissingColumn { table, column } => {
                write!(f, "table '{table}' has no column '{column}'")
            }
            TableError::RegionNotFound { table, region_code } => {
                write!(f, "table '{table}' has no row for region '{region_code}'")
            }
            TableError::AmbiguousRegion { table, region_code } => {
                write!(
                    f,
                    "table '{table}' has multiple rows for region '{region_code}'"
                )
            }
            TableError::InvalidNumber { table, column, value } => {
                write!(
                    f,
                    "table '{table}' column '{column}' holds non-numeric value '{value}'"
                )
            }
            TableError::RaggedRow { table, expected, found } => {
                write!(
                    f,
                    "table '{table}' has a row with {found} cells, expected {expected}"
                )
            }
            TableError::Csv { table, .. } => write!(f, "failed to parse CSV for table '{table}'"),
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::Csv { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl TableError {
    pub fn is_region_not_found(&self) -> bool {
        matches!(self, TableError::RegionNotFound { .. })
    }
}

/// Source of named datasets. The production service reads CSV exports from
/// disk; tests hand in tables directly.
pub trait TableProvider {
    fn fetch(&self, table_name: &str) -> Result<Table, SnapshotError>;
}

/// Immutable set of tables loaded once at startup and shared across report
/// builds. A reload must publish a whole new snapshot, never mutate one.
#[derive(Debug, Clone, Default)]
pub struct TableSnapshot {
    tables: HashMap<String, Table>,
}

impl TableSnapshot {
    pub fn load<P: TableProvider>(
        provider: &P,
        table_names: &[&str],
    ) -> Result<Self, SnapshotError> {
        let mut tables = HashMap::new();
        for name in table_names {
            let table = provider.fetch(name)?;
            tracing::info!(table = *name, rows = table.rows().len(), "table loaded");
            tables.insert((*name).to_string(), table);
        }
        Ok(Self { tables })
    }

    pub fn from_tables(tables: impl IntoIterator<Item = Table>) -> Self {
        Self {
            tables: tables
                .into_iter()
                .map(|table| (table.name().to_string(), table))
                .collect(),
        }
    }

    pub fn table(&self, name: &str) -> Result<&Table, SnapshotError> {
        self.tables
            .get(name)
            .ok_or_else(|| SnapshotError::MissingTable {
                table: name.to_string(),
            })
    }
}

#[derive(Debug)]
pub enum SnapshotError {
    MissingTable { table: String },
    Fetch { table: String, source: Box<dyn std::error::Error + Send + Sync> },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::MissingTable { table } => {
                write!(f, "snapshot does not contain table '{table}'")
            }
            SnapshotError::Fetch { table, .. } => {
                write!(f, "failed to fetch table '{table}'")
            }
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::MissingTable { .. } => None,
            SnapshotError::Fetch { source, .. } => Some(&**source),
        }
    }
}
