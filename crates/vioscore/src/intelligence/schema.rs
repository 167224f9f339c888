use super::snapshot::Table;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Region classification derived from the two-letter prefix of a region code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionKind {
    Country,
    Province,
    Municipality,
    District,
    Neighbourhood,
    Unknown,
}

impl RegionKind {
    pub fn from_code(region_code: &str) -> Self {
        match region_code.get(..2) {
            Some("NL") => Self::Country,
            Some("PV") => Self::Province,
            Some("GM") => Self::Municipality,
            Some("WK") => Self::District,
            Some("BU") => Self::Neighbourhood,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Country => "Country",
            Self::Province => "Province",
            Self::Municipality => "Municipality",
            Self::District => "District",
            Self::Neighbourhood => "Neighbourhood",
            Self::Unknown => "Unknown",
        }
    }
}

/// One row of the intelligence data model: which attribute belongs to which
/// category, dimension and vioscore group, and where its raw values live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRow {
    pub attribute: String,
    pub current_category: Option<String>,
    pub dimension: String,
    pub vioscore: String,
    pub table_name: String,
    pub dutch_name: Option<String>,
}

/// The intelligence data model, preserved in table order. Traversal helpers
/// return distinct values in first-appearance order, never sorted.
#[derive(Debug, Clone, Default)]
pub struct IntelligenceSchema {
    rows: Vec<SchemaRow>,
}

impl IntelligenceSchema {
    pub fn new(rows: Vec<SchemaRow>) -> Self {
        Self { rows }
    }

    pub fn from_table(table: &Table) -> Result<Self, SchemaError> {
        let column = |name: &str| {
            table
                .column_index(name)
                .map_err(|_| SchemaError::MissingColumn {
                    column: name.to_string(),
                })
        };

        let attribute = column("attribute")?;
        let current_category = column("current_category")?;
        let dimension = column("dimension")?;
        let vioscore = column("vioscore")?;
        let table_name = column("table_name")?;
        let dutch_name = column("dutch_names")?;

        let rows = table
            .rows()
            .iter()
            .map(|row| SchemaRow {
                attribute: row[attribute].clone(),
                current_category: non_empty(&row[current_category]),
                dimension: row[dimension].clone(),
                vioscore: row[vioscore].clone(),
                table_name: row[table_name].clone(),
                dutch_name: non_empty(&row[dutch_name]),
            })
            .collect();

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[SchemaRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct vioscore group values across the whole schema.
    pub fn vioscore_groups(&self) -> Vec<&str> {
        let mut groups = Vec::new();
        for row in &self.rows {
            push_unique(&mut groups, row.vioscore.as_str());
        }
        groups
    }

    /// Distinct dimensions within one vioscore group.
    pub fn dimensions(&self, group: &str) -> Vec<&str> {
        let mut dimensions = Vec::new();
        for row in self.rows.iter().filter(|row| row.vioscore == group) {
            push_unique(&mut dimensions, row.dimension.as_str());
        }
        dimensions
    }

    /// Distinct categories within one dimension of a vioscore group. A `None`
    /// entry means the schema carries attributes with no category; callers
    /// still count it when numbering siblings.
    pub fn categories(&self, group: &str, dimension: &str) -> Vec<Option<&str>> {
        let mut categories = Vec::new();
        for row in self
            .rows
            .iter()
            .filter(|row| row.vioscore == group && row.dimension == dimension)
        {
            push_unique(&mut categories, row.current_category.as_deref());
        }
        categories
    }

    /// First schema row per distinct attribute within one category slice, in
    /// appearance order. The first row wins for `table_name`/`dutch_name`.
    pub fn attribute_rows(
        &self,
        group: &str,
        dimension: &str,
        category: Option<&str>,
    ) -> Vec<&SchemaRow> {
        let mut seen: Vec<&str> = Vec::new();
        let mut rows = Vec::new();
        for row in self.rows.iter().filter(|row| {
            row.vioscore == group
                && row.dimension == dimension
                && row.current_category.as_deref() == category
        }) {
            if !seen.contains(&row.attribute.as_str()) {
                seen.push(row.attribute.as_str());
                rows.push(row);
            }
        }
        rows
    }

    /// Distinct non-null categories under the Health dimension, the set the
    /// scorer and aggregator operate on.
    pub fn health_categories(&self) -> Vec<&str> {
        let mut categories = Vec::new();
        for row in self.rows.iter().filter(|row| row.dimension == "Health") {
            if let Some(category) = row.current_category.as_deref() {
                push_unique(&mut categories, category);
            }
        }
        categories
    }
}

fn push_unique<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if !values.contains(&value) {
        values.push(value);
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug)]
pub enum SchemaError {
    MissingColumn { column: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::MissingColumn { column } => {
                write!(f, "intelligence data model is missing column '{column}'")
            }
        }
    }
}

impl std::error::Error for SchemaError {}
