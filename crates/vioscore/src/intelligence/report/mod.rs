mod node;

pub use node::{display_label, NodeKind, ReportNode, NOT_APPLICABLE};

use super::schema::{IntelligenceSchema, RegionKind, SchemaRow};
use super::scoring::{aggregate_health, score_health_categories};
use super::snapshot::{SnapshotError, TableError, TableSnapshot};
use super::PRIMARY_TABLE;
use std::fmt;

/// Vioscore group whose Health dimension carries the computed scores; every
/// other group shows the not-applicable sentinel.
const SCORED_GROUP: &str = "VioScore";
const SCORED_DIMENSION: &str = "Health";

/// Builds the labeled report tree for one region against an immutable table
/// snapshot. Holds only borrows; the walk allocates nothing shared.
pub struct ReportBuilder<'a> {
    snapshot: &'a TableSnapshot,
    schema: &'a IntelligenceSchema,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(snapshot: &'a TableSnapshot, schema: &'a IntelligenceSchema) -> Self {
        Self { snapshot, schema }
    }

    /// Walk the schema's distinct values in appearance order and emit the
    /// five-level tree. Only the root region lookup is fatal; every deeper
    /// failure degrades to the sentinel on its own node.
    pub fn build(&self, region_code: &str) -> Result<ReportNode, ReportError> {
        let primary = self.snapshot.table(PRIMARY_TABLE)?;
        let region_name = primary
            .cell("region_name", region_code)
            .map_err(|err| match err {
                TableError::RegionNotFound { .. } => ReportError::RegionNotFound {
                    region_code: region_code.to_string(),
                },
                other => ReportError::Table(other),
            })?
            .to_string();

        // One scoring pass, reused across every vioscore group.
        let health_categories = self.schema.health_categories();
        let category_scores = score_health_categories(primary, region_code, &health_categories);
        let health_vioscore = match aggregate_health(&category_scores) {
            Ok(score) => format_score(score),
            Err(err) => {
                tracing::warn!(region_code, %err, "health aggregate unavailable");
                NOT_APPLICABLE.to_string()
            }
        };

        let mut root = ReportNode::new(
            RegionKind::from_code(region_code).label(),
            NodeKind::Region,
            "1".to_string(),
            region_code,
            NOT_APPLICABLE.to_string(),
        );
        root.name = Some(region_name);

        for (j, group) in self.schema.vioscore_groups().iter().enumerate() {
            let mut group_node = ReportNode::new(
                *group,
                NodeKind::VioScoreTotal,
                child_index(&root.index, j),
                region_code,
                NOT_APPLICABLE.to_string(),
            );

            for (k, dimension) in self.schema.dimensions(group).iter().enumerate() {
                let scored = *group == SCORED_GROUP && *dimension == SCORED_DIMENSION;
                let vioscore = if scored {
                    health_vioscore.clone()
                } else {
                    NOT_APPLICABLE.to_string()
                };
                let mut dimension_node = ReportNode::new(
                    *dimension,
                    NodeKind::Dimension,
                    child_index(&group_node.index, k),
                    region_code,
                    vioscore,
                );

                for (l, category) in self
                    .schema
                    .categories(group, dimension)
                    .iter()
                    .enumerate()
                {
                    // A null category creates no node but still consumes its
                    // index slot, keeping sibling numbering stable for
                    // consumers that pin exact index strings.
                    let Some(category) = category else {
                        continue;
                    };

                    let vioscore = if scored {
                        category_scores
                            .get(*category)
                            .map(|score| format_score(*score))
                            .unwrap_or_else(|| NOT_APPLICABLE.to_string())
                    } else {
                        NOT_APPLICABLE.to_string()
                    };
                    let mut category_node = ReportNode::new(
                        display_label(category),
                        NodeKind::Category,
                        child_index(&dimension_node.index, l),
                        region_code,
                        vioscore,
                    );

                    for (m, row) in self
                        .schema
                        .attribute_rows(group, dimension, Some(*category))
                        .iter()
                        .enumerate()
                    {
                        category_node.children.push(ReportNode::new(
                            display_label(&row.attribute),
                            NodeKind::Attribute,
                            child_index(&category_node.index, m),
                            region_code,
                            self.attribute_value(row, region_code),
                        ));
                    }

                    dimension_node.children.push(category_node);
                }

                group_node.children.push(dimension_node);
            }

            root.children.push(group_node);
        }

        Ok(root)
    }

    /// Raw value for one attribute node. Attributes backed by the primary
    /// score table are addressed by their schema name, everything else by
    /// the Dutch alias. Any failure yields the sentinel.
    fn attribute_value(&self, row: &SchemaRow, region_code: &str) -> String {
        let column = if row.table_name == PRIMARY_TABLE {
            Some(row.attribute.as_str())
        } else {
            row.dutch_name.as_deref()
        };
        let Some(column) = column else {
            return NOT_APPLICABLE.to_string();
        };

        let value = self
            .snapshot
            .table(&row.table_name)
            .ok()
            .and_then(|table| table.number(column, region_code).ok());
        match value {
            Some(value) => format_score(value),
            None => NOT_APPLICABLE.to_string(),
        }
    }
}

fn child_index(parent: &str, position: usize) -> String {
    format!("{parent}.{}", position + 1)
}

fn format_score(score: f64) -> String {
    format!("{score:.2}")
}

/// Convenience entry point mirroring the service route: build the schema
/// from the snapshot's own data model table, then walk it.
pub fn build_report(
    snapshot: &TableSnapshot,
    schema: &IntelligenceSchema,
    region_code: &str,
) -> Result<ReportNode, ReportError> {
    ReportBuilder::new(snapshot, schema).build(region_code)
}

#[derive(Debug)]
pub enum ReportError {
    RegionNotFound { region_code: String },
    Snapshot(SnapshotError),
    Table(TableError),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::RegionNotFound { region_code } => {
                write!(f, "region '{region_code}' not found in the primary score table")
            }
            ReportError::Snapshot(err) => write!(f, "snapshot error: {err}"),
            ReportError::Table(err) => write!(f, "table error: {err}"),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::RegionNotFound { .. } => None,
            ReportError::Snapshot(err) => Some(err),
            ReportError::Table(err) => Some(err),
        }
    }
}

impl From<SnapshotError> for ReportError {
    fn from(value: SnapshotError) -> Self {
        Self::Snapshot(value)
    }
}

impl ReportError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReportError::RegionNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_index_is_one_based_and_dot_joined() {
        assert_eq!(child_index("1", 0), "1.1");
        assert_eq!(child_index("1.2.3", 3), "1.2.3.4");
    }

    #[test]
    fn scores_format_to_two_decimals() {
        assert_eq!(format_score(1000.0), "1000.00");
        assert_eq!(format_score(233.333_333_3), "233.33");
        assert_eq!(format_score(0.005), "0.01");
    }
}
