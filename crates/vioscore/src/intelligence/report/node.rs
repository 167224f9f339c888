use serde::{Deserialize, Serialize};

/// Score placeholder for nodes that carry no resolvable value. Reproduced
/// exactly; downstream consumers match on it.
pub const NOT_APPLICABLE: &str = "N/A";

/// Kind tag carried in the second slot of a node's `labels` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Region,
    VioScoreTotal,
    Dimension,
    Category,
    Attribute,
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Region => "Region",
            Self::VioScoreTotal => "VioScoreTotal",
            Self::Dimension => "Dimension",
            Self::Category => "Category",
            Self::Attribute => "Attribute",
        }
    }
}

/// One node of the intelligence report tree. Immutable once attached to its
/// parent; the whole tree is rebuilt per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportNode {
    pub labels: [String; 2],
    pub index: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub vioscore: String,
    pub children: Vec<ReportNode>,
}

impl ReportNode {
    pub fn new(
        display: impl Into<String>,
        kind: NodeKind,
        index: String,
        code: &str,
        vioscore: String,
    ) -> Self {
        Self {
            labels: [display.into(), kind.label().to_string()],
            index,
            code: code.to_string(),
            name: None,
            vioscore,
            children: Vec::new(),
        }
    }
}

/// Display transform for category and attribute names: underscores to
/// spaces, title-case, spaces stripped (`physical_activity` becomes
/// `PhysicalActivity`).
pub fn display_label(raw: &str) -> String {
    raw.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}
