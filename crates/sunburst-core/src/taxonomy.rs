use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::io::Read;

/// The `niveau` field of a taxonomy record. Any JSON scalar is accepted; the value is carried
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Level {
    Number(i64),
    Decimal(f64),
    Flag(bool),
    Text(String),
}

impl From<i64> for Level {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// A raw competency record as produced by the data-loading side.
///
/// Every field except `name` may be missing; missing `children` means leaf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyNode {
    #[serde(
        default,
        deserialize_with = "de_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(
        default,
        rename = "shortdesc",
        skip_serializing_if = "Option::is_none"
    )]
    pub short_description: Option<String>,
    #[serde(default, rename = "niveau", skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    #[serde(
        default,
        rename = "prérogative",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TaxonomyNode>>,
}

impl TaxonomyNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_children(mut self, children: Vec<TaxonomyNode>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json_value(value)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_reader(reader)?;
        Self::from_json_value(value)
    }

    fn from_json_value(value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::MalformedTaxonomy {
                message: "taxonomy root must be a JSON object".to_string(),
            });
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Children as a slice; absent and empty both read as "no children".
    pub fn children(&self) -> &[TaxonomyNode] {
        self.children.as_deref().unwrap_or_default()
    }
}

/// A taxonomy record after normalization, ready for the hierarchy layout.
///
/// `children: None` is the only leaf representation; normalization never produces `Some(vec![])`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(
        default,
        rename = "shortdesc",
        skip_serializing_if = "Option::is_none"
    )]
    pub short_description: Option<String>,
    #[serde(default, rename = "niveau", skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    #[serde(
        default,
        rename = "prérogative",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NormalizedNode>>,
}

impl NormalizedNode {
    pub fn children(&self) -> &[NormalizedNode] {
        self.children.as_deref().unwrap_or_default()
    }

    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// True for the merge nodes inserted by the normalizer (`TAMPON-<category>`).
    pub fn is_synthetic(&self) -> bool {
        self.id
            .as_deref()
            .is_some_and(|id| id.starts_with(crate::MERGE_ID_PREFIX))
    }

    /// Text shown on the segment: the short description when present, else the name.
    pub fn label_text(&self) -> &str {
        match self.short_description.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => &self.name,
        }
    }

    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            return 1;
        }
        self.children().iter().map(Self::leaf_count).sum()
    }

    /// Height of the subtree (a leaf has height 0).
    pub fn max_depth(&self) -> usize {
        self.children()
            .iter()
            .map(|c| c.max_depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

impl From<&NormalizedNode> for TaxonomyNode {
    fn from(node: &NormalizedNode) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            short_description: node.short_description.clone(),
            level: node.level.clone(),
            category: node.category.clone(),
            description: node.description.clone(),
            children: node
                .children
                .as_ref()
                .map(|cs| cs.iter().map(TaxonomyNode::from).collect()),
        }
    }
}

fn de_opt_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    // Exported spreadsheets sometimes carry numeric ids.
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
