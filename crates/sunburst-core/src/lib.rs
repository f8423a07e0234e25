#![forbid(unsafe_code)]

//! Competency taxonomy model + tree normalizer (headless).
//!
//! The raw taxonomy is a three-tier tree (root, categories, competencies). Before it can be laid
//! out as a sunburst, every category's grandchildren are flattened into a single synthetic
//! "merge" ring so the chart keeps one ring per depth. See [`normalize`].

pub mod config;
pub mod error;
pub mod normalize;
pub mod taxonomy;

pub use config::ChartConfig;
pub use error::{Error, Result};
pub use normalize::{
    MERGE_CATEGORY, MERGE_ID_PREFIX, MERGE_LEVEL, merge_description, merge_node_id, normalize,
};
pub use taxonomy::{Level, NormalizedNode, TaxonomyNode};
