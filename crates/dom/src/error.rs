use std::path::PathBuf;

use thiserror::Error;

use crate::node::NodeId;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("failed to read page {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid page JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tag name '{0}'")]
    InvalidTag(String),

    #[error("invalid value '{value}' for {property}")]
    InvalidStyle {
        property: &'static str,
        value: String,
    },

    #[error("node {0:?} cannot be inserted at this position")]
    HierarchyRequest(NodeId),

    #[error("node {0:?} is not attached to a parent")]
    Detached(NodeId),
}
