//! Error types for lineage resolution

use thiserror::Error;

/// Errors raised while resolving and rendering an ownership lineage
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LineageError {
    /// The object (start object or an owner) does not exist in the cluster
    #[error("object not found: {object}")]
    ObjectNotFound { object: String },

    /// An owner reference names a (group, kind) that discovery does not know
    #[error("no resource type registered for kind {kind:?} in group {group:?}")]
    TypeNotFound { group: String, kind: String },

    /// A (group, kind) maps to more than one resource collection
    #[error("kind {kind:?} in group {group:?} is ambiguous: {candidates:?}")]
    AmbiguousType {
        group: String,
        kind: String,
        candidates: Vec<String>,
    },

    /// `metadata.ownerReferences` is present but not a list of owner references
    #[error("malformed owner references on {object}: {reason}")]
    MalformedOwnerMetadata { object: String, reason: String },

    /// Transport, credential or discovery failure
    #[error("cluster connection error: {0}")]
    Connection(String),

    /// The graph could not be turned into a diagram
    #[error("render error: {0}")]
    Render(String),
}

impl LineageError {
    pub fn object_not_found(object: impl Into<String>) -> Self {
        Self::ObjectNotFound {
            object: object.into(),
        }
    }

    pub fn type_not_found(group: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::TypeNotFound {
            group: group.into(),
            kind: kind.into(),
        }
    }

    pub fn malformed(object: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedOwnerMetadata {
            object: object.into(),
            reason: reason.into(),
        }
    }

    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Whether this failure can be confined to the owner branch that raised it
    ///
    /// Connection and render failures never are: the cluster or the output
    /// is unusable for every branch.
    pub fn is_branch_scoped(&self) -> bool {
        matches!(
            self,
            Self::ObjectNotFound { .. }
                | Self::TypeNotFound { .. }
                | Self::AmbiguousType { .. }
                | Self::MalformedOwnerMetadata { .. }
        )
    }
}

impl From<kube::Error> for LineageError {
    fn from(err: kube::Error) -> Self {
        Self::Connection(err.to_string())
    }
}
