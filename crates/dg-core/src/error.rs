//! Error types for generation, linking, storage and collaborators
//!
//! Movement refusals are not errors; see `navigation::DenialReason`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Region generation failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("layout '{layout}' produced no nodes")]
    EmptyLayout { layout: String },

    #[error("grid layout of {requested} nodes exceeds the limit of {max}")]
    GridTooLarge { requested: usize, max: usize },

    #[error("layout '{layout}' may produce {requested} nodes, over the limit of {max}")]
    LayoutTooLarge {
        layout: String,
        requested: usize,
        max: usize,
    },

    #[error("invalid layout parameters: {0}")]
    InvalidLayout(String),

    #[error("invalid generation config: {0}")]
    InvalidConfig(String),

    #[error("region failed validation with {} issue(s): {}", .0.len(), join_issues(.0))]
    Validation(Vec<ValidationIssue>),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// A single inconsistency found by the post-assignment validation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationIssue {
    /// Two outgoing edges on one node share a label
    DuplicateLabel { node: String, label: String },
    /// Edge has no edge pointing back
    MissingReverse { from: String, to: String, label: String },
    /// Reverse edge exists but its label is not the opposite
    MismatchedReverse {
        from: String,
        to: String,
        label: String,
        reverse: String,
    },
    /// Edge points at a node that is not in the region
    DanglingEdge { from: String, to: String },
    /// Node cannot reach every other node
    Disconnected { unreachable: usize },
    /// Node has no outgoing edges
    Isolated { node: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateLabel { node, label } => {
                write!(f, "node {node} has duplicate label '{label}'")
            }
            Self::MissingReverse { from, to, label } => {
                write!(f, "edge {from}->{to} ('{label}') has no reverse")
            }
            Self::MismatchedReverse {
                from,
                to,
                label,
                reverse,
            } => write!(
                f,
                "edge {from}->{to} ('{label}') has reverse '{reverse}', not its opposite"
            ),
            Self::DanglingEdge { from, to } => write!(f, "edge {from}->{to} targets unknown node"),
            Self::Disconnected { unreachable } => {
                write!(f, "{unreachable} node(s) unreachable from the entry")
            }
            Self::Isolated { node } => write!(f, "node {node} has no exits"),
        }
    }
}

/// Region-to-region linking failures (recoverable)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("region '{0}' is not loaded")]
    MissingRegion(String),

    #[error("region '{0}' has no frontier node")]
    MissingFrontier(String),

    #[error("no free label pair between {from} and {to}")]
    NoFreeLabel { from: String, to: String },

    #[error("cannot link region '{0}' to itself")]
    SameRegion(String),
}

/// Persistence collaborator errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("Incompatible store version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error("Invalid store file header")]
    InvalidHeader,
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failure of an external collaborator (LLM, content service)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("collaborator timed out after {0} ms")]
    Timeout(u64),

    #[error("collaborator failed: {0}")]
    Failed(String),

    #[error("collaborator returned malformed output: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_issues() {
        let err = GenerationError::Validation(vec![
            ValidationIssue::DuplicateLabel {
                node: "r-0".to_string(),
                label: "north".to_string(),
            },
            ValidationIssue::Disconnected { unreachable: 2 },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("2 issue(s)"));
        assert!(msg.contains("duplicate label 'north'"));
        assert!(msg.contains("2 node(s) unreachable"));
    }
}
