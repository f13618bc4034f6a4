//! Post-assignment validation
//!
//! Checks the label and mirror invariants on a finished graph. Any issue is
//! logged and returned; generation treats a non-empty list as fatal.

use hashbrown::HashSet;
use tracing::warn;

use crate::error::{GenerationError, ValidationIssue};
use crate::graph::{RegionGraph, are_opposites};

/// Collect every invariant violation in `graph`
pub fn find_issues(graph: &RegionGraph) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for node in graph.nodes() {
        let mut seen = HashSet::new();
        for edge in &node.edges {
            if !seen.insert(edge.label.to_ascii_lowercase()) {
                issues.push(ValidationIssue::DuplicateLabel {
                    node: node.id.clone(),
                    label: edge.label.clone(),
                });
            }

            let Some(target) = graph.node(&edge.target) else {
                issues.push(ValidationIssue::DanglingEdge {
                    from: node.id.clone(),
                    to: edge.target.clone(),
                });
                continue;
            };
            match target.edge_to(&node.id) {
                None => issues.push(ValidationIssue::MissingReverse {
                    from: node.id.clone(),
                    to: edge.target.clone(),
                    label: edge.label.clone(),
                }),
                Some(back) if !are_opposites(&edge.label, &back.label) => {
                    issues.push(ValidationIssue::MismatchedReverse {
                        from: node.id.clone(),
                        to: edge.target.clone(),
                        label: edge.label.clone(),
                        reverse: back.label.clone(),
                    })
                }
                Some(_) => {}
            }
        }

        if node.edges.is_empty() && graph.len() > 1 {
            issues.push(ValidationIssue::Isolated {
                node: node.id.clone(),
            });
        }
    }

    let unreachable = graph.bfs_distances(0).iter().filter(|d| d.is_none()).count();
    if unreachable > 0 {
        issues.push(ValidationIssue::Disconnected { unreachable });
    }

    issues
}

/// Validate `graph`, surfacing every issue as a hard error
pub fn validate_region(graph: &RegionGraph) -> Result<(), GenerationError> {
    let issues = find_issues(graph);
    if issues.is_empty() {
        return Ok(());
    }
    for issue in &issues {
        warn!(region = %graph.region_id, %issue, "region validation issue");
    }
    Err(GenerationError::Validation(issues))
}
