//! Input validation for job batches.
//!
//! Checks structural integrity of a batch before any date is computed.
//! Detects:
//! - Empty batches
//! - Nodes that wait on themselves
//! - Nodes that wait on a later node
//! - Predecessor positions past the end of the batch
//!
//! Requiring every predecessor to sit at a strictly smaller position makes
//! the dependency graph acyclic by construction, so no cycle search is
//! needed.

use thiserror::Error;

use crate::models::JobNode;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Position of the offending node, if any.
    pub index: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The batch has no nodes.
    EmptyBatch,
    /// A node names itself as predecessor.
    SelfReference,
    /// A node names a later node as predecessor.
    ForwardReference,
    /// A node names a position outside the batch.
    OutOfRange,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, index: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            kind,
            index,
            message: message.into(),
        }
    }
}

/// Validates a batch of job nodes.
///
/// Checks:
/// 1. The batch has at least one node
/// 2. No node is its own predecessor
/// 3. Every predecessor position lies inside the batch
/// 4. Every predecessor position is strictly smaller than the node's own
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_nodes(nodes: &[JobNode]) -> ValidationResult {
    let mut errors = Vec::new();

    if nodes.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyBatch,
            None,
            "Job batch has no nodes",
        ));
    }

    for (index, node) in nodes.iter().enumerate() {
        if let Some(pred) = node.predecessor {
            if let Some(err) = check_predecessor(index, pred, nodes.len()) {
                errors.push(err);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(count = errors.len(), "job batch rejected");
        Err(errors)
    }
}

/// Checks one predecessor reference against a batch of `len` nodes.
pub(crate) fn check_predecessor(index: usize, pred: usize, len: usize) -> Option<ValidationError> {
    if pred == index {
        Some(ValidationError::new(
            ValidationErrorKind::SelfReference,
            Some(index),
            format!("Job {index} cannot depend on itself"),
        ))
    } else if pred >= len {
        Some(ValidationError::new(
            ValidationErrorKind::OutOfRange,
            Some(index),
            format!("Job {index} depends on job {pred}, but the batch has {len} jobs"),
        ))
    } else if pred > index {
        Some(ValidationError::new(
            ValidationErrorKind::ForwardReference,
            Some(index),
            format!("Job {index} depends on later job {pred}"),
        ))
    } else {
        None
    }
}
