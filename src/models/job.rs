//! Job models.
//!
//! A [`JobNode`] is one sub-job of a composite submission. It carries its
//! SLA in working days and optionally the position of an earlier sub-job it
//! waits for. A [`JobBatch`] is an ordered, validated list of nodes.
//!
//! # SLA Coercion
//! Every job has at least one working day of lead time. Non-positive SLA
//! values are coerced to 1 at construction; fractional values are rejected.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::EngineError;
use crate::validation::validate_nodes;

/// Clamps a raw SLA to the minimum of one working day.
pub(crate) fn coerce_sla(raw: i64) -> u32 {
    if raw < 1 {
        tracing::warn!(raw, "non-positive SLA coerced to 1 working day");
        1
    } else {
        u32::try_from(raw).unwrap_or(u32::MAX)
    }
}

/// Deserializes a raw SLA and applies the minimum of one working day.
fn deserialize_sla<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(coerce_sla(raw))
}

/// Checks that a floating-point SLA is a finite whole number, then coerces it.
pub(crate) fn coerce_fractional_sla(raw: f64) -> Result<u32, EngineError> {
    if !raw.is_finite() || raw.fract() != 0.0 {
        return Err(EngineError::InvalidSla(raw));
    }
    // Whole and finite; saturating cast is fine beyond i64 range.
    Ok(coerce_sla(raw as i64))
}

/// A single due-date request: count `working_days` from `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingDaySpec {
    /// Instant counting begins from (its calendar day is not counted).
    pub start: NaiveDateTime,
    /// SLA in working days (always >= 1).
    #[serde(deserialize_with = "deserialize_sla")]
    pub working_days: u32,
}

impl WorkingDaySpec {
    /// Creates a spec, coercing `working_days <= 0` to 1.
    pub fn new(start: NaiveDateTime, working_days: i64) -> Self {
        Self {
            start,
            working_days: coerce_sla(working_days),
        }
    }

    /// Creates a spec from a possibly fractional SLA value.
    ///
    /// # Errors
    /// [`EngineError::InvalidSla`] if the value is not finite or not whole.
    pub fn from_fractional(start: NaiveDateTime, working_days: f64) -> Result<Self, EngineError> {
        Ok(Self {
            start,
            working_days: coerce_fractional_sla(working_days)?,
        })
    }
}

/// One sub-job in a composite submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobNode {
    /// Job type label (e.g., "Artwork", "Banner").
    pub label: String,
    /// SLA in working days (always >= 1).
    #[serde(deserialize_with = "deserialize_sla")]
    sla_working_days: u32,
    /// Position of the node this one waits for. `None` = starts with the batch.
    pub predecessor: Option<usize>,
    /// Caller metadata, carried through untouched.
    pub attributes: HashMap<String, String>,
}

impl JobNode {
    /// Creates an independent node, coercing `sla_working_days <= 0` to 1.
    pub fn new(sla_working_days: i64) -> Self {
        Self {
            label: String::new(),
            sla_working_days: coerce_sla(sla_working_days),
            predecessor: None,
            attributes: HashMap::new(),
        }
    }

    /// Creates a node from a possibly fractional SLA value.
    ///
    /// # Errors
    /// [`EngineError::InvalidSla`] if the value is not finite or not whole.
    pub fn from_fractional(sla_working_days: f64) -> Result<Self, EngineError> {
        let sla = coerce_fractional_sla(sla_working_days)?;
        Ok(Self::new(i64::from(sla)))
    }

    /// SLA in working days (always >= 1).
    pub fn sla_working_days(&self) -> u32 {
        self.sla_working_days
    }

    /// Sets the job type label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Makes this node start when node `predecessor` is due.
    pub fn after(mut self, predecessor: usize) -> Self {
        self.predecessor = Some(predecessor);
        self
    }

    /// Adds a metadata attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Whether this node starts with the batch.
    pub fn is_independent(&self) -> bool {
        self.predecessor.is_none()
    }
}

/// An ordered, validated batch of job nodes.
///
/// Every predecessor points strictly backwards, so the dependency graph is
/// a forest of chains and a single forward pass resolves it. A batch is
/// never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobBatch {
    nodes: Vec<JobNode>,
}

impl JobBatch {
    /// Validates and wraps a list of nodes.
    ///
    /// # Errors
    /// [`EngineError::InvalidJobSpec`] listing every problem found.
    pub fn new(nodes: Vec<JobNode>) -> Result<Self, EngineError> {
        validate_nodes(&nodes).map_err(EngineError::InvalidJobSpec)?;
        Ok(Self { nodes })
    }

    /// Starts a batch from its first node.
    ///
    /// # Errors
    /// [`EngineError::InvalidJobSpec`] if the node names a predecessor,
    /// since nothing precedes the first node.
    pub fn from_first(node: JobNode) -> Result<Self, EngineError> {
        Self::new(vec![node])
    }

    /// Appends a node, returning its index.
    ///
    /// # Errors
    /// [`EngineError::InvalidJobSpec`] if the node's predecessor does not
    /// point at an existing node. The batch is left unchanged.
    pub fn push(&mut self, node: JobNode) -> Result<usize, EngineError> {
        let index = self.nodes.len();
        if let Some(pred) = node.predecessor {
            if let Some(err) = crate::validation::check_predecessor(index, pred, index + 1) {
                return Err(EngineError::InvalidJobSpec(vec![err]));
            }
        }
        self.nodes.push(node);
        Ok(index)
    }

    /// Nodes in batch order.
    pub fn nodes(&self) -> &[JobNode] {
        &self.nodes
    }

    /// Node at `index`.
    pub fn get(&self, index: usize) -> Option<&JobNode> {
        self.nodes.get(index)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the batch has no nodes. Always `false` for a built batch.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Consumes the batch, returning its nodes.
    pub fn into_nodes(self) -> Vec<JobNode> {
        self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;
    use chrono::NaiveDate;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_job_node_builder() {
        let node = JobNode::new(3)
            .with_label("Artwork")
            .after(0)
            .with_attribute("project", "P-42");

        assert_eq!(node.label, "Artwork");
        assert_eq!(node.sla_working_days(), 3);
        assert_eq!(node.predecessor, Some(0));
        assert!(!node.is_independent());
        assert_eq!(node.attributes.get("project"), Some(&"P-42".to_string()));
    }

    #[test]
    fn test_sla_coercion() {
        assert_eq!(JobNode::new(0).sla_working_days(), 1);
        assert_eq!(JobNode::new(-5).sla_working_days(), 1);
        assert_eq!(WorkingDaySpec::new(start(), 0).working_days, 1);
        assert_eq!(WorkingDaySpec::new(start(), 7).working_days, 7);
    }

    #[test]
    fn test_fractional_sla() {
        assert_eq!(JobNode::from_fractional(4.0).unwrap().sla_working_days(), 4);
        assert_eq!(JobNode::from_fractional(-2.0).unwrap().sla_working_days(), 1);
        assert!(matches!(
            JobNode::from_fractional(2.5),
            Err(EngineError::InvalidSla(v)) if v == 2.5
        ));
        assert!(WorkingDaySpec::from_fractional(start(), f64::NAN).is_err());
        assert!(WorkingDaySpec::from_fractional(start(), f64::INFINITY).is_err());
    }

    #[test]
    fn test_batch_new_valid() {
        let batch = JobBatch::new(vec![JobNode::new(3), JobNode::new(2).after(0)]).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.get(1).unwrap().predecessor, Some(0));
    }

    #[test]
    fn test_batch_new_rejects_forward_reference() {
        let err = JobBatch::new(vec![JobNode::new(3).after(1), JobNode::new(2)]).unwrap_err();
        assert!(err
            .validation_errors()
            .iter()
            .any(|e| e.kind == ValidationErrorKind::ForwardReference));
    }

    #[test]
    fn test_batch_push() {
        let mut batch = JobBatch::from_first(JobNode::new(1)).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.push(JobNode::new(2).after(0)).unwrap(), 1);

        let err = batch.push(JobNode::new(2).after(2)).unwrap_err();
        assert!(err
            .validation_errors()
            .iter()
            .any(|e| e.kind == ValidationErrorKind::SelfReference));
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_batch_from_first_rejects_predecessor() {
        let err = JobBatch::from_first(JobNode::new(1).after(0)).unwrap_err();
        assert_eq!(
            err.validation_errors()[0].kind,
            ValidationErrorKind::SelfReference
        );
    }

    #[test]
    fn test_empty_batch_cannot_be_built() {
        let err = JobBatch::new(Vec::new()).unwrap_err();
        assert_eq!(
            err.validation_errors()[0].kind,
            ValidationErrorKind::EmptyBatch
        );
    }

    #[test]
    fn test_deserialized_sla_is_coerced() {
        let node: JobNode = serde_json::from_str(
            r#"{"label":"Banner","sla_working_days":0,"predecessor":null,"attributes":{}}"#,
        )
        .unwrap();
        assert_eq!(node.sla_working_days(), 1);

        let node: JobNode = serde_json::from_str(
            r#"{"label":"","sla_working_days":-4,"predecessor":null,"attributes":{}}"#,
        )
        .unwrap();
        assert_eq!(node.sla_working_days(), 1);
    }
}
