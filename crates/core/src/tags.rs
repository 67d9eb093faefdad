//! Tag label extraction and reconciliation of a project's tag collection.
//!
//! A project's tags are replaced by converging the stored collection onto
//! the requested label list: tags whose label is still requested keep
//! their row (and id), missing labels become new rows, and every stored
//! tag that nobody claimed is deleted. [`plan_reconciliation`] computes
//! that plan without touching storage; the repository layer executes it
//! inside one transaction.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum length of a tag label.
pub const MAX_LABEL_LEN: usize = 255;

/// Extract the label from one incoming tag entry.
///
/// An entry is either a bare string or an object with a string `label`
/// field. The label is trimmed; an empty result is returned as-is and
/// skipped later by [`plan_reconciliation`].
pub fn tag_label(entry: &Value) -> Result<String, CoreError> {
    let raw = match entry {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => match obj.get("label") {
            Some(Value::String(s)) => s.as_str(),
            Some(Value::Null) | None => "",
            Some(_) => {
                return Err(CoreError::Validation(
                    "Tag 'label' must be a string".into(),
                ))
            }
        },
        _ => {
            return Err(CoreError::Validation(
                "Each tag must be a label string or an object with a 'label' field".into(),
            ))
        }
    };

    let label = raw.trim();
    if label.chars().count() > MAX_LABEL_LEN {
        return Err(CoreError::Validation(format!(
            "Tag label exceeds {MAX_LABEL_LEN} characters"
        )));
    }
    Ok(label.to_string())
}

/// Extract every label from a `tags` payload value.
///
/// `null` means "no tags"; anything other than an array is rejected.
pub fn tag_labels(value: &Value) -> Result<Vec<String>, CoreError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(entries) => entries.iter().map(tag_label).collect(),
        _ => Err(CoreError::Validation("Field 'tags' must be an array".into())),
    }
}

/// Position of one tag in the reconciled collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagSlot {
    /// An existing tag, reused unchanged.
    Keep(DbId),
    /// A new tag; indexes into [`TagPlan::to_create`].
    Create(usize),
}

/// Result of reconciling stored tags against a requested label list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPlan {
    /// Final collection in request order, one slot per distinct label.
    pub slots: Vec<TagSlot>,
    /// Labels that need a new tag row.
    pub to_create: Vec<String>,
    /// Stored tags that were not claimed and must be deleted.
    pub to_delete: Vec<DbId>,
}

impl TagPlan {
    /// True when the plan neither creates nor deletes anything.
    pub fn is_noop(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty()
    }
}

/// Reconcile `existing` `(id, label)` pairs against the `incoming` labels.
///
/// - Empty labels are skipped.
/// - The first stored tag with a requested label is claimed and reused.
/// - Unmatched labels are scheduled for creation.
/// - A label repeated in `incoming` maps to the slot of its first
///   occurrence, so the result never holds two tags with one label.
/// - Every stored tag left unclaimed is scheduled for deletion, including
///   stored duplicates of a claimed label.
pub fn plan_reconciliation<'a, I>(existing: I, incoming: &[String]) -> TagPlan
where
    I: IntoIterator<Item = (DbId, &'a str)>,
{
    let mut stored_order: Vec<DbId> = Vec::new();
    let mut existing_by_label: HashMap<&str, DbId> = HashMap::new();
    for (id, label) in existing {
        stored_order.push(id);
        existing_by_label.entry(label).or_insert(id);
    }

    let mut plan = TagPlan::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for label in incoming {
        let label = label.as_str();
        if label.is_empty() || !seen.insert(label) {
            continue;
        }

        match existing_by_label.remove(label) {
            Some(id) => plan.slots.push(TagSlot::Keep(id)),
            None => {
                plan.slots.push(TagSlot::Create(plan.to_create.len()));
                plan.to_create.push(label.to_string());
            }
        }
    }

    plan.to_delete = stored_order
        .into_iter()
        .filter(|id| !plan.slots.contains(&TagSlot::Keep(*id)))
        .collect();

    plan
}
