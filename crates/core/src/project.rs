//! Field rules for creating and updating projects.
//!
//! A request body is first parsed into a [`ProjectPatch`], which rejects
//! bad enum labels, malformed dates and malformed tag lists before any
//! storage is touched. The patch is then applied to the current field
//! values (or to [`ProjectFields::default`] on creation), enforcing the
//! start/finish date policy.

use serde_json::Value;
use validator::Validate;

use crate::error::CoreError;
use crate::labels::{Difficulty, ProjectStatus};
use crate::payload::{self, Payload};
use crate::tags;
use crate::types::Timestamp;

/// Scalar fields of a project, as stored.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ProjectFields {
    #[validate(length(max = 255))]
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub difficulty: Difficulty,
    #[validate(length(max = 255))]
    pub image_url: Option<String>,
    pub started_at: Option<Timestamp>,
    pub finished_at: Option<Timestamp>,
}

/// How a request sets one of the date fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateInput {
    /// Key absent: keep the current value.
    #[default]
    Keep,
    /// Key present with a falsy value.
    Clear,
    /// Key present with a parsable date.
    Set(Timestamp),
}

impl DateInput {
    fn from_payload(payload: &Payload, field: &str) -> Result<Self, CoreError> {
        match payload.get(field) {
            None => Ok(DateInput::Keep),
            Some(value) if !payload::is_truthy(value) => Ok(DateInput::Clear),
            Some(value) => payload::timestamp_value(field, value).map(DateInput::Set),
        }
    }

    fn resolve(self, current: Option<Timestamp>) -> Option<Timestamp> {
        match self {
            DateInput::Keep => current,
            DateInput::Clear => None,
            DateInput::Set(ts) => Some(ts),
        }
    }
}

/// A validated partial update. `None` means "key absent, keep as is".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub difficulty: Option<Difficulty>,
    /// `Some(None)` clears the image.
    pub image_url: Option<Option<String>>,
    pub started_at: DateInput,
    pub finished_at: DateInput,
    /// Requested tag labels; `None` leaves the tag collection untouched.
    pub tags: Option<Vec<String>>,
}

impl ProjectPatch {
    /// Parse a request body. Fails on the first invalid field.
    pub fn from_payload(payload: &Payload) -> Result<Self, CoreError> {
        let name = payload::lookup_non_null(payload, &["name"])
            .map(|v| payload::string_value("name", v))
            .transpose()?;

        let description = payload::lookup_non_null(payload, &["description"])
            .map(|v| payload::string_value("description", v))
            .transpose()?;

        let status = payload::lookup_non_null(payload, &["status", "Status"])
            .map(|v| label_value("status", v).and_then(|s| ProjectStatus::parse(&s)))
            .transpose()?;

        let difficulty = payload::lookup_non_null(payload, &["difficulty", "Difficulty"])
            .map(|v| label_value("difficulty", v).and_then(|s| Difficulty::parse(&s)))
            .transpose()?;

        let image_url = payload::lookup(payload, &["imageUrl"])
            .map(|v| payload::optional_string("imageUrl", v))
            .transpose()?;

        let tags = payload
            .get("tags")
            .map(tags::tag_labels)
            .transpose()?;

        Ok(Self {
            name,
            description,
            status,
            difficulty,
            image_url,
            started_at: DateInput::from_payload(payload, "started_at")?,
            finished_at: DateInput::from_payload(payload, "finished_at")?,
            tags,
        })
    }

    /// Apply the patch on top of `current`.
    ///
    /// After the explicit values are applied, a missing `started_at` is
    /// stamped with `now` when the resulting status is WIP or Finished, and
    /// a missing `finished_at` is stamped when the status is Finished.
    pub fn apply(&self, current: &ProjectFields, now: Timestamp) -> ProjectFields {
        let status = self.status.unwrap_or(current.status);

        let mut started_at = self.started_at.resolve(current.started_at);
        if started_at.is_none() && status.is_started() {
            started_at = Some(now);
        }

        let mut finished_at = self.finished_at.resolve(current.finished_at);
        if finished_at.is_none() && status == ProjectStatus::Finished {
            finished_at = Some(now);
        }

        ProjectFields {
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| current.description.clone()),
            status,
            difficulty: self.difficulty.unwrap_or(current.difficulty),
            image_url: self
                .image_url
                .clone()
                .unwrap_or_else(|| current.image_url.clone()),
            started_at,
            finished_at,
        }
    }

    /// Fields of a brand-new project: the patch over the creation defaults.
    pub fn create(&self, now: Timestamp) -> ProjectFields {
        self.apply(&ProjectFields::default(), now)
    }
}

/// Returns the image URL that `next` no longer references, if it changed.
pub fn replaced_image(previous: &ProjectFields, next: &ProjectFields) -> Option<String> {
    match (&previous.image_url, &next.image_url) {
        (Some(old), new) if new.as_deref() != Some(old.as_str()) => Some(old.clone()),
        _ => None,
    }
}

fn label_value(field: &str, value: &Value) -> Result<String, CoreError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(CoreError::Validation(format!(
            "Field '{field}' must be a label string"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
    }

    fn patch(value: Value) -> Result<ProjectPatch, CoreError> {
        ProjectPatch::from_payload(&payload::into_payload(value).unwrap())
    }

    #[test]
    fn empty_payload_creates_defaults() {
        let fields = patch(json!({})).unwrap().create(now());
        assert_eq!(fields, ProjectFields::default());
        assert_eq!(fields.name, "");
        assert_eq!(fields.status, ProjectStatus::NotStarted);
        assert_eq!(fields.difficulty, Difficulty::Beginner);
        assert!(fields.started_at.is_none());
        assert!(fields.finished_at.is_none());
    }

    #[test]
    fn supplied_scalars_are_kept() {
        let fields = patch(json!({
            "name": "Blue Beanie",
            "description": "Ribbed hat",
            "difficulty": "Intermediate",
            "imageUrl": "http://localhost/uploads/a.png",
        }))
        .unwrap()
        .create(now());

        assert_eq!(fields.name, "Blue Beanie");
        assert_eq!(fields.description, "Ribbed hat");
        assert_eq!(fields.difficulty, Difficulty::Intermediate);
        assert_eq!(fields.image_url.as_deref(), Some("http://localhost/uploads/a.png"));
    }

    #[test]
    fn wip_without_start_date_is_stamped() {
        let fields = patch(json!({"status": "WIP"})).unwrap().create(now());
        assert_eq!(fields.started_at, Some(now()));
        assert!(fields.finished_at.is_none());
    }

    #[test]
    fn finished_stamps_both_dates() {
        let fields = patch(json!({"status": "Finished", "started_at": ""}))
            .unwrap()
            .create(now());
        assert_eq!(fields.started_at, Some(now()));
        assert_eq!(fields.finished_at, Some(now()));
    }

    #[test]
    fn explicit_start_date_wins() {
        let fields = patch(json!({"status": "WIP", "started_at": "2024-01-15"}))
            .unwrap()
            .create(now());
        assert_eq!(
            fields.started_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn unknown_status_label_fails() {
        let err = patch(json!({"status": "Not Real"})).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn non_string_label_fails() {
        assert!(patch(json!({"difficulty": 3})).is_err());
    }

    #[test]
    fn malformed_date_fails() {
        assert!(patch(json!({"started_at": "not a date"})).is_err());
    }

    #[test]
    fn absent_keys_keep_current_values() {
        let current = ProjectFields {
            name: "Socks".into(),
            description: "Toe-up".into(),
            status: ProjectStatus::Wip,
            difficulty: Difficulty::Advanced,
            image_url: Some("http://x/uploads/s.png".into()),
            started_at: Some(Utc.with_ymd_and_hms(2024, 2, 2, 0, 0, 0).unwrap()),
            finished_at: None,
        };

        let next = patch(json!({"name": "Wool socks"})).unwrap().apply(&current, now());
        assert_eq!(next.name, "Wool socks");
        assert_eq!(next.description, current.description);
        assert_eq!(next.status, current.status);
        assert_eq!(next.image_url, current.image_url);
        assert_eq!(next.started_at, current.started_at);
    }

    #[test]
    fn transition_to_finished_keeps_start_and_stamps_finish() {
        let started = Utc.with_ymd_and_hms(2024, 2, 2, 0, 0, 0).unwrap();
        let current = ProjectFields {
            status: ProjectStatus::Wip,
            started_at: Some(started),
            ..ProjectFields::default()
        };

        let next = patch(json!({"status": "Finished"})).unwrap().apply(&current, now());
        assert_eq!(next.started_at, Some(started));
        assert_eq!(next.finished_at, Some(now()));
    }

    #[test]
    fn clearing_dates_on_not_started_project() {
        let current = ProjectFields {
            started_at: Some(now()),
            ..ProjectFields::default()
        };
        let next = patch(json!({"started_at": null})).unwrap().apply(&current, now());
        assert!(next.started_at.is_none());
    }

    #[test]
    fn null_image_url_clears_it() {
        let current = ProjectFields {
            image_url: Some("http://x/uploads/old.png".into()),
            ..ProjectFields::default()
        };
        let next = patch(json!({"imageUrl": null})).unwrap().apply(&current, now());
        assert!(next.image_url.is_none());
        assert_eq!(replaced_image(&current, &next).as_deref(), Some("http://x/uploads/old.png"));
    }

    #[test]
    fn unchanged_image_is_not_replaced() {
        let current = ProjectFields {
            image_url: Some("http://x/uploads/old.png".into()),
            ..ProjectFields::default()
        };
        let next = patch(json!({"imageUrl": "http://x/uploads/old.png"}))
            .unwrap()
            .apply(&current, now());
        assert!(replaced_image(&current, &next).is_none());
    }

    #[test]
    fn tags_key_is_optional() {
        assert_eq!(patch(json!({})).unwrap().tags, None);
        assert_eq!(
            patch(json!({"tags": ["A", {"label": "B"}]})).unwrap().tags,
            Some(vec!["A".to_string(), "B".to_string()])
        );
    }

    #[test]
    fn legacy_capitalized_keys_are_read() {
        let p = patch(json!({"Status": "Not started", "Difficulty": "Easy"})).unwrap();
        assert_eq!(p.status, Some(ProjectStatus::NotStarted));
        assert_eq!(p.difficulty, Some(Difficulty::Easy));
    }

    #[test]
    fn overlong_name_fails_validation() {
        let fields = patch(json!({"name": "n".repeat(300)})).unwrap().create(now());
        assert!(fields.validate().is_err());
    }
}
