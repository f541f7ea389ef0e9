//! Event model: a named occasion with a date.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::SnapError;
use crate::validation::{parse_event_date, required};

/// A row in the `events` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub date: DateTime<Utc>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of both `POST /api/events` and `PUT /api/events/{id}`.
///
/// The edit dialog posts the whole event back, so unknown fields such as `id`
/// and `created_at` are ignored.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EventForm {
    #[validate(length(max = 200, message = "Event name must be at most 200 characters"))]
    pub name: Option<String>,

    pub date: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

/// Validated event fields, ready for the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct EventInput {
    pub name: String,
    pub date: DateTime<Utc>,
    pub description: Option<String>,
}

impl EventForm {
    /// Check required fields and parse the date.
    pub fn into_input(self) -> Result<EventInput, SnapError> {
        let name = required(self.name.as_deref())?.to_owned();
        let date = parse_event_date(required(self.date.as_deref())?)?;
        let description = self
            .description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());
        Ok(EventInput {
            name,
            date,
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_into_input() {
        let form: EventForm = serde_json::from_value(serde_json::json!({
            "id": "ignored",
            "name": "Spring Gala",
            "date": "2025-04-01",
            "description": "  ",
        }))
        .unwrap();
        let input = form.into_input().unwrap();
        assert_eq!(input.name, "Spring Gala");
        assert_eq!(input.date.to_rfc3339(), "2025-04-01T00:00:00+00:00");
        assert_eq!(input.description, None);
    }

    #[test]
    fn test_form_missing_date() {
        let form = EventForm {
            name: Some("Gala".into()),
            ..Default::default()
        };
        let err = form.into_input().unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields");
    }
}
