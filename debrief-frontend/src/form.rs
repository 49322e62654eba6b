use chrono::{DateTime, Utc};
use debrief_history::model::History;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::error::AppError;

pub const DEFAULT_MEETING_RATING: u8 = 3;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostcallForm {
    pub meeting_name: String,
    pub meeting_start: DateTime<Utc>,
    pub meeting_end: DateTime<Utc>,
    pub notes: String,
    pub meeting_rating: u8,
    pub schedule_follow_up: bool,
    pub follow_up_date: Option<DateTime<Utc>>,
}

impl Default for PostcallForm {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            meeting_name: String::new(),
            meeting_start: now,
            meeting_end: now,
            notes: String::new(),
            meeting_rating: DEFAULT_MEETING_RATING,
            schedule_follow_up: false,
            follow_up_date: None,
        }
    }
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum FormError {
    #[error("Meeting end must not be before its start")]
    EndBeforeStart,
    #[error("Follow-up date is required when scheduling a follow-up")]
    MissingFollowUpDate,
    #[error("Meeting name is required")]
    MissingMeetingName,
    #[error("Meeting rating must be between 1 and 5")]
    RatingOutOfRange(u8),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Submission<'a> {
    #[serde(flatten)]
    form: &'a PostcallForm,
    presented_content: &'a History,
}

impl PostcallForm {
    pub fn validate(&self) -> Result<(), Vec<FormError>> {
        let mut errors = Vec::new();
        if self.meeting_name.trim().is_empty() {
            errors.push(FormError::MissingMeetingName);
        }
        if !(1..=5).contains(&self.meeting_rating) {
            errors.push(FormError::RatingOutOfRange(self.meeting_rating));
        }
        if self.meeting_end < self.meeting_start {
            errors.push(FormError::EndBeforeStart);
        }
        if self.schedule_follow_up && self.follow_up_date.is_none() {
            errors.push(FormError::MissingFollowUpDate);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Event data posted to the action endpoint: the form values together with
    /// the whole organized history, disabled items and their ratings included.
    pub fn payload(&self, history: &History) -> Result<Value, AppError> {
        let submission = Submission {
            form: self,
            presented_content: history,
        };

        Ok(serde_json::to_value(submission)?)
    }
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;
    use debrief_history::{
        model::{PresentationEvent, RatingTable},
        organize::organize,
        update::toggle_enabled,
    };
    use serde_json::json;

    use super::*;

    fn form() -> PostcallForm {
        PostcallForm {
            meeting_name: "Quarterly review".to_string(),
            meeting_start: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            meeting_end: Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap(),
            notes: "went well".to_string(),
            meeting_rating: 4,
            schedule_follow_up: false,
            follow_up_date: None,
        }
    }

    #[test]
    fn valid_form_passes() {
        assert_eq!(Ok(()), form().validate());
    }

    #[test]
    fn reports_every_violation() {
        let form = PostcallForm {
            meeting_name: "  ".to_string(),
            meeting_rating: 0,
            meeting_end: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            schedule_follow_up: true,
            ..form()
        };

        assert_eq!(
            Err(vec![
                FormError::MissingMeetingName,
                FormError::RatingOutOfRange(0),
                FormError::EndBeforeStart,
                FormError::MissingFollowUpDate,
            ]),
            form.validate()
        );
    }

    #[test]
    fn follow_up_with_date_passes() {
        let form = PostcallForm {
            schedule_follow_up: true,
            follow_up_date: Some(Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()),
            ..form()
        };

        assert_eq!(Ok(()), form.validate());
    }

    #[test]
    fn payload_contains_form_and_presented_content() {
        let history = organize(
            &[
                PresentationEvent::file("f1").with_name("Deck"),
                PresentationEvent::page("f1", 0),
                PresentationEvent::file("f2"),
            ],
            &RatingTable::new(),
        );
        let history = toggle_enabled(&history, "f2", None);

        let payload = form().payload(&history).unwrap();

        assert_eq!(json!("Quarterly review"), payload["meetingName"]);
        assert_eq!(json!("2024-05-01T10:00:00Z"), payload["meetingStart"]);
        assert_eq!(json!(4), payload["meetingRating"]);
        assert_eq!(json!(false), payload["scheduleFollowUp"]);
        assert_eq!(Value::Null, payload["followUpDate"]);
        assert_eq!(
            json!([
                {
                    "id": "f1",
                    "type": "file",
                    "name": "Deck",
                    "enabled": true,
                    "pages": [{ "id": "f1/0", "type": "page", "enabled": true, "pageIndex": 0 }]
                },
                { "id": "f2", "type": "file", "enabled": false, "pages": [] }
            ]),
            payload["presentedContent"]
        );
    }
}
