//! Visit form validation.
//!
//! Binding failures are reported per field so a form can be redisplayed with
//! the submitted values and an error next to each offending input.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::models::{VisitForm, DATE_FORMAT};

/// Field names as they appear in the HTML form.
pub const FIELD_DATE: &str = "date";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_VET_ID: &str = "vetId";

/// Error codes.
pub const CODE_NOT_EMPTY: &str = "NotEmpty";
pub const CODE_TYPE_MISMATCH: &str = "typeMismatch";
pub const CODE_UNKNOWN_VET: &str = "unknownVet";

/// A single rejected form field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, code: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// All field errors found in one submission.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq, Error)]
#[error("{} invalid field(s)", .0.len())]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Check whether a field has at least one error.
    pub fn has_field_error(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

/// A form that passed validation, with its values parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidVisit {
    pub date: NaiveDate,
    pub description: String,
    pub vet_id: i64,
}

/// Validate a visit form, collecting every failing field.
///
/// A description made only of whitespace counts as empty. A `vetId` that is
/// not an integer is a `typeMismatch`, like an unparseable date.
pub fn validate_visit_form(form: &VisitForm) -> Result<ValidVisit, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let date_text = form.date.trim();
    let date = if date_text.is_empty() {
        errors.push(FieldError::new(
            FIELD_DATE,
            CODE_NOT_EMPTY,
            "must not be empty",
        ));
        None
    } else {
        match NaiveDate::parse_from_str(date_text, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push(FieldError::new(
                    FIELD_DATE,
                    CODE_TYPE_MISMATCH,
                    format!("invalid date '{}', expected yyyy-MM-dd", date_text),
                ));
                None
            }
        }
    };

    if form.description.trim().is_empty() {
        errors.push(FieldError::new(
            FIELD_DESCRIPTION,
            CODE_NOT_EMPTY,
            "must not be empty",
        ));
    }

    let vet_text = form.vet_id.trim();
    let vet_id = if vet_text.is_empty() {
        errors.push(FieldError::new(
            FIELD_VET_ID,
            CODE_NOT_EMPTY,
            "must not be empty",
        ));
        None
    } else {
        match vet_text.parse::<i64>() {
            Ok(vet_id) => Some(vet_id),
            Err(_) => {
                errors.push(FieldError::new(
                    FIELD_VET_ID,
                    CODE_TYPE_MISMATCH,
                    format!("invalid vet id '{}'", vet_text),
                ));
                None
            }
        }
    };

    match (date, vet_id) {
        (Some(date), Some(vet_id)) if errors.is_empty() => Ok(ValidVisit {
            date,
            description: form.description.clone(),
            vet_id,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn form(date: &str, description: &str, vet_id: Option<i64>) -> VisitForm {
        VisitForm {
            date: date.into(),
            description: description.into(),
            vet_id: vet_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }

    #[test]
    fn test_valid_form() {
        let valid = validate_visit_form(&form("2024-02-01", "follow-up", Some(2))).unwrap();
        assert_eq!(valid.date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(valid.description, "follow-up");
        assert_eq!(valid.vet_id, 2);
    }

    #[test]
    fn test_empty_description() {
        let errors = validate_visit_form(&form("2024-02-01", "", Some(2))).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.has_field_error(FIELD_DESCRIPTION));
    }

    #[test]
    fn test_blank_description() {
        let errors = validate_visit_form(&form("2024-02-01", "   ", Some(2))).unwrap_err();
        assert!(errors.has_field_error(FIELD_DESCRIPTION));
    }

    #[test]
    fn test_bad_date_pattern() {
        let errors = validate_visit_form(&form("02/01/2024", "checkup", Some(2))).unwrap_err();
        let error = errors.iter().next().unwrap();
        assert_eq!(error.field, FIELD_DATE);
        assert_eq!(error.code, CODE_TYPE_MISMATCH);
    }

    #[test]
    fn test_impossible_date() {
        let errors = validate_visit_form(&form("2024-02-30", "checkup", Some(2))).unwrap_err();
        assert!(errors.has_field_error(FIELD_DATE));
    }

    #[test]
    fn test_non_numeric_vet() {
        let mut submitted = form("2024-02-01", "", None);
        submitted.vet_id = "abc".into();

        let errors = validate_visit_form(&submitted).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.has_field_error(FIELD_DESCRIPTION));
        let vet_error = errors.iter().find(|e| e.field == FIELD_VET_ID).unwrap();
        assert_eq!(vet_error.code, CODE_TYPE_MISMATCH);
    }

    #[test]
    fn test_reports_every_field() {
        let errors = validate_visit_form(&form("", "", None)).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.has_field_error(FIELD_DATE));
        assert!(errors.has_field_error(FIELD_DESCRIPTION));
        assert!(errors.has_field_error(FIELD_VET_ID));
        assert_eq!(errors.to_string(), "3 invalid field(s)");
    }

    #[test]
    fn test_errors_serialize_as_list() {
        let errors = validate_visit_form(&form("2024-02-01", "", Some(1))).unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json[0]["field"], "description");
        assert_eq!(json[0]["code"], "NotEmpty");
    }

    proptest! {
        #[test]
        fn prop_empty_description_always_rejected(
            days in 0i64..20_000,
            vet_id in 1i64..1_000,
            padding in "[ \t]{0,4}",
        ) {
            let date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() + chrono::Duration::days(days);
            let date_text = date.format(DATE_FORMAT).to_string();
            let submitted = form(&date_text, &padding, Some(vet_id));
            let errors = validate_visit_form(&submitted).unwrap_err();
            prop_assert!(errors.has_field_error(FIELD_DESCRIPTION));
        }

        #[test]
        fn prop_well_formed_forms_accepted(
            days in 0i64..20_000,
            vet_id in 1i64..1_000,
            description in "[a-zA-Z][a-zA-Z ]{0,40}",
        ) {
            let date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() + chrono::Duration::days(days);
            let date_text = date.format(DATE_FORMAT).to_string();
            let submitted = form(&date_text, &description, Some(vet_id));
            let valid = validate_visit_form(&submitted).unwrap();
            prop_assert_eq!(valid.date, date);
            prop_assert_eq!(valid.vet_id, vet_id);
            prop_assert_eq!(valid.description, description);
        }
    }
}
