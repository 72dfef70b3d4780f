//! Field rules for inbound patient payloads.
//!
//! Create payloads are checked field by field in a fixed order and the first
//! failure is returned. Update payloads run the same rules on supplied fields
//! only; the assigned doctor is additionally normalized to carry a `Dr` prefix.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{BloodType, Gender, NewPatient, PatientChanges, PatientPatch, PatientPayload};

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_DOCTOR_LEN: usize = 50;
pub const MIN_AGE: i64 = 1;
pub const MAX_AGE: i64 = 99;
pub const MAX_HISTORY_ENTRIES: usize = 5;

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9-]{4,15}$").unwrap());

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,
    #[error("Name must contain only letters and spaces")]
    NameCharacters,
    #[error("Name must be at most {max} characters", max = MAX_NAME_LEN)]
    NameTooLong,
    #[error("Age must be between {min} and {max}, got {0}", min = MIN_AGE, max = MAX_AGE)]
    AgeOutOfRange(i64),
    #[error("Gender must be Male or Female, got {0:?}")]
    InvalidGender(String),
    #[error("Blood type must be one of {choices}, got {value:?}", choices = BloodType::choices())]
    InvalidBloodType { value: String },
    #[error("Invalid email address: {0:?}")]
    InvalidEmail(String),
    #[error("Email domain {0:?} is not accepted")]
    EmailDomainNotAllowed(String),
    #[error("Phone must be 4 to 15 digits or dashes, got {0:?}")]
    InvalidPhone(String),
    #[error("Doctor assigned is required")]
    DoctorRequired,
    #[error("Doctor assigned must be at most {max} characters", max = MAX_DOCTOR_LEN)]
    DoctorTooLong,
    #[error("Medical history may list at most {max} entries, got {0}", max = MAX_HISTORY_ENTRIES)]
    TooManyHistoryEntries(usize),
}

impl ValidationError {
    /// JSON key of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NameRequired | Self::NameCharacters | Self::NameTooLong => "name",
            Self::AgeOutOfRange(_) => "age",
            Self::InvalidGender(_) => "gender",
            Self::InvalidBloodType { .. } => "blood_type",
            Self::InvalidEmail(_) | Self::EmailDomainNotAllowed(_) => "contact_email",
            Self::InvalidPhone(_) => "contact_phone",
            Self::DoctorRequired | Self::DoctorTooLong => "doctor_assigned",
            Self::TooManyHistoryEntries(_) => "medical_history",
        }
    }
}

/// Applies the field rules. Holds the optional email-domain policy.
#[derive(Debug, Clone, Default)]
pub struct PatientValidator {
    allowed_email_domains: Vec<String>,
}

impl PatientValidator {
    /// `allowed_email_domains` are compared case-insensitively; empty accepts any domain.
    pub fn new(allowed_email_domains: Vec<String>) -> Self {
        Self {
            allowed_email_domains: allowed_email_domains
                .into_iter()
                .map(|d| d.to_lowercase())
                .collect(),
        }
    }

    /// Validate a full create payload.
    pub fn validate_new(&self, payload: PatientPayload) -> Result<NewPatient, ValidationError> {
        let name = check_name(&payload.name)?;
        let age = check_age(payload.age)?;
        let gender = check_gender(&payload.gender)?;
        let blood_type = check_blood_type(&payload.blood_type)?;
        let contact_email = self.check_email(payload.contact_email.as_deref())?;
        let contact_phone = check_phone(&payload.contact_phone)?;
        let doctor_assigned = check_doctor(&payload.doctor_assigned)?;
        let medical_history = check_history(payload.medical_history)?;

        Ok(NewPatient {
            name,
            age,
            gender,
            blood_type,
            contact_phone,
            contact_email,
            medical_history,
            doctor_assigned,
        })
    }

    /// Validate the supplied subset of an update payload.
    pub fn validate_changes(&self, patch: PatientPatch) -> Result<PatientChanges, ValidationError> {
        let name = patch.name.as_deref().map(check_name).transpose()?;
        let age = patch.age.map(check_age).transpose()?;
        let gender = patch.gender.as_deref().map(check_gender).transpose()?;
        let blood_type = patch.blood_type.as_deref().map(check_blood_type).transpose()?;
        let contact_email = match patch.contact_email {
            Some(email) => Some(self.check_email(email.as_deref())?),
            None => None,
        };
        let contact_phone = patch.contact_phone.as_deref().map(check_phone).transpose()?;
        let doctor_assigned = patch
            .doctor_assigned
            .as_deref()
            .map(|raw| check_doctor(&normalize_doctor(raw)))
            .transpose()?;
        let medical_history = match patch.medical_history {
            Some(history) => Some(check_history(history)?),
            None => None,
        };

        Ok(PatientChanges {
            name,
            age,
            gender,
            blood_type,
            contact_phone,
            contact_email,
            medical_history,
            doctor_assigned,
        })
    }

    fn check_email(&self, raw: Option<&str>) -> Result<Option<String>, ValidationError> {
        let email = match raw.map(str::trim) {
            None | Some("") => return Ok(None),
            Some(email) => email,
        };
        if !EMAIL_PATTERN.is_match(email) {
            return Err(ValidationError::InvalidEmail(email.to_string()));
        }
        if !self.allowed_email_domains.is_empty() {
            let domain = email
                .rsplit_once('@')
                .map(|(_, domain)| domain.to_lowercase())
                .unwrap_or_default();
            if !self.allowed_email_domains.contains(&domain) {
                return Err(ValidationError::EmailDomainNotAllowed(domain));
            }
        }
        Ok(Some(email.to_string()))
    }
}

fn check_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if !name.chars().all(|c| c.is_alphabetic() || c.is_whitespace()) {
        return Err(ValidationError::NameCharacters);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong);
    }
    Ok(name.to_string())
}

fn check_age(age: i64) -> Result<u8, ValidationError> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(ValidationError::AgeOutOfRange(age));
    }
    u8::try_from(age).map_err(|_| ValidationError::AgeOutOfRange(age))
}

fn check_gender(raw: &str) -> Result<Gender, ValidationError> {
    Gender::parse_loose(raw).ok_or_else(|| ValidationError::InvalidGender(raw.to_string()))
}

fn check_blood_type(raw: &str) -> Result<BloodType, ValidationError> {
    BloodType::parse_loose(raw).ok_or_else(|| ValidationError::InvalidBloodType {
        value: raw.to_string(),
    })
}

fn check_phone(raw: &str) -> Result<String, ValidationError> {
    let phone = raw.trim();
    if !PHONE_PATTERN.is_match(phone) {
        return Err(ValidationError::InvalidPhone(raw.to_string()));
    }
    Ok(phone.to_string())
}

fn check_doctor(raw: &str) -> Result<String, ValidationError> {
    let doctor = raw.trim();
    if doctor.is_empty() {
        return Err(ValidationError::DoctorRequired);
    }
    if doctor.chars().count() > MAX_DOCTOR_LEN {
        return Err(ValidationError::DoctorTooLong);
    }
    Ok(doctor.to_string())
}

fn check_history(history: Option<Vec<String>>) -> Result<Option<Vec<String>>, ValidationError> {
    match history {
        Some(entries) if entries.len() > MAX_HISTORY_ENTRIES => {
            Err(ValidationError::TooManyHistoryEntries(entries.len()))
        }
        other => Ok(other),
    }
}

/// Trim and prefix with `Dr ` unless the name already starts with "dr" (any case).
/// Blank input stays blank so the required-field rule still rejects it.
pub fn normalize_doctor(raw: &str) -> String {
    let doctor = raw.trim();
    if doctor.is_empty() || doctor.to_lowercase().starts_with("dr") {
        doctor.to_string()
    } else {
        format!("Dr {doctor}")
    }
}
