//! Patient operations — validation in front of the repository, plus the
//! read-side sort used by the dashboard.

use std::cmp::Ordering;
use std::str::FromStr;

use rusqlite::Connection;

use crate::db::{self, DatabaseError};
use crate::models::{Patient, PatientPatch, PatientPayload, SortField, SortOrder};
use crate::validation::{PatientValidator, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Patient {0} not found")]
    NotFound(String),
    #[error("{0}")]
    InvalidSort(String),
    #[error("Storage error: {0}")]
    Storage(DatabaseError),
}

impl From<DatabaseError> for PatientError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { id, .. } => PatientError::NotFound(id),
            other => PatientError::Storage(other),
        }
    }
}

/// Validate and insert a new patient. Returns the assigned id.
pub fn create_patient(
    conn: &Connection,
    validator: &PatientValidator,
    payload: PatientPayload,
) -> Result<i64, PatientError> {
    let patient = validator.validate_new(payload)?;
    let id = db::insert_patient(conn, &patient)?;
    tracing::info!(patient_id = id, "Patient created");
    Ok(id)
}

pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, PatientError> {
    Ok(db::get_all_patients(conn)?)
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Patient, PatientError> {
    db::get_patient(conn, id)?.ok_or_else(|| PatientError::NotFound(id.to_string()))
}

/// Validate the supplied fields and apply them to patient `id`.
pub fn update_patient(
    conn: &Connection,
    validator: &PatientValidator,
    id: i64,
    patch: PatientPatch,
) -> Result<(), PatientError> {
    let changes = validator.validate_changes(patch)?;
    db::update_patient(conn, id, &changes)?;
    tracing::info!(patient_id = id, "Patient updated");
    Ok(())
}

pub fn delete_patient(conn: &Connection, id: i64) -> Result<(), PatientError> {
    db::delete_patient(conn, id)?;
    tracing::info!(patient_id = id, "Patient deleted");
    Ok(())
}

/// Parse the `sort_by` / `order` query tokens. `order` defaults to ascending.
pub fn parse_sort_request(
    sort_by: Option<&str>,
    order: Option<&str>,
) -> Result<(SortField, SortOrder), PatientError> {
    let field = sort_by
        .and_then(|s| SortField::from_str(s).ok())
        .ok_or_else(|| {
            PatientError::InvalidSort(format!(
                "Invalid sort_by field. Must be one of {}",
                SortField::choices()
            ))
        })?;
    let order = match order {
        None => SortOrder::default(),
        Some(token) => SortOrder::from_str(token).map_err(|_| {
            PatientError::InvalidSort(format!(
                "Invalid order. Must be one of {}",
                SortOrder::choices()
            ))
        })?,
    };
    Ok((field, order))
}

/// Read every patient and order them by `field`.
pub fn sort_patients(
    conn: &Connection,
    field: SortField,
    order: SortOrder,
) -> Result<Vec<Patient>, PatientError> {
    let mut patients = db::get_all_patients(conn)?;
    sort_by_field(&mut patients, field, order);
    Ok(patients)
}

/// Stable sort: patients with equal keys keep their stored order in both directions.
pub fn sort_by_field(patients: &mut [Patient], field: SortField, order: SortOrder) {
    patients.sort_by(|a, b| {
        let ordering = compare_by(a, b, field);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn compare_by(a: &Patient, b: &Patient, field: SortField) -> Ordering {
    match field {
        SortField::Age => a.age.cmp(&b.age),
        SortField::Gender => a.gender.as_str().cmp(b.gender.as_str()),
        SortField::BloodType => a.blood_type.as_str().cmp(b.blood_type.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::{BloodType, Gender};

    fn payload(name: &str, age: i64) -> PatientPayload {
        PatientPayload {
            name: name.into(),
            age,
            gender: "Male".into(),
            blood_type: "O+".into(),
            contact_phone: "0312-3456789".into(),
            contact_email: None,
            medical_history: None,
            doctor_assigned: "Dr. Hamza".into(),
        }
    }

    fn patient(id: i64, age: u8, gender: Gender, blood_type: BloodType) -> Patient {
        Patient {
            id,
            name: "Test Patient".into(),
            age,
            gender,
            blood_type,
            contact_phone: "1234".into(),
            contact_email: None,
            medical_history: None,
            doctor_assigned: "Dr Ali".into(),
        }
    }

    #[test]
    fn create_then_list_returns_the_record() {
        let conn = open_memory_database().unwrap();
        let validator = PatientValidator::default();

        let id = create_patient(&conn, &validator, payload("Aarish Arif", 40)).unwrap();
        let all = list_patients(&conn).unwrap();

        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
        assert_eq!(all[0].name, "Aarish Arif");
        assert_eq!(all[0].age, 40);
    }

    #[test]
    fn invalid_create_persists_nothing() {
        let conn = open_memory_database().unwrap();
        let validator = PatientValidator::default();

        for age in [0, 100] {
            let err = create_patient(&conn, &validator, payload("Bad Age", age)).unwrap_err();
            assert!(matches!(err, PatientError::Validation(ValidationError::AgeOutOfRange(_))));
        }
        assert!(list_patients(&conn).unwrap().is_empty());
    }

    #[test]
    fn update_missing_patient_is_not_found() {
        let conn = open_memory_database().unwrap();
        let validator = PatientValidator::default();
        let patch = PatientPatch {
            age: Some(30),
            ..Default::default()
        };
        let err = update_patient(&conn, &validator, 99999, patch).unwrap_err();
        assert!(matches!(err, PatientError::NotFound(ref id) if id == "99999"));
    }

    #[test]
    fn update_doctor_is_normalized() {
        let conn = open_memory_database().unwrap();
        let validator = PatientValidator::default();
        let id = create_patient(&conn, &validator, payload("Doc Change", 40)).unwrap();

        let patch = PatientPatch {
            doctor_assigned: Some("Ali".into()),
            ..Default::default()
        };
        update_patient(&conn, &validator, id, patch).unwrap();

        assert_eq!(get_patient(&conn, id).unwrap().doctor_assigned, "Dr Ali");
    }

    #[test]
    fn delete_twice() {
        let conn = open_memory_database().unwrap();
        let validator = PatientValidator::default();
        let id = create_patient(&conn, &validator, payload("Short Lived", 40)).unwrap();

        delete_patient(&conn, id).unwrap();
        assert!(matches!(
            delete_patient(&conn, id).unwrap_err(),
            PatientError::NotFound(_)
        ));
    }

    #[test]
    fn sort_by_age_both_directions() {
        let conn = open_memory_database().unwrap();
        let validator = PatientValidator::default();
        for age in [40, 25, 60] {
            create_patient(&conn, &validator, payload("Sorted", age)).unwrap();
        }

        let asc = sort_patients(&conn, SortField::Age, SortOrder::Asc).unwrap();
        let ages: Vec<u8> = asc.iter().map(|p| p.age).collect();
        assert_eq!(ages, vec![25, 40, 60]);

        let desc = sort_patients(&conn, SortField::Age, SortOrder::Desc).unwrap();
        let ages: Vec<u8> = desc.iter().map(|p| p.age).collect();
        assert_eq!(ages, vec![60, 40, 25]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut patients = vec![
            patient(1, 30, Gender::Male, BloodType::APositive),
            patient(2, 30, Gender::Female, BloodType::APositive),
            patient(3, 20, Gender::Male, BloodType::BPositive),
        ];

        sort_by_field(&mut patients, SortField::BloodType, SortOrder::Asc);
        let ids: Vec<i64> = patients.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        sort_by_field(&mut patients, SortField::BloodType, SortOrder::Desc);
        let ids: Vec<i64> = patients.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        sort_by_field(&mut patients, SortField::Gender, SortOrder::Asc);
        let ids: Vec<i64> = patients.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn sort_request_parsing() {
        assert_eq!(
            parse_sort_request(Some("age"), None).unwrap(),
            (SortField::Age, SortOrder::Asc)
        );
        assert_eq!(
            parse_sort_request(Some("blood_type"), Some("desc")).unwrap(),
            (SortField::BloodType, SortOrder::Desc)
        );
        assert!(matches!(
            parse_sort_request(Some("name"), None).unwrap_err(),
            PatientError::InvalidSort(_)
        ));
        assert!(matches!(
            parse_sort_request(None, Some("asc")).unwrap_err(),
            PatientError::InvalidSort(_)
        ));
        assert!(matches!(
            parse_sort_request(Some("age"), Some("up")).unwrap_err(),
            PatientError::InvalidSort(_)
        ));
    }
}
