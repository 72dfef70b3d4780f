use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::*;

/// Stored in `medical_history` when a patient has none.
pub const NO_HISTORY_SENTINEL: &str = "None";

const SELECT_COLUMNS: &str = "SELECT id, name, age, gender, blood_type, contact_phone,
        contact_email, medical_history, doctor_assigned
     FROM patients";

pub fn insert_patient(conn: &Connection, patient: &NewPatient) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO patients (name, age, gender, blood_type, contact_phone, contact_email,
                               medical_history, doctor_assigned)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            patient.name,
            patient.age,
            patient.gender.as_str(),
            patient.blood_type.as_str(),
            patient.contact_phone,
            patient.contact_email,
            encode_history(patient.medical_history.as_deref())?,
            patient.doctor_assigned,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_all_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
    let rows = stmt.query_map([], PatientRow::read)?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(row?.into_patient()?);
    }
    Ok(patients)
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Option<Patient>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("{SELECT_COLUMNS} WHERE id = ?1"),
            params![id],
            PatientRow::read,
        )
        .optional()?;
    row.map(PatientRow::into_patient).transpose()
}

pub fn patient_exists(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let found = conn
        .query_row("SELECT 1 FROM patients WHERE id = ?1", params![id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

/// Apply the supplied fields to an existing patient in a single statement.
///
/// Returns `NotFound` when no row has `id`; nothing is written in that case.
pub fn update_patient(
    conn: &Connection,
    id: i64,
    changes: &PatientChanges,
) -> Result<(), DatabaseError> {
    let mut assignments: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(name) = &changes.name {
        assignments.push("name = ?");
        values.push(Value::Text(name.clone()));
    }
    if let Some(age) = changes.age {
        assignments.push("age = ?");
        values.push(Value::Integer(i64::from(age)));
    }
    if let Some(gender) = changes.gender {
        assignments.push("gender = ?");
        values.push(Value::Text(gender.as_str().to_string()));
    }
    if let Some(blood_type) = changes.blood_type {
        assignments.push("blood_type = ?");
        values.push(Value::Text(blood_type.as_str().to_string()));
    }
    if let Some(phone) = &changes.contact_phone {
        assignments.push("contact_phone = ?");
        values.push(Value::Text(phone.clone()));
    }
    if let Some(email) = &changes.contact_email {
        assignments.push("contact_email = ?");
        values.push(email.clone().map_or(Value::Null, Value::Text));
    }
    if let Some(history) = &changes.medical_history {
        assignments.push("medical_history = ?");
        values.push(Value::Text(encode_history(history.as_deref())?));
    }
    if let Some(doctor) = &changes.doctor_assigned {
        assignments.push("doctor_assigned = ?");
        values.push(Value::Text(doctor.clone()));
    }

    if assignments.is_empty() {
        return if patient_exists(conn, id)? {
            Ok(())
        } else {
            Err(DatabaseError::patient_not_found(id))
        };
    }

    values.push(Value::Integer(id));
    let sql = format!(
        "UPDATE patients SET {} WHERE id = ?",
        assignments.join(", ")
    );
    let updated = conn.execute(&sql, params_from_iter(values))?;
    if updated == 0 {
        return Err(DatabaseError::patient_not_found(id));
    }
    Ok(())
}

pub fn delete_patient(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM patients WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::patient_not_found(id));
    }
    Ok(())
}

/// Serialize the history list for its TEXT column.
pub fn encode_history(history: Option<&[String]>) -> Result<String, DatabaseError> {
    match history {
        Some(entries) => Ok(serde_json::to_string(entries)?),
        None => Ok(NO_HISTORY_SENTINEL.to_string()),
    }
}

/// Inverse of [`encode_history`]. Rows written before the list format hold a
/// plain string, which is returned as a single entry.
pub fn decode_history(raw: Option<String>) -> Option<Vec<String>> {
    let raw = raw?;
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NO_HISTORY_SENTINEL {
        return None;
    }
    match serde_json::from_str::<Vec<String>>(trimmed) {
        Ok(entries) => Some(entries),
        Err(_) => Some(vec![raw]),
    }
}

// Older rows hold the raw client casing (`male`, `o+`).
fn stored_enum<T>(
    raw: &str,
    field: &'static str,
    parse: fn(&str) -> Option<T>,
) -> Result<T, ParseEnumError> {
    parse(raw).ok_or_else(|| ParseEnumError {
        field,
        value: raw.to_string(),
    })
}

/// Raw column values, converted to a [`Patient`] outside the rusqlite closure
/// so enum and range failures surface as `DatabaseError`.
struct PatientRow {
    id: i64,
    name: String,
    age: i64,
    gender: String,
    blood_type: String,
    contact_phone: String,
    contact_email: Option<String>,
    medical_history: Option<String>,
    doctor_assigned: String,
}

impl PatientRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            age: row.get(2)?,
            gender: row.get(3)?,
            blood_type: row.get(4)?,
            contact_phone: row.get(5)?,
            contact_email: row.get(6)?,
            medical_history: row.get(7)?,
            doctor_assigned: row.get(8)?,
        })
    }

    fn into_patient(self) -> Result<Patient, DatabaseError> {
        let age = u8::try_from(self.age).map_err(|_| {
            DatabaseError::ConstraintViolation(format!(
                "patient {} has out-of-range age {}",
                self.id, self.age
            ))
        })?;
        Ok(Patient {
            id: self.id,
            name: self.name,
            age,
            gender: stored_enum(&self.gender, "Gender", Gender::parse_loose)?,
            blood_type: stored_enum(&self.blood_type, "BloodType", BloodType::parse_loose)?,
            contact_phone: self.contact_phone,
            contact_email: self.contact_email,
            medical_history: decode_history(self.medical_history),
            doctor_assigned: self.doctor_assigned,
        })
    }
}
