use serde::{Deserialize, Deserializer, Serialize};

use super::enums::{BloodType, Gender};

/// A stored patient record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub blood_type: BloodType,
    pub contact_phone: String,
    pub contact_email: Option<String>,
    pub medical_history: Option<Vec<String>>,
    pub doctor_assigned: String,
}

/// A validated patient ready to be inserted. The id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatient {
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub blood_type: BloodType,
    pub contact_phone: String,
    pub contact_email: Option<String>,
    pub medical_history: Option<Vec<String>>,
    pub doctor_assigned: String,
}

/// A validated partial update. `None` leaves the stored value untouched.
///
/// The nullable columns use `Option<Option<_>>`: `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientChanges {
    pub name: Option<String>,
    pub age: Option<u8>,
    pub gender: Option<Gender>,
    pub blood_type: Option<BloodType>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<Option<String>>,
    pub medical_history: Option<Option<Vec<String>>>,
    pub doctor_assigned: Option<String>,
}

impl PatientChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.blood_type.is_none()
            && self.contact_phone.is_none()
            && self.contact_email.is_none()
            && self.medical_history.is_none()
            && self.doctor_assigned.is_none()
    }
}

/// Create request body as received from clients, before validation.
///
/// Older dashboard builds send `Medical_History` / `Doctor_Assigned`.
#[derive(Debug, Clone, Deserialize)]
pub struct PatientPayload {
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub blood_type: String,
    pub contact_phone: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default, alias = "Medical_History")]
    pub medical_history: Option<Vec<String>>,
    #[serde(alias = "Doctor_Assigned")]
    pub doctor_assigned: String,
}

/// Update request body. Every field is optional; absent fields are not modified.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub blood_type: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub contact_email: Option<Option<String>>,
    #[serde(
        default,
        alias = "Medical_History",
        deserialize_with = "deserialize_double_option"
    )]
    pub medical_history: Option<Option<Vec<String>>>,
    #[serde(default, alias = "Doctor_Assigned")]
    pub doctor_assigned: Option<String>,
}

// Only called when the key is present: `null` => Some(None), value => Some(Some(v)).
fn deserialize_double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
