//! Accident data model and the canonical reshaping transform.
//!
//! Two shapes exist for the same record:
//!
//! - [`AccidentDocument`]: what arrives from a caller or from the store.
//!   Every sub-record is optional so a missing one is a typed absence rather
//!   than a deserialization failure.
//! - [`Accident`]: the canonical representation. All seven sub-records are
//!   present; leaf fields may still be absent and are then omitted from JSON.
//!
//! [`AccidentDocument::into_accident`] is the single transform shared by all
//! five operations. Unknown members are dropped on the way through.
//!
//! Leaf values are [`Scalar`]s: a string, number or boolean is carried
//! through as sent. Only objects and arrays in a leaf position are rejected.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A leaf value, kept in whatever JSON scalar form it arrived in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(Number),
    Bool(bool),
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n.into())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Police {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub police_id: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insurance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_id: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ambulance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambulance_id: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Scalar>,
}

/// Medical record summary. `medical_records` is passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital_id: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_records: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital_id: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<Scalar>,
}

/// Canonical accident representation returned to callers and sent to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accident {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accident_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Number>,
    pub police: Police,
    pub insurance: Insurance,
    pub ambulance: Ambulance,
    pub medical_record: MedicalRecord,
    pub hospital: Hospital,
    pub vehicle: Vehicle,
    pub contact: Contact,
}

/// Loosely-shaped accident as received from a caller or the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccidentDocument {
    pub accident_id: Option<String>,
    pub location: Option<Scalar>,
    pub timestamp: Option<Number>,
    pub police: Option<Police>,
    pub insurance: Option<Insurance>,
    pub ambulance: Option<Ambulance>,
    pub medical_record: Option<MedicalRecord>,
    pub hospital: Option<Hospital>,
    pub vehicle: Option<Vehicle>,
    pub contact: Option<Contact>,
}

/// A required sub-record was absent from a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingSubRecord(pub &'static str);

impl fmt::Display for MissingSubRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required sub-record '{}'", self.0)
    }
}

impl std::error::Error for MissingSubRecord {}

fn require<T>(value: Option<T>, name: &'static str) -> Result<T, MissingSubRecord> {
    value.ok_or(MissingSubRecord(name))
}

impl AccidentDocument {
    /// Reshape into the canonical form, failing on the first missing sub-record.
    pub fn into_accident(self) -> Result<Accident, MissingSubRecord> {
        Ok(Accident {
            accident_id: self.accident_id,
            location: self.location,
            timestamp: self.timestamp,
            police: require(self.police, "police")?,
            insurance: require(self.insurance, "insurance")?,
            ambulance: require(self.ambulance, "ambulance")?,
            medical_record: require(self.medical_record, "medicalRecord")?,
            hospital: require(self.hospital, "hospital")?,
            vehicle: require(self.vehicle, "vehicle")?,
            contact: require(self.contact, "contact")?,
        })
    }
}

impl From<Accident> for AccidentDocument {
    fn from(accident: Accident) -> Self {
        Self {
            accident_id: accident.accident_id,
            location: accident.location,
            timestamp: accident.timestamp,
            police: Some(accident.police),
            insurance: Some(accident.insurance),
            ambulance: Some(accident.ambulance),
            medical_record: Some(accident.medical_record),
            hospital: Some(accident.hospital),
            vehicle: Some(accident.vehicle),
            contact: Some(accident.contact),
        }
    }
}

/// Reply to a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAccident {
    pub accident_id: String,
}

/// Reply to an update or delete: the store's success flag, verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_document() -> Value {
        json!({
            "accidentId": "a1",
            "location": "Main St",
            "timestamp": 1690000000,
            "police": {"policeId": "p1", "station": "S1"},
            "insurance": {"insuranceId": "i1", "provider": "Acme"},
            "ambulance": {"ambulanceId": "am1", "location": "X"},
            "medicalRecord": {"hospitalId": "h1", "name": "N", "medicalRecords": []},
            "hospital": {"hospitalId": "h1", "name": "Gen", "location": "Y"},
            "vehicle": {"vehicleId": "v1", "registration": "R1"},
            "contact": {"contactId": "c1", "name": "Bob", "phoneNumber": "555", "relationship": "spouse"}
        })
    }

    #[test]
    fn transform_preserves_every_listed_field() {
        let doc: AccidentDocument = serde_json::from_value(full_document()).unwrap();
        let accident = doc.into_accident().expect("all sub-records present");
        let round = serde_json::to_value(&accident).unwrap();
        assert_eq!(round, full_document());
    }

    #[test]
    fn transform_reports_missing_sub_record_by_wire_name() {
        let mut value = full_document();
        value.as_object_mut().unwrap().remove("medicalRecord");
        let doc: AccidentDocument = serde_json::from_value(value).unwrap();

        let err = doc.into_accident().unwrap_err();
        assert_eq!(err, MissingSubRecord("medicalRecord"));
        assert!(err.to_string().contains("medicalRecord"));
    }

    #[test]
    fn null_sub_record_counts_as_missing() {
        let mut value = full_document();
        value["vehicle"] = Value::Null;
        let doc: AccidentDocument = serde_json::from_value(value).unwrap();
        assert_eq!(doc.into_accident().unwrap_err(), MissingSubRecord("vehicle"));
    }

    #[test]
    fn unknown_members_are_dropped() {
        let mut value = full_document();
        value["extra"] = json!("ignored");
        value["police"]["badge"] = json!(42);
        let doc: AccidentDocument = serde_json::from_value(value).unwrap();
        let out = serde_json::to_value(doc.into_accident().unwrap()).unwrap();

        assert!(out.get("extra").is_none());
        assert!(out["police"].get("badge").is_none());
    }

    #[test]
    fn absent_leaves_are_omitted() {
        let doc: AccidentDocument = serde_json::from_value(json!({
            "police": {}, "insurance": {}, "ambulance": {}, "medicalRecord": {},
            "hospital": {}, "vehicle": {}, "contact": {"name": "Ann"}
        }))
        .unwrap();
        let out = serde_json::to_value(doc.into_accident().unwrap()).unwrap();

        assert!(out.get("accidentId").is_none());
        assert!(out.get("timestamp").is_none());
        assert_eq!(out["police"], json!({}));
        assert_eq!(out["contact"], json!({"name": "Ann"}));
    }

    #[test]
    fn scalar_leaves_keep_their_json_type() {
        let mut value = full_document();
        value["timestamp"] = json!(1690000000.5);
        value["police"]["policeId"] = json!(17);
        value["contact"]["phoneNumber"] = json!(555);
        value["vehicle"]["registration"] = json!(true);

        let doc: AccidentDocument = serde_json::from_value(value.clone()).unwrap();
        let accident = doc.into_accident().unwrap();
        assert_eq!(accident.contact.phone_number, Some(Scalar::from(555_i64)));
        assert_eq!(serde_json::to_value(&accident).unwrap(), value);
    }

    #[test]
    fn structured_leaf_is_rejected() {
        let mut value = full_document();
        value["police"]["station"] = json!({"name": "S1"});
        assert!(serde_json::from_value::<AccidentDocument>(value).is_err());
    }

    #[test]
    fn write_outcome_omits_missing_flag() {
        let json = serde_json::to_string(&WriteOutcome { success: None }).unwrap();
        assert_eq!(json, "{}");
        let json = serde_json::to_string(&WriteOutcome {
            success: Some(true),
        })
        .unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }

    #[test]
    fn created_accident_uses_camel_case() {
        let json = serde_json::to_string(&CreatedAccident {
            accident_id: "a1".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"accidentId":"a1"}"#);
    }
}
