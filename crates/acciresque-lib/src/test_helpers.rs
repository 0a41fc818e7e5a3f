// Fixture builders shared by this crate's tests and, through the
// `test-utils` feature, by the service crates.
#![allow(dead_code)]

use serde_json::{json, Value};

use crate::model::{
    Accident, AccidentDocument, Ambulance, Contact, Hospital, Insurance, MedicalRecord, Police,
    Vehicle,
};

/// The reference accident used across the test suites, as raw JSON.
pub fn sample_accident_json() -> Value {
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

/// Builder to create `Accident` instances in tests with sensible defaults.
pub struct AccidentBuilder {
    accident: Accident,
}

impl AccidentBuilder {
    /// Starts from the same record as [`sample_accident_json`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            accident: Accident {
                accident_id: Some("a1".into()),
                location: Some("Main St".into()),
                timestamp: Some(1_690_000_000_i64.into()),
                police: Police {
                    police_id: Some("p1".into()),
                    station: Some("S1".into()),
                },
                insurance: Insurance {
                    insurance_id: Some("i1".into()),
                    provider: Some("Acme".into()),
                },
                ambulance: Ambulance {
                    ambulance_id: Some("am1".into()),
                    location: Some("X".into()),
                },
                medical_record: MedicalRecord {
                    hospital_id: Some("h1".into()),
                    name: Some("N".into()),
                    medical_records: Some(Vec::new()),
                },
                hospital: Hospital {
                    hospital_id: Some("h1".into()),
                    name: Some("Gen".into()),
                    location: Some("Y".into()),
                },
                vehicle: Vehicle {
                    vehicle_id: Some("v1".into()),
                    registration: Some("R1".into()),
                },
                contact: Contact {
                    contact_id: Some("c1".into()),
                    name: Some("Bob".into()),
                    phone_number: Some("555".into()),
                    relationship: Some("spouse".into()),
                },
            },
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.accident.accident_id = Some(id.to_string());
        self
    }

    pub fn without_id(mut self) -> Self {
        self.accident.accident_id = None;
        self
    }

    pub fn location(mut self, location: &str) -> Self {
        self.accident.location = Some(location.into());
        self
    }

    pub fn without_location(mut self) -> Self {
        self.accident.location = None;
        self
    }

    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.accident.timestamp = Some(timestamp.into());
        self
    }

    pub fn contact(mut self, name: &str, phone_number: &str) -> Self {
        self.accident.contact.name = Some(name.into());
        self.accident.contact.phone_number = Some(phone_number.into());
        self
    }

    pub fn medical_records(mut self, records: Vec<Value>) -> Self {
        self.accident.medical_record.medical_records = Some(records);
        self
    }

    pub fn build(self) -> Accident {
        self.accident
    }

    pub fn build_document(self) -> AccidentDocument {
        self.accident.into()
    }

    pub fn build_json(self) -> Value {
        serde_json::to_value(&self.accident).unwrap_or(Value::Null)
    }
}

impl Default for AccidentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
