use serde::{Deserialize, Serialize};
use validator::Validate;

/// Patient demographics as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Patient {
    /// One-line label used in search suggestions, e.g. `ID: 7 • 54y • Female`.
    pub fn suggestion_label(&self) -> String {
        let mut parts = vec![format!("ID: {}", self.id)];
        if let Some(age) = self.age {
            parts.push(format!("{}y", age));
        }
        if let Some(gender) = self.gender.as_deref().filter(|g| !g.is_empty()) {
            parts.push(gender.to_string());
        }
        parts.join(" • ")
    }
}

/// Registration form submitted to `/patients/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewPatient {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(range(max = 150))]
    pub age: u32,
    pub gender: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_patient_with_missing_optionals() {
        let patient: Patient =
            serde_json::from_str(r#"{"id": 3, "name": "Diana Prince", "age": 41, "gender": "Female", "contact_info": null}"#)
                .unwrap();
        assert_eq!(patient.id, 3);
        assert_eq!(patient.age, Some(41));
        assert_eq!(patient.contact_info, None);
        assert_eq!(patient.address, None);
    }

    #[test]
    fn suggestion_label_skips_unknown_fields() {
        let patient = Patient {
            id: 7,
            name: "John Doe".into(),
            age: Some(54),
            gender: None,
            contact_info: None,
            address: None,
        };
        assert_eq!(patient.suggestion_label(), "ID: 7 • 54y");
    }

    #[test]
    fn registration_requires_a_name() {
        let form = NewPatient {
            name: String::new(),
            age: 30,
            gender: "Male".into(),
            contact: String::new(),
            address: String::new(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn registration_serializes_contact_field_name() {
        let form = NewPatient {
            name: "Jane Roe".into(),
            age: 29,
            gender: "Female".into(),
            contact: "+1 234 567 8900".into(),
            address: "123 Health St".into(),
        };
        assert!(form.validate().is_ok());
        let body = serde_json::to_value(&form).unwrap();
        assert_eq!(body["contact"], "+1 234 567 8900");
        assert_eq!(body["age"], 29);
    }
}
