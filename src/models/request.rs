use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use super::Client;

/// Body of `POST /clients`.
///
/// Fields are optional at the JSON level so that a missing field shows up as
/// a validation message instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewClientReq {
    #[validate(
        required(message = "must not be null"),
        length(min = 1, message = "must not be empty")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "must not be null"),
        length(min = 1, message = "must not be empty")
    )]
    pub surname: Option<String>,
    #[validate(
        required(message = "must not be null"),
        email(message = "must be a well-formed email address")
    )]
    pub email: Option<String>,
}

/// Body of `PUT /clients/{id}`. Absent or null fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ClientPatchReq {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub surname: Option<String>,
    #[validate(email(message = "must be a well-formed email address"))]
    pub email: Option<String>,
}

impl NewClientReq {
    /// Turn a validated request into an unsaved client.
    pub fn into_client(self) -> Client {
        Client::new(
            self.name.unwrap_or_default(),
            self.surname.unwrap_or_default(),
            self.email.unwrap_or_default(),
        )
    }
}

impl ClientPatchReq {
    /// Overwrite the fields present in the patch.
    pub fn apply_to(self, client: &mut Client) {
        if let Some(surname) = self.surname {
            client.surname = surname;
        }
        if let Some(name) = self.name {
            client.name = name;
        }
        if let Some(email) = self.email {
            client.email = email;
        }
    }
}

/// Run the field rules and render one `Field '<field>' <message>` line per
/// violation, ordered by field name.
pub fn field_errors<T: Validate>(payload: &T) -> Option<Vec<String>> {
    payload.validate().err().map(|errors| describe(&errors))
}

fn describe(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, violations)| {
            violations.iter().map(move |violation| {
                let message = violation
                    .message
                    .as_deref()
                    .unwrap_or(&*violation.code);
                format!("Field '{}' {}", field, message)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_req(name: &str, surname: &str, email: &str) -> NewClientReq {
        NewClientReq {
            name: Some(name.to_string()),
            surname: Some(surname.to_string()),
            email: Some(email.to_string()),
        }
    }

    #[test]
    fn valid_new_client_passes() {
        assert!(field_errors(&new_req("Ana", "Lopez", "ana@example.com")).is_none());
    }

    #[test]
    fn one_message_per_invalid_field() {
        let errors = field_errors(&new_req("", "Lopez", "not-an-email")).unwrap();
        assert_eq!(
            errors,
            vec![
                "Field 'email' must be a well-formed email address".to_string(),
                "Field 'name' must not be empty".to_string(),
            ]
        );
    }

    #[test]
    fn missing_fields_are_reported_on_create() {
        let errors = field_errors(&NewClientReq::default()).unwrap();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&"Field 'surname' must not be null".to_string()));
    }

    #[test]
    fn empty_patch_is_valid() {
        assert!(field_errors(&ClientPatchReq::default()).is_none());
    }

    #[test]
    fn patch_checks_present_fields() {
        let patch = ClientPatchReq {
            surname: Some(String::new()),
            email: Some("still-not-an-email".to_string()),
            ..ClientPatchReq::default()
        };
        let errors = field_errors(&patch).unwrap();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("Field 'email'"));
        assert!(errors[1].starts_with("Field 'surname'"));
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut client = Client {
            id: 3,
            name: "Ana".to_string(),
            surname: "Lopez".to_string(),
            email: "ana@example.com".to_string(),
            created_at: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        };
        let patch: ClientPatchReq =
            serde_json::from_str(r#"{"email":"ana.lopez@example.com","name":null}"#).unwrap();
        patch.apply_to(&mut client);

        assert_eq!(client.email, "ana.lopez@example.com");
        assert_eq!(client.name, "Ana");
        assert_eq!(client.surname, "Lopez");
        assert_eq!(client.id, 3);
    }
}
