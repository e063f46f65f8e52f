use serde::{Deserialize, Serialize};

/// One contact-form submission. Transient: built per attempt, never stored.
///
/// Fields default to empty on deserialization so that an absent field and an
/// empty field are rejected the same way (`400 Missing fields`) instead of
/// failing JSON extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub message: String,

    #[serde(
        rename = "cf-turnstile-response",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub turnstile_token: Option<String>,
}

impl ContactForm {
    /// Presence check only. Format and length rules are the submission
    /// controller's responsibility. Fields are trimmed first, so
    /// whitespace-only input does not count as present.
    pub fn has_required_fields(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.message.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_deserialize_as_empty() {
        let form: ContactForm = serde_json::from_str(r#"{"name":"Jane"}"#).unwrap();
        assert_eq!(form.name, "Jane");
        assert!(form.email.is_empty());
        assert!(form.message.is_empty());
        assert!(form.turnstile_token.is_none());
    }

    #[test]
    fn turnstile_token_uses_the_widget_field_name() {
        let form: ContactForm = serde_json::from_str(
            r#"{"name":"a","email":"b","message":"c","cf-turnstile-response":"tok"}"#,
        )
        .unwrap();
        assert_eq!(form.turnstile_token.as_deref(), Some("tok"));

        let wire = serde_json::to_value(&form).unwrap();
        assert_eq!(wire["cf-turnstile-response"], "tok");
    }

    #[test]
    fn token_field_is_omitted_from_payload_when_absent() {
        let form = ContactForm {
            name: "a".into(),
            email: "b".into(),
            message: "c".into(),
            turnstile_token: None,
        };
        let wire = serde_json::to_value(&form).unwrap();
        assert!(wire.get("cf-turnstile-response").is_none());
    }

    #[test]
    fn whitespace_only_fields_do_not_count_as_present() {
        let form = ContactForm {
            name: "Jane".into(),
            email: "jane@example.com".into(),
            message: "   ".into(),
            turnstile_token: None,
        };
        assert!(!form.has_required_fields());
    }
}
