//! Mutable credential draft that accumulates fields, then finalizes into an
//! immutable [`Credential`] record.
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use ssi::vc::{Credential, Issuer, DEFAULT_CONTEXT};
use thiserror::Error;

/// An error relating to credential assembly.
#[derive(Error, Debug)]
pub enum CredentialBuilderError {
    /// Template or partial credential is not a JSON object.
    #[error("Credential draft must be a JSON object.")]
    NotAnObject,
    /// Draft does not parse as a partial credential.
    #[error("Invalid partial credential: {0}")]
    InvalidPartial(serde_json::Error),
    /// Finalized draft does not form a valid credential record.
    #[error("Invalid credential: {0}")]
    InvalidCredential(serde_json::Error),
}

/// Builder for a W3C credential, usable from a partial JSON template.
///
/// Later writes of the same field override earlier ones.
#[derive(Debug, Clone)]
pub struct CredentialBuilder {
    draft: Map<String, Value>,
}

impl Default for CredentialBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialBuilder {
    /// Constructs a minimal credential skeleton.
    pub fn new() -> Self {
        let mut draft = Map::new();
        draft.insert("@context".to_string(), json!([DEFAULT_CONTEXT]));
        draft.insert("type".to_string(), json!(["VerifiableCredential"]));
        Self { draft }
    }

    /// Constructs a builder from a partial credential in JSON form, e.g. a
    /// stored template.
    pub fn from_partial(partial: &str) -> Result<Self, CredentialBuilderError> {
        let value: Value =
            serde_json::from_str(partial).map_err(CredentialBuilderError::InvalidPartial)?;
        match value {
            Value::Object(draft) => Ok(Self { draft }),
            _ => Err(CredentialBuilderError::NotAnObject),
        }
    }

    /// Attaches an explicit issuer record, replacing any present issuer.
    pub fn set_issuer(&mut self, issuer: &Issuer) -> &mut Self {
        self.draft.insert("issuer".to_string(), json!(issuer));
        self
    }

    /// Sets the issuer ID, preserving the extra properties of an issuer
    /// object if one is attached.
    pub fn set_issuer_id(&mut self, issuer_id: &str) -> &mut Self {
        match self.draft.get_mut("issuer") {
            Some(Value::Object(issuer)) => {
                issuer.insert("id".to_string(), json!(issuer_id));
            }
            _ => {
                self.draft.insert("issuer".to_string(), json!(issuer_id));
            }
        }
        self
    }

    pub fn set_id(&mut self, id: &str) -> &mut Self {
        self.draft.insert("id".to_string(), json!(id));
        self
    }

    pub fn set_issuance_date(&mut self, date: DateTime<Utc>) -> &mut Self {
        self.draft.insert("issuanceDate".to_string(), json!(date));
        self
    }

    pub fn set_issued(&mut self, date: DateTime<Utc>) -> &mut Self {
        self.draft.insert("issued".to_string(), json!(date));
        self
    }

    pub fn set_valid_from(&mut self, date: DateTime<Utc>) -> &mut Self {
        self.draft.insert("validFrom".to_string(), json!(date));
        self
    }

    pub fn set_expiration_date(&mut self, date: DateTime<Utc>) -> &mut Self {
        self.draft.insert("expirationDate".to_string(), json!(date));
        self
    }

    /// Sets the subject ID on the credential subject, or on each subject if
    /// the draft carries several.
    pub fn set_subject_id(&mut self, subject_id: &str) -> &mut Self {
        match self.draft.get_mut("credentialSubject") {
            Some(Value::Object(subject)) => {
                subject.insert("id".to_string(), json!(subject_id));
            }
            Some(Value::Array(subjects)) => {
                for subject in subjects.iter_mut() {
                    if let Value::Object(subject) = subject {
                        subject.insert("id".to_string(), json!(subject_id));
                    }
                }
            }
            _ => {
                self.draft.insert(
                    "credentialSubject".to_string(),
                    json!({ "id": subject_id }),
                );
            }
        }
        self
    }

    /// Sets an arbitrary top-level property, e.g. from a data provider.
    pub fn set_property(&mut self, key: &str, value: Value) -> &mut Self {
        self.draft.insert(key.to_string(), value);
        self
    }

    /// Finalizes the draft into an immutable credential record.
    pub fn build(self) -> Result<Credential, CredentialBuilderError> {
        serde_json::from_value(Value::Object(self.draft))
            .map_err(CredentialBuilderError::InvalidCredential)
    }
}
