//! Proof configuration: the cryptographic and metadata parameters of an issuance request.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An error relating to proof configuration parameters.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProofConfigError {
    /// DID does not conform to DID syntax.
    #[error("Malformed DID: {0}")]
    MalformedDid(String),
}

/// Selector for the signing backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofType {
    #[serde(rename = "JWT")]
    Jwt,
    #[default]
    #[serde(rename = "LD_PROOF")]
    LdProof,
}

/// Issuance profile selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Ecosystem {
    #[default]
    Default,
    Essif,
    Gaiax,
    Iota,
}

/// Signature suite selector for linked-data proofs, serialized as the suite name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LdSignatureType {
    Ed25519Signature2018,
    Ed25519Signature2020,
    EcdsaSecp256k1Signature2019,
    RsaSignature2018,
    JsonWebSignature2020,
    JcsEd25519Signature2020,
}

impl LdSignatureType {
    /// The suite name as it appears in a proof's `type` field.
    pub fn suite_name(&self) -> &'static str {
        match self {
            LdSignatureType::Ed25519Signature2018 => "Ed25519Signature2018",
            LdSignatureType::Ed25519Signature2020 => "Ed25519Signature2020",
            LdSignatureType::EcdsaSecp256k1Signature2019 => "EcdsaSecp256k1Signature2019",
            LdSignatureType::RsaSignature2018 => "RsaSignature2018",
            LdSignatureType::JsonWebSignature2020 => "JsonWebSignature2020",
            LdSignatureType::JcsEd25519Signature2020 => "JcsEd25519Signature2020",
        }
    }
}

/// Parameters controlling how, and with which key, a credential is signed.
///
/// A caller constructs a partial `ProofConfig` (only `issuer_did` is required);
/// the signatory completes it before signing. Optional fields absent from a
/// request are omitted from its JSON representation. `creator` defaults to
/// `issuer_did` on every construction path, including deserialization; only
/// an explicit null clears it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawProofConfig")]
pub struct ProofConfig {
    pub issuer_did: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_did: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verifier_did: Option<String>,
    /// DID URL of the signing key; if `None` the issuer's default key is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_verification_method: Option<String>,
    #[serde(default)]
    pub proof_type: ProofType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
    /// Issue date from the request, or current system time if `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<DateTime<Utc>>,
    /// Valid date from the request, or current system time if `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
    /// Opaque key for mapping data sets from a custom data provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_provider_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ld_signature_type: Option<LdSignatureType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(default)]
    pub ecosystem: Ecosystem,
}

impl ProofConfig {
    /// Constructs a partial proof config for the given issuer DID, with
    /// `creator` defaulted to the issuer DID.
    pub fn new(issuer_did: &str) -> Self {
        Self {
            issuer_did: issuer_did.to_owned(),
            subject_did: None,
            verifier_did: None,
            issuer_verification_method: None,
            proof_type: ProofType::default(),
            domain: None,
            nonce: None,
            proof_purpose: None,
            credential_id: None,
            issue_date: None,
            valid_date: None,
            expiration_date: None,
            data_provider_identifier: None,
            ld_signature_type: None,
            creator: Some(issuer_did.to_owned()),
            ecosystem: Ecosystem::default(),
        }
    }
}

/// Deserialization shadow distinguishing an absent `creator` key (defaulted
/// to the issuer DID) from an explicit null (left cleared).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProofConfig {
    issuer_did: String,
    subject_did: Option<String>,
    verifier_did: Option<String>,
    issuer_verification_method: Option<String>,
    #[serde(default)]
    proof_type: ProofType,
    domain: Option<String>,
    nonce: Option<String>,
    proof_purpose: Option<String>,
    credential_id: Option<String>,
    issue_date: Option<DateTime<Utc>>,
    valid_date: Option<DateTime<Utc>>,
    expiration_date: Option<DateTime<Utc>>,
    data_provider_identifier: Option<String>,
    ld_signature_type: Option<LdSignatureType>,
    #[serde(default, deserialize_with = "creator_present")]
    creator: Option<Option<String>>,
    #[serde(default)]
    ecosystem: Ecosystem,
}

fn creator_present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

impl From<RawProofConfig> for ProofConfig {
    fn from(raw: RawProofConfig) -> Self {
        let creator = match raw.creator {
            Some(creator) => creator,
            None => Some(raw.issuer_did.clone()),
        };
        Self {
            issuer_did: raw.issuer_did,
            subject_did: raw.subject_did,
            verifier_did: raw.verifier_did,
            issuer_verification_method: raw.issuer_verification_method,
            proof_type: raw.proof_type,
            domain: raw.domain,
            nonce: raw.nonce,
            proof_purpose: raw.proof_purpose,
            credential_id: raw.credential_id,
            issue_date: raw.issue_date,
            valid_date: raw.valid_date,
            expiration_date: raw.expiration_date,
            data_provider_identifier: raw.data_provider_identifier,
            ld_signature_type: raw.ld_signature_type,
            creator,
            ecosystem: raw.ecosystem,
        }
    }
}

/// Extracts the method name from a DID, failing on malformed DID syntax.
pub fn did_method(did: &str) -> Result<&str, ProofConfigError> {
    let mut parts = did.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("did"), Some(method), Some(id))
            if !method.is_empty()
                && method
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
                && !id.is_empty() =>
        {
            Ok(method)
        }
        _ => Err(ProofConfigError::MalformedDid(did.to_owned())),
    }
}

/// The fixed DID method to signature suite defaulting table. Methods absent
/// from the table yield no default.
pub fn default_ld_signature_type(did: &str) -> Result<Option<LdSignatureType>, ProofConfigError> {
    match did_method(did)? {
        "iota" => Ok(Some(LdSignatureType::JcsEd25519Signature2020)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_did_method() {
        assert_eq!(did_method("did:example:123").unwrap(), "example");
        assert_eq!(did_method("did:key:z6MkhaXg").unwrap(), "key");
        assert_eq!(
            did_method("did:ion:test:EiAtHHKFJWAk5AsM3tgCut3OiBY4ekHTf66AAjoysXL65Q").unwrap(),
            "ion"
        );
    }

    #[test]
    fn test_did_method_malformed() {
        for did in ["", "did:", "did::", "did:example:", "not-a-did", "did:EXAMPLE:123"] {
            assert_eq!(
                did_method(did),
                Err(ProofConfigError::MalformedDid(did.to_string()))
            );
        }
    }

    #[test]
    fn test_default_ld_signature_type() {
        assert_eq!(
            default_ld_signature_type("did:iota:abc").unwrap(),
            Some(LdSignatureType::JcsEd25519Signature2020)
        );
        assert_eq!(default_ld_signature_type("did:example:123").unwrap(), None);
        assert!(default_ld_signature_type("example:123").is_err());
    }

    #[test]
    fn test_new_defaults_creator() {
        let config = ProofConfig::new("did:example:123");
        assert_eq!(config.creator.as_deref(), Some("did:example:123"));
        assert_eq!(config.proof_type, ProofType::LdProof);
        assert_eq!(config.ecosystem, Ecosystem::Default);
    }

    #[test]
    fn test_serialize_omits_absent_fields() {
        let config = ProofConfig::new("did:example:123");
        let value = serde_json::to_value(&config).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map["issuerDid"], "did:example:123");
        assert_eq!(map["proofType"], "LD_PROOF");
        assert_eq!(map["ecosystem"], "DEFAULT");
        assert!(!map.contains_key("subjectDid"));
        assert!(!map.contains_key("credentialId"));
        assert!(!map.contains_key("expirationDate"));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ProofConfig = serde_json::from_str(
            r#"{"issuerDid": "did:example:123", "proofType": "JWT", "subjectDid": "did:example:456"}"#,
        )
        .unwrap();
        assert_eq!(config.proof_type, ProofType::Jwt);
        assert_eq!(config.subject_did.as_deref(), Some("did:example:456"));
        // An absent creator key defaults to the issuer DID.
        assert_eq!(config.creator.as_deref(), Some("did:example:123"));
    }

    #[test]
    fn test_deserialize_creator() {
        // Explicit null clears the creator.
        let config: ProofConfig =
            serde_json::from_str(r#"{"issuerDid": "did:example:123", "creator": null}"#).unwrap();
        assert_eq!(config.creator, None);

        // An explicit creator is preserved.
        let config: ProofConfig = serde_json::from_str(
            r#"{"issuerDid": "did:example:123", "creator": "did:example:789"}"#,
        )
        .unwrap();
        assert_eq!(config.creator.as_deref(), Some("did:example:789"));
    }
}
