//! Signing backends and the proof-type dispatcher.
use crate::proof_config::{LdSignatureType, ProofConfig, ProofType};
use async_trait::async_trait;
use ssi::did::VerificationRelationship;
use ssi::did_resolve::DIDResolver;
use ssi::jsonld::ContextLoader;
use ssi::jwk::JWK;
use ssi::ldp::ProofSuiteType;
use ssi::vc::{Credential, LinkedDataProofOptions, URI};
use thiserror::Error;

/// An error relating to a signing backend.
#[derive(Error, Debug)]
pub enum SignerError {
    /// Credential to be signed does not parse.
    #[error("Malformed credential: {0}")]
    MalformedCredential(serde_json::Error),
    /// Signature suite is not supported by the backend.
    #[error("Unsupported signature suite: {0}")]
    UnsupportedSignatureSuite(String),
    /// Proof generation failed.
    #[error("Signing failure: {0}")]
    SigningFailure(String),
}

/// A signature backend: takes a serialized credential and a completed proof
/// config and returns the signed credential string.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProofSigner: Send + Sync {
    async fn sign(&self, credential_json: &str, config: &ProofConfig)
        -> Result<String, SignerError>;
}

/// Routes an assembled credential to the signature backend selected by the
/// proof type. Stateless.
pub struct SignerDispatcher {
    ld_proof: Box<dyn ProofSigner>,
    jwt: Box<dyn ProofSigner>,
}

impl SignerDispatcher {
    pub fn new(ld_proof: Box<dyn ProofSigner>, jwt: Box<dyn ProofSigner>) -> Self {
        Self { ld_proof, jwt }
    }

    pub async fn sign(
        &self,
        credential_json: &str,
        config: &ProofConfig,
    ) -> Result<String, SignerError> {
        match config.proof_type {
            ProofType::LdProof => self.ld_proof.sign(credential_json, config).await,
            ProofType::Jwt => self.jwt.sign(credential_json, config).await,
        }
    }
}

fn verification_relationship(proof_purpose: &str) -> Option<VerificationRelationship> {
    match proof_purpose {
        "assertionMethod" => Some(VerificationRelationship::AssertionMethod),
        "authentication" => Some(VerificationRelationship::Authentication),
        "capabilityDelegation" => Some(VerificationRelationship::CapabilityDelegation),
        "capabilityInvocation" => Some(VerificationRelationship::CapabilityInvocation),
        "keyAgreement" => Some(VerificationRelationship::KeyAgreement),
        _ => None,
    }
}

fn proof_suite(ld_signature_type: LdSignatureType) -> Result<ProofSuiteType, SignerError> {
    let name = ld_signature_type.suite_name();
    serde_json::from_value(serde_json::Value::String(name.to_string()))
        .map_err(|_| SignerError::UnsupportedSignatureSuite(name.to_string()))
}

fn linked_data_proof_options(
    config: &ProofConfig,
    suite: Option<ProofSuiteType>,
) -> LinkedDataProofOptions {
    LinkedDataProofOptions {
        type_: suite,
        verification_method: config
            .issuer_verification_method
            .as_ref()
            .map(|method| URI::String(method.clone())),
        proof_purpose: config
            .proof_purpose
            .as_deref()
            .and_then(verification_relationship),
        domain: config.domain.clone(),
        challenge: config.nonce.clone(),
        ..Default::default()
    }
}

/// Linked-data-proof backend over a signing key and a DID resolver.
///
/// The signature suite comes from the config's `ld_signature_type`; when the
/// config carries none, the suite is inferred from the signing key.
pub struct LdProofSigner<T: DIDResolver + Send + Sync> {
    signing_key: JWK,
    resolver: T,
}

impl<T: DIDResolver + Send + Sync> LdProofSigner<T> {
    pub fn new(signing_key: JWK, resolver: T) -> Self {
        Self {
            signing_key,
            resolver,
        }
    }
}

#[async_trait]
impl<T: DIDResolver + Send + Sync> ProofSigner for LdProofSigner<T> {
    async fn sign(
        &self,
        credential_json: &str,
        config: &ProofConfig,
    ) -> Result<String, SignerError> {
        let mut credential: Credential =
            serde_json::from_str(credential_json).map_err(SignerError::MalformedCredential)?;
        let suite = config.ld_signature_type.map(proof_suite).transpose()?;
        let options = linked_data_proof_options(config, suite);

        let proof = credential
            .generate_proof(
                &self.signing_key,
                &options,
                &self.resolver,
                &mut ContextLoader::default(),
            )
            .await
            .map_err(|e| SignerError::SigningFailure(e.to_string()))?;
        credential.add_proof(proof);
        serde_json::to_string(&credential).map_err(SignerError::MalformedCredential)
    }
}

/// JWT backend over a signing key and a DID resolver, producing a credential
/// in compact JWS form.
pub struct JwtProofSigner<T: DIDResolver + Send + Sync> {
    signing_key: JWK,
    resolver: T,
}

impl<T: DIDResolver + Send + Sync> JwtProofSigner<T> {
    pub fn new(signing_key: JWK, resolver: T) -> Self {
        Self {
            signing_key,
            resolver,
        }
    }
}

#[async_trait]
impl<T: DIDResolver + Send + Sync> ProofSigner for JwtProofSigner<T> {
    async fn sign(
        &self,
        credential_json: &str,
        config: &ProofConfig,
    ) -> Result<String, SignerError> {
        let credential: Credential =
            serde_json::from_str(credential_json).map_err(SignerError::MalformedCredential)?;
        let mut options = linked_data_proof_options(config, None);
        // These two have no JWT claim encoding; `generate_jwt` rejects them.
        options.checks = None;
        options.created = None;

        credential
            .generate_jwt(Some(&self.signing_key), &options, &self.resolver)
            .await
            .map_err(|e| SignerError::SigningFailure(e.to_string()))
    }
}
