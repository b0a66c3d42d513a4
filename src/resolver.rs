//! DID document loading and verification method selection.
use async_trait::async_trait;
use ssi::did::{Document, VerificationMethod};
use ssi::did_resolve::{DIDResolver, ResolutionInputMetadata};
use thiserror::Error;

/// An error relating to DID document loading.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DidLoaderError {
    /// DID does not exist.
    #[error("DID: {0} does not exist.")]
    NonExistentDid(String),
    /// DID is not found.
    #[error("DID: {0} is not found.")]
    DidNotFound(String),
    /// Cannot connect to the DID resolution endpoint.
    #[error("Cannot connect to DID resolution endpoint.")]
    ConnectionFailure,
    /// Resolution failed with an unhandled error.
    #[error("DID resolution failure: {0}")]
    ResolutionFailure(String),
}

/// Loads DID documents for issuer DIDs.
#[async_trait]
pub trait DidLoader: Send + Sync {
    async fn load(&self, did: &str) -> Result<Document, DidLoaderError>;
}

/// Adapter making any [`DIDResolver`] usable as a [`DidLoader`].
pub struct DidResolverLoader<T: DIDResolver + Send + Sync> {
    resolver: T,
}

impl<T: DIDResolver + Send + Sync> DidResolverLoader<T> {
    pub fn new(resolver: T) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl<T: DIDResolver + Send + Sync> DidLoader for DidResolverLoader<T> {
    async fn load(&self, did: &str) -> Result<Document, DidLoaderError> {
        let (res_meta, doc, _doc_meta) = self
            .resolver
            .resolve(did, &ResolutionInputMetadata::default())
            .await;

        // Handle error cases based on string content of the resolution metadata.
        if let Some(err) = res_meta.error {
            if err.starts_with("Error sending HTTP request") {
                return Err(DidLoaderError::ConnectionFailure);
            } else if err == "invalidDid" {
                return Err(DidLoaderError::NonExistentDid(did.to_string()));
            } else if err == "notFound" {
                return Err(DidLoaderError::DidNotFound(did.to_string()));
            }
            return Err(DidLoaderError::ResolutionFailure(err));
        }
        doc.ok_or_else(|| DidLoaderError::DidNotFound(did.to_string()))
    }
}

/// Selects the ID of the verification method to sign with.
///
/// The candidate list is chosen by proof purpose; any purpose other than the
/// five verification relationships falls back to the document's general
/// `verificationMethod` list. Within the list, the first entry matching
/// `requested` wins, or simply the first entry when no method was requested.
/// Returns `None` when the list is empty or nothing matches; callers degrade
/// to the requested ID rather than failing.
pub fn resolve_verification_method(
    doc: &Document,
    proof_purpose: &str,
    requested: Option<&str>,
) -> Option<String> {
    let candidates = match proof_purpose {
        "assertionMethod" => &doc.assertion_method,
        "authentication" => &doc.authentication,
        "capabilityDelegation" => &doc.capability_delegation,
        "capabilityInvocation" => &doc.capability_invocation,
        "keyAgreement" => &doc.key_agreement,
        _ => &doc.verification_method,
    };
    candidates
        .iter()
        .flatten()
        .map(|vm: &VerificationMethod| vm.get_id(&doc.id))
        .find(|id| requested.map_or(true, |requested| id == requested))
}
