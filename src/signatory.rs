//! Proof-config completion and the issuance orchestrator.
use crate::builder::{CredentialBuilder, CredentialBuilderError};
use crate::config::SignatoryConfig;
use crate::proof_config::{
    default_ld_signature_type, did_method, ProofConfig, ProofConfigError,
};
use crate::provider::{CredentialDataProvider, DataProviderError};
use crate::resolver::{resolve_verification_method, DidLoader};
use crate::signer::{SignerDispatcher, SignerError};
use crate::store::{CredentialStore, CredentialStoreItem, StoreError};
use crate::template::{TemplateError, TemplateRegistry};
use crate::CREDENTIAL_GROUP;
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use ssi::vc::{Credential, CredentialOrJWT, Issuer};
use std::fs;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// An error relating to credential issuance.
#[derive(Error, Debug)]
pub enum SignatoryError {
    /// Issuer DID does not conform to DID syntax.
    #[error("Invalid issuer DID: {0}")]
    InvalidIssuerDid(#[from] ProofConfigError),
    /// Template file exists but cannot be read.
    #[error("Error reading template file: {0}")]
    TemplateFileRead(std::io::Error),
    /// Wrapped error for the template registry.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    /// Wrapped error for credential assembly.
    #[error("Credential assembly error: {0}")]
    Builder(#[from] CredentialBuilderError),
    /// Wrapped error for the data provider hook.
    #[error("Data provider error: {0}")]
    DataProvider(#[from] DataProviderError),
    /// Assembled credential cannot be serialized for signing.
    #[error("Credential serialization error: {0}")]
    Serialization(serde_json::Error),
    /// Wrapped error for the signing backends.
    #[error("Signing error: {0}")]
    Signer(#[from] SignerError),
    /// Wrapped error for the credential store. The credential was signed
    /// before the write failed; re-storing under the same ID is safe.
    #[error("Credential store error: {0}")]
    Store(#[from] StoreError),
}

fn fresh_urn() -> String {
    format!("urn:uuid:{}", Uuid::new_v4())
}

/// Completes a partial proof config into a fully-specified copy.
///
/// The verification method is selected from the issuer's DID document by
/// proof purpose (defaulting to `assertionMethod` for the lookup only; the
/// stored `proof_purpose` field is not mutated). Resolution failures degrade
/// to the requested method ID. Absent credential ID, issue date, valid date
/// and signature suite get generated or derived defaults; fields already
/// present are never re-generated. The input is not mutated.
pub async fn complete_proof_config<L: DidLoader>(
    loader: &L,
    partial: &ProofConfig,
) -> Result<ProofConfig, SignatoryError> {
    // Malformed issuer DID syntax is fatal before any lookup.
    did_method(&partial.issuer_did)?;

    let purpose = partial.proof_purpose.as_deref().unwrap_or("assertionMethod");
    let issuer_verification_method = match loader.load(&partial.issuer_did).await {
        Ok(doc) => resolve_verification_method(
            &doc,
            purpose,
            partial.issuer_verification_method.as_deref(),
        )
        .or_else(|| partial.issuer_verification_method.clone()),
        Err(_) => partial.issuer_verification_method.clone(),
    };

    let credential_id = match partial.credential_id.as_deref() {
        Some(id) if !id.is_empty() => Some(id.to_string()),
        _ => Some(fresh_urn()),
    };

    let ld_signature_type = match partial.ld_signature_type {
        Some(suite) => Some(suite),
        None => default_ld_signature_type(&partial.issuer_did)?,
    };

    Ok(ProofConfig {
        issuer_verification_method,
        credential_id,
        issue_date: Some(partial.issue_date.unwrap_or_else(Utc::now)),
        valid_date: Some(partial.valid_date.unwrap_or_else(Utc::now)),
        ld_signature_type,
        ..partial.clone()
    })
}

/// Applies the identity and temporal fields of a completed proof config to a
/// credential draft and finalizes it.
pub fn assemble(
    mut builder: CredentialBuilder,
    config: &ProofConfig,
    issuer: Option<&Issuer>,
) -> Result<Credential, SignatoryError> {
    if let Some(issuer) = issuer {
        builder.set_issuer(issuer);
    }
    builder.set_issuer_id(&config.issuer_did);

    let issuance_date = config.issue_date.unwrap_or_else(Utc::now);
    builder.set_issuance_date(issuance_date).set_issued(issuance_date);

    if let Some(subject_did) = config.subject_did.as_deref() {
        builder.set_subject_id(subject_did);
    }

    // Guard against an empty ID reaching assembly outside the completion
    // path. After completion this preserves the completed ID exactly.
    let credential_id = match config.credential_id.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => fresh_urn(),
    };
    builder.set_id(&credential_id);

    builder.set_valid_from(config.valid_date.unwrap_or_else(Utc::now));
    if let Some(expiration_date) = config.expiration_date {
        builder.set_expiration_date(expiration_date);
    }
    Ok(builder.build()?)
}

/// An API for a party who issues credentials.
#[async_trait]
pub trait Signatory {
    /// Issues a credential from a template, identified by filesystem path or,
    /// failing that, by registry ID. An optional data provider populates the
    /// draft before assembly.
    async fn issue(
        &self,
        template: &str,
        config: &ProofConfig,
        data_provider: Option<&dyn CredentialDataProvider>,
        issuer: Option<&Issuer>,
    ) -> Result<String, SignatoryError>;

    /// Issues a credential from a prepared draft: completes the proof config,
    /// assembles, signs, stores and returns the signed credential string.
    async fn issue_credential(
        &self,
        builder: CredentialBuilder,
        config: &ProofConfig,
        issuer: Option<&Issuer>,
    ) -> Result<String, SignatoryError>;

    /// Lists the identifiers of all registered templates.
    fn list_templates(&self) -> Vec<String>;

    /// Loads a template as a (partial, unsigned) credential.
    fn load_template(&self, template_id: &str) -> Result<Credential, SignatoryError>;
}

/// Issuance orchestrator over a DID loader, a template registry, a signer
/// dispatcher and a credential store.
pub struct CredentialSignatory<L, T, S>
where
    L: DidLoader,
    T: TemplateRegistry,
    S: CredentialStore,
{
    config: SignatoryConfig,
    loader: L,
    templates: T,
    signer: SignerDispatcher,
    store: S,
}

impl<L, T, S> CredentialSignatory<L, T, S>
where
    L: DidLoader,
    T: TemplateRegistry,
    S: CredentialStore,
{
    pub fn new(
        config: SignatoryConfig,
        loader: L,
        templates: T,
        signer: SignerDispatcher,
        store: S,
    ) -> Self {
        Self {
            config,
            loader,
            templates,
            signer,
            store,
        }
    }

    /// The default proof config applied to requests that carry no overrides.
    pub fn default_proof_config(&self) -> &ProofConfig {
        &self.config.proof_config
    }

    /// The credential store issued credentials are recorded in.
    pub fn store(&self) -> &S {
        &self.store
    }
}

fn to_credential_or_jwt(signed: &str) -> CredentialOrJWT {
    serde_json::from_str::<Credential>(signed)
        .map(CredentialOrJWT::Credential)
        .unwrap_or_else(|_| CredentialOrJWT::JWT(signed.to_string()))
}

#[async_trait]
impl<L, T, S> Signatory for CredentialSignatory<L, T, S>
where
    L: DidLoader,
    T: TemplateRegistry,
    S: CredentialStore,
{
    async fn issue(
        &self,
        template: &str,
        config: &ProofConfig,
        data_provider: Option<&dyn CredentialDataProvider>,
        issuer: Option<&Issuer>,
    ) -> Result<String, SignatoryError> {
        let path = Path::new(template);
        let source = if path.is_file() {
            fs::read_to_string(path).map_err(SignatoryError::TemplateFileRead)?
        } else {
            self.templates.get_template(template)?
        };

        let mut builder = CredentialBuilder::from_partial(&source)?;
        if let Some(provider) = data_provider {
            builder = provider.populate(builder, config)?;
        }
        self.issue_credential(builder, config, issuer).await
    }

    async fn issue_credential(
        &self,
        builder: CredentialBuilder,
        config: &ProofConfig,
        issuer: Option<&Issuer>,
    ) -> Result<String, SignatoryError> {
        let completed = complete_proof_config(&self.loader, config).await?;
        let credential = assemble(builder, &completed, issuer)?;
        let credential_json =
            serde_json::to_string(&credential).map_err(SignatoryError::Serialization)?;

        info!(
            "Issuing credential {} with proof type {:?}.",
            completed.credential_id.as_deref().unwrap_or("<unset>"),
            completed.proof_type
        );
        debug!("Unsigned credential: {credential_json}");

        let signed = self.signer.sign(&credential_json, &completed).await?;
        debug!("Signed credential: {signed}");

        if let Some(credential_id) = completed.credential_id.as_deref() {
            let item = CredentialStoreItem {
                issuer_did: completed.issuer_did.clone(),
                credential: to_credential_or_jwt(&signed),
            };
            self.store
                .store_credential(credential_id, item, CREDENTIAL_GROUP)
                .await?;
        }
        Ok(signed)
    }

    fn list_templates(&self) -> Vec<String> {
        self.templates.list_templates()
    }

    fn load_template(&self, template_id: &str) -> Result<Credential, SignatoryError> {
        Ok(self.templates.load_template(template_id)?)
    }
}
