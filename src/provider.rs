//! Pluggable enrichment hook run against the credential draft before assembly.
use crate::builder::CredentialBuilder;
use crate::proof_config::ProofConfig;
use thiserror::Error;

/// An error raised by a credential data provider.
#[derive(Error, Debug)]
pub enum DataProviderError {
    /// No data set is available for the requested identifier.
    #[error("No data set for identifier: {0}")]
    NoDataSet(String),
    /// Provider-specific failure.
    #[error("Data provider failure: {0}")]
    Failure(String),
}

/// Populates a credential draft with externally sourced data.
///
/// Implementations receive the draft and the raw (uncompleted) proof config
/// and return a possibly modified draft. Omitting a provider at the call site
/// is the identity transform.
pub trait CredentialDataProvider: Send + Sync {
    fn populate(
        &self,
        builder: CredentialBuilder,
        config: &ProofConfig,
    ) -> Result<CredentialBuilder, DataProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TEST_CREDENTIAL_TEMPLATE;
    use serde_json::json;

    struct NameProvider;

    impl CredentialDataProvider for NameProvider {
        fn populate(
            &self,
            mut builder: CredentialBuilder,
            config: &ProofConfig,
        ) -> Result<CredentialBuilder, DataProviderError> {
            let identifier = config
                .data_provider_identifier
                .as_deref()
                .ok_or_else(|| DataProviderError::NoDataSet("<unset>".to_string()))?;
            builder.set_property("name", json!(identifier));
            Ok(builder)
        }
    }

    #[test]
    fn provider_populates_draft() {
        let mut config = ProofConfig::new("did:example:123");
        config.data_provider_identifier = Some("data-set-1".to_string());
        let builder = CredentialBuilder::from_partial(TEST_CREDENTIAL_TEMPLATE).unwrap();
        let mut populated = NameProvider.populate(builder, &config).unwrap();
        populated.set_issuer_id(&config.issuer_did);
        let value = serde_json::to_value(&populated.build().unwrap()).unwrap();
        assert_eq!(value["name"], "data-set-1");
    }

    #[test]
    fn provider_failure_is_surfaced() {
        let config = ProofConfig::new("did:example:123");
        let builder = CredentialBuilder::from_partial(TEST_CREDENTIAL_TEMPLATE).unwrap();
        assert!(matches!(
            NameProvider.populate(builder, &config),
            Err(DataProviderError::NoDataSet(_))
        ));
    }
}
