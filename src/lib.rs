//! Verifiable credential issuance: proof-configuration resolution and signing dispatch.
pub mod builder;
pub mod config;
pub mod data;
pub mod proof_config;
pub mod provider;
pub mod resolver;
pub mod signatory;
pub mod signer;
pub mod store;
pub mod template;

/// Environment variable name for the signatory config file.
pub const SIGNATORY_CONFIG: &str = "SIGNATORY_CONFIG";

/// The store group under which this subsystem records issued credentials.
pub const CREDENTIAL_GROUP: &str = "signatory";

pub const JSON_FILE_EXTENSION: &str = ".json";
