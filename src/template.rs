//! Credential template registry.
use crate::JSON_FILE_EXTENSION;
use ssi::vc::Credential;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// An error relating to the template registry.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// No template is registered under the given identifier.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),
    /// Template exists but its source cannot be read.
    #[error("Error reading template {0}: {1}")]
    ReadFailure(String, std::io::Error),
    /// Template source does not parse as a credential.
    #[error("Invalid template {0}: {1}")]
    InvalidTemplate(String, serde_json::Error),
}

/// Registry of credential templates, keyed by template identifier.
pub trait TemplateRegistry: Send + Sync {
    /// Gets the raw JSON source of a template.
    fn get_template(&self, template_id: &str) -> Result<String, TemplateError>;

    /// Lists the identifiers of all registered templates.
    fn list_templates(&self) -> Vec<String>;

    /// Loads a template as a (partial, unsigned) credential.
    fn load_template(&self, template_id: &str) -> Result<Credential, TemplateError> {
        let source = self.get_template(template_id)?;
        serde_json::from_str(&source)
            .map_err(|e| TemplateError::InvalidTemplate(template_id.to_string(), e))
    }
}

/// Template registry backed by a directory of `<id>.json` files.
pub struct DirTemplateRegistry {
    path: PathBuf,
}

impl DirTemplateRegistry {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TemplateRegistry for DirTemplateRegistry {
    fn get_template(&self, template_id: &str) -> Result<String, TemplateError> {
        let file = self
            .path
            .join(format!("{template_id}{JSON_FILE_EXTENSION}"));
        fs::read_to_string(file).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                TemplateError::TemplateNotFound(template_id.to_string())
            }
            _ => TemplateError::ReadFailure(template_id.to_string(), e),
        })
    }

    fn list_templates(&self) -> Vec<String> {
        let mut ids: Vec<String> = fs::read_dir(&self.path)
            .into_iter()
            .flatten()
            .flatten()
            .filter_map(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .and_then(|name| name.strip_suffix(JSON_FILE_EXTENSION))
                    .map(|id| id.to_string())
            })
            .collect();
        ids.sort();
        ids
    }
}

/// Template registry holding template sources in memory.
#[derive(Default)]
pub struct InMemoryTemplateRegistry {
    templates: HashMap<String, String>,
}

impl InMemoryTemplateRegistry {
    pub fn new(templates: HashMap<String, String>) -> Self {
        Self { templates }
    }

    pub fn insert(&mut self, template_id: &str, source: &str) {
        self.templates
            .insert(template_id.to_string(), source.to_string());
    }
}

impl TemplateRegistry for InMemoryTemplateRegistry {
    fn get_template(&self, template_id: &str) -> Result<String, TemplateError> {
        self.templates
            .get(template_id)
            .cloned()
            .ok_or_else(|| TemplateError::TemplateNotFound(template_id.to_string()))
    }

    fn list_templates(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.templates.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{TEST_CREDENTIAL_TEMPLATE, TEST_TEMPLATE_ID};

    fn registry() -> InMemoryTemplateRegistry {
        let mut registry = InMemoryTemplateRegistry::default();
        registry.insert(TEST_TEMPLATE_ID, TEST_CREDENTIAL_TEMPLATE);
        registry
    }

    #[test]
    fn load_template_parses_source() {
        let credential = registry().load_template(TEST_TEMPLATE_ID).unwrap();
        assert!(credential.issuer.is_none());
    }

    #[test]
    fn missing_template_is_reported() {
        assert!(matches!(
            registry().get_template("no-such-template"),
            Err(TemplateError::TemplateNotFound(_))
        ));
    }

    #[test]
    fn dir_registry_reads_and_lists_json_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("vc-template-default.json"),
            TEST_CREDENTIAL_TEMPLATE,
        )
        .unwrap();
        fs::write(dir.path().join("vc-template-degree.json"), TEST_CREDENTIAL_TEMPLATE).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let registry = DirTemplateRegistry::new(dir.path().to_path_buf());
        assert_eq!(
            registry.list_templates(),
            vec!["vc-template-default", "vc-template-degree"]
        );
        assert!(registry.get_template("vc-template-default").is_ok());
        assert!(registry.load_template("vc-template-degree").is_ok());
    }

    #[test]
    fn dir_registry_distinguishes_missing_from_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("vc-template-binary.json"), [0xff, 0xfe]).unwrap();

        let registry = DirTemplateRegistry::new(dir.path().to_path_buf());
        assert!(matches!(
            registry.get_template("vc-template-absent"),
            Err(TemplateError::TemplateNotFound(_))
        ));
        // Invalid UTF-8 is a read failure, not a missing template.
        assert!(matches!(
            registry.get_template("vc-template-binary"),
            Err(TemplateError::ReadFailure(..))
        ));
    }
}
