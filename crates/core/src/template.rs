//! Template uploads, template analysis and provider credentials.

use crate::error::{Error, Result};
use crate::types::TemplateDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest template upload accepted (50 MiB).
pub const MAX_TEMPLATE_BYTES: usize = 50 * 1024 * 1024;

/// File extensions accepted for template uploads.
const TEMPLATE_EXTENSIONS: [&str; 2] = ["pptx", "potx"];

/// An uploaded template file: opaque bytes plus the name it came with.
#[derive(Clone)]
pub struct TemplateFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl TemplateFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Check the extension and size of the upload.
    pub fn validate(&self) -> Result<()> {
        let extension = self
            .filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        if !TEMPLATE_EXTENSIONS.contains(&extension.as_str()) {
            return Err(Error::Template(format!(
                "'{}' is not a PowerPoint template (.pptx or .potx)",
                self.filename
            )));
        }

        if self.bytes.len() > MAX_TEMPLATE_BYTES {
            return Err(Error::Template(format!(
                "'{}' is {} bytes, templates must be at most 50MB",
                self.filename,
                self.bytes.len()
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for TemplateFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateFile")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Capability that derives a visual identity from a template file.
pub trait TemplateAnalyzer {
    fn analyze(&self, file: &TemplateFile) -> Result<TemplateDescriptor>;
}

impl<F> TemplateAnalyzer for F
where
    F: Fn(&TemplateFile) -> Result<TemplateDescriptor>,
{
    fn analyze(&self, file: &TemplateFile) -> Result<TemplateDescriptor> {
        self(file)
    }
}

/// Analyzer that ignores the file contents and reports the built-in template.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinAnalyzer;

impl TemplateAnalyzer for BuiltinAnalyzer {
    fn analyze(&self, file: &TemplateFile) -> Result<TemplateDescriptor> {
        log::debug!("Using built-in template for '{}'", file.filename);
        Ok(TemplateDescriptor::default())
    }
}

/// AI provider selector. Opaque to the pipeline apart from key hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
    Gemini,
}

impl Provider {
    /// The prefix keys for this provider usually start with.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            Provider::OpenAi => "sk-",
            Provider::Anthropic => "sk-ant-",
            Provider::Gemini => "AIza",
        }
    }

    /// Human-readable key format hint.
    pub fn key_format_hint(&self) -> String {
        format!("Format: {}... (starts with {})", self.key_prefix(), self.key_prefix())
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
        };
        f.write_str(name)
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "anthropic" => Ok(Provider::Anthropic),
            "gemini" => Ok(Provider::Gemini),
            _ => Err(Error::UnknownProvider(s.to_string())),
        }
    }
}

/// Provider selector and API key for the text-understanding step.
#[derive(Clone)]
pub struct Credentials {
    pub provider: Provider,
    pub api_key: String,
}

impl Credentials {
    pub fn new(provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
        }
    }

    /// Whether the key starts with the provider's usual prefix.
    pub fn matches_provider_format(&self) -> bool {
        self.api_key.trim().starts_with(self.provider.key_prefix())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
