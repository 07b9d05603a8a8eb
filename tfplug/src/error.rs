//! Error types for tfplug

use crate::types::Diagnostic;

/// Error type for tfplug operations
#[derive(Debug, thiserror::Error)]
pub enum TfplugError {
    #[error("Resource type not found: {0}")]
    ResourceNotFound(String),

    #[error("Data source type not found: {0}")]
    DataSourceNotFound(String),

    #[error("Attribute not found: {0}")]
    AttributeNotFound(String),

    #[error("Provider not configured")]
    ProviderNotConfigured,

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Upgrade failed: {0}")]
    UpgradeFailed(String),

    #[error("{0}")]
    Custom(String),
}

/// Result type alias for tfplug operations
pub type Result<T> = std::result::Result<T, TfplugError>;

impl From<String> for TfplugError {
    fn from(s: String) -> Self {
        TfplugError::Custom(s)
    }
}

impl From<&str> for TfplugError {
    fn from(s: &str) -> Self {
        TfplugError::Custom(s.to_string())
    }
}

impl From<TfplugError> for Diagnostic {
    fn from(err: TfplugError) -> Self {
        let summary = match &err {
            TfplugError::ResourceNotFound(_) => "Unknown resource type",
            TfplugError::DataSourceNotFound(_) => "Unknown data source type",
            TfplugError::ProviderNotConfigured => "Provider not configured",
            TfplugError::EncodingError(_) | TfplugError::DecodingError(_) => "Value encoding error",
            TfplugError::UpgradeFailed(_) => "Unable to upgrade resource state",
            _ => "Framework error",
        };
        Diagnostic::error(summary, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DiagnosticSeverity;

    #[test]
    fn error_converts_into_error_diagnostic() {
        let diag: Diagnostic = TfplugError::ResourceNotFound("atlassian_nope".into()).into();
        assert_eq!(diag.severity, DiagnosticSeverity::Error);
        assert_eq!(diag.summary, "Unknown resource type");
        assert!(diag.detail.contains("atlassian_nope"));
    }

    #[test]
    fn type_mismatch_message_names_both_types() {
        let err = TfplugError::TypeMismatch {
            expected: "string".into(),
            actual: "number".into(),
        };
        assert_eq!(err.to_string(), "Type mismatch: expected string, got number");
    }
}
