use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Malformed document: {message}")]
    MalformedDocument { message: String },

    #[error("Root element has no '{attribute}' attribute")]
    MissingRootAttribute { attribute: String },

    #[error("Package parsing not implemented for OS '{os}'")]
    UnsupportedOs { os: String },

    #[error("Malformed package line '{line}': expected 3 fields, found {tokens}")]
    MalformedPackageLine { line: String, tokens: usize },

    #[error("Field '{field}' not found in run record")]
    MissingField { field: String },

    #[error("Field '{field}' does not hold text")]
    NotTextField { field: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Transform,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::IoError(_)
            | EtlError::XmlError(_)
            | EtlError::MalformedDocument { .. }
            | EtlError::MissingRootAttribute { .. } => ErrorCategory::Input,
            EtlError::UnsupportedOs { .. }
            | EtlError::MalformedPackageLine { .. }
            | EtlError::MissingField { .. }
            | EtlError::NotTextField { .. } => ErrorCategory::Transform,
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::SerializationError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Transform => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    /// Exit status for the binary; never zero.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::IoError(_) => {
                "Check that the input report exists and the working directory is writable".to_string()
            }
            EtlError::XmlError(_) | EtlError::MalformedDocument { .. } => {
                "Regenerate the CI report; the XML could not be parsed".to_string()
            }
            EtlError::MissingRootAttribute { attribute } => format!(
                "Add a '{}' attribute with the OS identifier to the report's root element",
                attribute
            ),
            EtlError::UnsupportedOs { os } => format!(
                "Package listings for '{}' have no parsing rule yet; run on centos-7 or add a rule",
                os
            ),
            EtlError::MalformedPackageLine { .. } => {
                "Each package line must read '<package> <version> <repository>'".to_string()
            }
            EtlError::MissingField { field } | EtlError::NotTextField { field } => {
                format!("Make sure the CI report contains a text '{}' element", field)
            }
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line arguments".to_string()
            }
            EtlError::SerializationError(_) => {
                "Report this as a bug; the summary could not be serialized".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Could not read the CI report: {}", self),
            ErrorCategory::Transform => format!("Could not transform the CI report: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Output => format!("Could not write the release summary: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_exits_non_zero() {
        let errors = vec![
            EtlError::UnsupportedOs {
                os: "windows-2019".to_string(),
            },
            EtlError::ConfigValidationError {
                field: "fields.config".to_string(),
                message: "empty".to_string(),
            },
            EtlError::SerializationError(serde_json::from_str::<u8>("x").unwrap_err()),
        ];

        let codes: Vec<i32> = errors.iter().map(|e| e.exit_code()).collect();
        assert_eq!(codes, vec![1, 2, 3]);
    }

    #[test]
    fn test_unsupported_os_message_names_os() {
        let e = EtlError::UnsupportedOs {
            os: "macos-11-01".to_string(),
        };
        assert_eq!(e.category(), ErrorCategory::Transform);
        assert!(e.to_string().contains("macos-11-01"));
        assert!(e.recovery_suggestion().contains("macos-11-01"));
        assert!(e.user_friendly_message().starts_with("Could not transform"));
    }
}
