use std::fmt;

use serde::{Deserialize, Serialize};

/// A single user-facing diagnostic produced while validating a parsed
/// command line.
///
/// The structured kinds originate in the parsing layer; executor-side
/// validators report through [`CliError::Custom`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CliError {
    MissingRequiredOption { option: String },
    UnknownOption { option: String },
    InvalidOptionValue { option: String, value: String },
    Custom { message: String },
}

impl CliError {
    pub fn custom(message: impl Into<String>) -> Self {
        CliError::Custom {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::MissingRequiredOption { option } => {
                write!(f, "Missing required option '{option}'")
            }
            CliError::UnknownOption { option } => write!(f, "Unknown option '{option}'"),
            CliError::InvalidOptionValue { option, value } => {
                write!(f, "Invalid value '{value}' for option '{option}'")
            }
            CliError::Custom { message } => f.write_str(message),
        }
    }
}

/// Outcome of semantic validation. Diagnostics exist only on the failing
/// variant, so "success with errors" is unrepresentable.
///
/// Validation failures are data for the host to render; they never travel
/// through the error channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationResult {
    Valid,
    Invalid(Vec<CliError>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn errors(&self) -> &[CliError] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(errors) => errors,
        }
    }
}
