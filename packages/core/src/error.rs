//! Error types for the object model, router and resolver.

use fhatos_furi::{Coefficient, FuriError};

/// Errors raised by the core.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed fURI text.
    Furi(FuriError),

    /// Instruction resolution exhausted every probe. `derivation` is the rendered probe log.
    NoResolution {
        lhs: String,
        inst: String,
        derivation: String,
    },

    /// A value does not structurally match its expected type.
    TypeCheckFailure {
        value: String,
        expected: String,
        definition: String,
        reasons: Vec<String>,
    },

    /// The expected type has no definition.
    UndefinedType { expected: String },

    /// The lhs coefficient falls outside the rhs coefficient.
    CoefficientMismatch { lhs: Coefficient, rhs: Coefficient },

    /// An object was not the variant an operation needed.
    WrongVariant {
        expected: &'static str,
        found: String,
    },

    /// Configuration could not be read or decoded.
    Config { message: String },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Furi(e) => write!(f, "furi error: {}", e),
            Error::NoResolution {
                lhs,
                inst,
                derivation,
            } => write!(f, "{} inst {} unresolved{}", lhs, inst, derivation),
            Error::TypeCheckFailure {
                value,
                expected,
                definition,
                reasons,
            } => {
                write!(
                    f,
                    "{} is not a {} as defined by {}",
                    value, expected, definition
                )?;
                for (depth, reason) in reasons.iter().enumerate() {
                    write!(f, "\n{}\\{} {}", " ".repeat(depth + 1), "_".repeat(depth + 1), reason)?;
                }
                Ok(())
            }
            Error::UndefinedType { expected } => write!(f, "{} is an undefined type", expected),
            Error::CoefficientMismatch { lhs, rhs } => write!(
                f,
                "lhs coefficient not within rhs coefficient: {{{},{}}} <> {{{},{}}}",
                lhs.0, lhs.1, rhs.0, rhs.1
            ),
            Error::WrongVariant { expected, found } => {
                write!(f, "expected {} but found {}", expected, found)
            }
            Error::Config { message } => write!(f, "config error: {}", message),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Furi(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FuriError> for Error {
    fn from(e: FuriError) -> Self {
        Error::Furi(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn furi_error_is_the_source() {
        let e: Error = FuriError::InvalidPort {
            token: "x".to_string(),
        }
        .into();
        assert!(e.to_string().starts_with("furi error"));
        assert!(e.source().is_some());
    }

    #[test]
    fn no_resolution_carries_the_derivation() {
        let e = Error::NoResolution {
            lhs: "/x".to_string(),
            inst: "plus".to_string(),
            derivation: "\n\ttrace".to_string(),
        };
        let display = e.to_string();
        assert!(display.contains("/x"));
        assert!(display.contains("plus"));
        assert!(display.ends_with("trace"));
        assert!(e.source().is_none());
    }

    #[test]
    fn type_check_failure_lists_reasons() {
        let e = Error::TypeCheckFailure {
            value: "'a'".to_string(),
            expected: "/nat".to_string(),
            definition: "int".to_string(),
            reasons: vec!["'a' is not an int".to_string()],
        };
        let display = e.to_string();
        assert!(display.contains("is not a /nat"));
        assert!(display.contains("\\_ 'a' is not an int"));
    }

    #[test]
    fn coefficient_mismatch_display() {
        let e = Error::CoefficientMismatch {
            lhs: (0, 5),
            rhs: (1, 1),
        };
        assert_eq!(
            e.to_string(),
            "lhs coefficient not within rhs coefficient: {0,5} <> {1,1}"
        );
    }
}
