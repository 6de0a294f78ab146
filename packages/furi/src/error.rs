//! Error types for fURI parsing and identifier construction.

use std::fmt;

/// Errors raised while turning text into a [`Furi`](crate::Furi), [`Id`](crate::Id) or
/// [`Pattern`](crate::Pattern).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FuriError {
    /// The token in the port position is not an unsigned 16-bit integer.
    InvalidPort { token: String },
    /// A `#` segment appears somewhere other than the last path position.
    MisplacedWildcard { path: String },
    /// A node path ends in a reserved character (`_` or `=`).
    ReservedTerminalChar { name: String },
    /// An identifier contains a wildcard (`+` or `#`).
    InvalidIdentifier { furi: String },
    /// A coefficient bound is not a 32-bit integer.
    InvalidCoefficient { coefficient: String },
}

impl fmt::Display for FuriError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuriError::InvalidPort { token } => {
                write!(f, "invalid port '{}': not an unsigned 16-bit integer", token)
            }
            FuriError::MisplacedWildcard { path } => {
                write!(f, "recursive wildcard # must be the last segment: {}", path)
            }
            FuriError::ReservedTerminalChar { name } => {
                write!(
                    f,
                    "reserved terminal character (_ or =) at the end of node {}",
                    name
                )
            }
            FuriError::InvalidIdentifier { furi } => {
                write!(f, "ids can not contain pattern symbols (#, +): {}", furi)
            }
            FuriError::InvalidCoefficient { coefficient } => {
                write!(f, "invalid coefficient '{}'", coefficient)
            }
        }
    }
}

impl std::error::Error for FuriError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_token() {
        let err = FuriError::InvalidPort {
            token: "8o".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid port '8o': not an unsigned 16-bit integer"
        );
    }

    #[test]
    fn display_identifier_error() {
        let err = FuriError::InvalidIdentifier {
            furi: "a/+".to_string(),
        };
        assert!(err.to_string().contains("a/+"));
        assert!(err.to_string().starts_with("ids can not contain"));
    }
}
