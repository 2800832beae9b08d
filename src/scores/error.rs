//! Score client errors

use std::fmt;

use crate::consts::PLAYER_NAME_MAX_LEN;

/// Why a player name was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameError {
    Empty,
    TooLong { max: usize },
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameError::Empty => write!(f, "Please enter your name"),
            NameError::TooLong { max } => write!(f, "Name must be at most {max} characters"),
        }
    }
}

impl std::error::Error for NameError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    InvalidName(NameError),
    /// No backend configured
    NotConnected,
    /// Backend base URL could not be parsed
    InvalidUrl(String),
    Transport(String),
    /// Non-2xx response
    Status(u16),
    Decode(String),
    /// Refused by the backend's own validation
    InvalidScore,
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::InvalidName(e) => write!(f, "{e}"),
            ScoreError::NotConnected => write!(f, "score backend not connected"),
            ScoreError::InvalidUrl(e) => write!(f, "invalid backend url: {e}"),
            ScoreError::Transport(e) => write!(f, "request failed: {e}"),
            ScoreError::Status(code) => write!(f, "backend returned status {code}"),
            ScoreError::Decode(e) => write!(f, "malformed response: {e}"),
            ScoreError::InvalidScore => write!(f, "score rejected"),
        }
    }
}

impl std::error::Error for ScoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScoreError::InvalidName(e) => Some(e),
            _ => None,
        }
    }
}

impl From<NameError> for ScoreError {
    fn from(e: NameError) -> Self {
        ScoreError::InvalidName(e)
    }
}

impl From<reqwest::Error> for ScoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ScoreError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ScoreError::Status(status.as_u16())
        } else {
            ScoreError::Transport(e.to_string())
        }
    }
}

/// Trim a player name and check it against the length cap
pub fn validate_player_name(raw: &str) -> Result<String, NameError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.chars().count() > PLAYER_NAME_MAX_LEN {
        return Err(NameError::TooLong {
            max: PLAYER_NAME_MAX_LEN,
        });
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_name_trimmed() {
        assert_eq!(validate_player_name("  Ada  ").as_deref(), Ok("Ada"));
    }

    #[test]
    fn test_blank_name_rejected() {
        assert_eq!(validate_player_name(" \t "), Err(NameError::Empty));
        assert_eq!(NameError::Empty.to_string(), "Please enter your name");
    }

    #[test]
    fn test_long_name_rejected() {
        let name = "x".repeat(PLAYER_NAME_MAX_LEN + 1);
        assert_eq!(
            validate_player_name(&name),
            Err(NameError::TooLong { max: PLAYER_NAME_MAX_LEN })
        );
        // Counted in characters, not bytes
        let name = "é".repeat(PLAYER_NAME_MAX_LEN);
        assert!(validate_player_name(&name).is_ok());
    }

    proptest! {
        #[test]
        fn prop_valid_names_are_trimmed_and_bounded(raw in "\\PC{0,30}") {
            match validate_player_name(&raw) {
                Ok(name) => {
                    prop_assert_eq!(name.trim(), name.as_str());
                    prop_assert!(!name.is_empty());
                    prop_assert!(name.chars().count() <= PLAYER_NAME_MAX_LEN);
                }
                Err(NameError::Empty) => prop_assert!(raw.trim().is_empty()),
                Err(NameError::TooLong { .. }) => {
                    prop_assert!(raw.trim().chars().count() > PLAYER_NAME_MAX_LEN)
                }
            }
        }
    }
}
