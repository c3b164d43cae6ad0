use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandleParseError {
    #[error("Channel username must start with '@'")]
    MissingAt,
    #[error("Channel username cannot be empty")]
    Empty,
}

/// A public channel username as typed by the user, e.g. `@durov`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelHandle {
    username: String,
}

impl ChannelHandle {
    /// The username without the leading `@`.
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Display for ChannelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.username)
    }
}

impl FromStr for ChannelHandle {
    type Err = HandleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let username = s.trim().strip_prefix('@').ok_or(HandleParseError::MissingAt)?;

        if username.is_empty() {
            return Err(HandleParseError::Empty);
        }

        Ok(Self { username: username.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        let handle = ChannelHandle::from_str("@durov").unwrap();
        assert_eq!(handle.username(), "durov");
        assert_eq!(handle.to_string(), "@durov");
    }

    #[test]
    fn test_from_str_trims_whitespace() {
        let handle = ChannelHandle::from_str("  @examplechannel\n").unwrap();
        assert_eq!(handle.username(), "examplechannel");
    }

    #[test]
    fn test_from_str_missing_at() {
        assert_eq!(ChannelHandle::from_str("hello"), Err(HandleParseError::MissingAt));
    }

    #[test]
    fn test_from_str_at_not_first() {
        assert_eq!(ChannelHandle::from_str("durov@"), Err(HandleParseError::MissingAt));
    }

    #[test]
    fn test_from_str_empty() {
        assert_eq!(ChannelHandle::from_str("@"), Err(HandleParseError::Empty));
        assert_eq!(ChannelHandle::from_str(""), Err(HandleParseError::MissingAt));
    }
}
