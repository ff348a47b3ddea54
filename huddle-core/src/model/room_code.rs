use crate::CallError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Length of codes issued by [`RoomCode::generate`].
pub const ROOM_CODE_LEN: usize = 6;

/// Longest code accepted from user input.
pub const MAX_ROOM_CODE_LEN: usize = 32;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Short, case-insensitive identifier of a call room. Always stored upper case.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Validates and normalizes user input.
    pub fn new(input: &str) -> Result<Self, CallError> {
        let trimmed = input.trim();
        if trimmed.is_empty()
            || trimmed.len() > MAX_ROOM_CODE_LEN
            || !trimmed.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(CallError::InvalidCode(input.to_owned()));
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// A fresh random code drawn from `A-Z0-9`.
    pub fn generate() -> Self {
        let code = Uuid::new_v4()
            .into_bytes()
            .iter()
            .take(ROOM_CODE_LEN)
            .map(|b| ALPHABET[*b as usize % ALPHABET.len()] as char)
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RoomCode {
    type Err = CallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RoomCode {
    type Error = CallError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
