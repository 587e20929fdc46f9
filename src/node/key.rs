//! Node public keys and their abbreviated display form

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Text prefix of an encoded node public key
pub const NODE_KEY_PREFIX: &str = "nodekey:";

const KEY_LEN: usize = 32;

#[derive(Error, Debug, PartialEq)]
pub enum KeyError {
    #[error("node key has {0} hex characters, expected 64")]
    Length(usize),

    #[error("node key is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// A 32-byte node public key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey([u8; KEY_LEN]);

impl NodeKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse `nodekey:<hex>`; the prefix is optional
    pub fn parse(text: &str) -> Result<Self, KeyError> {
        let hex_part = text.strip_prefix(NODE_KEY_PREFIX).unwrap_or(text);
        if hex_part.len() != KEY_LEN * 2 {
            return Err(KeyError::Length(hex_part.len()));
        }

        let mut bytes = [0u8; KEY_LEN];
        hex::decode_to_slice(hex_part, &mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; KEY_LEN]
    }

    /// Abbreviated form: `[` + first five base64 characters + `]`, empty for the zero key
    pub fn short_string(&self) -> String {
        if self.is_zero() {
            return String::new();
        }
        let encoded = STANDARD.encode(self.0);
        format!("[{}]", &encoded[..5])
    }
}

impl FromStr for NodeKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", NODE_KEY_PREFIX, hex::encode(self.0))
    }
}
