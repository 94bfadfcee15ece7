//! Feed label <-> 32-byte leaf key encoding
//!
//! The oracle network stores every feed under a `bytes32` key built from the
//! label's UTF-8 bytes right-aligned in the word, left-padded with zeros.
//! Independent nodes and consumers must agree on this layout byte for byte.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::B256;
use serde::Serialize;

use crate::shared::errors::CodecError;

/// Width of a leaf key in bytes.
pub const KEY_WIDTH: usize = 32;

/// Fixed-width oracle leaf key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FeedKey(B256);

impl FeedKey {
    pub fn as_bytes(&self) -> &[u8; KEY_WIDTH] {
        &self.0 .0
    }

    pub fn as_b256(&self) -> B256 {
        self.0
    }

    /// Label this key was encoded from.
    pub fn label(&self) -> Result<String, CodecError> {
        KeyCodec::decode(self)
    }
}

impl From<FeedKey> for B256 {
    fn from(key: FeedKey) -> Self {
        key.0
    }
}

impl TryFrom<B256> for FeedKey {
    type Error = CodecError;

    /// Accepts only words `KeyCodec::encode` could have produced.
    fn try_from(word: B256) -> Result<Self, Self::Error> {
        let key = FeedKey(word);
        KeyCodec::decode(&key)?;
        Ok(key)
    }
}

impl FromStr for FeedKey {
    type Err = CodecError;

    /// Parses a 0x-prefixed (or bare) 64-digit hex key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_str = s.trim().trim_start_matches("0x");
        let bytes = hex::decode(hex_str).map_err(|e| CodecError::MalformedKey {
            input: s.to_string(),
            reason: format!("not a hex key: {}", e),
        })?;
        if bytes.len() != KEY_WIDTH {
            return Err(CodecError::MalformedKey {
                input: s.to_string(),
                reason: format!("key must be {} bytes, got {}", KEY_WIDTH, bytes.len()),
            });
        }
        FeedKey::try_from(B256::from_slice(&bytes))
    }
}

impl fmt::Display for FeedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Leaf key coder
pub struct KeyCodec;

impl KeyCodec {
    /// Encode a feed label into its leaf key.
    pub fn encode(label: &str) -> Result<FeedKey, CodecError> {
        let bytes = label.as_bytes();

        if bytes.is_empty() {
            return Err(invalid_label(label, "label is empty"));
        }
        if bytes.len() > KEY_WIDTH {
            return Err(invalid_label(
                label,
                format!("{} bytes exceeds key width of {}", bytes.len(), KEY_WIDTH),
            ));
        }
        // A NUL would be indistinguishable from padding.
        if bytes.contains(&0) {
            return Err(invalid_label(label, "label contains a NUL byte"));
        }

        let mut word = [0u8; KEY_WIDTH];
        word[KEY_WIDTH - bytes.len()..].copy_from_slice(bytes);
        Ok(FeedKey(B256::from(word)))
    }

    /// Decode a leaf key back into its label.
    pub fn decode(key: &FeedKey) -> Result<String, CodecError> {
        let word = key.as_bytes();
        let start = word
            .iter()
            .position(|b| *b != 0)
            .ok_or(CodecError::InvalidKey(key.0))?;
        let label_bytes = &word[start..];

        if label_bytes.contains(&0) {
            return Err(CodecError::InvalidKey(key.0));
        }

        String::from_utf8(label_bytes.to_vec()).map_err(|_| CodecError::InvalidKey(key.0))
    }
}

fn invalid_label(label: &str, reason: impl Into<String>) -> CodecError {
    CodecError::InvalidLabel {
        label: label.to_string(),
        reason: reason.into(),
    }
}
