//! Account and operation identities
//!
//! Both identities are opaque 32-byte values. The environment is trusted to
//! verify who the caller is; this crate only compares identities.
//!
//! # Properties
//!
//! - **Determinism**: `AccountId::from_label` maps the same label to the same id
//! - **Zero marker**: the all-zero `OperationId` means "completed immediately,
//!   nothing left to confirm"

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Error parsing a hex-encoded identity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityParseError {
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

fn parse_hex32(s: &str) -> Result<[u8; 32], IdentityParseError> {
    let bytes = hex::decode(s.trim_start_matches("0x"))
        .map_err(|e| IdentityParseError::InvalidHex(e.to_string()))?;
    if bytes.len() != 32 {
        return Err(IdentityParseError::InvalidLength(bytes.len()));
    }
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}

/// An account identity: an owner, a transfer recipient, or a created account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId([u8; 32]);

impl AccountId {
    /// Create from a 32-byte array.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create from a 32-byte slice
    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert_eq!(bytes.len(), 32, "AccountId must be 32 bytes");
        let mut arr = [0u8; 32];
        arr.copy_from_slice(bytes);
        Self(arr)
    }

    /// Derive an identity from a human-readable label (SHA-256 of the label).
    pub fn from_label(label: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"covenant-account-v1");
        hasher.update(label.as_bytes());
        Self::from_bytes(&hasher.finalize())
    }

    /// Parse either a 64-character hex id or, failing that, treat the input as a label.
    pub fn parse_or_label(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| Self::from_label(s))
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First four bytes as hex, for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for AccountId {
    type Err = IdentityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex32(s).map(Self)
    }
}

/// Identifier of a proposed operation: a SHA-256 over its canonical encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OperationId([u8; 32]);

impl OperationId {
    /// Returned by entry points that completed without needing confirmation.
    pub const ZERO: OperationId = OperationId([0u8; 32]);

    /// Create from a 32-byte slice
    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert_eq!(bytes.len(), 32, "OperationId must be 32 bytes");
        let mut arr = [0u8; 32];
        arr.copy_from_slice(bytes);
        Self(arr)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Whether this is the "completed immediately" marker.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for OperationId {
    type Err = IdentityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex32(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_deterministic() {
        assert_eq!(AccountId::from_label("alice"), AccountId::from_label("alice"));
        assert_ne!(AccountId::from_label("alice"), AccountId::from_label("bob"));
    }

    #[test]
    fn test_account_display_parses_back() {
        let id = AccountId::from_label("carol");
        let parsed: AccountId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_accepts_0x_prefix() {
        let id = AccountId::new([0xab; 32]);
        let parsed: AccountId = format!("0x{}", id).parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        let result = "abcd".parse::<AccountId>();
        assert_eq!(result, Err(IdentityParseError::InvalidLength(2)));
    }

    #[test]
    fn test_parse_or_label_falls_back() {
        assert_eq!(AccountId::parse_or_label("dave"), AccountId::from_label("dave"));
        let hex_id = AccountId::new([7u8; 32]);
        assert_eq!(AccountId::parse_or_label(&hex_id.to_string()), hex_id);
    }

    #[test]
    fn test_operation_zero_marker() {
        assert!(OperationId::ZERO.is_zero());
        assert!(!OperationId::from_bytes(&[1u8; 32]).is_zero());
    }

    #[test]
    fn test_short_is_eight_hex_chars() {
        assert_eq!(AccountId::new([0x12; 32]).short(), "12121212");
    }

    #[test]
    #[should_panic(expected = "AccountId must be 32 bytes")]
    fn test_account_from_long_slice_panics() {
        AccountId::from_bytes(&[7u8; 33]);
    }

    #[test]
    #[should_panic(expected = "OperationId must be 32 bytes")]
    fn test_operation_from_short_slice_panics() {
        OperationId::from_bytes(&[7u8; 31]);
    }
}
