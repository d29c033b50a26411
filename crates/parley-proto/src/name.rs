//! Operator display name.

use std::fmt;

use bytes::Bytes;

use crate::{
    Frame, MAX_NAME_LEN,
    errors::{ProtocolError, Result},
};

/// Validated display name.
///
/// Sent once as the first frame after connecting and used afterwards only to
/// decorate the local prompt. Immutable once built.
///
/// # Invariants
///
/// - Between 1 and [`MAX_NAME_LEN`] bytes.
/// - No control characters, so no newline and no terminator byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate a display name.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::EmptyName` if `name` is empty
    /// - `ProtocolError::NameTooLong` if `name` exceeds [`MAX_NAME_LEN`] bytes
    /// - `ProtocolError::InvalidNameCharacter` if `name` contains a control
    ///   character
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(ProtocolError::EmptyName);
        }
        if name.len() > MAX_NAME_LEN {
            return Err(ProtocolError::NameTooLong { size: name.len(), max: MAX_NAME_LEN });
        }
        if let Some(c) = name.chars().find(|c| c.is_control()) {
            return Err(ProtocolError::InvalidNameCharacter(c));
        }

        Ok(Self(name))
    }

    /// The name as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Frame announcing this name to the peer.
    #[must_use]
    pub fn to_frame(&self) -> Frame {
        // MAX_NAME_LEN < MAX_TEXT_LEN and control characters include NUL.
        Frame::from_validated(Bytes::copy_from_slice(self.0.as_bytes()))
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_printable_names_up_to_limit() {
        assert!(DisplayName::new("alice").is_ok());
        assert!(DisplayName::new("a".repeat(MAX_NAME_LEN)).is_ok());
        assert!(DisplayName::new("Zoë Ünal").is_ok());
    }

    #[test]
    fn rejects_empty_and_oversized_names() {
        assert_eq!(DisplayName::new(""), Err(ProtocolError::EmptyName));
        assert_eq!(
            DisplayName::new("a".repeat(MAX_NAME_LEN + 1)),
            Err(ProtocolError::NameTooLong { size: MAX_NAME_LEN + 1, max: MAX_NAME_LEN })
        );
    }

    #[test]
    fn rejects_control_characters() {
        assert_eq!(DisplayName::new("al\nice"), Err(ProtocolError::InvalidNameCharacter('\n')));
        assert_eq!(DisplayName::new("bob\0"), Err(ProtocolError::InvalidNameCharacter('\0')));
    }

    #[test]
    fn name_frame_carries_name() {
        let name = DisplayName::new("carol").unwrap();
        let frame = name.to_frame();
        assert_eq!(frame.to_bytes().as_ref(), b"carol\0");
    }
}
