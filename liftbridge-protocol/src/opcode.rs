//! Opcode encoding
//!
//! Opcode format:
//! - SYNC (2 bytes): 0x55 0xAA
//! - PAYLOAD (3 bytes): action code, repeated three times

/// Sync marker that starts every opcode
pub const SYNC: [u8; 2] = [0x55, 0xAA];

/// Opcode length in bytes
pub const OPCODE_LEN: usize = 5;

/// A complete five-byte button opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Opcode([u8; OPCODE_LEN]);

impl Opcode {
    /// Build the opcode for a payload byte
    pub const fn new(payload: u8) -> Self {
        Self([SYNC[0], SYNC[1], payload, payload, payload])
    }

    /// Validate a raw byte sequence as an opcode
    ///
    /// Accepts exactly five bytes with the sync marker and a payload byte
    /// repeated three times.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match *bytes {
            [s0, s1, a, b, c] if [s0, s1] == SYNC && a == b && b == c => Some(Self::new(a)),
            _ => None,
        }
    }

    /// The action code carried in the payload
    pub const fn payload(&self) -> u8 {
        self.0[2]
    }

    /// Wire bytes
    pub const fn as_bytes(&self) -> &[u8; OPCODE_LEN] {
        &self.0
    }
}

impl AsRef<[u8]> for Opcode {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_repeats_payload() {
        let op = Opcode::new(0xD7);
        assert_eq!(op.as_bytes(), &[0x55, 0xAA, 0xD7, 0xD7, 0xD7]);
        assert_eq!(op.payload(), 0xD7);
    }

    #[test]
    fn test_from_bytes_accepts_wellformed() {
        let op = Opcode::from_bytes(&[0x55, 0xAA, 0xE1, 0xE1, 0xE1]).unwrap();
        assert_eq!(op, Opcode::new(0xE1));
    }

    #[test]
    fn test_from_bytes_rejects_malformed() {
        // Payload not repeated
        assert!(Opcode::from_bytes(&[0x55, 0xAA, 0xE1, 0xE1, 0xE2]).is_none());
        // Bad sync
        assert!(Opcode::from_bytes(&[0x55, 0xAB, 0xE1, 0xE1, 0xE1]).is_none());
        // Display sleep frame from the remote is two bytes
        assert!(Opcode::from_bytes(&[0x55, 0xFC]).is_none());
        // Lift status frames are six bytes
        assert!(Opcode::from_bytes(&[0x55, 0xAA, 0xA5, 0x8C, 0x0C, 0x00]).is_none());
        assert!(Opcode::from_bytes(&[]).is_none());
    }
}
