//! APDU command definitions
//!
//! Short-length (case 1 to 4) command APDUs according to ISO/IEC 7816-4,
//! plus constructors for the two commands the exchange engine sends.

use bytes::{BufMut, Bytes, BytesMut};

/// Expected length type for APDU commands
///
/// `0x00` means "up to 256 bytes".
pub type ExpectedLength = u8;

/// Inter-industry class byte
pub const CLA_ISO: u8 = 0x00;
/// SELECT instruction
pub const INS_SELECT: u8 = 0xA4;
/// GET RESPONSE instruction
pub const INS_GET_RESPONSE: u8 = 0xC0;
/// SELECT P1: select by DF name (AID)
pub const SELECT_P1_BY_NAME: u8 = 0x04;
/// SELECT P2: first or only occurrence, return FCI if any
pub const SELECT_P2_FIRST_OR_ONLY: u8 = 0x00;

/// Generic APDU command structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command class byte
    pub cla: u8,
    /// Instruction byte
    pub ins: u8,
    /// Parameter 1
    pub p1: u8,
    /// Parameter 2
    pub p2: u8,
    /// Command data (optional)
    pub data: Option<Bytes>,
    /// Expected length (optional)
    pub le: Option<ExpectedLength>,
}

impl Command {
    /// Create a new command with just the header bytes
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: None,
        }
    }

    /// Create a new command with expected response length (Le)
    pub const fn new_with_le(cla: u8, ins: u8, p1: u8, p2: u8, le: ExpectedLength) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: Some(le),
        }
    }

    /// Create a new command with both data and expected length
    pub fn new_with_data_and_le<T: Into<Bytes>>(
        cla: u8,
        ins: u8,
        p1: u8,
        p2: u8,
        data: T,
        le: ExpectedLength,
    ) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Some(data.into()),
            le: Some(le),
        }
    }

    /// SELECT by AID, first or only occurrence, up to 256 response bytes
    ///
    /// The AID length is written as a single Lc byte. Anything longer than
    /// 255 bytes is a caller error and is not checked here.
    pub fn select_by_aid(aid: &[u8]) -> Self {
        Self::new_with_data_and_le(
            CLA_ISO,
            INS_SELECT,
            SELECT_P1_BY_NAME,
            SELECT_P2_FIRST_OR_ONLY,
            Bytes::copy_from_slice(aid),
            0x00,
        )
    }

    /// GET RESPONSE for the `available` bytes announced by a 61 XX status
    pub const fn get_response(available: u8) -> Self {
        Self::new_with_le(CLA_ISO, INS_GET_RESPONSE, 0x00, 0x00, available)
    }

    /// Calculate length of serialized command
    pub fn command_length(&self) -> usize {
        // Header (CLA, INS, P1, P2) is always 4 bytes
        4 + self.data.as_ref().map_or(0, |data| 1 + data.len()) + usize::from(self.le.is_some())
    }

    /// Convert to raw APDU bytes
    pub fn to_bytes(&self) -> Bytes {
        let mut buffer = BytesMut::with_capacity(self.command_length());

        buffer.put_u8(self.cla);
        buffer.put_u8(self.ins);
        buffer.put_u8(self.p1);
        buffer.put_u8(self.p2);

        if let Some(data) = &self.data {
            buffer.put_u8(data.len() as u8);
            buffer.put_slice(data);
        }

        if let Some(le) = self.le {
            buffer.put_u8(le);
        }

        buffer.freeze()
    }
}

impl From<Command> for Bytes {
    fn from(command: Command) -> Self {
        command.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_select_visa() {
        let cmd = Command::select_by_aid(&hex!("A0 00 00 00 03 10 10"));
        assert_eq!(
            cmd.to_bytes().as_ref(),
            &hex!("00 A4 04 00 07 A0 00 00 00 03 10 10 00")
        );
        assert_eq!(cmd.command_length(), 13);
    }

    #[test]
    fn test_select_length_byte_tracks_aid() {
        let aid = hex!("32 50 41 59 2E 53 59 53 2E 44 44 46 30 31");
        let bytes = Command::select_by_aid(&aid).to_bytes();
        assert_eq!(bytes[4] as usize, aid.len());
        assert_eq!(&bytes[5..bytes.len() - 1], &aid);
        assert_eq!(bytes[bytes.len() - 1], 0x00);
    }

    #[test]
    fn test_get_response() {
        for n in [0x00, 0x05, 0xFF] {
            assert_eq!(Command::get_response(n).to_bytes().as_ref(), &[0x00, 0xC0, 0x00, 0x00, n]);
        }
    }

    #[test]
    fn test_header_only() {
        let cmd = Command::new(0x00, 0xA4, 0x04, 0x00);
        assert_eq!(cmd.command_length(), 4);
        assert_eq!(Bytes::from(cmd).as_ref(), &[0x00, 0xA4, 0x04, 0x00]);
    }
}
