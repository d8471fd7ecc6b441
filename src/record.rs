use crate::checksum::checksum;
use crate::error::Error;
use crate::layout::{
    BOARD_ID_SENTINEL, CHECKSUM_OFFSET, Field, FieldKind, IMAGE_MIN_LEN, LAYOUT, MAC_LEN,
    NVRAM_OFFSET, RECORD_SIZE, SERIAL_ID_LEN,
};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
#[cfg(feature = "defmt")]
use defmt::{trace, warn};
use strum::IntoEnumIterator;

/// A decoded field. Text and opaque fields keep every byte of the field, including padding, so
/// that encoding reproduces the record exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    U32(u32),
    Checksum(u32),
    U32Array(Vec<u32>),
    Text(Vec<u8>),
    Mac([u8; MAC_LEN]),
    Opaque(Vec<u8>),
}

impl FieldValue {
    fn decode(kind: FieldKind, bytes: &[u8]) -> Self {
        match kind {
            FieldKind::U32 => Self::U32(read_u32(bytes)),
            FieldKind::Checksum => Self::Checksum(read_u32(bytes)),
            FieldKind::U32Array => Self::U32Array(bytes.chunks_exact(4).map(read_u32).collect()),
            FieldKind::Text => Self::Text(bytes.to_vec()),
            FieldKind::Mac => {
                let mut mac = [0u8; MAC_LEN];
                mac.copy_from_slice(bytes);
                Self::Mac(mac)
            }
            FieldKind::Opaque => Self::Opaque(bytes.to_vec()),
        }
    }

    fn encode_into(&self, dst: &mut [u8]) {
        match self {
            Self::U32(value) | Self::Checksum(value) => dst.copy_from_slice(&value.to_be_bytes()),
            Self::U32Array(values) => {
                for (chunk, value) in dst.chunks_exact_mut(4).zip(values) {
                    chunk.copy_from_slice(&value.to_be_bytes());
                }
            }
            Self::Text(bytes) | Self::Opaque(bytes) => dst.copy_from_slice(bytes),
            Self::Mac(mac) => dst.copy_from_slice(mac),
        }
    }

    /// The numeric value of `U32` and `Checksum` fields.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::U32(value) | Self::Checksum(value) => Some(*value),
            _ => None,
        }
    }

    /// The raw bytes of byte-valued fields.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Text(bytes) | Self::Opaque(bytes) => Some(bytes),
            Self::Mac(mac) => Some(mac),
            _ => None,
        }
    }
}

/// Renders the value the way it is shown in an audit log: numbers in decimal, checksums and
/// opaque bytes in hex, text quoted with the null padding removed.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U32(value) => write!(f, "{value}"),
            Self::Checksum(value) => write!(f, "{value:#010x}"),
            Self::U32Array(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            Self::Text(bytes) => {
                f.write_str("\"")?;
                for &byte in trim_nulls(bytes) {
                    // escape_default would escape 0 as \x00, but \0 is more readable
                    if byte == 0 {
                        f.write_str("\\0")?;
                        continue;
                    }
                    write!(f, "{}", core::ascii::escape_default(byte))?;
                }
                f.write_str("\"")
            }
            Self::Mac(mac) => write_hex(f, mac, Some(':')),
            Self::Opaque(bytes) => write_hex(f, bytes, None),
        }
    }
}

/// The NVRAM record of a flash dump, decoded field by field according to [`LAYOUT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NvramRecord {
    values: Vec<FieldValue>,
}

impl NvramRecord {
    /// Decode the record stored at [`NVRAM_OFFSET`] of `image`.
    ///
    /// Decoding succeeds for any board id; use [`NvramRecord::check_sentinel`] before acting on
    /// the record.
    pub fn from_image(image: &[u8]) -> Result<Self, Error> {
        Ok(Self::decode(record_bytes(image)?))
    }

    /// Decode a bare record.
    pub fn decode(record: &[u8; RECORD_SIZE]) -> Self {
        #[cfg(feature = "defmt")]
        trace!("decode: {} fields", LAYOUT.len());

        let values = LAYOUT
            .iter()
            .map(|spec| FieldValue::decode(spec.kind, &record[spec.range()]))
            .collect();
        Self { values }
    }

    /// Encode the record back into its 1024 bytes. The checksum field is written as decoded, not
    /// recomputed.
    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut record = [0u8; RECORD_SIZE];
        for (spec, value) in LAYOUT.iter().zip(&self.values) {
            value.encode_into(&mut record[spec.range()]);
        }
        record
    }

    /// Copy `image` and replace its record region with this record.
    pub fn splice_into(&self, image: &[u8]) -> Result<Vec<u8>, Error> {
        if image.len() < IMAGE_MIN_LEN {
            return Err(Error::TruncatedImage(image.len()));
        }
        let mut spliced = image.to_vec();
        spliced[NVRAM_OFFSET..IMAGE_MIN_LEN].copy_from_slice(&self.encode());
        Ok(spliced)
    }

    pub fn get(&self, field: Field) -> &FieldValue {
        &self.values[field as usize]
    }

    /// Every field in on-flash order, for reporting.
    pub fn fields(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        Field::iter().zip(self.values.iter())
    }

    pub fn version(&self) -> u32 {
        self.word(Field::Version)
    }

    pub fn board_id(&self) -> &[u8] {
        self.bytes(Field::BoardId)
    }

    pub fn base_mac_addr(&self) -> [u8; MAC_LEN] {
        match self.get(Field::BaseMacAddr) {
            FieldValue::Mac(mac) => *mac,
            other => unreachable!("base_mac_addr decoded as {other:?}"),
        }
    }

    pub fn vendor_id(&self) -> &[u8] {
        self.bytes(Field::SnVendorId)
    }

    pub fn serial_id(&self) -> &[u8] {
        self.bytes(Field::SnSerialId)
    }

    /// The checksum stored in the record.
    pub fn checksum(&self) -> u32 {
        self.word(Field::Checksum)
    }

    /// The checksum the record should carry.
    pub fn computed_checksum(&self) -> u32 {
        checksum(&self.encode()[..CHECKSUM_OFFSET])
    }

    pub fn verify_checksum(&self) -> Result<(), Error> {
        let stored = self.checksum();
        let computed = self.computed_checksum();
        if stored != computed {
            #[cfg(feature = "defmt")]
            warn!("checksum mismatch: {:#x} != {:#x}", stored, computed);

            return Err(Error::ChecksumMismatch { stored, computed });
        }
        Ok(())
    }

    pub fn has_sentinel_board_id(&self) -> bool {
        self.board_id() == BOARD_ID_SENTINEL
    }

    /// Fails with [`Error::SentinelMismatch`] unless the board id is the UBNT_SFU sentinel.
    pub fn check_sentinel(&self) -> Result<(), Error> {
        if !self.has_sentinel_board_id() {
            #[cfg(feature = "debug-logs")]
            println!("record: unexpected board id {}", self.get(Field::BoardId));

            return Err(Error::SentinelMismatch);
        }
        Ok(())
    }

    /// The serial number in the notation it is entered with, e.g. `48:57:54:43:30:30:30:30`:
    /// the vendor id as hex followed by the ASCII characters of the serial id, grouped in pairs.
    /// Feeding it back to [`crate::patch`] reproduces the identity fields.
    pub fn serial_token(&self) -> String {
        let mut digits = hex::encode_upper(self.vendor_id());
        let serial = &self.serial_id()[..SERIAL_ID_LEN - 1];
        let len = serial.iter().position(|&b| b == 0).unwrap_or(serial.len());
        digits.extend(serial[..len].iter().map(|&b| char::from(b)));

        let chars: Vec<char> = digits.chars().collect();
        let mut token = String::with_capacity(chars.len() * 3 / 2);
        for (i, pair) in chars.chunks(2).enumerate() {
            if i != 0 {
                token.push(':');
            }
            token.extend(pair);
        }
        token
    }

    fn word(&self, field: Field) -> u32 {
        match self.get(field).as_u32() {
            Some(value) => value,
            None => unreachable!("{field} is not a numeric field"),
        }
    }

    fn bytes(&self, field: Field) -> &[u8] {
        match self.get(field).as_bytes() {
            Some(bytes) => bytes,
            None => unreachable!("{field} is not a byte field"),
        }
    }
}

/// Decode the record embedded in a flash dump. See [`NvramRecord::from_image`].
pub fn decode(image: &[u8]) -> Result<NvramRecord, Error> {
    NvramRecord::from_image(image)
}

/// Borrow the record region of `image`.
pub(crate) fn record_bytes(image: &[u8]) -> Result<&[u8; RECORD_SIZE], Error> {
    image
        .get(NVRAM_OFFSET..IMAGE_MIN_LEN)
        .and_then(|record| record.try_into().ok())
        .ok_or(Error::TruncatedImage(image.len()))
}

pub(crate) fn trim_nulls(bytes: &[u8]) -> &[u8] {
    let len = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &bytes[..len]
}

fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8], separator: Option<char>) -> fmt::Result {
    for (i, byte) in bytes.iter().enumerate() {
        if i != 0
            && let Some(separator) = separator
        {
            write!(f, "{separator}")?;
        }
        write!(f, "{byte:02X}")?;
    }
    Ok(())
}
