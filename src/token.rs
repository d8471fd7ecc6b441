//! Parsing of the serial number and MAC address tokens typed by the user.
//!
//! Both accept the common notations (`48:57:54:43:30:30:30:30`, `48-57-...`, `\x48\x57...`,
//! `0x4857...`); the separators are stripped before the digits are checked.

use crate::error::Error;
use crate::layout::{MAC_LEN, SERIAL_ID_LEN, VENDOR_ID_LEN};
use alloc::string::String;
use core::fmt;
use core::str::FromStr;

const SERIAL_DIGITS: usize = 16;
const MAC_DIGITS: usize = MAC_LEN * 2;

/// Strip `-`, `:`, `\x` and `x` from `token` and uppercase what is left.
///
/// The separators are removed before uppercasing, so an uppercase `X` is kept and later
/// rejected as a non-hex digit.
pub fn normalize(token: &str) -> String {
    token
        .replace(['-', ':'], "")
        .replace("\\x", "")
        .replace('x', "")
        .to_ascii_uppercase()
}

fn is_hex(digits: &str, len: usize) -> bool {
    digits.len() == len && digits.bytes().all(|b| b.is_ascii_hexdigit())
}

/// GPON serial number: a four letter vendor id and an eight character serial id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialNumber {
    vendor_id: [u8; VENDOR_ID_LEN],
    serial_id: [u8; SERIAL_ID_LEN],
}

impl SerialNumber {
    /// Parse a serial token.
    ///
    /// The first eight digits are hex-decoded into the vendor id, which has to spell four
    /// uppercase ASCII letters. The last eight digits are stored as ASCII characters, not
    /// decoded, followed by a null terminator. This mirrors how the device firmware stores the
    /// serial id.
    pub fn parse(token: &str) -> Result<Self, Error> {
        let digits = normalize(token);
        if !is_hex(&digits, SERIAL_DIGITS) {
            return Err(Error::InvalidSerialLength);
        }

        let mut vendor_id = [0u8; VENDOR_ID_LEN];
        hex::decode_to_slice(&digits[..VENDOR_ID_LEN * 2], &mut vendor_id)
            .map_err(|_| Error::InvalidSerialLength)?;
        if !vendor_id.iter().all(u8::is_ascii_uppercase) {
            return Err(Error::InvalidVendorId);
        }

        let mut serial_id = [0u8; SERIAL_ID_LEN];
        serial_id[..SERIAL_ID_LEN - 1].copy_from_slice(&digits.as_bytes()[VENDOR_ID_LEN * 2..]);

        Ok(Self {
            vendor_id,
            serial_id,
        })
    }

    pub fn vendor_id(&self) -> &[u8; VENDOR_ID_LEN] {
        &self.vendor_id
    }

    /// Eight ASCII characters and the null terminator.
    pub fn serial_id(&self) -> &[u8; SERIAL_ID_LEN] {
        &self.serial_id
    }
}

impl FromStr for SerialNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MacAddress([u8; MAC_LEN]);

impl MacAddress {
    pub fn parse(token: &str) -> Result<Self, Error> {
        let digits = normalize(token);
        if !is_hex(&digits, MAC_DIGITS) {
            return Err(Error::InvalidMacLength);
        }

        let mut mac = [0u8; MAC_LEN];
        hex::decode_to_slice(&digits, &mut mac).map_err(|_| Error::InvalidMacLength)?;
        Ok(Self(mac))
    }

    pub const fn octets(&self) -> &[u8; MAC_LEN] {
        &self.0
    }
}

impl FromStr for MacAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<[u8; MAC_LEN]> for MacAddress {
    fn from(octets: [u8; MAC_LEN]) -> Self {
        Self(octets)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}
