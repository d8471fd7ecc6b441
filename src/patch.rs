use crate::checksum::checksum;
use crate::error::Error;
use crate::layout::{CHECKSUM_OFFSET, Field, RECORD_SIZE};
use crate::record::{NvramRecord, record_bytes};
use crate::token::{MacAddress, SerialNumber};
use alloc::vec::Vec;
#[cfg(feature = "defmt")]
use defmt::{trace, warn};

/// New identity for a record: always a serial number, optionally a base MAC address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IdentityPatch {
    pub serial: SerialNumber,
    pub mac: Option<MacAddress>,
}

impl IdentityPatch {
    pub fn new(serial: SerialNumber, mac: Option<MacAddress>) -> Self {
        Self { serial, mac }
    }

    /// Parse the user supplied tokens. See [`SerialNumber::parse`] and [`MacAddress::parse`].
    pub fn parse(serial: &str, mac: Option<&str>) -> Result<Self, Error> {
        let serial = SerialNumber::parse(serial)?;
        let mac = mac.map(MacAddress::parse).transpose()?;
        Ok(Self { serial, mac })
    }

    /// Build the patched copy of `record`.
    ///
    /// Everything up to the vendor id is kept (apart from the MAC, if one is set), then the
    /// vendor id and serial id are written, the rest of the record is copied up to the checksum,
    /// and a fresh checksum over the first 1020 bytes closes the record.
    pub fn apply_to_record(&self, record: &[u8; RECORD_SIZE]) -> [u8; RECORD_SIZE] {
        let mac = Field::BaseMacAddr.range();
        let identity_start = Field::SnVendorId.spec().offset;
        let identity_end = Field::SnSerialId.range().end;

        let mut out = RecordBuilder::new();
        match &self.mac {
            Some(address) => {
                out.put(&record[..mac.start]);
                out.put(address.octets());
                out.put(&record[mac.end..identity_start]);
            }
            None => out.put(&record[..identity_start]),
        }
        out.put(self.serial.vendor_id());
        out.put(self.serial.serial_id());
        out.put(&record[identity_end..CHECKSUM_OFFSET]);
        out.finish()
    }

    /// Produce a patched copy of `image`. The input is never modified and nothing is returned
    /// unless the patched image passes the board id check.
    pub fn apply(&self, image: &[u8]) -> Result<Vec<u8>, Error> {
        let record = self.apply_to_record(record_bytes(image)?);

        #[cfg(feature = "defmt")]
        trace!("apply: mac {}", self.mac.is_some());

        #[cfg(feature = "debug-logs")]
        println!(
            "patch: new checksum {:#010x}",
            u32::from_be_bytes([record[1020], record[1021], record[1022], record[1023]])
        );

        let patched = NvramRecord::decode(&record).splice_into(image)?;

        if !NvramRecord::from_image(&patched)?.has_sentinel_board_id() {
            #[cfg(feature = "defmt")]
            warn!("apply: board id lost after patching");

            return Err(Error::PostPatchIntegrityError);
        }
        Ok(patched)
    }
}

/// Parse `serial` and `mac` and patch the identity of the record in `image`.
///
/// Returns a new image; bytes outside the record region are copied unchanged.
pub fn patch(image: &[u8], serial: &str, mac: Option<&str>) -> Result<Vec<u8>, Error> {
    IdentityPatch::parse(serial, mac)?.apply(image)
}

/// Appends the record front to back and seals it with the checksum.
struct RecordBuilder {
    buf: [u8; RECORD_SIZE],
    len: usize,
}

impl RecordBuilder {
    fn new() -> Self {
        Self {
            buf: [0u8; RECORD_SIZE],
            len: 0,
        }
    }

    fn put(&mut self, bytes: &[u8]) {
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
    }

    fn finish(mut self) -> [u8; RECORD_SIZE] {
        debug_assert_eq!(self.len, CHECKSUM_OFFSET);
        let crc = checksum(&self.buf[..CHECKSUM_OFFSET]);
        self.buf[CHECKSUM_OFFSET..].copy_from_slice(&crc.to_be_bytes());
        self.buf
    }
}
