use thiserror::Error;

/// Errors that can occur while decoding or patching an NVRAM record. None of them is retried
/// internally: a malformed token or a truncated dump cannot succeed without new input.
#[derive(Error, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The image has to hold at least `NVRAM_OFFSET + RECORD_SIZE` (2432) bytes. The actual
    /// length is reported.
    #[error("image of {0} bytes is too short to contain the NVRAM record")]
    TruncatedImage(usize),

    /// After stripping separators the serial token has to be exactly 16 hex digits.
    #[error("invalid serial number length")]
    InvalidSerialLength,

    /// The first four serial bytes have to be uppercase ASCII letters.
    #[error("invalid vendor id")]
    InvalidVendorId,

    /// After stripping separators the MAC token has to be exactly 12 hex digits.
    #[error("invalid mac address length")]
    InvalidMacLength,

    /// The board id of the record is not the expected sentinel, so this is not a record of the
    /// supported device family.
    #[error("board id mismatch")]
    SentinelMismatch,

    /// The patched image no longer carries the sentinel board id.
    #[error("post-patch integrity check failed")]
    PostPatchIntegrityError,

    /// The stored checksum does not match the one computed over the record.
    #[error("checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    /// The device capacity is not a multiple of its read size, so its last bytes cannot be read
    /// with an aligned access.
    #[error("flash capacity {capacity} is not a multiple of the read size {read_size}")]
    UnalignedCapacity { capacity: usize, read_size: usize },

    /// The NOR flash device returned an error while reading.
    #[error("flash read error")]
    FlashError,
}
