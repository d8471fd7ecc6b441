#![doc = include_str ! ("../README.md")]
#![cfg_attr(not(any(test, feature = "debug-logs")), no_std)]

pub mod checksum;
pub mod error;
pub mod flash;
pub mod layout;
mod patch;
mod record;
pub mod token;

extern crate alloc;

pub use checksum::{CHECKSUM_SEED, checksum, checksum_with_seed};
pub use error::Error;
pub use layout::{
    BOARD_ID_SENTINEL, CHECKSUM_OFFSET, Field, FieldKind, FieldSpec, IMAGE_MIN_LEN, LAYOUT,
    NVRAM_OFFSET, RECORD_SIZE,
};
pub use patch::{IdentityPatch, patch};
pub use record::{FieldValue, NvramRecord, decode};
pub use token::{MacAddress, SerialNumber};
