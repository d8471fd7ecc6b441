//! Byte layout of the Broadcom NVRAM record found on UBNT_SFU boards.
//!
//! Every field is described once in [`LAYOUT`]; decoding and encoding in [`crate::record`] walk
//! this table instead of slicing with literal bounds.

use core::ops::Range;
use strum::EnumCount;

/// Offset of the NVRAM record inside the flash dump.
pub const NVRAM_OFFSET: usize = 1408;

/// Size of the NVRAM record.
pub const RECORD_SIZE: usize = 1024;

/// Smallest flash dump that still contains the whole record.
pub const IMAGE_MIN_LEN: usize = NVRAM_OFFSET + RECORD_SIZE;

/// The checksum covers every byte in front of it.
pub const CHECKSUM_OFFSET: usize = RECORD_SIZE - 4;

pub const BOARD_ID_LEN: usize = 16;
pub const MAC_LEN: usize = 6;
pub const VENDOR_ID_LEN: usize = 4;
/// 8 ASCII characters plus the null terminator.
pub const SERIAL_ID_LEN: usize = 9;

/// Board id of the only device family this crate patches.
pub const BOARD_ID_SENTINEL: [u8; BOARD_ID_LEN] = pad_board_id(b"UBNT_SFU");

/// Null-pads `src` to the width of the board id field.
pub const fn pad_board_id<const M: usize>(src: &[u8; M]) -> [u8; BOARD_ID_LEN] {
    assert!(M <= BOARD_ID_LEN);
    let mut dst = [0u8; BOARD_ID_LEN];
    let mut i = 0;
    while i < M {
        dst[i] = src[i];
        i += 1;
    }
    dst
}

/// Named fields of the record, in on-flash order.
#[derive(
    strum::EnumIter,
    strum::EnumCount,
    strum::IntoStaticStr,
    strum::Display,
    Debug,
    PartialEq,
    Eq,
    Copy,
    Clone,
)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum Field {
    Version,
    BootLine,
    BoardId,
    MainThread,
    PsiSize,
    NumMacAddr,
    BaseMacAddr,
    Reserved,
    OldChecksum,
    SnVendorId,
    SnSerialId,
    SnPassword,
    WpsPin,
    WlanParams,
    SyslogSize,
    NandPartOfsKb,
    NandPartSizeKb,
    VoiceBoardId,
    AfeId,
    Unused,
    Checksum,
}

/// How the bytes of a field are interpreted. Numbers are big-endian.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldKind {
    U32,
    /// A `u32` that is rendered in hex.
    Checksum,
    /// A sequence of `u32` filling the whole field.
    U32Array,
    /// Null-padded ASCII.
    Text,
    Mac,
    /// Preserved verbatim, rendered in hex.
    Opaque,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct FieldSpec {
    pub field: Field,
    pub offset: usize,
    pub len: usize,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn new(field: Field, offset: usize, len: usize, kind: FieldKind) -> Self {
        Self {
            field,
            offset,
            len,
            kind,
        }
    }

    pub const fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

/// Every field of the record, indexed by [`Field`].
pub static LAYOUT: [FieldSpec; Field::COUNT] = TABLE;

#[rustfmt::skip]
const TABLE: [FieldSpec; Field::COUNT] = [
    FieldSpec::new(Field::Version,        0,    4,   FieldKind::U32),
    FieldSpec::new(Field::BootLine,       4,    256, FieldKind::Text),
    FieldSpec::new(Field::BoardId,        260,  16,  FieldKind::Text),
    FieldSpec::new(Field::MainThread,     276,  4,   FieldKind::U32),
    FieldSpec::new(Field::PsiSize,        280,  4,   FieldKind::U32),
    FieldSpec::new(Field::NumMacAddr,     284,  4,   FieldKind::U32),
    FieldSpec::new(Field::BaseMacAddr,    288,  6,   FieldKind::Mac),
    FieldSpec::new(Field::Reserved,       294,  2,   FieldKind::Opaque),
    FieldSpec::new(Field::OldChecksum,    296,  4,   FieldKind::Checksum),
    FieldSpec::new(Field::SnVendorId,     300,  4,   FieldKind::Text),
    FieldSpec::new(Field::SnSerialId,     304,  9,   FieldKind::Text),
    FieldSpec::new(Field::SnPassword,     313,  11,  FieldKind::Text),
    FieldSpec::new(Field::WpsPin,         324,  8,   FieldKind::Opaque),
    FieldSpec::new(Field::WlanParams,     332,  256, FieldKind::Opaque),
    FieldSpec::new(Field::SyslogSize,     588,  4,   FieldKind::U32),
    FieldSpec::new(Field::NandPartOfsKb,  592,  20,  FieldKind::U32Array),
    FieldSpec::new(Field::NandPartSizeKb, 612,  20,  FieldKind::U32Array),
    FieldSpec::new(Field::VoiceBoardId,   632,  16,  FieldKind::Text),
    FieldSpec::new(Field::AfeId,          648,  8,   FieldKind::U32Array),
    FieldSpec::new(Field::Unused,         656,  364, FieldKind::Opaque),
    FieldSpec::new(Field::Checksum,       1020, 4,   FieldKind::Checksum),
];

// The table has to be indexed by `Field`, contiguous and cover the whole record.
const _: () = {
    let mut i = 0;
    let mut offset = 0;
    while i < TABLE.len() {
        assert!(TABLE[i].field as usize == i, "LAYOUT is not in Field order");
        assert!(TABLE[i].offset == offset, "LAYOUT has a gap or overlap");
        offset += TABLE[i].len;
        i += 1;
    }
    assert!(offset == RECORD_SIZE, "LAYOUT does not cover the record");
    assert!(TABLE[Field::Checksum as usize].offset == CHECKSUM_OFFSET);
};

impl Field {
    pub fn spec(self) -> &'static FieldSpec {
        &LAYOUT[self as usize]
    }

    pub fn range(self) -> Range<usize> {
        self.spec().range()
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}
