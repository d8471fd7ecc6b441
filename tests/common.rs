#![allow(dead_code)]

// filename according to https://doc.rust-lang.org/book/ch11-03-test-organization.html
use embedded_storage::nor_flash::{ErrorType, NorFlashError, NorFlashErrorKind, ReadNorFlash};
use sfu_nvram::{BOARD_ID_SENTINEL, CHECKSUM_OFFSET, Field, IMAGE_MIN_LEN, NVRAM_OFFSET};

/// Size of the mtdblock3 partition on the device.
pub const DUMP_SIZE: usize = 64 * 1024;

/// A flash dump whose record carries the UBNT_SFU board id, a plausible identity and a valid
/// checksum. Everything outside the record is filled with a position dependent pattern so that
/// stray writes show up.
pub fn dump(len: usize) -> Vec<u8> {
    assert!(len >= IMAGE_MIN_LEN);
    let mut image: Vec<u8> = (0..len).map(|i| (i % 253) as u8).collect();
    let record = &mut image[NVRAM_OFFSET..IMAGE_MIN_LEN];
    record.fill(0);

    record[Field::Version.range()].copy_from_slice(&6u32.to_be_bytes());
    record[4..4 + 29].copy_from_slice(b"e=192.168.1.1:ffffff00 h=192.");
    record[Field::BoardId.range()].copy_from_slice(&BOARD_ID_SENTINEL);
    record[Field::MainThread.range()].copy_from_slice(&1u32.to_be_bytes());
    record[Field::PsiSize.range()].copy_from_slice(&64u32.to_be_bytes());
    record[Field::NumMacAddr.range()].copy_from_slice(&10u32.to_be_bytes());
    record[Field::BaseMacAddr.range()].copy_from_slice(&[0x78, 0x8A, 0x20, 0x11, 0x22, 0x33]);
    record[Field::SnVendorId.range()].copy_from_slice(b"UBNT");
    record[Field::SnSerialId.range()].copy_from_slice(b"788A2011\0");
    record[Field::SnPassword.range()].copy_from_slice(b"1234567890\0");
    record[Field::WpsPin.range()].copy_from_slice(b"12345670");
    record[Field::SyslogSize.range()].copy_from_slice(&16u32.to_be_bytes());
    record[Field::VoiceBoardId.range()][..4].copy_from_slice(b"NONE");
    for (i, byte) in record[Field::WlanParams.range()].iter_mut().enumerate() {
        *byte = i as u8;
    }
    reseal(&mut image);
    image
}

/// Same as [`dump`] with another board id.
pub fn dump_with_board_id(len: usize, board_id: &[u8]) -> Vec<u8> {
    let mut image = dump(len);
    let range = Field::BoardId.range();
    let field = &mut image[NVRAM_OFFSET + range.start..NVRAM_OFFSET + range.end];
    field.fill(0);
    field[..board_id.len()].copy_from_slice(board_id);
    reseal(&mut image);
    image
}

/// Recompute the checksum of the record in `image`.
pub fn reseal(image: &mut [u8]) {
    let record = &mut image[NVRAM_OFFSET..IMAGE_MIN_LEN];
    let crc = sfu_nvram::checksum(&record[..CHECKSUM_OFFSET]);
    record[CHECKSUM_OFFSET..].copy_from_slice(&crc.to_be_bytes());
}

pub fn record_of(image: &[u8]) -> &[u8] {
    &image[NVRAM_OFFSET..IMAGE_MIN_LEN]
}

#[derive(Default)]
pub struct Flash {
    pub buf: Vec<u8>,
    pub fail_after_operation: usize,
    pub operations: Vec<Operation>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Operation {
    Read { offset: u32, len: usize },
}

impl Flash {
    pub fn new(buf: Vec<u8>) -> Self {
        Self {
            buf,
            fail_after_operation: usize::MAX,
            ..Default::default()
        }
    }

    pub fn new_with_fault(buf: Vec<u8>, fail_after_operation: usize) -> Self {
        Self {
            buf,
            fail_after_operation,
            ..Default::default()
        }
    }
}

#[derive(Debug)]
pub struct FlashError;

impl NorFlashError for FlashError {
    fn kind(&self) -> NorFlashErrorKind {
        NorFlashErrorKind::Other
    }
}

impl ErrorType for Flash {
    type Error = FlashError;
}

impl ReadNorFlash for Flash {
    const READ_SIZE: usize = 4;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        read(self, Self::READ_SIZE, offset, bytes)
    }

    fn capacity(&self) -> usize {
        self.buf.len()
    }
}

/// A device that only reads whole 256 byte pages.
pub struct PageFlash(pub Flash);

impl ErrorType for PageFlash {
    type Error = FlashError;
}

impl ReadNorFlash for PageFlash {
    const READ_SIZE: usize = 256;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        read(&mut self.0, Self::READ_SIZE, offset, bytes)
    }

    fn capacity(&self) -> usize {
        self.0.buf.len()
    }
}

fn read(
    flash: &mut Flash,
    read_size: usize,
    offset: u32,
    bytes: &mut [u8],
) -> Result<(), FlashError> {
    assert!(offset.is_multiple_of(read_size as _));
    assert!(bytes.len().is_multiple_of(read_size));

    println!(
        "    flash: read:  0x{offset:04X}[0x{:04X}] #{:>2}",
        bytes.len(),
        flash.operations.len()
    );
    if flash.operations.len() >= flash.fail_after_operation {
        println!("    flash: FAULT");
        return Err(FlashError);
    }
    flash.operations.push(Operation::Read {
        offset,
        len: bytes.len(),
    });

    let offset = offset as usize;
    bytes.copy_from_slice(&flash.buf[offset..offset + bytes.len()]);
    Ok(())
}
