//! Reading the dump straight from a NOR flash device.

use crate::error::Error;
use crate::layout::{IMAGE_MIN_LEN, NVRAM_OFFSET, RECORD_SIZE};
use crate::record::NvramRecord;
use alloc::vec;
use alloc::vec::Vec;
#[cfg(feature = "defmt")]
use defmt::trace;
use embedded_storage::nor_flash::ReadNorFlash;

/// Largest single read issued to the device.
const READ_CHUNK: usize = 4096;

/// Read the whole device into memory.
///
/// Every read is aligned to `F::READ_SIZE`; a device whose capacity is not a multiple of it is
/// rejected before anything is read.
pub fn read_image<F: ReadNorFlash>(flash: &mut F) -> Result<Vec<u8>, Error> {
    let capacity = flash.capacity();
    if !capacity.is_multiple_of(F::READ_SIZE) {
        return Err(Error::UnalignedCapacity {
            capacity,
            read_size: F::READ_SIZE,
        });
    }

    #[cfg(feature = "defmt")]
    trace!("read_image: {} bytes", capacity);

    let chunk = align_floor(READ_CHUNK, F::READ_SIZE).max(F::READ_SIZE);
    let mut image = vec![0u8; capacity];
    for (i, buf) in image.chunks_mut(chunk).enumerate() {
        flash
            .read((i * chunk) as u32, buf)
            .map_err(|_| Error::FlashError)?;
    }
    Ok(image)
}

/// Read and decode only the NVRAM record. The read window is widened to the device's read
/// alignment.
pub fn read_record<F: ReadNorFlash>(flash: &mut F) -> Result<NvramRecord, Error> {
    let start = align_floor(NVRAM_OFFSET, F::READ_SIZE);
    let end = align_ceil(IMAGE_MIN_LEN, F::READ_SIZE);
    if end > flash.capacity() {
        return Err(Error::TruncatedImage(flash.capacity()));
    }

    #[cfg(feature = "debug-logs")]
    println!("flash: read_record: 0x{start:04X}..0x{end:04X}");

    let mut window = vec![0u8; end - start];
    flash
        .read(start as u32, &mut window)
        .map_err(|_| Error::FlashError)?;

    let skip = NVRAM_OFFSET - start;
    let record: &[u8; RECORD_SIZE] = window[skip..skip + RECORD_SIZE]
        .try_into()
        .map_err(|_| Error::TruncatedImage(flash.capacity()))?;
    Ok(NvramRecord::decode(record))
}

#[inline(always)]
const fn align_ceil(size: usize, alignment: usize) -> usize {
    size.saturating_add(alignment - 1) / alignment * alignment
}

#[inline(always)]
const fn align_floor(size: usize, alignment: usize) -> usize {
    size / alignment * alignment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment() {
        assert_eq!(align_floor(NVRAM_OFFSET, 4), 1408);
        assert_eq!(align_ceil(IMAGE_MIN_LEN, 4), 2432);
        assert_eq!(align_floor(NVRAM_OFFSET, 256), 1280);
        assert_eq!(align_ceil(IMAGE_MIN_LEN, 256), 2560);
        assert_eq!(align_ceil(IMAGE_MIN_LEN, 3), 2433);
    }
}
