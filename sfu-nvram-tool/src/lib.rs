//! Inspect and re-identify the NVRAM record of UBNT_SFU `mtdblock3` flash dumps.
//!
//! The device side (pulling the dump with `dd`, copying it back, rebooting) is not handled here;
//! the functions in this crate work on local files.

pub mod dump;
pub mod error;
pub mod report;

use std::path::Path;

pub use dump::Dump;
pub use error::Error;
pub use sfu_nvram::{
    IdentityPatch,
    MacAddress,
    NvramRecord,
    SerialNumber,
};

/// A decoded dump together with its digest.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub sha256: String,
    pub record: NvramRecord,
}

impl Inspection {
    pub fn of(dump: &Dump) -> Result<Self, Error> {
        Ok(Self {
            sha256: dump.sha256(),
            record: dump.record()?,
        })
    }
}

/// Make sure `dump` belongs to a UBNT_SFU board, apply `patch` and write the result to `output`.
/// Returns the inspection of the patched dump.
///
/// Nothing is written unless both the original and the patched dump carry the sentinel board
/// id; the second check is done by [`IdentityPatch::apply`].
pub fn reidentify<P: AsRef<Path>>(
    dump: &Dump,
    output: P,
    patch: &IdentityPatch,
) -> Result<Inspection, Error> {
    dump.record()?.check_sentinel()?;

    let patched_dump = dump.patched(patch)?;
    let patched = Inspection::of(&patched_dump)?;

    patched_dump.write_file(output)?;
    Ok(patched)
}
