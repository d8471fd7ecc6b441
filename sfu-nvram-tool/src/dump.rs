use std::fs;
use std::path::Path;

use sha2::{
    Digest,
    Sha256,
};
use sfu_nvram::{
    IdentityPatch,
    NvramRecord,
};

use crate::error::Error;

/// A raw `mtdblock3` flash dump held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dump {
    data: Vec<u8>,
}

impl Dump {
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Read a dump from the file at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Ok(Self::from_bytes(fs::read(path)?))
    }

    /// Write the dump to `path`, replacing any existing file.
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        fs::write(path, &self.data)?;
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// SHA-256 of the whole dump as lowercase hex, for the audit log.
    pub fn sha256(&self) -> String {
        hex::encode(Sha256::digest(&self.data))
    }

    /// Decode the NVRAM record of this dump.
    pub fn record(&self) -> Result<NvramRecord, Error> {
        Ok(sfu_nvram::decode(&self.data)?)
    }

    /// Return a patched copy of this dump.
    pub fn patched(&self, patch: &IdentityPatch) -> Result<Self, Error> {
        Ok(Self::from_bytes(patch.apply(&self.data)?))
    }
}
