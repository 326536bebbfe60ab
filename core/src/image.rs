// In-memory volume image
// Every read and write is bounds-checked so a malformed BPB can never index past the buffer

use byteorder::{ByteOrder, LittleEndian};
use crate::FatmendError;

/// An owned, mutable copy of a whole FAT32 volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteImage {
    data: Vec<u8>,
}

impl ByteImage {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// A zero-filled image of `len` bytes.
    pub fn zeroed(len: usize) -> Self {
        Self { data: vec![0u8; len] }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    /// True when `len` bytes starting at `offset` lie inside the image.
    pub fn contains(&self, offset: usize, len: usize) -> bool {
        offset
            .checked_add(len)
            .map_or(false, |end| end <= self.data.len())
    }

    fn check(&self, offset: usize, len: usize) -> Result<(), FatmendError> {
        if self.contains(offset, len) {
            Ok(())
        } else {
            Err(FatmendError::OutOfRange {
                offset: offset as u64,
                len,
                image_len: self.data.len(),
            })
        }
    }

    pub fn slice(&self, offset: usize, len: usize) -> Result<&[u8], FatmendError> {
        self.check(offset, len)?;
        Ok(&self.data[offset..offset + len])
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, FatmendError> {
        self.check(offset, 1)?;
        Ok(self.data[offset])
    }

    pub fn read_u16_le(&self, offset: usize) -> Result<u16, FatmendError> {
        Ok(LittleEndian::read_u16(self.slice(offset, 2)?))
    }

    pub fn read_u32_le(&self, offset: usize) -> Result<u32, FatmendError> {
        Ok(LittleEndian::read_u32(self.slice(offset, 4)?))
    }

    pub fn write_u8(&mut self, offset: usize, value: u8) -> Result<(), FatmendError> {
        self.check(offset, 1)?;
        self.data[offset] = value;
        Ok(())
    }

    /// Copy `len` bytes from `src` to `dst`. Overlapping ranges are handled like `memmove`.
    pub fn copy_within(&mut self, src: usize, dst: usize, len: usize) -> Result<(), FatmendError> {
        self.check(src, len)?;
        self.check(dst, len)?;
        self.data.copy_within(src..src + len, dst);
        Ok(())
    }
}

impl From<Vec<u8>> for ByteImage {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl AsRef<[u8]> for ByteImage {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
