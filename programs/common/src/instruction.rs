//! Instruction data deserialization helpers
//!
//! Provides utilities for safely parsing instruction data from byte slices.
//! All functions perform bounds checking and return errors on invalid input.

use crate::error::LendingError;
use pinocchio::pubkey::Pubkey;

/// Read a u8 from instruction data
#[inline]
pub fn read_u8(data: &[u8], offset: usize) -> Result<u8, LendingError> {
    if offset >= data.len() {
        return Err(LendingError::InvalidInstruction);
    }
    Ok(data[offset])
}

/// Read a u16 (little-endian) from instruction data
#[inline]
pub fn read_u16(data: &[u8], offset: usize) -> Result<u16, LendingError> {
    if offset + 2 > data.len() {
        return Err(LendingError::InvalidInstruction);
    }
    let bytes = [data[offset], data[offset + 1]];
    Ok(u16::from_le_bytes(bytes))
}

/// Read a u32 (little-endian) from instruction data
#[inline]
pub fn read_u32(data: &[u8], offset: usize) -> Result<u32, LendingError> {
    if offset + 4 > data.len() {
        return Err(LendingError::InvalidInstruction);
    }
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[offset..offset + 4]);
    Ok(u32::from_le_bytes(bytes))
}

/// Read a u64 (little-endian) from instruction data
#[inline]
pub fn read_u64(data: &[u8], offset: usize) -> Result<u64, LendingError> {
    if offset + 8 > data.len() {
        return Err(LendingError::InvalidInstruction);
    }
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[offset..offset + 8]);
    Ok(u64::from_le_bytes(bytes))
}

/// Read an i64 (little-endian) from instruction data
#[inline]
pub fn read_i64(data: &[u8], offset: usize) -> Result<i64, LendingError> {
    if offset + 8 > data.len() {
        return Err(LendingError::InvalidInstruction);
    }
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[offset..offset + 8]);
    Ok(i64::from_le_bytes(bytes))
}

/// Read a fixed-size byte array from instruction data
#[inline]
pub fn read_bytes<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N], LendingError> {
    if offset + N > data.len() {
        return Err(LendingError::InvalidInstruction);
    }
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(&data[offset..offset + N]);
    Ok(bytes)
}

/// Read a pubkey (32 bytes) from instruction data
#[inline]
pub fn read_pubkey(data: &[u8], offset: usize) -> Result<Pubkey, LendingError> {
    let bytes: [u8; 32] = read_bytes(data, offset)?;
    Ok(Pubkey::from(bytes))
}

/// Instruction data reader with tracked offset
///
/// Provides a convenient way to sequentially read fields from instruction data
/// while automatically tracking the current offset.
pub struct InstructionReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> InstructionReader<'a> {
    /// Create a new instruction reader
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Get the current offset
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Get remaining bytes
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    /// Read a u8 and advance offset
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, LendingError> {
        let val = read_u8(self.data, self.offset)?;
        self.offset += 1;
        Ok(val)
    }

    /// Read a u16 and advance offset
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16, LendingError> {
        let val = read_u16(self.data, self.offset)?;
        self.offset += 2;
        Ok(val)
    }

    /// Read a u32 and advance offset
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32, LendingError> {
        let val = read_u32(self.data, self.offset)?;
        self.offset += 4;
        Ok(val)
    }

    /// Read a u64 and advance offset
    #[inline]
    pub fn read_u64(&mut self) -> Result<u64, LendingError> {
        let val = read_u64(self.data, self.offset)?;
        self.offset += 8;
        Ok(val)
    }

    /// Read an i64 and advance offset
    #[inline]
    pub fn read_i64(&mut self) -> Result<i64, LendingError> {
        let val = read_i64(self.data, self.offset)?;
        self.offset += 8;
        Ok(val)
    }

    /// Read a fixed-size byte array and advance offset
    #[inline]
    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N], LendingError> {
        let val = read_bytes(self.data, self.offset)?;
        self.offset += N;
        Ok(val)
    }

    /// Read a pubkey and advance offset
    #[inline]
    pub fn read_pubkey(&mut self) -> Result<Pubkey, LendingError> {
        let val = read_pubkey(self.data, self.offset)?;
        self.offset += 32;
        Ok(val)
    }
}
