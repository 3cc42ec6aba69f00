//! VRAM provider contract and the device's bounded accessors into it.
//!
//! Two views are layered on the same region:
//! - DMA object access (`object + offset`) used by the semaphore path, and
//! - the RAMIN instance-memory window, which occupies the top `ramin_size` bytes of VRAM and is
//!   addressed from zero.
//!
//! Out-of-range accesses through either view read as 0 and drop writes. They never grow the region.

use tracing::{debug, trace};

use crate::error::{DeviceInitError, VramError};

/// Linear device memory with a fixed size.
///
/// The display path reads from the same region, so implementations must tolerate reads that race
/// with device writes on the host side (last writer wins).
pub trait VramRegion {
    fn size(&self) -> u64;

    fn read(&self, offset: u64, dst: &mut [u8]) -> Result<(), VramError>;

    fn write(&mut self, offset: u64, src: &[u8]) -> Result<(), VramError>;

    fn read_u32(&self, offset: u64) -> Result<u32, VramError> {
        let mut buf = [0u8; 4];
        self.read(offset, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn write_u32(&mut self, offset: u64, value: u32) -> Result<(), VramError> {
        self.write(offset, &value.to_le_bytes())
    }
}

fn check_range(size: u64, offset: u64, len: usize) -> Result<std::ops::Range<usize>, VramError> {
    let err = VramError::OutOfRange { offset, len, size };
    let end = offset.checked_add(len as u64).ok_or(err)?;
    if end > size {
        return Err(err);
    }
    // `end <= size` and `size` came from a `Vec` length, so both fit in usize.
    Ok(offset as usize..end as usize)
}

/// Heap-backed VRAM.
#[derive(Clone)]
pub struct DenseVram {
    bytes: Vec<u8>,
}

impl DenseVram {
    pub fn new(size: u64) -> Result<Self, DeviceInitError> {
        if size == 0 {
            return Err(DeviceInitError::EmptyVram);
        }
        let len = usize::try_from(size).map_err(|_| DeviceInitError::VramAllocation { bytes: size })?;
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(len)
            .map_err(|_| DeviceInitError::VramAllocation { bytes: size })?;
        bytes.resize(len, 0);
        Ok(Self { bytes })
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for DenseVram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DenseVram")
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl VramRegion for DenseVram {
    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn read(&self, offset: u64, dst: &mut [u8]) -> Result<(), VramError> {
        let range = check_range(self.size(), offset, dst.len())?;
        dst.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    fn write(&mut self, offset: u64, src: &[u8]) -> Result<(), VramError> {
        let range = check_range(self.size(), offset, src.len())?;
        self.bytes[range].copy_from_slice(src);
        Ok(())
    }
}

fn dma_address(object: u32, offset: u32) -> u64 {
    u64::from(object) + u64::from(offset)
}

/// Reads a dword from DMA object `object` at byte `offset`. Out-of-range reads return 0.
pub fn dma_read32(vram: &dyn VramRegion, object: u32, offset: u32) -> u32 {
    let addr = dma_address(object, offset);
    match vram.read_u32(addr) {
        Ok(value) => value,
        Err(err) => {
            trace!(object, offset, %err, "dma read dropped");
            0
        }
    }
}

/// Writes a dword into DMA object `object` at byte `offset`. Out-of-range writes are dropped.
pub fn dma_write32(vram: &mut dyn VramRegion, object: u32, offset: u32, value: u32) {
    let addr = dma_address(object, offset);
    if let Err(err) = vram.write_u32(addr, value) {
        trace!(object, offset, value, %err, "dma write dropped");
    }
}

/// The RAMIN instance-memory window at the top of VRAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaminWindow {
    size: u64,
}

impl RaminWindow {
    pub fn new(size: u64, vram_size: u64) -> Result<Self, DeviceInitError> {
        if size > vram_size {
            return Err(DeviceInitError::RaminLargerThanVram {
                ramin: size,
                vram: vram_size,
            });
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// VRAM offset backing `addr..addr + len` in the window, if the whole access fits.
    pub fn translate(&self, vram_size: u64, addr: u64, len: usize) -> Option<u64> {
        let end = addr.checked_add(len as u64)?;
        if end > self.size || self.size > vram_size {
            return None;
        }
        Some(vram_size - self.size + addr)
    }

    fn access_len(size: usize) -> Option<usize> {
        matches!(size, 1 | 4).then_some(size)
    }

    pub fn read(&self, vram: &dyn VramRegion, addr: u64, size: usize) -> u32 {
        let Some(len) = Self::access_len(size) else {
            debug!(addr, size, "unsupported ramin read size");
            return 0;
        };
        let Some(vram_offset) = self.translate(vram.size(), addr, len) else {
            debug!(addr, size, "ramin read out of bounds");
            return 0;
        };
        let mut buf = [0u8; 4];
        if vram.read(vram_offset, &mut buf[..len]).is_err() {
            return 0;
        }
        u32::from_le_bytes(buf)
    }

    pub fn write(&self, vram: &mut dyn VramRegion, addr: u64, size: usize, value: u32) {
        let Some(len) = Self::access_len(size) else {
            debug!(addr, size, "unsupported ramin write size");
            return;
        };
        let Some(vram_offset) = self.translate(vram.size(), addr, len) else {
            debug!(addr, size, value, "ramin write out of bounds");
            return;
        };
        let bytes = value.to_le_bytes();
        let _ = vram.write(vram_offset, &bytes[..len]);
    }
}
