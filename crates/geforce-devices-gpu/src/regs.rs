//! BAR0 register map and the backing register file.
//!
//! Only the PMC, PBUS and PFIFO registers the driver touches during bring-up are modelled. Every
//! other offset decodes to `None`: reads return 0 and writes are ignored.

use bitflags::bitflags;

use crate::irq;

/// Size of the BAR0 register aperture.
pub const MMIO_SIZE_BYTES: u64 = 0x100_0000;

/// BAR0 register offsets.
pub mod mmio {
    pub const PMC_INTR_0: u64 = 0x0000_0100;
    pub const PMC_INTR_EN_0: u64 = 0x0000_0140;
    pub const PMC_ENABLE: u64 = 0x0000_0200;

    pub const PBUS_INTR_0: u64 = 0x0000_1100;
    pub const PBUS_INTR_EN_0: u64 = 0x0000_1140;

    pub const PFIFO_INTR_0: u64 = 0x0000_2100;
    pub const PFIFO_INTR_EN_0: u64 = 0x0000_2140;
    pub const PFIFO_RAMHT: u64 = 0x0000_2210;
    pub const PFIFO_RAMFC: u64 = 0x0000_2214;
    pub const PFIFO_RAMRO: u64 = 0x0000_2218;
    pub const PFIFO_MODE: u64 = 0x0000_2504;
    pub const PFIFO_CACHE1_PUSH1: u64 = 0x0000_3204;
    pub const PFIFO_CACHE1_PUT: u64 = 0x0000_3210;
    pub const PFIFO_CACHE1_DMA_PUSH: u64 = 0x0000_3220;
    pub const PFIFO_CACHE1_DMA_INSTANCE: u64 = 0x0000_3224;
    pub const PFIFO_CACHE1_DMA_PUT: u64 = 0x0000_3240;
    pub const PFIFO_CACHE1_DMA_GET: u64 = 0x0000_3244;
    pub const PFIFO_CACHE1_REF_CNT: u64 = 0x0000_3248;
    pub const PFIFO_CACHE1_PULL0: u64 = 0x0000_3250;
    pub const PFIFO_CACHE1_SEMAPHORE: u64 = 0x0000_3254;
}

bitflags! {
    /// Aggregate interrupt sources reported through `PMC_INTR_0` and gated by `PMC_INTR_EN_0`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct McIntr: u32 {
        const BUS = 1 << 0;
        const FIFO = 1 << 8;
    }
}

/// `PFIFO_INTR_0` latch bits.
pub mod fifo_intr_bits {
    /// Cache1 rejected a method (bad channel/subchannel/class/method).
    pub const CACHE_ERROR: u32 = 1 << 0;
}

/// `PFIFO_CACHE1_PUSH1` fields.
pub mod push1 {
    /// Pusher enable. A `CACHE1_PUT` write only kicks the FIFO while this is set.
    pub const ENABLE: u32 = 1 << 0;
    /// Channel id of the active pusher.
    pub const CHID_MASK: u32 = 0x1f;
}

/// Named BAR0 registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Register {
    McIntr,
    McIntrEn,
    McEnable,
    BusIntr,
    BusIntrEn,
    FifoIntr,
    FifoIntrEn,
    FifoRamht,
    FifoRamfc,
    FifoRamro,
    FifoMode,
    Cache1Push1,
    Cache1Put,
    Cache1DmaPush,
    Cache1DmaInstance,
    Cache1DmaPut,
    Cache1DmaGet,
    Cache1RefCnt,
    Cache1Pull0,
    Cache1Semaphore,
}

impl Register {
    pub const ALL: [Register; 20] = [
        Register::McIntr,
        Register::McIntrEn,
        Register::McEnable,
        Register::BusIntr,
        Register::BusIntrEn,
        Register::FifoIntr,
        Register::FifoIntrEn,
        Register::FifoRamht,
        Register::FifoRamfc,
        Register::FifoRamro,
        Register::FifoMode,
        Register::Cache1Push1,
        Register::Cache1Put,
        Register::Cache1DmaPush,
        Register::Cache1DmaInstance,
        Register::Cache1DmaPut,
        Register::Cache1DmaGet,
        Register::Cache1RefCnt,
        Register::Cache1Pull0,
        Register::Cache1Semaphore,
    ];

    pub fn decode(offset: u64) -> Option<Self> {
        let reg = match offset {
            mmio::PMC_INTR_0 => Register::McIntr,
            mmio::PMC_INTR_EN_0 => Register::McIntrEn,
            mmio::PMC_ENABLE => Register::McEnable,
            mmio::PBUS_INTR_0 => Register::BusIntr,
            mmio::PBUS_INTR_EN_0 => Register::BusIntrEn,
            mmio::PFIFO_INTR_0 => Register::FifoIntr,
            mmio::PFIFO_INTR_EN_0 => Register::FifoIntrEn,
            mmio::PFIFO_RAMHT => Register::FifoRamht,
            mmio::PFIFO_RAMFC => Register::FifoRamfc,
            mmio::PFIFO_RAMRO => Register::FifoRamro,
            mmio::PFIFO_MODE => Register::FifoMode,
            mmio::PFIFO_CACHE1_PUSH1 => Register::Cache1Push1,
            mmio::PFIFO_CACHE1_PUT => Register::Cache1Put,
            mmio::PFIFO_CACHE1_DMA_PUSH => Register::Cache1DmaPush,
            mmio::PFIFO_CACHE1_DMA_INSTANCE => Register::Cache1DmaInstance,
            mmio::PFIFO_CACHE1_DMA_PUT => Register::Cache1DmaPut,
            mmio::PFIFO_CACHE1_DMA_GET => Register::Cache1DmaGet,
            mmio::PFIFO_CACHE1_REF_CNT => Register::Cache1RefCnt,
            mmio::PFIFO_CACHE1_PULL0 => Register::Cache1Pull0,
            mmio::PFIFO_CACHE1_SEMAPHORE => Register::Cache1Semaphore,
            _ => return None,
        };
        Some(reg)
    }

    pub const fn offset(self) -> u64 {
        match self {
            Register::McIntr => mmio::PMC_INTR_0,
            Register::McIntrEn => mmio::PMC_INTR_EN_0,
            Register::McEnable => mmio::PMC_ENABLE,
            Register::BusIntr => mmio::PBUS_INTR_0,
            Register::BusIntrEn => mmio::PBUS_INTR_EN_0,
            Register::FifoIntr => mmio::PFIFO_INTR_0,
            Register::FifoIntrEn => mmio::PFIFO_INTR_EN_0,
            Register::FifoRamht => mmio::PFIFO_RAMHT,
            Register::FifoRamfc => mmio::PFIFO_RAMFC,
            Register::FifoRamro => mmio::PFIFO_RAMRO,
            Register::FifoMode => mmio::PFIFO_MODE,
            Register::Cache1Push1 => mmio::PFIFO_CACHE1_PUSH1,
            Register::Cache1Put => mmio::PFIFO_CACHE1_PUT,
            Register::Cache1DmaPush => mmio::PFIFO_CACHE1_DMA_PUSH,
            Register::Cache1DmaInstance => mmio::PFIFO_CACHE1_DMA_INSTANCE,
            Register::Cache1DmaPut => mmio::PFIFO_CACHE1_DMA_PUT,
            Register::Cache1DmaGet => mmio::PFIFO_CACHE1_DMA_GET,
            Register::Cache1RefCnt => mmio::PFIFO_CACHE1_REF_CNT,
            Register::Cache1Pull0 => mmio::PFIFO_CACHE1_PULL0,
            Register::Cache1Semaphore => mmio::PFIFO_CACHE1_SEMAPHORE,
        }
    }

    /// Whether a register write can change the interrupt line.
    pub const fn affects_irq(self) -> bool {
        matches!(
            self,
            Register::McIntr
                | Register::McIntrEn
                | Register::BusIntr
                | Register::BusIntrEn
                | Register::FifoIntr
                | Register::FifoIntrEn
        )
    }
}

/// Backing storage for every modelled register.
///
/// `PMC_INTR_0` has no storage of its own; it is a view composed from the PBUS/PFIFO latches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterFile {
    pub mc_intr_en: u32,
    pub mc_enable: u32,
    pub bus_intr: u32,
    pub bus_intr_en: u32,

    pub fifo_intr: u32,
    pub fifo_intr_en: u32,
    pub fifo_ramht: u32,
    pub fifo_ramfc: u32,
    pub fifo_ramro: u32,
    pub fifo_mode: u32,
    pub cache1_push1: u32,
    pub cache1_put: u32,
    pub cache1_dma_push: u32,
    pub cache1_dma_instance: u32,
    pub cache1_dma_put: u32,
    pub cache1_dma_get: u32,
    pub cache1_ref_cnt: u32,
    pub cache1_pull0: u32,
    pub cache1_semaphore: u32,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Power-on register state: everything zero except `PMC_ENABLE` and `PFIFO_MODE`.
    pub fn new() -> Self {
        Self {
            mc_intr_en: 0,
            mc_enable: 0x1,
            bus_intr: 0,
            bus_intr_en: 0,
            fifo_intr: 0,
            fifo_intr_en: 0,
            fifo_ramht: 0,
            fifo_ramfc: 0,
            fifo_ramro: 0,
            fifo_mode: 0x1,
            cache1_push1: 0,
            cache1_put: 0,
            cache1_dma_push: 0,
            cache1_dma_instance: 0,
            cache1_dma_put: 0,
            cache1_dma_get: 0,
            cache1_ref_cnt: 0,
            cache1_pull0: 0,
            cache1_semaphore: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn load(&self, reg: Register) -> u32 {
        match reg {
            Register::McIntr => irq::pending(self).bits(),
            Register::McIntrEn => self.mc_intr_en,
            Register::McEnable => self.mc_enable,
            Register::BusIntr => self.bus_intr,
            Register::BusIntrEn => self.bus_intr_en,
            Register::FifoIntr => self.fifo_intr,
            Register::FifoIntrEn => self.fifo_intr_en,
            Register::FifoRamht => self.fifo_ramht,
            Register::FifoRamfc => self.fifo_ramfc,
            Register::FifoRamro => self.fifo_ramro,
            Register::FifoMode => self.fifo_mode,
            Register::Cache1Push1 => self.cache1_push1,
            Register::Cache1Put => self.cache1_put,
            Register::Cache1DmaPush => self.cache1_dma_push,
            Register::Cache1DmaInstance => self.cache1_dma_instance,
            Register::Cache1DmaPut => self.cache1_dma_put,
            Register::Cache1DmaGet => self.cache1_dma_get,
            Register::Cache1RefCnt => self.cache1_ref_cnt,
            Register::Cache1Pull0 => self.cache1_pull0,
            Register::Cache1Semaphore => self.cache1_semaphore,
        }
    }

    /// Applies a software write to `reg`.
    ///
    /// Status registers are never set from a write: `PMC_INTR_0` is write-1-to-clear over the
    /// aggregate bits, and `PBUS_INTR_0`/`PFIFO_INTR_0` clear whichever latch bits are written.
    /// Side effects beyond storage (IRQ re-drive, FIFO kick) belong to the caller.
    pub fn store(&mut self, reg: Register, value: u32) {
        match reg {
            Register::McIntr => self.acknowledge(McIntr::from_bits_truncate(value)),
            Register::McIntrEn => self.mc_intr_en = value,
            Register::McEnable => self.mc_enable = value,
            Register::BusIntr => self.bus_intr &= !value,
            Register::BusIntrEn => self.bus_intr_en = value,
            Register::FifoIntr => self.fifo_intr &= !value,
            Register::FifoIntrEn => self.fifo_intr_en = value,
            Register::FifoRamht => self.fifo_ramht = value,
            Register::FifoRamfc => self.fifo_ramfc = value,
            Register::FifoRamro => self.fifo_ramro = value,
            Register::FifoMode => self.fifo_mode = value,
            Register::Cache1Push1 => self.cache1_push1 = value,
            Register::Cache1Put => self.cache1_put = value,
            Register::Cache1DmaPush => self.cache1_dma_push = value,
            Register::Cache1DmaInstance => self.cache1_dma_instance = value,
            Register::Cache1DmaPut => self.cache1_dma_put = value,
            Register::Cache1DmaGet => self.cache1_dma_get = value,
            Register::Cache1RefCnt => self.cache1_ref_cnt = value,
            Register::Cache1Pull0 => self.cache1_pull0 = value,
            Register::Cache1Semaphore => self.cache1_semaphore = value,
        }
    }

    /// Write-1-to-clear over the `PMC_INTR_0` view: each aggregate bit clears its whole source
    /// latch.
    pub fn acknowledge(&mut self, bits: McIntr) {
        if bits.contains(McIntr::BUS) {
            self.bus_intr = 0;
        }
        if bits.contains(McIntr::FIFO) {
            self.fifo_intr = 0;
        }
    }

    pub fn latch_bus_intr(&mut self, bits: u32) {
        self.bus_intr |= bits;
    }

    pub fn latch_fifo_intr(&mut self, bits: u32) {
        self.fifo_intr |= bits;
    }

    /// Pusher enable bit of `PFIFO_CACHE1_PUSH1`.
    pub fn push_enabled(&self) -> bool {
        self.cache1_push1 & push1::ENABLE != 0
    }

    /// Channel id selected by `PFIFO_CACHE1_PUSH1`.
    pub fn push_channel(&self) -> u32 {
        self.cache1_push1 & push1::CHID_MASK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_is_inverse_of_offset() {
        for reg in Register::ALL {
            assert_eq!(Register::decode(reg.offset()), Some(reg), "{reg:?}");
        }
    }

    #[test]
    fn unknown_and_unaligned_offsets_do_not_decode() {
        assert_eq!(Register::decode(0), None);
        assert_eq!(Register::decode(mmio::PMC_INTR_0 + 1), None);
        assert_eq!(Register::decode(mmio::PFIFO_CACHE1_PUT + 2), None);
        assert_eq!(Register::decode(MMIO_SIZE_BYTES), None);
    }

    #[test]
    fn power_on_defaults() {
        let regs = RegisterFile::new();
        assert_eq!(regs.mc_enable, 1);
        assert_eq!(regs.fifo_mode, 1);
        for reg in Register::ALL {
            match reg {
                Register::McEnable | Register::FifoMode => {}
                _ => assert_eq!(regs.load(reg), 0, "{reg:?}"),
            }
        }
    }

    #[test]
    fn status_writes_only_clear_bits() {
        let mut regs = RegisterFile::new();
        regs.store(Register::BusIntr, 0xffff_ffff);
        regs.store(Register::FifoIntr, 0xffff_ffff);
        assert_eq!(regs.bus_intr, 0);
        assert_eq!(regs.fifo_intr, 0);

        regs.latch_bus_intr(0b1011);
        regs.store(Register::BusIntr, 0b0010);
        assert_eq!(regs.bus_intr, 0b1001);

        regs.latch_fifo_intr(0xf0);
        regs.store(Register::FifoIntr, 0x30);
        assert_eq!(regs.fifo_intr, 0xc0);
    }

    #[test]
    fn mc_intr_write_one_clears_whole_source_latch() {
        let mut regs = RegisterFile::new();
        regs.latch_bus_intr(0x5);
        regs.latch_fifo_intr(0x3);

        regs.store(Register::McIntr, McIntr::FIFO.bits());
        assert_eq!(regs.bus_intr, 0x5);
        assert_eq!(regs.fifo_intr, 0);

        regs.store(Register::McIntr, McIntr::BUS.bits() | 0x8000_0000);
        assert_eq!(regs.bus_intr, 0);
    }

    #[test]
    fn push1_fields() {
        let mut regs = RegisterFile::new();
        regs.store(Register::Cache1Push1, 0x0000_0107);
        assert!(regs.push_enabled());
        assert_eq!(regs.push_channel(), 7);

        regs.store(Register::Cache1Push1, 0x0000_001e);
        assert!(!regs.push_enabled());
        assert_eq!(regs.push_channel(), 30);
    }
}
