//! PMC interrupt aggregation.
//!
//! The device drives a single level-triggered line. Each unit (PBUS, PFIFO) latches its own status
//! bits; PMC folds the enabled ones into one bit per unit and gates the result with
//! `PMC_INTR_EN_0`.

use crate::regs::{McIntr, RegisterFile};

/// Folds per-unit latch/enable pairs into the `PMC_INTR_0` aggregate.
pub fn compose(bus_intr: u32, bus_intr_en: u32, fifo_intr: u32, fifo_intr_en: u32) -> McIntr {
    let mut pending = McIntr::empty();
    if bus_intr & bus_intr_en != 0 {
        pending |= McIntr::BUS;
    }
    if fifo_intr & fifo_intr_en != 0 {
        pending |= McIntr::FIFO;
    }
    pending
}

/// Aggregate status as read back from `PMC_INTR_0`.
pub fn pending(regs: &RegisterFile) -> McIntr {
    compose(
        regs.bus_intr,
        regs.bus_intr_en,
        regs.fifo_intr,
        regs.fifo_intr_en,
    )
}

/// Interrupt line level for the current register state.
pub fn line_level(regs: &RegisterFile) -> bool {
    pending(regs).bits() & regs.mc_intr_en != 0
}

/// Sink for the device's interrupt line (INTx in a PCI host).
pub trait IrqLine {
    fn set_level(&mut self, level: bool);
}

/// Line that goes nowhere. Hosts that poll [`crate::GeForceDevice::irq_level`] can use this.
#[derive(Debug, Default)]
pub struct NullIrqLine;

impl IrqLine for NullIrqLine {
    fn set_level(&mut self, _level: bool) {}
}
