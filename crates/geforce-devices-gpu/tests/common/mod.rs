#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use geforce_devices_gpu::{
    DenseVram, DisplaySink, GeForceDevice, GeForceDeviceConfig, IrqLine,
};

/// Records every level driven onto the interrupt line.
#[derive(Clone, Default)]
pub struct RecordingIrq {
    pub levels: Rc<RefCell<Vec<bool>>>,
}

impl RecordingIrq {
    pub fn last(&self) -> Option<bool> {
        self.levels.borrow().last().copied()
    }
}

impl IrqLine for RecordingIrq {
    fn set_level(&mut self, level: bool) {
        self.levels.borrow_mut().push(level);
    }
}

/// Counts full-frame invalidations.
#[derive(Clone, Default)]
pub struct CountingDisplay {
    pub invalidations: Rc<RefCell<u32>>,
}

impl CountingDisplay {
    pub fn count(&self) -> u32 {
        *self.invalidations.borrow()
    }
}

impl DisplaySink for CountingDisplay {
    fn invalidate_full(&mut self) {
        *self.invalidations.borrow_mut() += 1;
    }
}

pub const TEST_VRAM_BYTES: u64 = 0x10_0000;
pub const TEST_RAMIN_BYTES: u64 = 0x1_0000;

pub fn new_test_device() -> (GeForceDevice, RecordingIrq, CountingDisplay) {
    let irq = RecordingIrq::default();
    let display = CountingDisplay::default();
    let dev = GeForceDevice::with_collaborators(
        GeForceDeviceConfig {
            ramin_size_bytes: TEST_RAMIN_BYTES,
            ..Default::default()
        },
        Box::new(DenseVram::new(TEST_VRAM_BYTES).unwrap()),
        Box::new(display.clone()),
        Box::new(irq.clone()),
    )
    .unwrap();
    (dev, irq, display)
}
