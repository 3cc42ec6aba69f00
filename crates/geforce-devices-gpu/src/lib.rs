//! GeForce3 (NV2x) device-side register model.
//!
//! This crate models the "hardware" view of an NV2x-class graphics accelerator at the register
//! level: the BAR0 register bank, the PMC interrupt aggregation, the PFIFO cache1 "kick", and a
//! small per-channel command dispatcher that routes methods to behavioural engine models.
//!
//! The main entry point is [`device::GeForceDevice`], which exposes:
//! - BAR0 register reads/writes ([`GeForceDevice::mmio_read`] / [`GeForceDevice::mmio_write`]),
//! - the RAMIN instance-memory window carved from the top of VRAM, and
//! - a command-injection surface for the FIFO collaborator and tests.
//!
//! Legacy VGA, PCI config space and host machine wiring are not modelled here; hosts consume the
//! device through the collaborator traits in [`vram`], [`display`] and [`irq`].
#![forbid(unsafe_code)]

pub mod channel;
pub mod config;
pub mod device;
pub mod dispatch;
pub mod display;
pub mod engines;
pub mod error;
pub mod fifo;
pub mod irq;
pub mod regs;
pub mod vram;

pub use channel::{
    bytes_per_pixel, Channel, ChannelTable, D3dState, Surf2dState, CHANNEL_COUNT,
    SUBCHANNEL_COUNT,
};
pub use config::{GeForceDeviceConfig, GeForceModel, DEFAULT_RAMIN_SIZE_BYTES, MODELS};
pub use device::GeForceDevice;
pub use dispatch::{Command, DispatchEffect};
pub use display::{DisplaySink, NullDisplaySink};
pub use engines::{kelvin, surf2d, EngineClass};
pub use error::{DeviceInitError, DispatchError, VramError};
pub use fifo::{CommandFetch, NullCommandFetch, QueuedCommandFetch, SemaphoreObjectFetch};
pub use irq::{IrqLine, NullIrqLine};
pub use regs::{fifo_intr_bits, mmio, push1, McIntr, Register, RegisterFile, MMIO_SIZE_BYTES};
pub use vram::{DenseVram, RaminWindow, VramRegion};
