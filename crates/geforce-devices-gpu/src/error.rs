use thiserror::Error;

/// Rejections surfaced by the command dispatcher.
///
/// A dispatch that returns any of these has not touched channel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("channel {0} out of range")]
    InvalidChannel(u32),
    #[error("subchannel {0} out of range")]
    InvalidSubchannel(u32),
    #[error("unknown engine class 0x{0:04x}")]
    UnknownEngineClass(u32),
    #[error("engine class 0x{class:04x} has no method 0x{method:04x}")]
    UnknownMethod { class: u32, method: u32 },
    #[error("channel {channel} subchannel {subchannel} has no bound engine")]
    UnboundSubchannel { channel: u32, subchannel: u32 },
}

/// Errors returned by [`crate::vram::VramRegion`] providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VramError {
    #[error("vram access out of range: offset=0x{offset:x} len={len} size=0x{size:x}")]
    OutOfRange { offset: u64, len: usize, size: u64 },
}

/// Fatal errors raised while constructing a device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceInitError {
    #[error("vram size must be non-zero")]
    EmptyVram,
    #[error("ramin window (0x{ramin:x} bytes) does not fit in vram (0x{vram:x} bytes)")]
    RaminLargerThanVram { ramin: u64, vram: u64 },
    #[error("unknown GeForce model {0:?}")]
    UnknownModel(String),
    #[error("failed to allocate {bytes} bytes of vram")]
    VramAllocation { bytes: u64 },
}
