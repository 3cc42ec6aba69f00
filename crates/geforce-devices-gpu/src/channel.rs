//! Per-channel state: subchannel bindings plus the Kelvin and 2D surface contexts.

use crate::engines::EngineClass;

pub const CHANNEL_COUNT: usize = 32;
pub const SUBCHANNEL_COUNT: usize = 8;

/// Bytes per pixel for a Kelvin `SURFACE_FORMAT` value, keyed on the colour format nibble.
///
/// Code `0x1` maps to one byte. Driver headers label it as a 16-bit format, but the mapping is kept
/// as-is so existing guests see the same values they always have.
pub fn bytes_per_pixel(surface_format: u32) -> u32 {
    match surface_format & 0xf {
        0x1 => 1,
        0x3 => 2,
        0x5 => 4,
        _ => 4,
    }
}

/// Kelvin context owned by a channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct D3dState {
    pub semaphore_obj: u32,
    pub semaphore_offset: u32,
    pub clip_horizontal: u32,
    pub clip_vertical: u32,
    pub surface_format: u32,
    /// Derived from `surface_format`; see [`bytes_per_pixel`].
    pub color_bytes: u32,
    pub surface_pitch: u32,
    pub surface_color_offset: u32,
    pub color_clear_value: u32,
    pub clear_surface: u32,
}

impl Default for D3dState {
    fn default() -> Self {
        Self {
            semaphore_obj: 0,
            semaphore_offset: 0,
            clip_horizontal: 0,
            clip_vertical: 0,
            surface_format: 0,
            color_bytes: 1,
            surface_pitch: 0,
            surface_color_offset: 0,
            color_clear_value: 0,
            clear_surface: 0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Surf2dState {
    pub format: u32,
    pub pitch: u32,
    pub offset_source: u32,
    pub offset_destin: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Channel {
    pub subchannels: [Option<EngineClass>; SUBCHANNEL_COUNT],
    pub d3d: D3dState,
    pub surf2d: Surf2dState,
}

impl Channel {
    pub fn bound_engine(&self, subchannel: u32) -> Option<EngineClass> {
        self.subchannels
            .get(subchannel as usize)
            .copied()
            .flatten()
    }
}

/// Fixed table of [`CHANNEL_COUNT`] channels, allocated with the device and reset in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelTable {
    channels: Box<[Channel; CHANNEL_COUNT]>,
}

impl Default for ChannelTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelTable {
    pub fn new() -> Self {
        Self {
            channels: Box::new(std::array::from_fn(|_| Channel::default())),
        }
    }

    pub fn reset(&mut self) {
        self.channels.iter_mut().for_each(|ch| *ch = Channel::default());
    }

    pub fn get(&self, chid: u32) -> Option<&Channel> {
        self.channels.get(chid as usize)
    }

    pub fn get_mut(&mut self, chid: u32) -> Option<&mut Channel> {
        self.channels.get_mut(chid as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }
}
