//! NV10 context surfaces 2D: source/destination surface descriptors for the blit engines.

use crate::channel::Surf2dState;

pub mod method {
    pub const FORMAT: u32 = 0x0300;
    pub const PITCH: u32 = 0x0304;
    pub const OFFSET_SOURCE: u32 = 0x0308;
    pub const OFFSET_DESTIN: u32 = 0x030C;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surf2dMethod {
    Format,
    Pitch,
    OffsetSource,
    OffsetDestin,
}

impl Surf2dMethod {
    pub fn decode(method: u32) -> Option<Self> {
        match method {
            method::FORMAT => Some(Self::Format),
            method::PITCH => Some(Self::Pitch),
            method::OFFSET_SOURCE => Some(Self::OffsetSource),
            method::OFFSET_DESTIN => Some(Self::OffsetDestin),
            _ => None,
        }
    }
}

pub fn execute(state: &mut Surf2dState, method: Surf2dMethod, param: u32) {
    match method {
        Surf2dMethod::Format => state.format = param,
        Surf2dMethod::Pitch => state.pitch = param,
        Surf2dMethod::OffsetSource => state.offset_source = param,
        Surf2dMethod::OffsetDestin => state.offset_destin = param,
    }
}
