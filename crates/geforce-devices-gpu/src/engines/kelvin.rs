//! Kelvin (NV20 3D) method table.
//!
//! Everything here is configuration storage except two methods:
//! - `SEMAPHORE_ACQUIRE` writes its parameter into the semaphore DMA object, which is how the
//!   driver hands a value back to a CPU thread polling that memory.
//! - `CLEAR_SURFACE` latches the trigger and asks the display to redraw. Pixels are not touched.
//!
//! The table only decides *what* happens; the device applies memory/display effects.

use crate::channel::{bytes_per_pixel, D3dState};
use crate::dispatch::DispatchEffect;

/// Method offsets (byte addresses within the object).
pub mod method {
    pub const SEMAPHORE_OBJECT: u32 = 0x01A4;
    pub const CLIP_HORIZONTAL: u32 = 0x0200;
    pub const CLIP_VERTICAL: u32 = 0x0204;
    pub const SURFACE_FORMAT: u32 = 0x0208;
    pub const SURFACE_PITCH: u32 = 0x020C;
    pub const SURFACE_COLOR_OFFSET: u32 = 0x0210;
    pub const SEMAPHORE_OFFSET: u32 = 0x1D6C;
    pub const SEMAPHORE_ACQUIRE: u32 = 0x1D70;
    pub const COLOR_CLEAR_VALUE: u32 = 0x1D90;
    pub const CLEAR_SURFACE: u32 = 0x1D94;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KelvinMethod {
    SemaphoreObject,
    ClipHorizontal,
    ClipVertical,
    SurfaceFormat,
    SurfacePitch,
    SurfaceColorOffset,
    SemaphoreOffset,
    SemaphoreAcquire,
    ColorClearValue,
    ClearSurface,
}

impl KelvinMethod {
    pub fn decode(method: u32) -> Option<Self> {
        let m = match method {
            method::SEMAPHORE_OBJECT => Self::SemaphoreObject,
            method::CLIP_HORIZONTAL => Self::ClipHorizontal,
            method::CLIP_VERTICAL => Self::ClipVertical,
            method::SURFACE_FORMAT => Self::SurfaceFormat,
            method::SURFACE_PITCH => Self::SurfacePitch,
            method::SURFACE_COLOR_OFFSET => Self::SurfaceColorOffset,
            method::SEMAPHORE_OFFSET => Self::SemaphoreOffset,
            method::SEMAPHORE_ACQUIRE => Self::SemaphoreAcquire,
            method::COLOR_CLEAR_VALUE => Self::ColorClearValue,
            method::CLEAR_SURFACE => Self::ClearSurface,
            _ => return None,
        };
        Some(m)
    }
}

pub fn execute(state: &mut D3dState, method: KelvinMethod, param: u32) -> DispatchEffect {
    match method {
        KelvinMethod::SemaphoreObject => state.semaphore_obj = param,
        KelvinMethod::ClipHorizontal => state.clip_horizontal = param,
        KelvinMethod::ClipVertical => state.clip_vertical = param,
        KelvinMethod::SurfaceFormat => {
            state.surface_format = param;
            state.color_bytes = bytes_per_pixel(param);
        }
        KelvinMethod::SurfacePitch => state.surface_pitch = param,
        KelvinMethod::SurfaceColorOffset => state.surface_color_offset = param,
        KelvinMethod::SemaphoreOffset => state.semaphore_offset = param,
        KelvinMethod::SemaphoreAcquire => {
            return DispatchEffect::SemaphoreWrite {
                object: state.semaphore_obj,
                offset: state.semaphore_offset,
                value: param,
            };
        }
        KelvinMethod::ColorClearValue => state.color_clear_value = param,
        KelvinMethod::ClearSurface => {
            state.clear_surface = param;
            return DispatchEffect::ClearSurface {
                color_offset: state.surface_color_offset,
                pitch: state.surface_pitch,
                clear_value: state.color_clear_value,
            };
        }
    }
    DispatchEffect::None
}
