//! Command dispatcher: routes `(channel, subchannel, class, method, param)` to an engine's method
//! table.
//!
//! Every check happens before any state is touched, so a rejected command leaves the channel table
//! exactly as it was. Effects that reach outside the channel (VRAM writes, display invalidation)
//! are returned as [`DispatchEffect`] for the device to apply.

use tracing::trace;

use crate::channel::{ChannelTable, SUBCHANNEL_COUNT};
use crate::engines::kelvin::{self, KelvinMethod};
use crate::engines::surf2d::{self, Surf2dMethod};
use crate::engines::EngineClass;
use crate::error::DispatchError;

/// Object-bind method shared by every engine class.
pub const SET_OBJECT: u32 = 0x0000;

/// One dispatch invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub channel: u32,
    pub subchannel: u32,
    pub class: u32,
    pub method: u32,
    pub param: u32,
}

impl Command {
    pub fn new(channel: u32, subchannel: u32, class: EngineClass, method: u32, param: u32) -> Self {
        Self {
            channel,
            subchannel,
            class: class.class_id(),
            method,
            param,
        }
    }
}

/// Side effect of a successful dispatch that the owning device must carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchEffect {
    None,
    /// 4-byte write of `value` at `object + offset` in VRAM.
    SemaphoreWrite { object: u32, offset: u32, value: u32 },
    /// Surface clear requested; only a full display redraw is signalled.
    ClearSurface {
        color_offset: u32,
        pitch: u32,
        clear_value: u32,
    },
}

enum Route {
    Bind(EngineClass),
    Kelvin(KelvinMethod),
    Surface2d(Surf2dMethod),
    Passive(EngineClass),
}

fn resolve(class: EngineClass, method: u32) -> Result<Route, DispatchError> {
    if method == SET_OBJECT {
        return Ok(Route::Bind(class));
    }
    let unknown = DispatchError::UnknownMethod {
        class: class.class_id(),
        method,
    };
    match class {
        EngineClass::Kelvin => KelvinMethod::decode(method)
            .map(Route::Kelvin)
            .ok_or(unknown),
        EngineClass::Surface2d => Surf2dMethod::decode(method)
            .map(Route::Surface2d)
            .ok_or(unknown),
        EngineClass::MemoryToMemory | EngineClass::GdiRectangle | EngineClass::ImageFromCpu => {
            Ok(Route::Passive(class))
        }
    }
}

fn check_subchannel(subchannel: u32) -> Result<(), DispatchError> {
    if subchannel as usize >= SUBCHANNEL_COUNT {
        return Err(DispatchError::InvalidSubchannel(subchannel));
    }
    Ok(())
}

/// Dispatches a command addressed by explicit engine class.
pub fn execute(channels: &mut ChannelTable, cmd: &Command) -> Result<DispatchEffect, DispatchError> {
    let Command {
        channel: chid,
        subchannel,
        class,
        method,
        param,
    } = *cmd;
    let channel = channels
        .get_mut(chid)
        .ok_or(DispatchError::InvalidChannel(chid))?;
    check_subchannel(subchannel)?;
    let class = EngineClass::from_class(class).ok_or(DispatchError::UnknownEngineClass(class))?;
    let route = resolve(class, method)?;

    let effect = match route {
        Route::Bind(class) => {
            channel.subchannels[subchannel as usize] = Some(class);
            DispatchEffect::None
        }
        Route::Kelvin(m) => kelvin::execute(&mut channel.d3d, m, param),
        Route::Surface2d(m) => {
            surf2d::execute(&mut channel.surf2d, m, param);
            DispatchEffect::None
        }
        Route::Passive(class) => {
            trace!(chid, subchannel, ?class, method, param, "passive engine method");
            DispatchEffect::None
        }
    };
    Ok(effect)
}

/// Dispatches through whatever engine is currently bound to the subchannel.
pub fn execute_bound(
    channels: &mut ChannelTable,
    chid: u32,
    subchannel: u32,
    method: u32,
    param: u32,
) -> Result<DispatchEffect, DispatchError> {
    let channel = channels
        .get(chid)
        .ok_or(DispatchError::InvalidChannel(chid))?;
    check_subchannel(subchannel)?;
    let class = channel
        .bound_engine(subchannel)
        .ok_or(DispatchError::UnboundSubchannel {
            channel: chid,
            subchannel,
        })?;
    execute(
        channels,
        &Command::new(chid, subchannel, class, method, param),
    )
}

/// Kelvin method table without subchannel addressing.
pub fn execute_d3d(
    channels: &mut ChannelTable,
    chid: u32,
    method: u32,
    param: u32,
) -> Result<DispatchEffect, DispatchError> {
    let channel = channels
        .get_mut(chid)
        .ok_or(DispatchError::InvalidChannel(chid))?;
    let m = KelvinMethod::decode(method).ok_or(DispatchError::UnknownMethod {
        class: EngineClass::Kelvin.class_id(),
        method,
    })?;
    Ok(kelvin::execute(&mut channel.d3d, m, param))
}
