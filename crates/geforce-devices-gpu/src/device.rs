use tracing::{debug, trace};

use crate::channel::{Channel, ChannelTable};
use crate::config::{GeForceDeviceConfig, GeForceModel};
use crate::dispatch::{self, Command, DispatchEffect};
use crate::display::{DisplaySink, NullDisplaySink};
use crate::engines::EngineClass;
use crate::error::{DeviceInitError, DispatchError};
use crate::fifo::{CommandFetch, SemaphoreObjectFetch};
use crate::irq::{self, IrqLine, NullIrqLine};
use crate::regs::{fifo_intr_bits, Register, RegisterFile, MMIO_SIZE_BYTES};
use crate::vram::{self, DenseVram, RaminWindow, VramRegion};

/// GeForce3 device model: BAR0 register front end plus the state it drives.
///
/// All accesses are synchronous. The host must serialize calls; the device does no locking.
pub struct GeForceDevice {
    model: &'static GeForceModel,
    regs: RegisterFile,
    channels: ChannelTable,

    vram: Box<dyn VramRegion>,
    ramin: RaminWindow,
    display: Box<dyn DisplaySink>,
    irq: Box<dyn IrqLine>,
    fetch: Box<dyn CommandFetch>,
    irq_level: bool,
}

impl GeForceDevice {
    /// Builds a device with heap-backed VRAM and no display or interrupt wiring.
    pub fn new(cfg: GeForceDeviceConfig) -> Result<Self, DeviceInitError> {
        let vram = DenseVram::new(cfg.vram_size_bytes())?;
        Self::with_collaborators(
            cfg,
            Box::new(vram),
            Box::new(NullDisplaySink),
            Box::new(NullIrqLine),
        )
    }

    /// Builds a device over host-provided VRAM, display sink and interrupt line.
    ///
    /// The configured VRAM size is ignored in favour of `vram.size()`.
    pub fn with_collaborators(
        cfg: GeForceDeviceConfig,
        vram: Box<dyn VramRegion>,
        display: Box<dyn DisplaySink>,
        irq: Box<dyn IrqLine>,
    ) -> Result<Self, DeviceInitError> {
        let model = cfg.resolve_model()?;
        if vram.size() == 0 {
            return Err(DeviceInitError::EmptyVram);
        }
        let ramin = RaminWindow::new(cfg.ramin_size_bytes, vram.size())?;

        let mut dev = Self {
            model,
            regs: RegisterFile::new(),
            channels: ChannelTable::new(),
            vram,
            ramin,
            display,
            irq,
            fetch: Box::new(SemaphoreObjectFetch::new()),
            irq_level: false,
        };
        dev.reset();
        Ok(dev)
    }

    pub fn set_command_fetch(&mut self, fetch: Box<dyn CommandFetch>) {
        self.fetch = fetch;
    }

    /// Returns registers, channels and the interrupt line to their power-on state.
    ///
    /// VRAM contents survive a reset.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.channels.reset();
        self.fetch.reset();
        self.irq_level = false;
        self.irq.set_level(false);
        debug!(model = self.model.name, "geforce reset");
    }

    pub fn model(&self) -> &'static GeForceModel {
        self.model
    }

    pub fn regs(&self) -> &RegisterFile {
        &self.regs
    }

    pub fn channel(&self, chid: u32) -> Option<&Channel> {
        self.channels.get(chid)
    }

    pub fn channels(&self) -> &ChannelTable {
        &self.channels
    }

    pub fn bound_engine(&self, chid: u32, subchannel: u32) -> Option<EngineClass> {
        self.channels.get(chid)?.bound_engine(subchannel)
    }

    /// Read-only VRAM view for the display path.
    pub fn vram(&self) -> &dyn VramRegion {
        self.vram.as_ref()
    }

    pub fn vram_mut(&mut self) -> &mut dyn VramRegion {
        self.vram.as_mut()
    }

    pub fn ramin_size(&self) -> u64 {
        self.ramin.size()
    }

    pub fn irq_level(&self) -> bool {
        self.irq_level
    }

    fn update_irq_level(&mut self) {
        let level = irq::line_level(&self.regs);
        trace!(
            pending = irq::pending(&self.regs).bits(),
            level,
            "geforce irq update"
        );
        self.irq_level = level;
        self.irq.set_level(level);
    }

    /// Latches PBUS interrupt status bits.
    pub fn raise_bus_interrupt(&mut self, bits: u32) {
        self.regs.latch_bus_intr(bits);
        self.update_irq_level();
    }

    /// Latches PFIFO interrupt status bits.
    pub fn raise_fifo_interrupt(&mut self, bits: u32) {
        self.regs.latch_fifo_intr(bits);
        self.update_irq_level();
    }

    // ---------------------------------------------------------------------------------------------
    // BAR0
    // ---------------------------------------------------------------------------------------------

    pub fn mmio_read(&self, offset: u64, size: usize) -> u32 {
        if offset >= MMIO_SIZE_BYTES {
            debug!(offset, size, "mmio read out of bounds");
            return 0;
        }
        if size != 4 {
            debug!(offset, size, "unsupported mmio read size");
            return 0;
        }
        let value = match Register::decode(offset) {
            Some(reg) => self.regs.load(reg),
            None => {
                debug!(offset, "unhandled register read");
                0
            }
        };
        trace!(offset, value, "mmio read");
        value
    }

    pub fn mmio_write(&mut self, offset: u64, size: usize, value: u32) {
        trace!(offset, size, value, "mmio write");
        if offset >= MMIO_SIZE_BYTES {
            debug!(offset, size, "mmio write out of bounds");
            return;
        }
        if size != 4 {
            debug!(offset, size, "unsupported mmio write size");
            return;
        }
        let Some(reg) = Register::decode(offset) else {
            debug!(offset, value, "unhandled register write");
            return;
        };

        self.regs.store(reg, value);
        if reg.affects_irq() {
            self.update_irq_level();
        }
        if reg == Register::Cache1Put && self.regs.push_enabled() {
            self.kick_fifo();
        }
    }

    fn kick_fifo(&mut self) {
        let chid = self.regs.push_channel();
        debug!(chid, put = self.regs.cache1_put, "fifo kick");

        let cmds = self.fetch.fetch(chid, &self.regs);
        let mut rejected = false;
        for cmd in &cmds {
            if let Err(err) = self.execute_command(cmd) {
                debug!(?cmd, %err, "fifo command rejected");
                rejected = true;
            }
        }
        if rejected {
            self.raise_fifo_interrupt(fifo_intr_bits::CACHE_ERROR);
        }
    }

    // ---------------------------------------------------------------------------------------------
    // RAMIN
    // ---------------------------------------------------------------------------------------------

    pub fn ramin_read(&self, addr: u64, size: usize) -> u32 {
        self.ramin.read(self.vram.as_ref(), addr, size)
    }

    pub fn ramin_write(&mut self, addr: u64, size: usize, value: u32) {
        self.ramin.write(self.vram.as_mut(), addr, size, value);
    }

    // ---------------------------------------------------------------------------------------------
    // Command injection
    // ---------------------------------------------------------------------------------------------

    pub fn execute_command(&mut self, cmd: &Command) -> Result<(), DispatchError> {
        let effect = dispatch::execute(&mut self.channels, cmd)?;
        self.apply_effect(effect);
        Ok(())
    }

    pub fn execute_engine_command(
        &mut self,
        chid: u32,
        subchannel: u32,
        class: u32,
        method: u32,
        param: u32,
    ) -> Result<(), DispatchError> {
        self.execute_command(&Command {
            channel: chid,
            subchannel,
            class,
            method,
            param,
        })
    }

    pub fn execute_bound_command(
        &mut self,
        chid: u32,
        subchannel: u32,
        method: u32,
        param: u32,
    ) -> Result<(), DispatchError> {
        let effect = dispatch::execute_bound(&mut self.channels, chid, subchannel, method, param)?;
        self.apply_effect(effect);
        Ok(())
    }

    pub fn execute_d3d_command(
        &mut self,
        chid: u32,
        method: u32,
        param: u32,
    ) -> Result<(), DispatchError> {
        let effect = dispatch::execute_d3d(&mut self.channels, chid, method, param)?;
        self.apply_effect(effect);
        Ok(())
    }

    fn apply_effect(&mut self, effect: DispatchEffect) {
        match effect {
            DispatchEffect::None => {}
            DispatchEffect::SemaphoreWrite {
                object,
                offset,
                value,
            } => {
                vram::dma_write32(self.vram.as_mut(), object, offset, value);
                trace!(object, offset, value, "d3d semaphore");
            }
            DispatchEffect::ClearSurface {
                color_offset,
                pitch,
                clear_value,
            } => {
                debug!(color_offset, pitch, clear_value, "d3d clear surface");
                self.display.invalidate_full();
            }
        }
    }
}

impl std::fmt::Debug for GeForceDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeForceDevice")
            .field("model", &self.model.name)
            .field("regs", &self.regs)
            .field("vram_size", &self.vram.size())
            .field("ramin_size", &self.ramin.size())
            .field("irq_level", &self.irq_level)
            .finish_non_exhaustive()
    }
}
