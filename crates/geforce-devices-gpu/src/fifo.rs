use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::dispatch::Command;
use crate::engines::{kelvin, EngineClass};
use crate::regs::RegisterFile;

/// Source of commands pulled when the guest advances `PFIFO_CACHE1_PUT`.
///
/// The device does not walk DMA pushbuffers itself. Whatever implements this trait decides which
/// commands a kick on channel `chid` produces; the device then dispatches them in order.
pub trait CommandFetch {
    /// Reset fetch state (queued commands, cursors).
    fn reset(&mut self);

    /// Produce the commands for one kick of channel `chid`.
    ///
    /// `regs` is the register file as it stands after the `CACHE1_PUT` write.
    fn fetch(&mut self, chid: u32, regs: &RegisterFile) -> Vec<Command>;
}

/// Fetcher that never produces work.
#[derive(Debug, Default)]
pub struct NullCommandFetch;

impl NullCommandFetch {
    pub fn new() -> Self {
        Self
    }
}

impl CommandFetch for NullCommandFetch {
    fn reset(&mut self) {
        // Stateless.
    }

    fn fetch(&mut self, _chid: u32, _regs: &RegisterFile) -> Vec<Command> {
        Vec::new()
    }
}

/// Default fetcher: each kick binds the channel's semaphore object on Kelvin subchannel 0, using the
/// current `CACHE1_DMA_INSTANCE` as the object handle.
///
/// This stands in for a real pushbuffer walk and carries no pushbuffer semantics.
#[derive(Debug, Default)]
pub struct SemaphoreObjectFetch;

impl SemaphoreObjectFetch {
    pub fn new() -> Self {
        Self
    }
}

impl CommandFetch for SemaphoreObjectFetch {
    fn reset(&mut self) {
        // Stateless.
    }

    fn fetch(&mut self, chid: u32, regs: &RegisterFile) -> Vec<Command> {
        vec![Command::new(
            chid,
            0,
            EngineClass::Kelvin,
            kelvin::method::SEMAPHORE_OBJECT,
            regs.cache1_dma_instance,
        )]
    }
}

/// Host-fed fetcher: drains every queued command on the next kick, whatever channel kicked.
///
/// Clones share one queue, so the host can keep a handle after installing the fetcher.
#[derive(Debug, Clone, Default)]
pub struct QueuedCommandFetch {
    queue: Rc<RefCell<VecDeque<Command>>>,
}

impl QueuedCommandFetch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, cmd: Command) {
        self.queue.borrow_mut().push_back(cmd);
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

impl CommandFetch for QueuedCommandFetch {
    fn reset(&mut self) {
        self.queue.borrow_mut().clear();
    }

    fn fetch(&mut self, _chid: u32, _regs: &RegisterFile) -> Vec<Command> {
        self.queue.borrow_mut().drain(..).collect()
    }
}
