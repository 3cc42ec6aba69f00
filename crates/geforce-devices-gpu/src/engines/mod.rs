//! Engine classes a subchannel can be bound to.
//!
//! Only Kelvin (3D) and the 2D surface context carry modelled state. GDI, M2MF and IFC accept any
//! method as an observation point so drivers that poke them during init keep going.

pub mod kelvin;
pub mod surf2d;

/// Engine classes, tagged by their NV class number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum EngineClass {
    /// NV03 memory-to-memory format (copy engine).
    MemoryToMemory = 0x0039,
    /// NV04 GDI rectangle text.
    GdiRectangle = 0x004A,
    /// NV10 context surfaces 2D.
    Surface2d = 0x0062,
    /// NV10 image from CPU.
    ImageFromCpu = 0x008A,
    /// NV20 Kelvin primitive (3D).
    Kelvin = 0x0097,
}

impl EngineClass {
    pub fn from_class(class: u32) -> Option<Self> {
        match class {
            0x0039 => Some(Self::MemoryToMemory),
            0x004A => Some(Self::GdiRectangle),
            0x0062 => Some(Self::Surface2d),
            0x008A => Some(Self::ImageFromCpu),
            0x0097 => Some(Self::Kelvin),
            _ => None,
        }
    }

    pub const fn class_id(self) -> u32 {
        self as u32
    }

    /// Engines that accept every method without modelling its effect.
    pub const fn is_passive(self) -> bool {
        matches!(
            self,
            Self::MemoryToMemory | Self::GdiRectangle | Self::ImageFromCpu
        )
    }
}
