use crate::error::DeviceInitError;

/// Default size of the RAMIN instance-memory window.
pub const DEFAULT_RAMIN_SIZE_BYTES: u64 = 0x1_0000;

/// Default attached memory size, in MiB.
pub const DEFAULT_VRAM_SIZE_MB: u32 = 64;

pub const PCI_VENDOR_ID_NVIDIA: u16 = 0x10de;

/// Identity of a supported board, consumed by the host's PCI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeForceModel {
    pub name: &'static str,
    pub vendor_id: u16,
    pub device_id: u16,
    pub subsystem_vendor_id: u16,
    pub subsystem_id: u16,
    pub revision: u8,
}

pub const MODELS: &[GeForceModel] = &[GeForceModel {
    name: "geforce3",
    vendor_id: PCI_VENDOR_ID_NVIDIA,
    device_id: 0x0201,
    subsystem_vendor_id: PCI_VENDOR_ID_NVIDIA,
    subsystem_id: 0x0201,
    revision: 0xa1,
}];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeForceDeviceConfig {
    /// Board name from [`MODELS`]; `None` selects the first entry.
    pub model: Option<String>,
    pub vram_size_mb: u32,
    pub ramin_size_bytes: u64,
}

impl Default for GeForceDeviceConfig {
    fn default() -> Self {
        Self {
            model: None,
            vram_size_mb: DEFAULT_VRAM_SIZE_MB,
            ramin_size_bytes: DEFAULT_RAMIN_SIZE_BYTES,
        }
    }
}

impl GeForceDeviceConfig {
    pub fn vram_size_bytes(&self) -> u64 {
        u64::from(self.vram_size_mb) << 20
    }

    pub fn resolve_model(&self) -> Result<&'static GeForceModel, DeviceInitError> {
        match self.model.as_deref() {
            None => Ok(&MODELS[0]),
            Some(name) => MODELS
                .iter()
                .find(|m| m.name == name)
                .ok_or_else(|| DeviceInitError::UnknownModel(name.to_string())),
        }
    }
}
