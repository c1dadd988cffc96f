use std::sync::atomic::{AtomicU8, Ordering};

use serde::Serialize;

const RADIO: u8 = 0b01;
const LOCATION: u8 = 0b10;

/// Normalized hardware availability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareStatus {
    pub radio_enabled: bool,
    pub location_enabled: bool,
}

impl HardwareStatus {
    pub fn new(radio_enabled: bool, location_enabled: bool) -> Self {
        Self {
            radio_enabled,
            location_enabled,
        }
    }

    /// True when both radio and location are available.
    pub fn is_ready(&self) -> bool {
        self.radio_enabled && self.location_enabled
    }

    fn to_bits(self) -> u8 {
        (if self.radio_enabled { RADIO } else { 0 })
            | (if self.location_enabled { LOCATION } else { 0 })
    }

    fn from_bits(bits: u8) -> Self {
        Self {
            radio_enabled: bits & RADIO != 0,
            location_enabled: bits & LOCATION != 0,
        }
    }
}

/// Lock-free cell publishing the latest [`HardwareStatus`].
///
/// Written from the OS delivery thread, read from the service thread.
#[derive(Debug, Default)]
pub(crate) struct AtomicHardwareStatus {
    bits: AtomicU8,
}

impl AtomicHardwareStatus {
    pub fn load(&self) -> HardwareStatus {
        HardwareStatus::from_bits(self.bits.load(Ordering::Acquire))
    }

    pub fn store(&self, status: HardwareStatus) {
        self.bits.store(status.to_bits(), Ordering::Release);
    }

    /// Sets the radio flag, returning the resulting status.
    pub fn set_radio(&self, enabled: bool) -> HardwareStatus {
        self.update(RADIO, enabled)
    }

    /// Sets the location flag, returning the resulting status.
    pub fn set_location(&self, enabled: bool) -> HardwareStatus {
        self.update(LOCATION, enabled)
    }

    fn update(&self, mask: u8, enabled: bool) -> HardwareStatus {
        let prev = if enabled {
            self.bits.fetch_or(mask, Ordering::AcqRel)
        } else {
            self.bits.fetch_and(!mask, Ordering::AcqRel)
        };
        let next = if enabled { prev | mask } else { prev & !mask };
        HardwareStatus::from_bits(next)
    }
}
