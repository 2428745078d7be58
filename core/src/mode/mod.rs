use crate::bus::DisplayHardware;

const BIOS_MODE_TEXT_80X25: u8 = 0x03;
const BIOS_MODE_320X200_4: u8 = 0x04;
const BIOS_MODE_320X200_5: u8 = 0x05;

/// Adapter operating modes this driver uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    /// 80x25 color text.
    Text,
    /// 320x200 four colors, palettes 0 and 1.
    Graphics4,
    /// 320x200 four colors with the color burst off, palette 2 only.
    Graphics5,
}

impl DisplayMode {
    pub fn bios_number(self) -> u8 {
        match self {
            DisplayMode::Text => BIOS_MODE_TEXT_80X25,
            DisplayMode::Graphics4 => BIOS_MODE_320X200_4,
            DisplayMode::Graphics5 => BIOS_MODE_320X200_5,
        }
    }

    pub fn is_graphics(self) -> bool {
        !matches!(self, DisplayMode::Text)
    }
}

/// Remembers the last mode programmed into the adapter so that repeated
/// requests for the same mode never reach the hardware.
#[derive(Debug, Default)]
pub struct ModeController {
    current: Option<DisplayMode>,
}

impl ModeController {
    /// Starts in the unknown state: the first `set_mode` always switches.
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn current(&self) -> Option<DisplayMode> {
        self.current
    }

    /// Returns `true` when the adapter was actually switched.
    pub fn set_mode<H: DisplayHardware + ?Sized>(&mut self, hw: &mut H, mode: DisplayMode) -> bool {
        if self.current == Some(mode) {
            #[cfg(feature = "trace_mode")]
            log::trace!("mode {:#04x} already active", mode.bios_number());
            return false;
        }
        log::debug!(
            "switching video mode {:?} -> {:?} (BIOS {:#04x})",
            self.current,
            mode,
            mode.bios_number()
        );
        hw.set_mode(mode);
        self.current = Some(mode);
        true
    }
}
