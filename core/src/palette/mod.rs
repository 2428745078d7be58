//! Palette selection and the color select register (port 0x3D9).

use crate::bus::DisplayHardware;
use crate::error::{CgaError, Result};
use crate::mode::{DisplayMode, ModeController};

pub const COLOR_SELECT_PALETTE_BIT: u8 = 1 << 5;
pub const COLOR_SELECT_INTENSITY_BIT: u8 = 1 << 4;
pub const COLOR_SELECT_BACKGROUND_MASK: u8 = 0x0F;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Palette {
    /// Green, red, brown.
    #[default]
    Palette0,
    /// Cyan, magenta, light grey.
    Palette1,
    /// Cyan, red, light grey. Needs the color burst off (mode 5).
    Palette2,
}

impl Palette {
    pub fn from_index(index: u8) -> Result<Self> {
        match index {
            0 => Ok(Palette::Palette0),
            1 => Ok(Palette::Palette1),
            2 => Ok(Palette::Palette2),
            other => Err(CgaError::InvalidPalette(other)),
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Palette::Palette0 => 0,
            Palette::Palette1 => 1,
            Palette::Palette2 => 2,
        }
    }

    pub fn required_mode(self) -> DisplayMode {
        match self {
            Palette::Palette2 => DisplayMode::Graphics5,
            Palette::Palette0 | Palette::Palette1 => DisplayMode::Graphics4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PaletteSelection {
    pub palette: Palette,
    pub intensity: bool,
    pub background: u8,
}

impl PaletteSelection {
    pub fn new(palette: Palette, intensity: bool, background: u8) -> Self {
        Self {
            palette,
            intensity,
            background: background & COLOR_SELECT_BACKGROUND_MASK,
        }
    }

    /// Encodes the selection for the color select register. Palette 0 and
    /// palette 2 share the same bit pattern; the display mode tells them apart.
    pub fn register_value(&self) -> u8 {
        let mut value = self.background & COLOR_SELECT_BACKGROUND_MASK;
        if self.intensity {
            value |= COLOR_SELECT_INTENSITY_BIT;
        }
        if self.palette == Palette::Palette1 {
            value |= COLOR_SELECT_PALETTE_BIT;
        }
        value
    }

    pub fn toggle_intensity(&mut self) {
        self.intensity = !self.intensity;
    }

    pub fn next_background(&mut self) {
        self.background = self.background.wrapping_add(1) & COLOR_SELECT_BACKGROUND_MASK;
    }

    /// Steps back through the 16 colors, wrapping from 0 to 15.
    pub fn previous_background(&mut self) {
        let mask = COLOR_SELECT_BACKGROUND_MASK;
        self.background = self.background.wrapping_add(mask) & mask;
    }
}

/// Programs the adapter for a palette selection, switching display mode when
/// the palette needs a different one.
///
/// Returns `true` when the mode changed. Video memory may have been cleared
/// by the switch, so the caller must blit its offscreen buffer again.
pub fn apply_palette<H: DisplayHardware + ?Sized>(
    modes: &mut ModeController,
    hw: &mut H,
    selection: &PaletteSelection,
) -> bool {
    let changed = modes.set_mode(hw, selection.palette.required_mode());
    let value = selection.register_value();
    #[cfg(feature = "trace_palette")]
    log::trace!("{:?} -> color select {:#010b}", selection, value);
    log::debug!(
        "palette {} intensity={} background={} (color select {:#04x})",
        selection.palette.index(),
        selection.intensity,
        selection.background,
        value
    );
    hw.write_control_register(value);
    changed
}
