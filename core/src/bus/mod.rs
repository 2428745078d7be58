use crate::io::{
    COLOR_SELECT_DEFAULT, Io, PORT_COLOR_SELECT, PORT_MODE_CONTROL, mode_control_value,
};
use crate::mem::BUFFER_SIZE;
use crate::mode::DisplayMode;

#[cfg(test)]
pub(crate) mod test_harness;

const TEXT_BLANK_CELL: [u8; 2] = [b' ', 0x07];

/// Everything the driver needs from the display adapter.
pub trait DisplayHardware {
    /// Switches the adapter's operating mode. Video memory contents may be lost.
    fn set_mode(&mut self, mode: DisplayMode);
    /// Writes the color select register.
    fn write_control_register(&mut self, value: u8);
    /// Copies a full 16 KiB image to video memory (segment B800).
    fn write_framebuffer(&mut self, data: &[u8; BUFFER_SIZE]);
}

impl<H: DisplayHardware + ?Sized> DisplayHardware for &mut H {
    fn set_mode(&mut self, mode: DisplayMode) {
        (**self).set_mode(mode);
    }
    fn write_control_register(&mut self, value: u8) {
        (**self).write_control_register(value);
    }
    fn write_framebuffer(&mut self, data: &[u8; BUFFER_SIZE]) {
        (**self).write_framebuffer(data);
    }
}

/// A simulated CGA card: 16 KiB of video memory plus its I/O ports.
///
/// Mode sets behave like the BIOS video service: memory is cleared (blank
/// attribute cells in text mode, zero in graphics modes) and the color select
/// register goes back to its power-on value.
pub struct Adapter {
    pub vram: Box<[u8; BUFFER_SIZE]>,
    pub io: Io,
    mode_switches: usize,
}

impl Adapter {
    pub fn new() -> Self {
        let mut adapter = Self {
            vram: Box::new([0u8; BUFFER_SIZE]),
            io: Io::new(),
            mode_switches: 0,
        };
        adapter.clear_vram(DisplayMode::Text);
        adapter
    }

    pub fn mode(&self) -> Option<DisplayMode> {
        self.io.display_mode()
    }

    pub fn mode_switches(&self) -> usize {
        self.mode_switches
    }

    fn clear_vram(&mut self, mode: DisplayMode) {
        if mode.is_graphics() {
            self.vram.fill(0);
        } else {
            for cell in self.vram.chunks_exact_mut(2) {
                cell.copy_from_slice(&TEXT_BLANK_CELL);
            }
        }
    }
}

impl Default for Adapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayHardware for Adapter {
    fn set_mode(&mut self, mode: DisplayMode) {
        self.io.write8(PORT_MODE_CONTROL, mode_control_value(mode));
        self.io.write8(PORT_COLOR_SELECT, COLOR_SELECT_DEFAULT);
        self.clear_vram(mode);
        self.mode_switches += 1;
    }

    fn write_control_register(&mut self, value: u8) {
        self.io.write8(PORT_COLOR_SELECT, value);
    }

    fn write_framebuffer(&mut self, data: &[u8; BUFFER_SIZE]) {
        self.vram.copy_from_slice(data);
    }
}
