#![forbid(unsafe_code)]
//! Driver core for the CGA 320x200 four-color modes: offscreen pixel
//! addressing, display mode tracking, palette programming and blitting.

use crate::blit::blit;
use crate::bus::DisplayHardware;
use crate::input::{read_command, Command, KeySource};
use crate::mem::OffscreenBuffer;
use crate::mode::{DisplayMode, ModeController};
use crate::palette::{apply_palette, PaletteSelection};

pub mod blit;
pub mod bus;
pub mod error;
pub mod input;
pub mod io;
pub mod log_buffer;
pub mod mem;
pub mod mode;
pub mod palette;
pub mod pattern;
pub mod video;

pub use error::{CgaError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One run of the palette viewer: the offscreen image, the palette the user
/// picked, and the adapter it is shown on.
pub struct Session<H: DisplayHardware> {
    hw: H,
    modes: ModeController,
    buffer: OffscreenBuffer,
    selection: PaletteSelection,
}

impl<H: DisplayHardware> Session<H> {
    /// Draws the test pattern and puts it on screen with `selection`.
    pub fn start(hw: H, selection: PaletteSelection) -> Result<Self> {
        let mut buffer = OffscreenBuffer::new();
        pattern::draw_test_pattern(&mut buffer)?;
        Ok(Self::with_buffer(hw, selection, buffer))
    }

    /// Shows an already prepared image.
    pub fn with_buffer(hw: H, selection: PaletteSelection, buffer: OffscreenBuffer) -> Self {
        let mut session = Self {
            hw,
            modes: ModeController::new(),
            buffer,
            selection,
        };
        apply_palette(&mut session.modes, &mut session.hw, &session.selection);
        blit(&mut session.hw, &session.buffer);
        log::info!(
            "session started in {:?} with palette {}",
            session.modes.current(),
            session.selection.palette.index()
        );
        session
    }

    pub fn handle(&mut self, command: Command) -> Flow {
        match command {
            Command::Quit => return Flow::Quit,
            Command::None => return Flow::Continue,
            Command::SelectPalette(palette) => self.selection.palette = palette,
            Command::ToggleIntensity => self.selection.toggle_intensity(),
            Command::BackgroundUp => self.selection.next_background(),
            Command::BackgroundDown => self.selection.previous_background(),
        }
        self.refresh();
        Flow::Continue
    }

    /// Reprograms the palette and, when that switched modes, puts the image
    /// back since the switch may have wiped video memory.
    pub fn refresh(&mut self) {
        if apply_palette(&mut self.modes, &mut self.hw, &self.selection) {
            log::debug!("mode changed, redrawing");
            blit(&mut self.hw, &self.buffer);
        }
    }

    /// Replaces the offscreen image and shows it.
    pub fn load_image(&mut self, data: &[u8]) -> Result<()> {
        self.buffer.load(data)?;
        blit(&mut self.hw, &self.buffer);
        Ok(())
    }

    pub fn redraw_test_pattern(&mut self) -> Result<()> {
        self.buffer.clear();
        pattern::draw_test_pattern(&mut self.buffer)?;
        blit(&mut self.hw, &self.buffer);
        Ok(())
    }

    /// Returns the adapter to text mode. Returns `true` if it had to switch.
    pub fn shutdown(&mut self) -> bool {
        log::info!("restoring text mode");
        self.modes.set_mode(&mut self.hw, DisplayMode::Text)
    }

    /// Reads keys until quit (or end of input), then restores text mode.
    pub fn run<K: KeySource + ?Sized>(&mut self, keys: &mut K) {
        while self.handle(read_command(keys)) == Flow::Continue {}
        self.shutdown();
    }

    pub fn selection(&self) -> &PaletteSelection { &self.selection }
    pub fn current_mode(&self) -> Option<DisplayMode> { self.modes.current() }
    pub fn buffer(&self) -> &OffscreenBuffer { &self.buffer }
    pub fn hardware(&self) -> &H { &self.hw }
    pub fn into_hardware(self) -> H { self.hw }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::test_harness::{HardwareCall, MockHardware};
    use crate::bus::Adapter;
    use crate::input::{KeyQueue, KEY_ESCAPE, SCAN_DOWN, SCAN_UP};
    use crate::mem::{BUFFER_SIZE, BYTES_PER_ROW};
    use crate::palette::Palette;

    #[test]
    fn start_draws_programs_and_blits_once() {
        let session = Session::start(MockHardware::new(), PaletteSelection::default()).unwrap();
        assert_eq!(
            session.hardware().calls(),
            &[
                HardwareCall::SetMode(DisplayMode::Graphics4),
                HardwareCall::ControlRegister(0x00),
                HardwareCall::Framebuffer(BUFFER_SIZE),
            ]
        );
    }

    #[test]
    fn first_row_shows_bands_at_five_byte_boundaries() {
        let session = Session::start(Adapter::new(), PaletteSelection::default()).unwrap();
        let adapter = session.hardware();
        assert_eq!(adapter.mode(), Some(DisplayMode::Graphics4));
        assert_eq!(adapter.io.color_select, 0x00);
        const SOLID: [u8; 4] = [0x00, 0x55, 0xAA, 0xFF];
        for (i, &byte) in adapter.vram[..BYTES_PER_ROW].iter().enumerate() {
            assert_eq!(byte, SOLID[(i / 5) % 4], "byte {i}");
        }
    }

    #[test]
    fn same_mode_palette_change_does_not_reblit() {
        let mut session = Session::start(MockHardware::new(), PaletteSelection::default()).unwrap();
        session.handle(Command::SelectPalette(Palette::Palette1));
        session.handle(Command::ToggleIntensity);
        let hw = session.hardware();
        assert_eq!(hw.mode_switches(), 1);
        assert_eq!(hw.blits(), 1);
        assert_eq!(hw.last_control_register(), Some(0x30));
    }

    #[test]
    fn mode_change_reblits_exactly_once() {
        let mut session = Session::start(MockHardware::new(), PaletteSelection::default()).unwrap();
        session.handle(Command::SelectPalette(Palette::Palette2));
        assert_eq!(session.current_mode(), Some(DisplayMode::Graphics5));
        assert_eq!(session.hardware().blits(), 2);
        session.handle(Command::SelectPalette(Palette::Palette2));
        assert_eq!(session.hardware().blits(), 2);
    }

    #[test]
    fn image_survives_mode_switch_on_adapter() {
        let mut session = Session::start(Adapter::new(), PaletteSelection::default()).unwrap();
        let expected = session.buffer().as_bytes().to_vec();
        session.handle(Command::SelectPalette(Palette::Palette2));
        let adapter = session.hardware();
        assert_eq!(adapter.mode_switches(), 2);
        assert_eq!(&adapter.vram[..], &expected[..]);
    }

    #[test]
    fn run_consumes_keys_and_restores_text_mode() {
        let mut keys = KeyQueue::new();
        keys.push_extended(SCAN_DOWN);
        keys.push_extended(SCAN_DOWN);
        keys.push_extended(SCAN_UP);
        keys.push(b'i');
        keys.push(b'h');
        keys.push(KEY_ESCAPE);
        keys.push(b'2');

        let mut session = Session::start(MockHardware::new(), PaletteSelection::default()).unwrap();
        session.run(&mut keys);

        assert_eq!(session.selection().background, 15);
        assert!(session.selection().intensity);
        assert_eq!(session.selection().palette, Palette::Palette0);
        assert_eq!(session.current_mode(), Some(DisplayMode::Text));
        assert_eq!(session.hardware().last_mode(), Some(DisplayMode::Text));
        assert!(!keys.is_empty());
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mut session = Session::start(MockHardware::new(), PaletteSelection::default()).unwrap();
        assert!(session.shutdown());
        assert!(!session.shutdown());
        assert_eq!(session.into_hardware().mode_switches(), 2);
    }

    #[test]
    fn load_image_checks_size_and_blits() {
        let mut session = Session::start(MockHardware::new(), PaletteSelection::default()).unwrap();
        assert!(session.load_image(&[0u8; 10]).is_err());
        assert_eq!(session.hardware().blits(), 1);
        session.load_image(&vec![0x1Bu8; BUFFER_SIZE]).unwrap();
        assert_eq!(session.hardware().blits(), 2);
        assert!(session.hardware().framebuffer().iter().all(|&b| b == 0x1B));
        session.redraw_test_pattern().unwrap();
        assert_eq!(session.hardware().framebuffer()[5], 0x55);
    }
}
