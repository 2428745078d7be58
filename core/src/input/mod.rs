//! Keyboard decoding for the palette viewer control loop.
//!
//! Keys arrive one byte at a time, the way DOS `getch` delivers them.
//! Cursor keys come as a two byte sequence: a prefix (0x00 or 0xE0) followed
//! by the scan code.

use std::collections::VecDeque;

use crate::palette::Palette;

pub const KEY_ESCAPE: u8 = 0x1B;
pub const KEY_EXTENDED: u8 = 0x00;
pub const KEY_EXTENDED_E0: u8 = 0xE0;
pub const SCAN_UP: u8 = 0x48;
pub const SCAN_DOWN: u8 = 0x50;

/// Blocking source of key codes. `None` means the input is gone.
pub trait KeySource {
    fn read_key(&mut self) -> Option<u8>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    SelectPalette(Palette),
    ToggleIntensity,
    BackgroundUp,
    BackgroundDown,
    Quit,
    None,
}

/// Reads one command, consuming the second byte of extended sequences.
pub fn read_command<K: KeySource + ?Sized>(keys: &mut K) -> Command {
    let Some(key) = keys.read_key() else {
        return Command::Quit;
    };
    if key == KEY_EXTENDED || key == KEY_EXTENDED_E0 {
        return match keys.read_key() {
            Some(SCAN_UP) => Command::BackgroundUp,
            Some(SCAN_DOWN) => Command::BackgroundDown,
            Some(_) => Command::None,
            None => Command::Quit,
        };
    }
    match key.to_ascii_uppercase() {
        KEY_ESCAPE => Command::Quit,
        b'0' => Command::SelectPalette(Palette::Palette0),
        b'1' => Command::SelectPalette(Palette::Palette1),
        b'2' => Command::SelectPalette(Palette::Palette2),
        b'I' => Command::ToggleIntensity,
        _ => Command::None,
    }
}

/// Key codes queued by a frontend (or a test) and read back in order.
#[derive(Debug, Default)]
pub struct KeyQueue {
    pending: VecDeque<u8>,
}

impl KeyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: u8) {
        self.pending.push_back(key);
    }

    pub fn push_extended(&mut self, scan_code: u8) {
        self.pending.push_back(KEY_EXTENDED_E0);
        self.pending.push_back(scan_code);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl KeySource for KeyQueue {
    fn read_key(&mut self) -> Option<u8> {
        self.pending.pop_front()
    }
}
