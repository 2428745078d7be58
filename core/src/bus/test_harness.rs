// Recording stand-in for the display adapter. Every call the driver makes is
// kept in order so tests can assert on the exact hardware traffic.

use super::DisplayHardware;
use crate::mem::BUFFER_SIZE;
use crate::mode::DisplayMode;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HardwareCall {
    SetMode(DisplayMode),
    ControlRegister(u8),
    // Only the length is kept; the image itself lives in `MockHardware::framebuffer`.
    Framebuffer(usize),
}

pub struct MockHardware {
    calls: Vec<HardwareCall>,
    framebuffer: Vec<u8>,
}

impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            framebuffer: vec![0u8; BUFFER_SIZE],
        }
    }

    pub fn calls(&self) -> &[HardwareCall] {
        &self.calls
    }

    pub fn reset(&mut self) {
        self.calls.clear();
    }

    pub fn mode_switches(&self) -> usize {
        self.count(|c| matches!(c, HardwareCall::SetMode(_)))
    }

    pub fn blits(&self) -> usize {
        self.count(|c| matches!(c, HardwareCall::Framebuffer(_)))
    }

    pub fn last_control_register(&self) -> Option<u8> {
        self.calls.iter().rev().find_map(|c| match c {
            HardwareCall::ControlRegister(v) => Some(*v),
            _ => None,
        })
    }

    pub fn last_mode(&self) -> Option<DisplayMode> {
        self.calls.iter().rev().find_map(|c| match c {
            HardwareCall::SetMode(m) => Some(*m),
            _ => None,
        })
    }

    pub fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }

    fn count(&self, pred: impl Fn(&HardwareCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(*c)).count()
    }
}

impl DisplayHardware for MockHardware {
    fn set_mode(&mut self, mode: DisplayMode) {
        self.calls.push(HardwareCall::SetMode(mode));
    }

    fn write_control_register(&mut self, value: u8) {
        self.calls.push(HardwareCall::ControlRegister(value));
    }

    fn write_framebuffer(&mut self, data: &[u8; BUFFER_SIZE]) {
        self.calls.push(HardwareCall::Framebuffer(data.len()));
        self.framebuffer.copy_from_slice(data);
    }
}
