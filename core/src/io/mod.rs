use crate::mode::DisplayMode;

pub const PORT_MODE_CONTROL: u16 = 0x03D8;
pub const PORT_COLOR_SELECT: u16 = 0x03D9;
pub const PORT_STATUS: u16 = 0x03DA;

pub const MODE_HIRES_TEXT: u8 = 0b0000_0001;
pub const MODE_GRAPHICS: u8 = 0b0000_0010;
pub const MODE_BW: u8 = 0b0000_0100;
pub const MODE_ENABLE: u8 = 0b0000_1000;
pub const MODE_BLINKING: u8 = 0b0010_0000;

// BIOS leaves bright cyan/magenta/white selected after every mode set.
pub const COLOR_SELECT_DEFAULT: u8 = 0x30;

const STATUS_IDLE: u8 = 0xF0;

/// Port-mapped registers of the simulated adapter.
pub struct Io {
    pub mode_control: u8,
    pub color_select: u8,
}

impl Default for Io {
    fn default() -> Self {
        Self {
            mode_control: mode_control_value(DisplayMode::Text),
            color_select: COLOR_SELECT_DEFAULT,
        }
    }
}

/// Value the BIOS programs into the mode control register for `mode`.
pub fn mode_control_value(mode: DisplayMode) -> u8 {
    match mode {
        DisplayMode::Text => MODE_HIRES_TEXT | MODE_ENABLE | MODE_BLINKING,
        DisplayMode::Graphics4 => MODE_GRAPHICS | MODE_ENABLE | MODE_BLINKING,
        DisplayMode::Graphics5 => MODE_GRAPHICS | MODE_BW | MODE_ENABLE | MODE_BLINKING,
    }
}

impl Io {
    pub fn new() -> Self { Self::default() }

    // Mode control and color select are write-only on a real card; the
    // latched values are returned here so frontends can show them.
    pub fn read8(&self, port: u16) -> u8 {
        match port {
            PORT_MODE_CONTROL => self.mode_control,
            PORT_COLOR_SELECT => self.color_select,
            PORT_STATUS => STATUS_IDLE,
            _ => 0xFF,
        }
    }

    pub fn write8(&mut self, port: u16, value: u8) {
        match port {
            PORT_MODE_CONTROL => self.mode_control = value & 0x3F,
            PORT_COLOR_SELECT => self.color_select = value & 0x3F,
            _ => {}
        }
    }

    pub fn is_graphics(&self) -> bool {
        self.mode_control & MODE_GRAPHICS != 0
    }

    pub fn color_burst_off(&self) -> bool {
        self.mode_control & MODE_BW != 0
    }

    pub fn video_enabled(&self) -> bool {
        self.mode_control & MODE_ENABLE != 0
    }

    pub fn display_mode(&self) -> Option<DisplayMode> {
        [DisplayMode::Text, DisplayMode::Graphics4, DisplayMode::Graphics5]
            .into_iter()
            .find(|&mode| mode_control_value(mode) == self.mode_control)
    }
}
