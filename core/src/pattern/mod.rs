use crate::error::Result;
use crate::mem::{OffscreenBuffer, SCREEN_H, SCREEN_W};

pub const BAND_WIDTH: usize = 20;

/// Fills the buffer with 20 pixel wide vertical bands cycling through the
/// four color indices. A torn or staggered picture means the scanline
/// interleave is wrong.
pub fn draw_test_pattern(buffer: &mut OffscreenBuffer) -> Result<()> {
    let mut color = 0u8;
    for band_x in (0..SCREEN_W).step_by(BAND_WIDTH) {
        for y in 0..SCREEN_H {
            for x in band_x..band_x + BAND_WIDTH {
                buffer.set_pixel(x, y, color)?;
            }
        }
        log::trace!("band at x={} filled with color {}", band_x, color);
        color = (color + 1) & 3;
    }
    log::debug!("test pattern drawn ({} bands)", SCREEN_W / BAND_WIDTH);
    Ok(())
}
