use crate::io::Io;
use crate::mem::{locate, BUFFER_SIZE, SCREEN_H, SCREEN_W};
use crate::palette::{COLOR_SELECT_INTENSITY_BIT, COLOR_SELECT_PALETTE_BIT};

pub const CGA_SCREEN_W: usize = SCREEN_W;
pub const CGA_SCREEN_H: usize = SCREEN_H;

/// The 16 RGBI colors as a typical monitor shows them, with color 6
/// darkened to brown.
pub const RGBI_COLORS: [[u8; 3]; 16] = [
    [0x00, 0x00, 0x00],
    [0x00, 0x00, 0xAA],
    [0x00, 0xAA, 0x00],
    [0x00, 0xAA, 0xAA],
    [0xAA, 0x00, 0x00],
    [0xAA, 0x00, 0xAA],
    [0xAA, 0x55, 0x00],
    [0xAA, 0xAA, 0xAA],
    [0x55, 0x55, 0x55],
    [0x55, 0x55, 0xFF],
    [0x55, 0xFF, 0x55],
    [0x55, 0xFF, 0xFF],
    [0xFF, 0x55, 0x55],
    [0xFF, 0x55, 0xFF],
    [0xFF, 0xFF, 0x55],
    [0xFF, 0xFF, 0xFF],
];

// Foreground colors for pixel values 1-3, indexed by
// [burst off][palette bit][intensity bit].
const FOREGROUND: [[[[u8; 3]; 2]; 2]; 2] = [
    [
        [[2, 4, 6], [10, 12, 14]],
        [[3, 5, 7], [11, 13, 15]],
    ],
    [
        [[3, 4, 7], [11, 12, 15]],
        [[3, 4, 7], [11, 12, 15]],
    ],
];

pub fn rgbi_to_rgba8888(color: u8) -> [u8; 4] {
    let [r, g, b] = RGBI_COLORS[(color & 0x0F) as usize];
    [r, g, b, 0xFF]
}

/// RGBI color for each 2-bit pixel value under the current register state.
pub fn active_colors(io: &Io) -> [u8; 4] {
    let burst_off = io.color_burst_off() as usize;
    let palette = (io.color_select & COLOR_SELECT_PALETTE_BIT != 0) as usize;
    let intensity = (io.color_select & COLOR_SELECT_INTENSITY_BIT != 0) as usize;
    let [c1, c2, c3] = FOREGROUND[burst_off][palette][intensity];
    [io.color_select & 0x0F, c1, c2, c3]
}

/// Decodes 320x200 four-color video memory to RGBA. Text mode and a
/// disabled display come out black.
pub fn framebuffer_cga_to_rgba(dst: &mut [u8], vram: &[u8; BUFFER_SIZE], io: &Io) {
    assert_eq!(dst.len(), CGA_SCREEN_W * CGA_SCREEN_H * 4);
    if !io.is_graphics() || !io.video_enabled() {
        for px in dst.chunks_exact_mut(4) {
            px.copy_from_slice(&[0, 0, 0, 0xFF]);
        }
        return;
    }
    let colors = active_colors(io).map(rgbi_to_rgba8888);
    for y in 0..CGA_SCREEN_H {
        for x in 0..CGA_SCREEN_W {
            let Ok((offset, shift)) = locate(x, y) else {
                continue;
            };
            let value = (vram[offset] >> shift) & 0b11;
            let o = (y * CGA_SCREEN_W + x) * 4;
            dst[o..o + 4].copy_from_slice(&colors[value as usize]);
        }
    }
}
