//! Offscreen copy of CGA video memory in 320x200 four-color layout.
//!
//! The adapter stores even scanlines in the first 8 KiB bank and odd
//! scanlines in the second. Each row is 80 bytes, four 2-bit pixels per byte
//! with the leftmost pixel in the top two bits.

use crate::error::{CgaError, Result};

pub const SCREEN_W: usize = 320;
pub const SCREEN_H: usize = 200;
pub const BUFFER_SIZE: usize = 16 * 1024;
pub const BANK_SIZE: usize = 8 * 1024;
pub const BYTES_PER_ROW: usize = SCREEN_W / PIXELS_PER_BYTE;
pub const PIXELS_PER_BYTE: usize = 4;

const PIXEL_MASK: u8 = 0b11;

/// Maps a pixel to its byte offset and the shift of its 2-bit field.
pub fn locate(x: usize, y: usize) -> Result<(usize, u8)> {
    if x >= SCREEN_W || y >= SCREEN_H {
        return Err(CgaError::OutOfRange { x, y });
    }
    let bank = (y & 1) * BANK_SIZE;
    let row = (y >> 1) * BYTES_PER_ROW;
    let shift = 6 - 2 * (x & 3) as u8;
    Ok((bank + row + (x >> 2), shift))
}

pub struct OffscreenBuffer {
    bytes: Box<[u8; BUFFER_SIZE]>,
}

impl OffscreenBuffer {
    pub fn new() -> Self {
        Self {
            bytes: Box::new([0u8; BUFFER_SIZE]),
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: u8) -> Result<()> {
        if color > PIXEL_MASK {
            return Err(CgaError::InvalidColor(color));
        }
        let (offset, shift) = locate(x, y)?;
        let mut value = self.bytes[offset];
        value &= !(PIXEL_MASK << shift);
        value |= color << shift;
        self.bytes[offset] = value;
        Ok(())
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Result<u8> {
        let (offset, shift) = locate(x, y)?;
        Ok((self.bytes[offset] >> shift) & PIXEL_MASK)
    }

    /// Fills a `w` x `h` block. Nothing is written unless the whole block
    /// lies on screen.
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u8) -> Result<()> {
        if color > PIXEL_MASK {
            return Err(CgaError::InvalidColor(color));
        }
        if w == 0 || h == 0 {
            return Ok(());
        }
        let right = x.saturating_add(w - 1);
        let bottom = y.saturating_add(h - 1);
        if right >= SCREEN_W || bottom >= SCREEN_H {
            return Err(CgaError::OutOfRange { x: right, y: bottom });
        }
        for py in y..=bottom {
            for px in x..=right {
                self.set_pixel(px, py, color)?;
            }
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    pub fn as_bytes(&self) -> &[u8; BUFFER_SIZE] {
        &self.bytes
    }

    /// Replaces the contents with a raw 16 KiB screen dump.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        if data.len() != BUFFER_SIZE {
            return Err(CgaError::BufferSize {
                expected: BUFFER_SIZE,
                actual: data.len(),
            });
        }
        self.bytes.copy_from_slice(data);
        Ok(())
    }
}

impl Default for OffscreenBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn locate_interleaves_scanlines() {
        assert_eq!(locate(0, 0), Ok((0, 6)));
        assert_eq!(locate(0, 1), Ok((BANK_SIZE, 6)));
        assert_eq!(locate(0, 2), Ok((BYTES_PER_ROW, 6)));
        assert_eq!(locate(3, 0), Ok((0, 0)));
        assert_eq!(locate(4, 3), Ok((BANK_SIZE + BYTES_PER_ROW + 1, 6)));
        assert_eq!(locate(319, 199), Ok((BANK_SIZE + 99 * BYTES_PER_ROW + 79, 0)));
    }

    #[test]
    fn locate_is_injective_and_covers_all_pixel_slots() {
        let mut slots = HashSet::new();
        let mut offsets = HashSet::new();
        for y in 0..SCREEN_H {
            for x in 0..SCREEN_W {
                let (offset, shift) = locate(x, y).unwrap();
                assert!(offset < BUFFER_SIZE);
                assert!(shift <= 6 && shift % 2 == 0);
                assert!(slots.insert((offset, shift)), "({x}, {y}) collides");
                offsets.insert(offset);
            }
        }
        assert_eq!(slots.len(), SCREEN_W * SCREEN_H);
        assert_eq!(offsets.len(), 16000);
    }

    #[test]
    fn locate_rejects_off_screen_pixels() {
        assert_eq!(locate(320, 0), Err(CgaError::OutOfRange { x: 320, y: 0 }));
        assert_eq!(locate(0, 200), Err(CgaError::OutOfRange { x: 0, y: 200 }));
    }

    #[test]
    fn set_pixel_keeps_neighbours_in_the_same_byte() {
        let mut buf = OffscreenBuffer::new();
        for (x, color) in [(8, 3), (9, 0), (10, 1), (11, 2)] {
            buf.set_pixel(x, 5, color).unwrap();
        }
        assert_eq!(buf.get_pixel(8, 5), Ok(3));
        assert_eq!(buf.get_pixel(9, 5), Ok(0));
        assert_eq!(buf.get_pixel(10, 5), Ok(1));
        assert_eq!(buf.get_pixel(11, 5), Ok(2));
        let (offset, _) = locate(8, 5).unwrap();
        assert_eq!(buf.as_bytes()[offset], 0b11_00_01_10);

        buf.set_pixel(9, 5, 2).unwrap();
        assert_eq!(buf.as_bytes()[offset], 0b11_10_01_10);
    }

    #[test]
    fn every_color_reads_back() {
        let mut buf = OffscreenBuffer::new();
        for color in 0..4 {
            buf.set_pixel(123, 77, color).unwrap();
            assert_eq!(buf.get_pixel(123, 77), Ok(color));
        }
    }

    #[test]
    fn set_pixel_rejects_wide_colors() {
        let mut buf = OffscreenBuffer::new();
        assert_eq!(buf.set_pixel(0, 0, 4), Err(CgaError::InvalidColor(4)));
        assert!(buf.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn fill_rect_paints_block_only() {
        let mut buf = OffscreenBuffer::new();
        buf.fill_rect(10, 10, 6, 3, 2).unwrap();
        for y in 9..14 {
            for x in 9..17 {
                let inside = (10..16).contains(&x) && (10..13).contains(&y);
                assert_eq!(buf.get_pixel(x, y), Ok(if inside { 2 } else { 0 }), "({x}, {y})");
            }
        }
    }

    #[test]
    fn fill_rect_off_screen_writes_nothing() {
        let mut buf = OffscreenBuffer::new();
        assert!(buf.fill_rect(300, 190, 30, 5, 1).is_err());
        assert!(buf.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(buf.fill_rect(5, 5, 0, 10, 1), Ok(()));
    }

    #[test]
    fn load_checks_dump_size() {
        let mut buf = OffscreenBuffer::new();
        assert_eq!(
            buf.load(&[0u8; 100]),
            Err(CgaError::BufferSize { expected: BUFFER_SIZE, actual: 100 })
        );
        let dump = vec![0xE4u8; BUFFER_SIZE];
        buf.load(&dump).unwrap();
        assert_eq!(buf.get_pixel(0, 0), Ok(3));
        assert_eq!(buf.get_pixel(3, 1), Ok(0));
        buf.clear();
        assert!(buf.as_bytes().iter().all(|&b| b == 0));
    }
}
