use crate::bus::DisplayHardware;
use crate::mem::OffscreenBuffer;

/// Copies the whole offscreen buffer to video memory in one transfer.
///
/// The bank interleaving is kept as is; the adapter scans memory in the
/// same order the buffer was laid out in.
pub fn blit<H: DisplayHardware + ?Sized>(hw: &mut H, buffer: &OffscreenBuffer) {
    #[cfg(feature = "trace_blit")]
    log::trace!("blit {} bytes", buffer.as_bytes().len());
    hw.write_framebuffer(buffer.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::test_harness::{HardwareCall, MockHardware};
    use crate::bus::Adapter;
    use crate::mem::BUFFER_SIZE;

    #[test]
    fn blit_is_a_single_full_copy() {
        let mut hw = MockHardware::new();
        let mut buffer = OffscreenBuffer::new();
        buffer.set_pixel(0, 1, 3).unwrap();
        buffer.set_pixel(319, 198, 2).unwrap();

        blit(&mut hw, &buffer);

        assert_eq!(hw.calls(), &[HardwareCall::Framebuffer(BUFFER_SIZE)]);
        assert_eq!(hw.framebuffer(), &buffer.as_bytes()[..]);
    }

    #[test]
    fn blit_overwrites_cleared_adapter_memory() {
        let mut adapter = Adapter::new();
        let mut buffer = OffscreenBuffer::new();
        buffer.fill_rect(0, 0, 4, 2, 1).unwrap();
        blit(&mut adapter, &buffer);
        assert_eq!(adapter.vram[0], 0b01_01_01_01);
        assert_eq!(adapter.vram[8192], 0b01_01_01_01);
        assert_eq!(adapter.vram[1], 0);
    }
}
