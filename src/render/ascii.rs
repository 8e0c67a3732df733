use crate::render::{check_dims, frame_begin, frame_end, luma_u8, ColorCache, Frame, Renderer};
use std::io::Write;

pub struct AsciiRenderer {
    colors: ColorCache,
}

impl AsciiRenderer {
    pub fn new() -> Self {
        Self {
            colors: ColorCache::default(),
        }
    }
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for AsciiRenderer {
    fn name(&self) -> &'static str {
        "ascii"
    }

    fn pixel_scale(&self) -> (usize, usize) {
        (1, 1)
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let Some((cols, visual_rows, w)) = check_dims(frame, self.pixel_scale(), out)? else {
            return Ok(());
        };

        frame_begin(frame, out)?;
        self.colors.reset();

        // Dark -> bright ramp. ASCII-safe and compact.
        const RAMP: &[u8] = b" .,:;irsXA253hMHGS#9B&@";

        for y in 0..visual_rows {
            for x in 0..cols {
                let idx = (y * w + x) * 4;
                let r = frame.pixels_rgba[idx];
                let g = frame.pixels_rgba[idx + 1];
                let b = frame.pixels_rgba[idx + 2];

                let l = luma_u8(r, g, b) as usize;
                let ch = RAMP[l * (RAMP.len() - 1) / 255];

                self.colors.fg(out, (r, g, b))?;
                out.write_all(&[ch])?;
            }
            out.write_all(b"\r\n")?;
        }

        frame_end(frame, cols, visual_rows, out)
    }
}
