use crate::render::{check_dims, frame_begin, frame_end, ColorCache, Frame, Renderer};
use std::io::Write;

/// Braille cells pack a 2x4 pixel block per character. Dot on/off comes
/// from a per-cell luma threshold; fg/bg are the means of the on and off
/// pixel groups.
pub struct BrailleRenderer {
    colors: ColorCache,
}

impl BrailleRenderer {
    pub fn new() -> Self {
        Self {
            colors: ColorCache::default(),
        }
    }
}

impl Default for BrailleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for BrailleRenderer {
    fn name(&self) -> &'static str {
        "braille"
    }

    fn pixel_scale(&self) -> (usize, usize) {
        (2, 4)
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let Some((cols, visual_rows, w)) = check_dims(frame, self.pixel_scale(), out)? else {
            return Ok(());
        };

        frame_begin(frame, out)?;
        self.colors.reset();

        // Braille dot bit per position within the 2x4 block, row-major.
        const DOT_BITS: [u8; 8] = [0x01, 0x08, 0x02, 0x10, 0x04, 0x20, 0x40, 0x80];

        for row in 0..visual_rows {
            let base_y = row * 4;
            for col in 0..cols {
                let base_x = col * 2;

                let mut lum = [0u16; 8];
                let mut rgb = [(0u8, 0u8, 0u8); 8];
                for dy in 0..4usize {
                    for dx in 0..2usize {
                        let i = dy * 2 + dx;
                        let idx = ((base_y + dy) * w + base_x + dx) * 4;
                        let r = frame.pixels_rgba[idx];
                        let g = frame.pixels_rgba[idx + 1];
                        let b = frame.pixels_rgba[idx + 2];
                        rgb[i] = (r, g, b);
                        lum[i] = luma_u16(r, g, b);
                    }
                }

                let min_l = *lum.iter().min().unwrap_or(&0);
                let max_l = *lum.iter().max().unwrap_or(&0);
                let thr = (min_l + max_l) / 2;

                let mut bits: u8 = 0;
                let mut on = ColorSum::default();
                let mut off = ColorSum::default();
                for i in 0..8usize {
                    if lum[i] > thr {
                        bits |= DOT_BITS[i];
                        on.add(rgb[i]);
                    } else {
                        off.add(rgb[i]);
                    }
                }

                let (fgc, bgc, ch) = if bits == 0 {
                    let c = off.mean().unwrap_or((0, 0, 0));
                    (c, c, ' ')
                } else {
                    let fgc = on.mean().unwrap_or((0, 0, 0));
                    let bgc = off.mean().unwrap_or(fgc);
                    let ch = char::from_u32(0x2800 + bits as u32).unwrap_or(' ');
                    (fgc, bgc, ch)
                };

                self.colors.fg(out, fgc)?;
                self.colors.bg(out, bgc)?;
                write!(out, "{ch}")?;
            }
            out.write_all(b"\r\n")?;
        }

        frame_end(frame, cols, visual_rows, out)
    }
}

#[derive(Default)]
struct ColorSum {
    r: u32,
    g: u32,
    b: u32,
    n: u32,
}

impl ColorSum {
    fn add(&mut self, c: (u8, u8, u8)) {
        self.r += c.0 as u32;
        self.g += c.1 as u32;
        self.b += c.2 as u32;
        self.n += 1;
    }

    fn mean(&self) -> Option<(u8, u8, u8)> {
        if self.n == 0 {
            return None;
        }
        Some(((self.r / self.n) as u8, (self.g / self.n) as u8, (self.b / self.n) as u8))
    }
}

#[inline]
fn luma_u16(r: u8, g: u8, b: u8) -> u16 {
    ((r as u32 * 54 + g as u32 * 183 + b as u32 * 19) >> 8) as u16
}
