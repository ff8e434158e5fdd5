/*
 * Copyright (c) Radzivon Bartoshyk, 11/2024. All rights reserved.
 *
 * Redistribution and use in source and binary forms, with or without modification,
 * are permitted provided that the following conditions are met:
 *
 * 1.  Redistributions of source code must retain the above copyright notice, this
 * list of conditions and the following disclaimer.
 *
 * 2.  Redistributions in binary form must reproduce the above copyright notice,
 * this list of conditions and the following disclaimer in the documentation
 * and/or other materials provided with the distribution.
 *
 * 3.  Neither the name of the copyright holder nor the names of its
 * contributors may be used to endorse or promote products derived from
 * this software without specific prior written permission.
 *
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS" AND
 * ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE IMPLIED
 * WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
use crate::cancel::CancelSignal;
use crate::error::RenderError;
use crate::format::{BayerPattern, PixelFormat, RenderingOptions};
use crate::layout::{check_plane, check_plane_count, row_span, single_plane_layout, PlaneDescriptor};
use crate::numerics::{align_cell_dyn, narrow_component, read_cell_dyn};
use crate::renderer::{
    check_sink, clamp_even, precheck_source, RawRenderer, RenderOutcome, RenderStage,
};
use crate::sink::BitmapSink;
use crate::source::DataSource;

/// Renderer for raw sensor mosaic dumps in the four Bayer arrangements.
///
/// No demosaicing is attempted. Each 2x2 quad collapses into one color,
/// red and blue taken straight, the two greens averaged, and that color
/// fills the matching 2x2 output block. Rows are consumed in pairs since
/// a quad spans two of them.
pub struct BayerRenderer {
    format: PixelFormat,
    pattern: BayerPattern,
}

impl BayerRenderer {
    pub fn new(format: PixelFormat, pattern: BayerPattern) -> Self {
        BayerRenderer { format, pattern }
    }
}

impl RawRenderer for BayerRenderer {
    fn format(&self) -> PixelFormat {
        self.format
    }

    fn default_layout(&self, width: u32, _height: u32) -> Vec<PlaneDescriptor> {
        single_plane_layout(clamp_even(width), self.format.component_size())
    }

    fn source_size(
        &self,
        width: u32,
        height: u32,
        _options: &RenderingOptions,
        layout: &[PlaneDescriptor],
    ) -> u64 {
        let width = clamp_even(width);
        let height = clamp_even(height);
        if width == 0 || height == 0 {
            return 0;
        }
        let fallback;
        let layout = if layout.len() == 1 {
            layout
        } else {
            fallback = self.default_layout(width, height);
            &fallback
        };
        let row = row_span(
            layout[0].pixel_stride as u64 * width as u64,
            layout[0].row_stride as u64,
        );
        height as u64 * row
    }

    fn pixel_count(&self, source_size: u64) -> u64 {
        source_size / self.format.component_size() as u64
    }

    fn render(
        &self,
        source: &mut dyn DataSource,
        sink: &mut dyn BitmapSink,
        options: &RenderingOptions,
        layout: &[PlaneDescriptor],
        cancel: &dyn CancelSignal,
    ) -> Result<RenderOutcome, RenderError> {
        log::debug!("{} render entering {:?}", self.format.name, RenderStage::Validating);
        let width = clamp_even(sink.width());
        let height = clamp_even(sink.height());
        if width == 0 || height == 0 {
            return Err(RenderError::ZeroBaseSize);
        }
        check_plane_count(layout, 1)?;
        check_plane(0, layout[0], self.format.component_size(), width)?;
        let required = height as u64 * layout[0].row_stride as u64;
        precheck_source(source, required)?;
        check_sink(sink, width, height)?;

        let wide = self.format.component_size() == 2;
        let depth = self.format.bit_depth;
        let red_at = self.pattern.red_position();
        let blue_at = self.pattern.blue_position();
        let greens_at = self.pattern.green_positions();
        let width = width as usize;
        let height = height as usize;
        let pitch = sink.row_pitch();
        let row_stride = layout[0].row_stride as usize;
        let pixel_stride = layout[0].pixel_stride as usize;
        // A quad spans two source rows, both are held while it is folded.
        let mut scratch = vec![0u8; row_stride * 2];

        let fetch = |rows: &[u8], (col, row): (usize, usize), quad: usize| -> u8 {
            let at = row * row_stride + (quad * 2 + col) * pixel_stride;
            if wide {
                let cell = read_cell_dyn([rows[at], rows[at + 1]], options.endianness);
                narrow_component(align_cell_dyn(cell, options.bytes_packing, depth), depth)
            } else {
                narrow_component(rows[at], depth)
            }
        };

        let frame = sink.frame_mut();
        for dst_rows in frame[..pitch * height].chunks_exact_mut(pitch * 2) {
            if cancel.is_requested() {
                log::debug!("render cancelled in {:?}", RenderStage::StreamingLuma);
                return Ok(RenderOutcome::Cancelled);
            }
            source.read_exact_into(&mut scratch[..row_stride])?;
            source.read_exact_into(&mut scratch[row_stride..row_stride * 2])?;
            let (row0, row1) = dst_rows.split_at_mut(pitch);
            for quad in 0..width / 2 {
                let red = fetch(&scratch, red_at, quad);
                let blue = fetch(&scratch, blue_at, quad);
                let g0 = fetch(&scratch, greens_at[0], quad);
                let g1 = fetch(&scratch, greens_at[1], quad);
                let green = ((g0 as u16 + g1 as u16 + 1) >> 1) as u8;
                let block = [blue, green, red, 255, blue, green, red, 255];
                row0[quad * 8..quad * 8 + 8].copy_from_slice(&block);
                row1[quad * 8..quad * 8 + 8].copy_from_slice(&block);
            }
        }
        log::debug!("render reached {:?}", RenderStage::Done);
        Ok(RenderOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::NeverCancel;
    use crate::format::{ChromaSubsampling, Endianness};
    use crate::sink::BgraBitmap;
    use crate::source::SliceSource;

    fn bayer8(pattern: BayerPattern) -> BayerRenderer {
        BayerRenderer::new(
            PixelFormat::new("RGGB8", ChromaSubsampling::None, 8, 1),
            pattern,
        )
    }

    fn bayer12(pattern: BayerPattern) -> BayerRenderer {
        BayerRenderer::new(
            PixelFormat::new("RGGB12", ChromaSubsampling::None, 12, 1),
            pattern,
        )
    }

    #[test]
    fn rggb_quad_folds_into_one_color() {
        let raw: [u8; 4] = [200, 120, 80, 40];
        let renderer = bayer8(BayerPattern::Rggb);
        let options = RenderingOptions::default();
        let layout = renderer.default_layout(2, 2);
        assert_eq!(renderer.source_size(2, 2, &options, &layout), 4);
        assert_eq!(renderer.pixel_count(4), 4);

        let mut source = SliceSource::new(&raw);
        let mut bitmap = BgraBitmap::alloc(2, 2);
        renderer
            .render(&mut source, &mut bitmap, &options, &layout, &NeverCancel)
            .unwrap();
        assert_eq!(source.consumed(), 4);
        // Greens 120 and 80 average to 100.
        for px in bitmap.data().chunks_exact(4) {
            assert_eq!(px, [40, 100, 200, 255]);
        }
    }

    #[test]
    fn bggr_mirrors_rggb() {
        let rggb_raw: [u8; 4] = [200, 120, 80, 40];
        let bggr_raw: [u8; 4] = [40, 120, 80, 200];
        let options = RenderingOptions::default();
        let layout = bayer8(BayerPattern::Rggb).default_layout(2, 2);

        let mut from_rggb = BgraBitmap::alloc(2, 2);
        bayer8(BayerPattern::Rggb)
            .render(
                &mut SliceSource::new(&rggb_raw),
                &mut from_rggb,
                &options,
                &layout,
                &NeverCancel,
            )
            .unwrap();
        let mut from_bggr = BgraBitmap::alloc(2, 2);
        bayer8(BayerPattern::Bggr)
            .render(
                &mut SliceSource::new(&bggr_raw),
                &mut from_bggr,
                &options,
                &layout,
                &NeverCancel,
            )
            .unwrap();
        assert_eq!(from_rggb.data(), from_bggr.data());
    }

    #[test]
    fn twelve_bit_cells_narrow_before_folding() {
        let renderer = BayerRenderer::new(
            PixelFormat::new("RGGB12", ChromaSubsampling::None, 12, 1),
            BayerPattern::Rggb,
        );
        let samples: [u16; 4] = [0xc80, 0x780, 0x500, 0x280];
        let mut raw = Vec::new();
        for s in samples {
            raw.extend_from_slice(&s.to_le_bytes());
        }
        let options = RenderingOptions::default();
        let layout = renderer.default_layout(2, 2);
        assert_eq!(renderer.source_size(2, 2, &options, &layout), 8);

        let mut bitmap = BgraBitmap::alloc(2, 2);
        renderer
            .render(
                &mut SliceSource::new(&raw),
                &mut bitmap,
                &options,
                &layout,
                &NeverCancel,
            )
            .unwrap();
        // Narrowing keeps the top eight of twelve bits.
        for px in bitmap.data().chunks_exact(4) {
            assert_eq!(px, [0x28, (0x78 + 0x50 + 1) / 2, 0xc8, 255]);
        }
    }

    #[test]
    fn big_endian_cells_are_honored() {
        let renderer = bayer12(BayerPattern::Rggb);
        let samples: [u16; 4] = [0xc80, 0x780, 0x500, 0x280];
        let mut raw = Vec::new();
        for s in samples {
            raw.extend_from_slice(&s.to_be_bytes());
        }
        let big = RenderingOptions {
            endianness: Endianness::BigEndian,
            ..RenderingOptions::default()
        };
        let layout = renderer.default_layout(2, 2);
        let mut bitmap = BgraBitmap::alloc(2, 2);
        renderer
            .render(
                &mut SliceSource::new(&raw),
                &mut bitmap,
                &big,
                &layout,
                &NeverCancel,
            )
            .unwrap();
        for px in bitmap.data().chunks_exact(4) {
            assert_eq!(px, [0x28, (0x78 + 0x50 + 1) / 2, 0xc8, 255]);
        }
    }

    #[test]
    fn odd_dimensions_are_clamped() {
        let renderer = bayer8(BayerPattern::Grbg);
        let options = RenderingOptions::default();
        assert_eq!(
            renderer.source_size(5, 3, &options, &[]),
            renderer.source_size(4, 2, &options, &[])
        );
    }

    #[test]
    fn cancel_between_row_pairs() {
        let raw = [100u8; 8];
        let renderer = bayer8(BayerPattern::Rggb);
        let options = RenderingOptions::default();
        let layout = renderer.default_layout(2, 4);
        let mut source = SliceSource::new(&raw);
        let mut bitmap = BgraBitmap::alloc(2, 4);
        let signal = crate::cancel::CancelToken::new();
        signal.request();
        let outcome = renderer
            .render(&mut source, &mut bitmap, &options, &layout, &signal)
            .unwrap();
        assert_eq!(outcome, RenderOutcome::Cancelled);
        assert_eq!(source.consumed(), 0);
        assert!(bitmap.data().iter().all(|&b| b == 0));
    }
}
