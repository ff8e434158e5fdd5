/*
 * Copyright (c) Radzivon Bartoshyk, 10/2024. All rights reserved.
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
use crate::format::{PixelFormat, RenderingOptions};
use crate::layout::{check_plane, check_plane_count, row_span, single_plane_layout, PlaneDescriptor};
use crate::numerics::{align_cell_dyn, narrow_component, read_cell_dyn};
use crate::renderer::{check_sink, precheck_source, RawRenderer, RenderOutcome, RenderStage};
use crate::sink::BitmapSink;
use crate::source::DataSource;

/// Renderer for single component luminance dumps, GRAY8 and GRAY16.
pub struct GrayRenderer {
    format: PixelFormat,
}

impl GrayRenderer {
    pub fn new(format: PixelFormat) -> Self {
        GrayRenderer { format }
    }
}

impl RawRenderer for GrayRenderer {
    fn format(&self) -> PixelFormat {
        self.format
    }

    fn default_layout(&self, width: u32, _height: u32) -> Vec<PlaneDescriptor> {
        single_plane_layout(width, self.format.component_size())
    }

    fn source_size(
        &self,
        width: u32,
        height: u32,
        _options: &RenderingOptions,
        layout: &[PlaneDescriptor],
    ) -> u64 {
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
        let width = sink.width();
        let height = sink.height();
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
        let width = width as usize;
        let height = height as usize;
        let pitch = sink.row_pitch();
        let row_stride = layout[0].row_stride as usize;
        let pixel_stride = layout[0].pixel_stride as usize;
        let mut scratch = vec![0u8; row_stride];

        let frame = sink.frame_mut();
        for dst_row in frame[..pitch * height].chunks_exact_mut(pitch) {
            if cancel.is_requested() {
                log::debug!("render cancelled in {:?}", RenderStage::StreamingLuma);
                return Ok(RenderOutcome::Cancelled);
            }
            source.read_exact_into(&mut scratch[..row_stride])?;
            for (dst, src) in dst_row[..width * 4]
                .chunks_exact_mut(4)
                .zip(scratch[..width * pixel_stride].chunks_exact(pixel_stride))
            {
                let level = if wide {
                    let cell = read_cell_dyn([src[0], src[1]], options.endianness);
                    narrow_component(align_cell_dyn(cell, options.bytes_packing, depth), depth)
                } else {
                    narrow_component(src[0], depth)
                };
                dst.copy_from_slice(&[level, level, level, 255]);
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

    fn gray8() -> GrayRenderer {
        GrayRenderer::new(PixelFormat::new("GRAY8", ChromaSubsampling::None, 8, 1))
    }

    fn gray16() -> GrayRenderer {
        GrayRenderer::new(PixelFormat::new("GRAY16", ChromaSubsampling::None, 16, 1))
    }

    #[test]
    fn gray8_expands_to_neutral_bgra() {
        let raw: [u8; 6] = [0, 51, 102, 153, 204, 255];
        let renderer = gray8();
        let options = RenderingOptions::default();
        let layout = renderer.default_layout(3, 2);
        assert_eq!(renderer.source_size(3, 2, &options, &layout), 6);
        assert_eq!(renderer.pixel_count(6), 6);

        let mut source = SliceSource::new(&raw);
        let mut bitmap = BgraBitmap::alloc(3, 2);
        renderer
            .render(&mut source, &mut bitmap, &options, &layout, &NeverCancel)
            .unwrap();
        assert_eq!(source.consumed(), 6);
        for (px, &level) in bitmap.data().chunks_exact(4).zip(raw.iter()) {
            assert_eq!(px, [level, level, level, 255]);
        }
    }

    #[test]
    fn gray16_narrows_by_endianness() {
        let raw: [u8; 4] = [0x12, 0xfe, 0xfe, 0x12];
        let renderer = gray16();
        let layout = renderer.default_layout(2, 1);

        let mut little = BgraBitmap::alloc(2, 1);
        renderer
            .render(
                &mut SliceSource::new(&raw),
                &mut little,
                &RenderingOptions::default(),
                &layout,
                &NeverCancel,
            )
            .unwrap();
        assert_eq!(little.data(), &[0xfe, 0xfe, 0xfe, 255, 0x12, 0x12, 0x12, 255]);

        let big = RenderingOptions {
            endianness: Endianness::BigEndian,
            ..RenderingOptions::default()
        };
        let mut flipped = BgraBitmap::alloc(2, 1);
        renderer
            .render(
                &mut SliceSource::new(&raw),
                &mut flipped,
                &big,
                &layout,
                &NeverCancel,
            )
            .unwrap();
        assert_eq!(flipped.data(), &[0x12, 0x12, 0x12, 255, 0xfe, 0xfe, 0xfe, 255]);
    }

    #[test]
    fn padded_rows_are_consumed() {
        let renderer = gray8();
        let options = RenderingOptions::default();
        let layout = [PlaneDescriptor::new(1, 5)];
        let size = renderer.source_size(3, 2, &options, &layout);
        assert_eq!(size, 10);
        let raw = vec![7u8; 10];
        let mut source = SliceSource::new(&raw);
        let mut bitmap = BgraBitmap::alloc(3, 2);
        renderer
            .render(&mut source, &mut bitmap, &options, &layout, &NeverCancel)
            .unwrap();
        assert_eq!(source.consumed(), 10);
    }
}
