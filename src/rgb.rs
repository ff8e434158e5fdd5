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
use crate::format::{Endianness, PackedChannels, PixelFormat, RenderingOptions};
use crate::layout::{check_plane, check_plane_count, row_span, single_plane_layout, PlaneDescriptor};
use crate::numerics::read_cell;
use crate::renderer::{check_sink, precheck_source, RawRenderer, RenderOutcome, RenderStage};
use crate::sink::BitmapSink;
use crate::source::DataSource;

/// Renderer for packed RGB dumps with no chroma sub-sampling.
///
/// Covers the 8-bit RGB24/BGR24/RGBA32/BGRA32 shapes plus RGB48 with
/// 16-bit cells. Dimensions are taken as-is, odd widths stay odd.
pub struct PackedRgbRenderer {
    format: PixelFormat,
    channels: PackedChannels,
}

impl PackedRgbRenderer {
    pub fn new(format: PixelFormat, channels: PackedChannels) -> Self {
        PackedRgbRenderer { format, channels }
    }

    fn bytes_per_pixel(&self) -> u32 {
        self.channels.get_channels_count() as u32 * self.format.component_size()
    }
}

impl RawRenderer for PackedRgbRenderer {
    fn format(&self) -> PixelFormat {
        self.format
    }

    fn default_layout(&self, width: u32, _height: u32) -> Vec<PlaneDescriptor> {
        single_plane_layout(width, self.bytes_per_pixel())
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
        source_size / self.bytes_per_pixel() as u64
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
        check_plane(0, layout[0], self.bytes_per_pixel(), width)?;
        let required = height as u64 * layout[0].row_stride as u64;
        precheck_source(source, required)?;
        check_sink(sink, width, height)?;

        let comp = self.format.component_size() as usize;
        let r_at = self.channels.get_r_channel_offset() * comp;
        let g_at = self.channels.get_g_channel_offset() * comp;
        let b_at = self.channels.get_b_channel_offset() * comp;
        let a_at = self.channels.get_a_channel_offset() * comp;
        let has_alpha = self.channels.has_alpha();
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
            let src_row = &scratch[..width * pixel_stride];
            let dst_row = &mut dst_row[..width * 4];
            if comp == 1 {
                for (dst, src) in dst_row
                    .chunks_exact_mut(4)
                    .zip(src_row.chunks_exact(pixel_stride))
                {
                    dst[0] = src[b_at];
                    dst[1] = src[g_at];
                    dst[2] = src[r_at];
                    dst[3] = if has_alpha { src[a_at] } else { 255 };
                }
            } else {
                match options.endianness {
                    Endianness::BigEndian => paint_wide_row::<{ Endianness::BigEndian as u8 }>(
                        src_row,
                        dst_row,
                        pixel_stride,
                        [b_at, g_at, r_at],
                    ),
                    Endianness::LittleEndian => {
                        paint_wide_row::<{ Endianness::LittleEndian as u8 }>(
                            src_row,
                            dst_row,
                            pixel_stride,
                            [b_at, g_at, r_at],
                        )
                    }
                }
            }
        }
        log::debug!("render reached {:?}", RenderStage::Done);
        Ok(RenderOutcome::Completed)
    }
}

/// 16-bit cells always fill the full cell, so narrowing keeps the high byte.
fn paint_wide_row<const ENDIANNESS: u8>(
    src_row: &[u8],
    dst_row: &mut [u8],
    pixel_stride: usize,
    bgr_offsets: [usize; 3],
) {
    for (dst, src) in dst_row
        .chunks_exact_mut(4)
        .zip(src_row.chunks_exact(pixel_stride))
    {
        for (channel, &at) in bgr_offsets.iter().enumerate() {
            let cell = read_cell::<ENDIANNESS>([src[at], src[at + 1]]);
            dst[channel] = (cell >> 8) as u8;
        }
        dst[3] = 255;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::NeverCancel;
    use crate::format::ChromaSubsampling;
    use crate::sink::BgraBitmap;
    use crate::source::SliceSource;
    use rand::Rng;

    fn rgb24() -> PackedRgbRenderer {
        PackedRgbRenderer::new(
            PixelFormat::new("RGB24", ChromaSubsampling::None, 8, 1),
            PackedChannels::Rgb,
        )
    }

    fn bgra32() -> PackedRgbRenderer {
        PackedRgbRenderer::new(
            PixelFormat::new("BGRA32", ChromaSubsampling::None, 8, 1),
            PackedChannels::Bgra,
        )
    }

    fn rgba32() -> PackedRgbRenderer {
        PackedRgbRenderer::new(
            PixelFormat::new("RGBA32", ChromaSubsampling::None, 8, 1),
            PackedChannels::Rgba,
        )
    }

    fn rgb48() -> PackedRgbRenderer {
        PackedRgbRenderer::new(
            PixelFormat::new("RGB48", ChromaSubsampling::None, 16, 1),
            PackedChannels::Rgb,
        )
    }

    #[test]
    fn rgb24_reorders_to_bgra() {
        let raw: [u8; 9] = [255, 0, 0, 0, 255, 0, 0, 0, 255];
        let renderer = rgb24();
        let options = RenderingOptions::default();
        let layout = renderer.default_layout(3, 1);
        assert_eq!(renderer.source_size(3, 1, &options, &layout), 9);
        assert_eq!(renderer.pixel_count(9), 3);

        let mut source = SliceSource::new(&raw);
        let mut bitmap = BgraBitmap::alloc(3, 1);
        renderer
            .render(&mut source, &mut bitmap, &options, &layout, &NeverCancel)
            .unwrap();
        assert_eq!(
            bitmap.data(),
            &[0, 0, 255, 255, 0, 255, 0, 255, 255, 0, 0, 255]
        );
    }

    #[test]
    fn bgra32_is_a_passthrough() {
        let mut rng = rand::rng();
        let raw: Vec<u8> = (0..4 * 6).map(|_| rng.random::<u8>()).collect();
        let renderer = bgra32();
        let options = RenderingOptions::default();
        let layout = renderer.default_layout(2, 3);
        let mut source = SliceSource::new(&raw);
        let mut bitmap = BgraBitmap::alloc(2, 3);
        renderer
            .render(&mut source, &mut bitmap, &options, &layout, &NeverCancel)
            .unwrap();
        assert_eq!(bitmap.data(), raw.as_slice());
    }

    #[test]
    fn rgba32_keeps_source_alpha() {
        let raw: [u8; 4] = [1, 2, 3, 77];
        let renderer = rgba32();
        let options = RenderingOptions::default();
        let layout = renderer.default_layout(1, 1);
        let mut bitmap = BgraBitmap::alloc(1, 1);
        renderer
            .render(
                &mut SliceSource::new(&raw),
                &mut bitmap,
                &options,
                &layout,
                &NeverCancel,
            )
            .unwrap();
        assert_eq!(bitmap.data(), &[3, 2, 1, 77]);
    }

    #[test]
    fn rgb48_narrows_by_endianness() {
        let raw: [u8; 6] = [0x12, 0x34, 0xab, 0xcd, 0x00, 0xff];
        let renderer = rgb48();
        let layout = renderer.default_layout(1, 1);

        let mut little = BgraBitmap::alloc(1, 1);
        renderer
            .render(
                &mut SliceSource::new(&raw),
                &mut little,
                &RenderingOptions::default(),
                &layout,
                &NeverCancel,
            )
            .unwrap();
        // Little endian cells, the high byte is the second of each pair.
        assert_eq!(little.data(), &[0xff, 0xcd, 0x34, 255]);

        let big = RenderingOptions {
            endianness: Endianness::BigEndian,
            ..RenderingOptions::default()
        };
        let mut big_bitmap = BgraBitmap::alloc(1, 1);
        renderer
            .render(
                &mut SliceSource::new(&raw),
                &mut big_bitmap,
                &big,
                &layout,
                &NeverCancel,
            )
            .unwrap();
        assert_eq!(big_bitmap.data(), &[0x00, 0xab, 0x12, 255]);
    }

    #[test]
    fn odd_width_is_not_clamped() {
        let renderer = rgb24();
        let options = RenderingOptions::default();
        let layout = renderer.default_layout(3, 3);
        assert_eq!(renderer.source_size(3, 3, &options, &layout), 27);
        let raw = vec![9u8; 27];
        let mut source = SliceSource::new(&raw);
        let mut bitmap = BgraBitmap::alloc(3, 3);
        renderer
            .render(&mut source, &mut bitmap, &options, &layout, &NeverCancel)
            .unwrap();
        assert_eq!(source.consumed(), 27);
        assert!(bitmap.data().chunks_exact(4).all(|px| px == [9, 9, 9, 255]));
    }
}
