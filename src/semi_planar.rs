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
use crate::format::{ChromaOrder, ChromaSubsampling, PixelFormat, RenderingOptions};
use crate::layout::{
    check_plane, check_plane_count, row_span, semi_planar_layout, PlaneDescriptor,
};
use crate::renderer::{
    check_sink, clamp_even, precheck_source, RawRenderer, RenderOutcome, RenderStage,
};
use crate::sink::BitmapSink;
use crate::source::DataSource;
use crate::transform::YuvToBgra;

/// Renderer for 8-bit semi-planar YUV dumps, the NV12/NV16 family.
///
/// Same staging scheme as the 16-bit variant, but cells are single bytes
/// so endianness and bit placement never apply.
pub struct SemiPlanarRenderer {
    format: PixelFormat,
    order: ChromaOrder,
}

impl SemiPlanarRenderer {
    pub fn new(format: PixelFormat, order: ChromaOrder) -> Self {
        SemiPlanarRenderer { format, order }
    }

    fn chroma_rows(&self, height: u32) -> u32 {
        match self.format.subsampling {
            ChromaSubsampling::Yuv420 => height / 2,
            _ => height,
        }
    }
}

impl RawRenderer for SemiPlanarRenderer {
    fn format(&self) -> PixelFormat {
        self.format
    }

    fn default_layout(&self, width: u32, _height: u32) -> Vec<PlaneDescriptor> {
        semi_planar_layout(clamp_even(width), 1)
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
        let layout = if layout.len() == 2 {
            layout
        } else {
            fallback = self.default_layout(width, height);
            &fallback
        };
        let luma_row = row_span(
            layout[0].pixel_stride as u64 * width as u64,
            layout[0].row_stride as u64,
        );
        let chroma_row = row_span(
            layout[1].pixel_stride as u64 * (width / 2) as u64,
            layout[1].row_stride as u64,
        );
        height as u64 * luma_row + self.chroma_rows(height) as u64 * chroma_row
    }

    fn pixel_count(&self, source_size: u64) -> u64 {
        // The 4:2:0 guess is one pixel per three bytes whatever the cell
        // width, so for byte cells it reports half the true capacity.
        match self.format.subsampling {
            ChromaSubsampling::Yuv420 => source_size / 3,
            _ => source_size / 2,
        }
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
        check_plane_count(layout, 2)?;
        check_plane(0, layout[0], 1, width)?;
        check_plane(1, layout[1], 2, width / 2)?;
        let required = height as u64 * layout[0].row_stride as u64
            + self.chroma_rows(height) as u64 * layout[1].row_stride as u64;
        precheck_source(source, required)?;
        check_sink(sink, width, height)?;

        let kernel = YuvToBgra::new(options.range, options.matrix);
        let order = if options.swap_chroma {
            self.order.flipped()
        } else {
            self.order
        };
        let width = width as usize;
        let height = height as usize;
        let pitch = sink.row_pitch();
        let luma_stride = layout[0].row_stride as usize;
        let luma_pixel_stride = layout[0].pixel_stride as usize;
        let chroma_stride = layout[1].row_stride as usize;
        let chroma_pixel_stride = layout[1].pixel_stride as usize;
        let u_offset = order.get_u_position();
        let v_offset = order.get_v_position();
        let mut scratch = vec![0u8; luma_stride.max(chroma_stride)];

        let frame = sink.frame_mut();
        for dst_row in frame[..pitch * height].chunks_exact_mut(pitch) {
            if cancel.is_requested() {
                log::debug!("render cancelled in {:?}", RenderStage::StreamingLuma);
                return Ok(RenderOutcome::Cancelled);
            }
            source.read_exact_into(&mut scratch[..luma_stride])?;
            for (dst, src) in dst_row[..width * 4]
                .chunks_exact_mut(4)
                .zip(scratch[..width * luma_pixel_stride].chunks_exact(luma_pixel_stride))
            {
                dst[1] = src[0];
            }
        }

        let paint = |src_row: &[u8], dst_row: &mut [u8]| {
            for (dst, chroma) in dst_row[..width * 4]
                .chunks_exact_mut(8)
                .zip(src_row[..(width / 2) * chroma_pixel_stride].chunks_exact(chroma_pixel_stride))
            {
                let (first, second) =
                    kernel.bgra_pair(dst[1], dst[5], chroma[u_offset], chroma[v_offset]);
                dst[..4].copy_from_slice(&first);
                dst[4..8].copy_from_slice(&second);
            }
        };

        if self.format.subsampling == ChromaSubsampling::Yuv420 {
            for dst_rows in frame[..pitch * height].chunks_exact_mut(pitch * 2) {
                if cancel.is_requested() {
                    log::debug!("render cancelled in {:?}", RenderStage::StreamingChroma);
                    return Ok(RenderOutcome::Cancelled);
                }
                source.read_exact_into(&mut scratch[..chroma_stride])?;
                let (row0, row1) = dst_rows.split_at_mut(pitch);
                paint(&scratch[..chroma_stride], row0);
                paint(&scratch[..chroma_stride], row1);
            }
        } else {
            for dst_row in frame[..pitch * height].chunks_exact_mut(pitch) {
                if cancel.is_requested() {
                    log::debug!("render cancelled in {:?}", RenderStage::StreamingChroma);
                    return Ok(RenderOutcome::Cancelled);
                }
                source.read_exact_into(&mut scratch[..chroma_stride])?;
                paint(&scratch[..chroma_stride], dst_row);
            }
        }
        log::debug!("render reached {:?}", RenderStage::Done);
        Ok(RenderOutcome::Completed)
    }
}
