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
use crate::format::{ChromaOrder, PixelFormat, RenderingOptions};
use crate::layout::{check_plane, check_plane_count, planar420_layout, row_span, PlaneDescriptor};
use crate::renderer::{
    check_sink, clamp_even, precheck_source, RawRenderer, RenderOutcome, RenderStage,
};
use crate::sink::BitmapSink;
use crate::source::DataSource;
use crate::transform::YuvToBgra;

/// Renderer for three plane 8-bit 4:2:0 dumps, I420 and YV12.
///
/// Planes arrive whole and in order, so a third pass is needed: luma is
/// staged in the G bytes, the first chroma plane in the B bytes of each
/// pair head, and the second chroma plane finalizes the pixels. This
/// keeps the source strictly forward read without plane sized buffers.
pub struct PlanarRenderer {
    format: PixelFormat,
    /// Which chroma component the first of the two half planes carries.
    order: ChromaOrder,
}

impl PlanarRenderer {
    pub fn new(format: PixelFormat, order: ChromaOrder) -> Self {
        PlanarRenderer { format, order }
    }
}

impl RawRenderer for PlanarRenderer {
    fn format(&self) -> PixelFormat {
        self.format
    }

    fn default_layout(&self, width: u32, _height: u32) -> Vec<PlaneDescriptor> {
        planar420_layout(clamp_even(width), 1)
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
        let layout = if layout.len() == 3 {
            layout
        } else {
            fallback = self.default_layout(width, height);
            &fallback
        };
        let luma_row = row_span(
            layout[0].pixel_stride as u64 * width as u64,
            layout[0].row_stride as u64,
        );
        let mut total = height as u64 * luma_row;
        for plane in &layout[1..] {
            let chroma_row = row_span(
                plane.pixel_stride as u64 * (width / 2) as u64,
                plane.row_stride as u64,
            );
            total += (height / 2) as u64 * chroma_row;
        }
        total
    }

    fn pixel_count(&self, source_size: u64) -> u64 {
        // Same one pixel per three bytes guess as the semi planar 4:2:0
        // renderers.
        source_size / 3
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
        check_plane_count(layout, 3)?;
        check_plane(0, layout[0], 1, width)?;
        check_plane(1, layout[1], 1, width / 2)?;
        check_plane(2, layout[2], 1, width / 2)?;
        let required = height as u64 * layout[0].row_stride as u64
            + (height / 2) as u64 * (layout[1].row_stride as u64 + layout[2].row_stride as u64);
        precheck_source(source, required)?;
        check_sink(sink, width, height)?;

        let kernel = YuvToBgra::new(options.range, options.matrix);
        let first_is_u = if options.swap_chroma {
            self.order.flipped() == ChromaOrder::UV
        } else {
            self.order == ChromaOrder::UV
        };
        let width = width as usize;
        let height = height as usize;
        let pitch = sink.row_pitch();
        let strides: Vec<usize> = layout.iter().map(|p| p.row_stride as usize).collect();
        let pixel_strides: Vec<usize> = layout.iter().map(|p| p.pixel_stride as usize).collect();
        let mut scratch = vec![0u8; strides.iter().copied().max().unwrap_or(0)];

        let frame = sink.frame_mut();
        for dst_row in frame[..pitch * height].chunks_exact_mut(pitch) {
            if cancel.is_requested() {
                log::debug!("render cancelled in {:?}", RenderStage::StreamingLuma);
                return Ok(RenderOutcome::Cancelled);
            }
            source.read_exact_into(&mut scratch[..strides[0]])?;
            for (dst, src) in dst_row[..width * 4]
                .chunks_exact_mut(4)
                .zip(scratch[..width * pixel_strides[0]].chunks_exact(pixel_strides[0]))
            {
                dst[1] = src[0];
            }
        }

        // First half plane, staged into the B byte of each pixel pair head.
        for dst_rows in frame[..pitch * height].chunks_exact_mut(pitch * 2) {
            if cancel.is_requested() {
                log::debug!("render cancelled in {:?}", RenderStage::StreamingChroma);
                return Ok(RenderOutcome::Cancelled);
            }
            source.read_exact_into(&mut scratch[..strides[1]])?;
            let (row0, row1) = dst_rows.split_at_mut(pitch);
            for row in [row0, row1] {
                for (dst, src) in row[..width * 4]
                    .chunks_exact_mut(8)
                    .zip(scratch[..(width / 2) * pixel_strides[1]].chunks_exact(pixel_strides[1]))
                {
                    dst[0] = src[0];
                }
            }
        }

        // Second half plane completes every pixel of the served row pair.
        let finalize = |src_row: &[u8], dst_row: &mut [u8]| {
            for (dst, src) in dst_row[..width * 4]
                .chunks_exact_mut(8)
                .zip(src_row[..(width / 2) * pixel_strides[2]].chunks_exact(pixel_strides[2]))
            {
                let (cb, cr) = if first_is_u {
                    (dst[0], src[0])
                } else {
                    (src[0], dst[0])
                };
                let (first, second) = kernel.bgra_pair(dst[1], dst[5], cb, cr);
                dst[..4].copy_from_slice(&first);
                dst[4..8].copy_from_slice(&second);
            }
        };
        for dst_rows in frame[..pitch * height].chunks_exact_mut(pitch * 2) {
            if cancel.is_requested() {
                log::debug!("render cancelled in {:?}", RenderStage::StreamingChroma);
                return Ok(RenderOutcome::Cancelled);
            }
            source.read_exact_into(&mut scratch[..strides[2]])?;
            let (row0, row1) = dst_rows.split_at_mut(pitch);
            finalize(&scratch[..strides[2]], row0);
            finalize(&scratch[..strides[2]], row1);
        }
        log::debug!("render reached {:?}", RenderStage::Done);
        Ok(RenderOutcome::Completed)
    }
}
