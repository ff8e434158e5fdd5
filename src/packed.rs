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
use crate::format::{Packed422Order, PixelFormat, RenderingOptions};
use crate::layout::{check_plane, check_plane_count, row_span, single_plane_layout, PlaneDescriptor};
use crate::renderer::{
    check_sink, clamp_even, precheck_source, RawRenderer, RenderOutcome, RenderStage,
};
use crate::sink::BitmapSink;
use crate::source::DataSource;
use crate::transform::YuvToBgra;

/// Renderer for packed 4:2:2 dumps, YUYV and UYVY.
///
/// One plane, two pixels per macropixel, so the whole frame finishes in
/// a single pass and cancellation leaves fully painted rows behind.
pub struct Packed422Renderer {
    format: PixelFormat,
    order: Packed422Order,
}

impl Packed422Renderer {
    pub fn new(format: PixelFormat, order: Packed422Order) -> Self {
        Packed422Renderer { format, order }
    }
}

impl RawRenderer for Packed422Renderer {
    fn format(&self) -> PixelFormat {
        self.format
    }

    fn default_layout(&self, width: u32, _height: u32) -> Vec<PlaneDescriptor> {
        single_plane_layout(clamp_even(width), 2)
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
        source_size / 2
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
        check_plane(0, layout[0], 2, width)?;
        let required = height as u64 * layout[0].row_stride as u64;
        precheck_source(source, required)?;
        check_sink(sink, width, height)?;

        let kernel = YuvToBgra::new(options.range, options.matrix);
        let order = if options.swap_chroma {
            self.order.swapped_chroma()
        } else {
            self.order
        };
        let y0_at = order.get_first_y_position();
        let y1_at = order.get_second_y_position();
        let u_at = order.get_u_position();
        let v_at = order.get_v_position();
        let width = width as usize;
        let height = height as usize;
        let pitch = sink.row_pitch();
        let row_stride = layout[0].row_stride as usize;
        let group = layout[0].pixel_stride as usize * 2;
        let mut scratch = vec![0u8; row_stride];

        let frame = sink.frame_mut();
        for dst_row in frame[..pitch * height].chunks_exact_mut(pitch) {
            if cancel.is_requested() {
                log::debug!("render cancelled in {:?}", RenderStage::StreamingLuma);
                return Ok(RenderOutcome::Cancelled);
            }
            source.read_exact_into(&mut scratch[..row_stride])?;
            for (dst, src) in dst_row[..width * 4]
                .chunks_exact_mut(8)
                .zip(scratch[..(width / 2) * group].chunks_exact(group))
            {
                let (first, second) =
                    kernel.bgra_pair(src[y0_at], src[y1_at], src[u_at], src[v_at]);
                dst[..4].copy_from_slice(&first);
                dst[4..8].copy_from_slice(&second);
            }
        }
        log::debug!("render reached {:?}", RenderStage::Done);
        Ok(RenderOutcome::Completed)
    }
}
