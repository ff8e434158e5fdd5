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
use crate::format::{
    BytesPacking, ChromaOrder, ChromaSubsampling, Endianness, PixelFormat, RenderingOptions,
};
use crate::layout::{
    check_plane, check_plane_count, row_span, semi_planar_layout, PlaneDescriptor,
};
use crate::numerics::narrow16;
use crate::renderer::{
    check_sink, clamp_even, precheck_source, RawRenderer, RenderOutcome, RenderStage,
};
use crate::sink::BitmapSink;
use crate::source::DataSource;
use crate::transform::YuvToBgra;

/// Renderer for 16-bit cell semi-planar YUV dumps, the P010/P210 family.
///
/// The first plane carries one luma cell per pixel, the second carries
/// interleaved chroma pairs. Significant bits per cell come from the
/// format, their placement inside the cell from the rendering options.
pub struct SemiPlanar16Renderer {
    format: PixelFormat,
    order: ChromaOrder,
}

impl SemiPlanar16Renderer {
    pub fn new(format: PixelFormat, order: ChromaOrder) -> Self {
        SemiPlanar16Renderer { format, order }
    }

    fn chroma_rows(&self, height: u32) -> u32 {
        match self.format.subsampling {
            ChromaSubsampling::Yuv420 => height / 2,
            _ => height,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn render_packed_cells<const ENDIANNESS: u8, const BYTES_POSITION: u8>(
        &self,
        source: &mut dyn DataSource,
        sink: &mut dyn BitmapSink,
        kernel: &YuvToBgra,
        order: ChromaOrder,
        layout: &[PlaneDescriptor],
        cancel: &dyn CancelSignal,
        width: usize,
        height: usize,
    ) -> Result<RenderOutcome, RenderError> {
        let is_420 = self.format.subsampling == ChromaSubsampling::Yuv420;
        match self.format.bit_depth {
            10 => render_cells::<ENDIANNESS, BYTES_POSITION, 10>(
                source, sink, kernel, order, layout, cancel, width, height, is_420,
            ),
            12 => render_cells::<ENDIANNESS, BYTES_POSITION, 12>(
                source, sink, kernel, order, layout, cancel, width, height, is_420,
            ),
            _ => render_cells::<ENDIANNESS, BYTES_POSITION, 16>(
                source, sink, kernel, order, layout, cancel, width, height, is_420,
            ),
        }
    }
}

impl RawRenderer for SemiPlanar16Renderer {
    fn format(&self) -> PixelFormat {
        self.format
    }

    fn default_layout(&self, width: u32, _height: u32) -> Vec<PlaneDescriptor> {
        semi_planar_layout(clamp_even(width), 2)
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
        // Two byte cells put three bytes behind each 4:2:0 pixel and four
        // behind each 4:2:2 pixel.
        match self.format.subsampling {
            ChromaSubsampling::Yuv420 => source_size / 3,
            _ => source_size / 4,
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
        check_plane(0, layout[0], 2, width)?;
        check_plane(1, layout[1], 4, width / 2)?;
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
        match (options.endianness, options.bytes_packing) {
            (Endianness::BigEndian, BytesPacking::MostSignificantBytes) => self
                .render_packed_cells::<{ Endianness::BigEndian as u8 }, { BytesPacking::MostSignificantBytes as u8 }>(
                    source, sink, &kernel, order, layout, cancel, width, height,
                ),
            (Endianness::BigEndian, BytesPacking::LeastSignificantBytes) => self
                .render_packed_cells::<{ Endianness::BigEndian as u8 }, { BytesPacking::LeastSignificantBytes as u8 }>(
                    source, sink, &kernel, order, layout, cancel, width, height,
                ),
            (Endianness::LittleEndian, BytesPacking::MostSignificantBytes) => self
                .render_packed_cells::<{ Endianness::LittleEndian as u8 }, { BytesPacking::MostSignificantBytes as u8 }>(
                    source, sink, &kernel, order, layout, cancel, width, height,
                ),
            (Endianness::LittleEndian, BytesPacking::LeastSignificantBytes) => self
                .render_packed_cells::<{ Endianness::LittleEndian as u8 }, { BytesPacking::LeastSignificantBytes as u8 }>(
                    source, sink, &kernel, order, layout, cancel, width, height,
                ),
        }
    }
}

/// Narrows one source row of luma cells into the G bytes of one frame row.
///
/// The frame acts as staging storage between the two passes, so a
/// cancelled render leaves narrowed luma behind and nothing else.
fn stage_luma_row<const ENDIANNESS: u8, const BYTES_POSITION: u8, const BIT_DEPTH: usize>(
    src_row: &[u8],
    pixel_stride: usize,
    dst_row: &mut [u8],
    width: usize,
) {
    for (dst, cell) in dst_row[..width * 4]
        .chunks_exact_mut(4)
        .zip(src_row[..width * pixel_stride].chunks_exact(pixel_stride))
    {
        dst[1] = narrow16::<ENDIANNESS, BYTES_POSITION, BIT_DEPTH>([cell[0], cell[1]]);
    }
}

/// Finalizes one frame row from one chroma row, reading the staged luma
/// back out of the G bytes and overwriting each pixel with full BGRA.
fn paint_chroma_pairs<const ENDIANNESS: u8, const BYTES_POSITION: u8, const BIT_DEPTH: usize>(
    kernel: &YuvToBgra,
    chroma_row: &[u8],
    pixel_stride: usize,
    u_offset: usize,
    v_offset: usize,
    dst_row: &mut [u8],
    width: usize,
) {
    for (dst, chroma) in dst_row[..width * 4]
        .chunks_exact_mut(8)
        .zip(chroma_row[..(width / 2) * pixel_stride].chunks_exact(pixel_stride))
    {
        let cb = narrow16::<ENDIANNESS, BYTES_POSITION, BIT_DEPTH>([
            chroma[u_offset],
            chroma[u_offset + 1],
        ]);
        let cr = narrow16::<ENDIANNESS, BYTES_POSITION, BIT_DEPTH>([
            chroma[v_offset],
            chroma[v_offset + 1],
        ]);
        let (first, second) = kernel.bgra_pair(dst[1], dst[5], cb, cr);
        dst[..4].copy_from_slice(&first);
        dst[4..8].copy_from_slice(&second);
    }
}

#[allow(clippy::too_many_arguments)]
fn render_cells<const ENDIANNESS: u8, const BYTES_POSITION: u8, const BIT_DEPTH: usize>(
    source: &mut dyn DataSource,
    sink: &mut dyn BitmapSink,
    kernel: &YuvToBgra,
    order: ChromaOrder,
    layout: &[PlaneDescriptor],
    cancel: &dyn CancelSignal,
    width: usize,
    height: usize,
    is_420: bool,
) -> Result<RenderOutcome, RenderError> {
    let pitch = sink.row_pitch();
    let luma_stride = layout[0].row_stride as usize;
    let luma_pixel_stride = layout[0].pixel_stride as usize;
    let chroma_stride = layout[1].row_stride as usize;
    let chroma_pixel_stride = layout[1].pixel_stride as usize;
    let u_offset = order.get_u_position() * 2;
    let v_offset = order.get_v_position() * 2;
    let mut scratch = vec![0u8; luma_stride.max(chroma_stride)];

    let frame = sink.frame_mut();
    for dst_row in frame[..pitch * height].chunks_exact_mut(pitch) {
        if cancel.is_requested() {
            log::debug!("render cancelled in {:?}", RenderStage::StreamingLuma);
            return Ok(RenderOutcome::Cancelled);
        }
        source.read_exact_into(&mut scratch[..luma_stride])?;
        stage_luma_row::<ENDIANNESS, BYTES_POSITION, BIT_DEPTH>(
            &scratch[..luma_stride],
            luma_pixel_stride,
            dst_row,
            width,
        );
    }

    if is_420 {
        for dst_rows in frame[..pitch * height].chunks_exact_mut(pitch * 2) {
            if cancel.is_requested() {
                log::debug!("render cancelled in {:?}", RenderStage::StreamingChroma);
                return Ok(RenderOutcome::Cancelled);
            }
            source.read_exact_into(&mut scratch[..chroma_stride])?;
            let (row0, row1) = dst_rows.split_at_mut(pitch);
            paint_chroma_pairs::<ENDIANNESS, BYTES_POSITION, BIT_DEPTH>(
                kernel,
                &scratch[..chroma_stride],
                chroma_pixel_stride,
                u_offset,
                v_offset,
                row0,
                width,
            );
            paint_chroma_pairs::<ENDIANNESS, BYTES_POSITION, BIT_DEPTH>(
                kernel,
                &scratch[..chroma_stride],
                chroma_pixel_stride,
                u_offset,
                v_offset,
                row1,
                width,
            );
        }
    } else {
        for dst_row in frame[..pitch * height].chunks_exact_mut(pitch) {
            if cancel.is_requested() {
                log::debug!("render cancelled in {:?}", RenderStage::StreamingChroma);
                return Ok(RenderOutcome::Cancelled);
            }
            source.read_exact_into(&mut scratch[..chroma_stride])?;
            paint_chroma_pairs::<ENDIANNESS, BYTES_POSITION, BIT_DEPTH>(
                kernel,
                &scratch[..chroma_stride],
                chroma_pixel_stride,
                u_offset,
                v_offset,
                dst_row,
                width,
            );
        }
    }
    log::debug!("render reached {:?}", RenderStage::Done);
    Ok(RenderOutcome::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::NeverCancel;
    use crate::sink::BgraBitmap;
    use crate::source::SliceSource;
    use crate::transform::yuv422_to_bgra;
    use rand::Rng;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn p010() -> SemiPlanar16Renderer {
        SemiPlanar16Renderer::new(
            PixelFormat::new("P010", ChromaSubsampling::Yuv420, 10, 2),
            ChromaOrder::UV,
        )
    }

    fn p210() -> SemiPlanar16Renderer {
        SemiPlanar16Renderer::new(
            PixelFormat::new("P210", ChromaSubsampling::Yuv422, 10, 2),
            ChromaOrder::UV,
        )
    }

    fn push_cell_le(bytes: &mut Vec<u8>, value: u16) {
        bytes.extend_from_slice(&value.to_le_bytes());
    }

    struct FireAfter {
        polls: AtomicU32,
        after: u32,
    }

    impl FireAfter {
        fn new(after: u32) -> Self {
            FireAfter {
                polls: AtomicU32::new(0),
                after,
            }
        }
    }

    impl CancelSignal for FireAfter {
        fn is_requested(&self) -> bool {
            self.polls.fetch_add(1, Ordering::Relaxed) + 1 > self.after
        }
    }

    #[test]
    fn p010_known_values_end_to_end() {
        // 4x2 frame, 10 significant bits in the low end of each cell.
        let lumas: [u16; 8] = [10, 20, 30, 40, 50, 60, 70, 80];
        let mut raw = Vec::new();
        for luma in lumas {
            push_cell_le(&mut raw, luma << 2);
        }
        for _ in 0..2 {
            push_cell_le(&mut raw, 100 << 2);
            push_cell_le(&mut raw, 150 << 2);
        }
        let renderer = p010();
        let options = RenderingOptions::default();
        let layout = renderer.default_layout(4, 2);
        assert_eq!(renderer.source_size(4, 2, &options, &layout), 24);
        assert_eq!(raw.len(), 24);
        assert_eq!(renderer.pixel_count(24), 8);

        let mut source = SliceSource::new(&raw);
        let mut bitmap = BgraBitmap::alloc(4, 2);
        let outcome = renderer
            .render(&mut source, &mut bitmap, &options, &layout, &NeverCancel)
            .unwrap();
        assert_eq!(outcome, RenderOutcome::Completed);
        assert_eq!(source.consumed(), 24);

        let frame = bitmap.data();
        for row in 0..2 {
            for pair in 0..2 {
                let y0 = lumas[row * 4 + pair * 2] as u8;
                let y1 = lumas[row * 4 + pair * 2 + 1] as u8;
                let (first, second) =
                    yuv422_to_bgra(y0, y1, 100, 150, options.range, options.matrix);
                let at = row * 16 + pair * 8;
                assert_eq!(&frame[at..at + 4], &first);
                assert_eq!(&frame[at + 4..at + 8], &second);
            }
        }
    }

    #[test]
    fn cancel_after_first_luma_row_leaves_staged_row_only() {
        let mut raw = Vec::new();
        for luma in [10u16, 20, 30, 40, 50, 60, 70, 80] {
            push_cell_le(&mut raw, luma << 2);
        }
        for _ in 0..2 {
            push_cell_le(&mut raw, 100 << 2);
            push_cell_le(&mut raw, 150 << 2);
        }
        let renderer = p010();
        let options = RenderingOptions::default();
        let layout = renderer.default_layout(4, 2);
        let mut source = SliceSource::new(&raw);
        let mut bitmap = BgraBitmap::alloc(4, 2);
        let signal = FireAfter::new(1);
        let outcome = renderer
            .render(&mut source, &mut bitmap, &options, &layout, &signal)
            .unwrap();
        assert_eq!(outcome, RenderOutcome::Cancelled);
        // One luma row was staged, nothing else was touched or consumed.
        assert_eq!(source.consumed(), 8);
        let frame = bitmap.data();
        for (idx, &byte) in frame.iter().enumerate() {
            if idx < 16 && idx % 4 == 1 {
                assert_eq!(byte, [10u8, 20, 30, 40][idx / 4]);
            } else {
                assert_eq!(byte, 0, "byte {} should be untouched", idx);
            }
        }
    }

    #[test]
    fn undersized_chroma_stride_fails_before_any_read() {
        let renderer = p010();
        let options = RenderingOptions::default();
        let layout = [PlaneDescriptor::new(2, 8), PlaneDescriptor::new(4, 7)];
        let mut source = SliceSource::new(&[]);
        let mut bitmap = BgraBitmap::alloc(4, 2);
        let err = renderer
            .render(&mut source, &mut bitmap, &options, &layout, &NeverCancel)
            .unwrap_err();
        match err {
            RenderError::InvalidLayout(fault) => {
                assert_eq!(fault.plane, 1);
                assert_eq!(fault.expected, 8);
                assert_eq!(fault.received, 7);
            }
            other => panic!("expected invalid layout, got {:?}", other),
        }
        assert_eq!(source.consumed(), 0);
    }

    #[test]
    fn odd_dimensions_behave_like_even_ones() {
        let renderer = p010();
        let options = RenderingOptions::default();
        let odd_layout = renderer.default_layout(7, 5);
        let even_layout = renderer.default_layout(6, 4);
        assert_eq!(odd_layout, even_layout);
        assert_eq!(
            renderer.source_size(7, 5, &options, &odd_layout),
            renderer.source_size(6, 4, &options, &even_layout)
        );

        let mut rng = rand::rng();
        let size = renderer.source_size(6, 4, &options, &even_layout) as usize;
        let raw: Vec<u8> = (0..size).map(|_| rng.random::<u8>()).collect();

        let mut even_bitmap = BgraBitmap::alloc(6, 4);
        let mut even_source = SliceSource::new(&raw);
        renderer
            .render(
                &mut even_source,
                &mut even_bitmap,
                &options,
                &even_layout,
                &NeverCancel,
            )
            .unwrap();

        let mut odd_bitmap = BgraBitmap::alloc(7, 5);
        let mut odd_source = SliceSource::new(&raw);
        renderer
            .render(
                &mut odd_source,
                &mut odd_bitmap,
                &options,
                &odd_layout,
                &NeverCancel,
            )
            .unwrap();
        assert_eq!(even_source.consumed(), odd_source.consumed());

        let even_frame = even_bitmap.data();
        let odd_frame = odd_bitmap.data();
        for row in 0..4 {
            assert_eq!(
                &even_frame[row * 24..row * 24 + 24],
                &odd_frame[row * 28..row * 28 + 24]
            );
            // The odd trailing column is never painted.
            assert_eq!(&odd_frame[row * 28 + 24..row * 28 + 28], &[0u8; 4]);
        }
        // Neither is the odd trailing row.
        assert!(odd_frame[4 * 28..].iter().all(|&b| b == 0));
    }

    #[test]
    fn padded_strides_are_consumed() {
        let renderer = p210();
        let options = RenderingOptions::default();
        let layout = [PlaneDescriptor::new(2, 16), PlaneDescriptor::new(4, 14)];
        let size = renderer.source_size(6, 4, &options, &layout);
        assert_eq!(size, 4 * 16 + 4 * 14);
        let raw = vec![0u8; size as usize];
        let mut source = SliceSource::new(&raw);
        let mut bitmap = BgraBitmap::alloc(6, 4);
        let outcome = renderer
            .render(&mut source, &mut bitmap, &options, &layout, &NeverCancel)
            .unwrap();
        assert_eq!(outcome, RenderOutcome::Completed);
        assert_eq!(source.consumed(), size);
    }

    #[test]
    fn p210_pixel_count_matches_capacity() {
        let renderer = p210();
        let options = RenderingOptions::default();
        let layout = renderer.default_layout(6, 4);
        let size = renderer.source_size(6, 4, &options, &layout);
        assert_eq!(renderer.pixel_count(size), 6 * 4);
    }

    #[test]
    fn truncated_source_is_rejected_up_front() {
        let renderer = p010();
        let options = RenderingOptions::default();
        let layout = renderer.default_layout(4, 2);
        let raw = vec![0u8; 23];
        let mut source = SliceSource::new(&raw);
        let mut bitmap = BgraBitmap::alloc(4, 2);
        let err = renderer
            .render(&mut source, &mut bitmap, &options, &layout, &NeverCancel)
            .unwrap_err();
        assert!(matches!(err, RenderError::InsufficientSource(_)));
        assert_eq!(source.consumed(), 0);
    }
}
