/*
 * Copyright (c) Radzivon Bartoshyk, 12/2024. All rights reserved.
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
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */

#![no_main]

use libfuzzer_sys::fuzz_target;
use rawpixels::{
    BgraBitmap, BytesPacking, Endianness, NeverCancel, PlaneDescriptor, RendererRegistry,
    RenderingOptions, SliceSource, YuvRange, YuvStandardMatrix,
};

fuzz_target!(|data: (u8, u8, u8, u8)| {
    let registry = RendererRegistry::new();
    for name in ["RGGB8", "BGGR10", "GRBG12", "GBRG16"] {
        fuzz_format(&registry, name, data.0, data.1, data.2, data.3);
    }
});

fn build_options(bits: u8) -> RenderingOptions {
    RenderingOptions {
        endianness: if bits & 1 == 0 {
            Endianness::LittleEndian
        } else {
            Endianness::BigEndian
        },
        bytes_packing: if bits & 2 == 0 {
            BytesPacking::LeastSignificantBytes
        } else {
            BytesPacking::MostSignificantBytes
        },
        swap_chroma: bits & 4 != 0,
        matrix: match (bits >> 3) & 3 {
            0 => YuvStandardMatrix::Bt601,
            1 => YuvStandardMatrix::Bt709,
            _ => YuvStandardMatrix::Bt2020,
        },
        range: if bits & 32 == 0 {
            YuvRange::Limited
        } else {
            YuvRange::Full
        },
    }
}

fn fuzz_format(
    registry: &RendererRegistry,
    name: &str,
    i_width: u8,
    i_height: u8,
    fill: u8,
    bits: u8,
) {
    if i_width < 2 || i_height < 2 {
        return;
    }
    let width = i_width as u32;
    let height = i_height as u32;
    let options = build_options(bits);
    let layout = registry.derive_default_layout(name, width, height).unwrap();
    let size = registry
        .evaluate_source_size(name, width, height, &options, &layout)
        .unwrap() as usize;
    let frame = vec![fill; size];

    let mut bitmap = BgraBitmap::alloc(width, height);
    let mut source = SliceSource::new(&frame);
    registry
        .render(name, &mut source, &mut bitmap, &options, &layout, &NeverCancel)
        .unwrap();

    let mut truncated = SliceSource::new(&frame[..size - 1]);
    assert!(registry
        .render(
            name,
            &mut truncated,
            &mut bitmap,
            &options,
            &layout,
            &NeverCancel
        )
        .is_err());

    let pad = (bits >> 6) as u32;
    let padded: Vec<PlaneDescriptor> = layout
        .iter()
        .map(|plane| PlaneDescriptor::new(plane.pixel_stride, plane.row_stride + pad))
        .collect();
    let padded_size = registry
        .evaluate_source_size(name, width, height, &options, &padded)
        .unwrap() as usize;
    let padded_frame = vec![fill; padded_size];
    let mut padded_source = SliceSource::new(&padded_frame);
    registry
        .render(
            name,
            &mut padded_source,
            &mut bitmap,
            &options,
            &padded,
            &NeverCancel,
        )
        .unwrap();
}
