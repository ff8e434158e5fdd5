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
use rawpixels::{
    BgraBitmap, BitmapSink, DataSource, NeverCancel, ReaderSource, RendererRegistry,
    RenderingOptions,
};
use std::fs::File;
use std::io::BufReader;
use std::time::Instant;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 6 {
        eprintln!("usage: app <format> <width> <height> <input.raw> <output.png>");
        eprintln!("formats:");
        for format in RendererRegistry::new().supported_formats() {
            eprintln!(
                "  {:8} {:?} {} bit, {} plane(s)",
                format.name, format.subsampling, format.bit_depth, format.planes
            );
        }
        std::process::exit(1);
    }
    let format = args[1].as_str();
    let width: u32 = args[2].parse().unwrap();
    let height: u32 = args[3].parse().unwrap();

    let registry = RendererRegistry::new();
    let options = RenderingOptions::default();
    let layout = registry.derive_default_layout(format, width, height).unwrap();
    let expected = registry
        .evaluate_source_size(format, width, height, &options, &layout)
        .unwrap();

    let file = File::open(&args[4]).unwrap();
    let mut source = ReaderSource::new(BufReader::new(file)).unwrap();
    println!(
        "{}: frame needs {} bytes, file holds {}",
        format,
        expected,
        source.size()
    );

    let mut bitmap = BgraBitmap::alloc(width, height);
    let start = Instant::now();
    let outcome = registry
        .render(
            format,
            &mut source,
            &mut bitmap,
            &options,
            &layout,
            &NeverCancel,
        )
        .unwrap();
    println!("render {:?} in {:?}", outcome, start.elapsed());

    // The png encoder wants RGBA ordering.
    let mut rgba = bitmap.data().to_vec();
    for px in rgba.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
    image::RgbaImage::from_raw(bitmap.width(), bitmap.height(), rgba)
        .unwrap()
        .save(&args[5])
        .unwrap();
    println!("wrote {}", args[5]);
}
