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
use criterion::{criterion_group, criterion_main, Criterion};
use rand::Rng;
use rawpixels::{BgraBitmap, NeverCancel, RendererRegistry, RenderingOptions, SliceSource};

const WIDTH: u32 = 1920;
const HEIGHT: u32 = 1080;

fn random_frame(registry: &RendererRegistry, name: &str) -> Vec<u8> {
    let options = RenderingOptions::default();
    let layout = registry
        .derive_default_layout(name, WIDTH, HEIGHT)
        .unwrap();
    let size = registry
        .evaluate_source_size(name, WIDTH, HEIGHT, &options, &layout)
        .unwrap();
    let mut rng = rand::rng();
    (0..size).map(|_| rng.random::<u8>()).collect()
}

fn ten_bit_frame(registry: &RendererRegistry, name: &str) -> Vec<u8> {
    let options = RenderingOptions::default();
    let layout = registry
        .derive_default_layout(name, WIDTH, HEIGHT)
        .unwrap();
    let size = registry
        .evaluate_source_size(name, WIDTH, HEIGHT, &options, &layout)
        .unwrap();
    let mut rng = rand::rng();
    let cells: Vec<u16> = (0..size / 2).map(|_| rng.random_range(0..1024)).collect();
    bytemuck::cast_slice::<u16, u8>(&cells).to_vec()
}

fn bench_format(c: &mut Criterion, registry: &RendererRegistry, name: &str, frame: &[u8]) {
    let options = RenderingOptions::default();
    let layout = registry
        .derive_default_layout(name, WIDTH, HEIGHT)
        .unwrap();
    let mut bitmap = BgraBitmap::alloc(WIDTH, HEIGHT);
    c.bench_function(&format!("rawpixels {} {}x{}", name, WIDTH, HEIGHT), |b| {
        b.iter(|| {
            let mut source = SliceSource::new(frame);
            registry
                .render(name, &mut source, &mut bitmap, &options, &layout, &NeverCancel)
                .unwrap();
        })
    });
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let registry = RendererRegistry::new();

    let nv12 = random_frame(&registry, "NV12");
    bench_format(c, &registry, "NV12", &nv12);

    let i420 = random_frame(&registry, "I420");
    bench_format(c, &registry, "I420", &i420);

    let p010 = ten_bit_frame(&registry, "P010");
    bench_format(c, &registry, "P010", &p010);

    let yuyv = random_frame(&registry, "YUYV");
    bench_format(c, &registry, "YUYV", &yuyv);

    let rgb24 = random_frame(&registry, "RGB24");
    bench_format(c, &registry, "RGB24", &rgb24);

    let rggb8 = random_frame(&registry, "RGGB8");
    bench_format(c, &registry, "RGGB8", &rggb8);

    let rggb16 = ten_bit_frame(&registry, "RGGB16");
    bench_format(c, &registry, "RGGB16", &rggb16);
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
