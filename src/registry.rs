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
use crate::bayer::BayerRenderer;
use crate::cancel::CancelSignal;
use crate::error::RenderError;
use crate::format::{
    BayerPattern, ChromaOrder, ChromaSubsampling, Packed422Order, PackedChannels, PixelFormat,
    RenderingOptions,
};
use crate::gray::GrayRenderer;
use crate::layout::PlaneDescriptor;
use crate::packed::Packed422Renderer;
use crate::planar::PlanarRenderer;
use crate::renderer::{RawRenderer, RenderOutcome};
use crate::rgb::PackedRgbRenderer;
use crate::semi_planar::SemiPlanarRenderer;
use crate::semi_planar16::SemiPlanar16Renderer;
use crate::sink::BitmapSink;
use crate::source::DataSource;
use std::sync::Arc;

/// Fixed table of every renderer the library ships.
///
/// Entries are registered once at construction and never change, lookups
/// go by format name and ignore case. Renderers come out as shared
/// handles so they can be moved onto worker threads.
pub struct RendererRegistry {
    renderers: Vec<Arc<dyn RawRenderer>>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        let mut renderers: Vec<Arc<dyn RawRenderer>> = Vec::new();

        let nv_family: [(&'static str, ChromaSubsampling, ChromaOrder); 4] = [
            ("NV12", ChromaSubsampling::Yuv420, ChromaOrder::UV),
            ("NV21", ChromaSubsampling::Yuv420, ChromaOrder::VU),
            ("NV16", ChromaSubsampling::Yuv422, ChromaOrder::UV),
            ("NV61", ChromaSubsampling::Yuv422, ChromaOrder::VU),
        ];
        for (name, sampling, order) in nv_family {
            renderers.push(Arc::new(SemiPlanarRenderer::new(
                PixelFormat::new(name, sampling, 8, 2),
                order,
            )));
        }

        let p_family: [(&'static str, ChromaSubsampling, u32); 6] = [
            ("P010", ChromaSubsampling::Yuv420, 10),
            ("P012", ChromaSubsampling::Yuv420, 12),
            ("P016", ChromaSubsampling::Yuv420, 16),
            ("P210", ChromaSubsampling::Yuv422, 10),
            ("P212", ChromaSubsampling::Yuv422, 12),
            ("P216", ChromaSubsampling::Yuv422, 16),
        ];
        for (name, sampling, depth) in p_family {
            renderers.push(Arc::new(SemiPlanar16Renderer::new(
                PixelFormat::new(name, sampling, depth, 2),
                ChromaOrder::UV,
            )));
        }

        renderers.push(Arc::new(PlanarRenderer::new(
            PixelFormat::new("I420", ChromaSubsampling::Yuv420, 8, 3),
            ChromaOrder::UV,
        )));
        renderers.push(Arc::new(PlanarRenderer::new(
            PixelFormat::new("YV12", ChromaSubsampling::Yuv420, 8, 3),
            ChromaOrder::VU,
        )));

        renderers.push(Arc::new(Packed422Renderer::new(
            PixelFormat::new("YUYV", ChromaSubsampling::Yuv422, 8, 1),
            Packed422Order::Yuyv,
        )));
        renderers.push(Arc::new(Packed422Renderer::new(
            PixelFormat::new("UYVY", ChromaSubsampling::Yuv422, 8, 1),
            Packed422Order::Uyvy,
        )));

        renderers.push(Arc::new(GrayRenderer::new(PixelFormat::new(
            "GRAY8",
            ChromaSubsampling::None,
            8,
            1,
        ))));
        renderers.push(Arc::new(GrayRenderer::new(PixelFormat::new(
            "GRAY16",
            ChromaSubsampling::None,
            16,
            1,
        ))));

        let rgb_family: [(&'static str, PackedChannels, u32); 5] = [
            ("RGB24", PackedChannels::Rgb, 8),
            ("BGR24", PackedChannels::Bgr, 8),
            ("RGBA32", PackedChannels::Rgba, 8),
            ("BGRA32", PackedChannels::Bgra, 8),
            ("RGB48", PackedChannels::Rgb, 16),
        ];
        for (name, channels, depth) in rgb_family {
            renderers.push(Arc::new(PackedRgbRenderer::new(
                PixelFormat::new(name, ChromaSubsampling::None, depth, 1),
                channels,
            )));
        }

        let bayer_family: [([&'static str; 4], BayerPattern); 4] = [
            (["RGGB8", "RGGB10", "RGGB12", "RGGB16"], BayerPattern::Rggb),
            (["BGGR8", "BGGR10", "BGGR12", "BGGR16"], BayerPattern::Bggr),
            (["GRBG8", "GRBG10", "GRBG12", "GRBG16"], BayerPattern::Grbg),
            (["GBRG8", "GBRG10", "GBRG12", "GBRG16"], BayerPattern::Gbrg),
        ];
        for (names, pattern) in bayer_family {
            for (name, depth) in names.into_iter().zip([8u32, 10, 12, 16]) {
                renderers.push(Arc::new(BayerRenderer::new(
                    PixelFormat::new(name, ChromaSubsampling::None, depth, 1),
                    pattern,
                )));
            }
        }

        RendererRegistry { renderers }
    }

    /// Formats in registration order.
    pub fn supported_formats(&self) -> Vec<PixelFormat> {
        self.renderers.iter().map(|r| r.format()).collect()
    }

    /// Case insensitive lookup returning a shareable renderer handle.
    pub fn find(&self, name: &str) -> Option<Arc<dyn RawRenderer>> {
        self.renderers
            .iter()
            .find(|r| r.format().name.eq_ignore_ascii_case(name))
            .cloned()
    }

    fn require(&self, name: &str) -> Result<Arc<dyn RawRenderer>, RenderError> {
        self.find(name)
            .ok_or_else(|| RenderError::UnsupportedFormat(name.to_string()))
    }

    /// Tightly packed plane layout of `name` for the given dimensions.
    pub fn derive_default_layout(
        &self,
        name: &str,
        width: u32,
        height: u32,
    ) -> Result<Vec<PlaneDescriptor>, RenderError> {
        Ok(self.require(name)?.default_layout(width, height))
    }

    /// Bytes one frame of `name` occupies under the given layout.
    pub fn evaluate_source_size(
        &self,
        name: &str,
        width: u32,
        height: u32,
        options: &RenderingOptions,
        layout: &[PlaneDescriptor],
    ) -> Result<u64, RenderError> {
        Ok(self
            .require(name)?
            .source_size(width, height, options, layout))
    }

    /// Rough pixel capacity of a dump of `source_size` bytes read as `name`.
    pub fn evaluate_pixel_count(&self, name: &str, source_size: u64) -> Result<u64, RenderError> {
        Ok(self.require(name)?.pixel_count(source_size))
    }

    /// Streams one frame of `name` from `source` into `sink`.
    pub fn render(
        &self,
        name: &str,
        source: &mut dyn DataSource,
        sink: &mut dyn BitmapSink,
        options: &RenderingOptions,
        layout: &[PlaneDescriptor],
        cancel: &dyn CancelSignal,
    ) -> Result<RenderOutcome, RenderError> {
        self.require(name)?
            .render(source, sink, options, layout, cancel)
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        RendererRegistry::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::NeverCancel;
    use crate::sink::BgraBitmap;
    use crate::source::SliceSource;

    #[test]
    fn registry_holds_every_family() {
        let registry = RendererRegistry::new();
        let formats = registry.supported_formats();
        assert_eq!(formats.len(), 37);
        let mut names: Vec<&str> = formats.iter().map(|f| f.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 37, "every registered name must be unique");
        for name in ["NV12", "P016", "I420", "UYVY", "GRAY16", "RGB48", "GBRG12"] {
            assert!(registry.find(name).is_some(), "{} must be registered", name);
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let registry = RendererRegistry::new();
        assert_eq!(registry.find("nv12").unwrap().format().name, "NV12");
        assert_eq!(registry.find("p010").unwrap().format().name, "P010");
        assert!(registry.find("NV99").is_none());
    }

    #[test]
    fn unknown_format_is_reported() {
        let registry = RendererRegistry::new();
        let err = registry.evaluate_pixel_count("AV1", 100).unwrap_err();
        match err {
            RenderError::UnsupportedFormat(name) => assert_eq!(name, "AV1"),
            other => panic!("expected unsupported format, got {:?}", other),
        }
    }

    #[test]
    fn every_format_consumes_exactly_its_evaluated_size() {
        let registry = RendererRegistry::new();
        let options = RenderingOptions::default();
        for format in registry.supported_formats() {
            let layout = registry
                .derive_default_layout(format.name, 6, 4)
                .unwrap();
            let size = registry
                .evaluate_source_size(format.name, 6, 4, &options, &layout)
                .unwrap();
            assert!(size > 0, "{} evaluated to an empty frame", format.name);
            let raw = vec![0x55u8; size as usize];
            let mut source = SliceSource::new(&raw);
            let mut bitmap = BgraBitmap::alloc(6, 4);
            let outcome = registry
                .render(
                    format.name,
                    &mut source,
                    &mut bitmap,
                    &options,
                    &layout,
                    &NeverCancel,
                )
                .unwrap();
            assert_eq!(outcome, RenderOutcome::Completed);
            assert_eq!(
                source.consumed(),
                size,
                "{} left source bytes behind",
                format.name
            );
            // Alpha carrying formats propagate the source byte, the rest
            // force opaque.
            let expected_alpha = match format.name {
                "RGBA32" | "BGRA32" => 0x55,
                _ => 255,
            };
            assert!(
                bitmap.data().chunks_exact(4).all(|px| px[3] == expected_alpha),
                "{} left alpha unset",
                format.name
            );
        }
    }

    #[test]
    fn pixel_count_spot_checks() {
        let registry = RendererRegistry::new();
        // Every 4:2:0 family guesses one pixel per three bytes: exact for
        // the two byte cells of P010, half the true count for NV12 and
        // I420 byte cells.
        assert_eq!(registry.evaluate_pixel_count("P010", 24).unwrap(), 8);
        assert_eq!(registry.evaluate_pixel_count("NV12", 12).unwrap(), 4);
        assert_eq!(registry.evaluate_pixel_count("I420", 12).unwrap(), 4);
        assert_eq!(registry.evaluate_pixel_count("YUYV", 16).unwrap(), 8);
        assert_eq!(registry.evaluate_pixel_count("RGB24", 12).unwrap(), 4);
        assert_eq!(registry.evaluate_pixel_count("GRAY16", 8).unwrap(), 4);
        assert_eq!(registry.evaluate_pixel_count("RGGB16", 8).unwrap(), 4);
    }
}
