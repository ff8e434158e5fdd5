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
//! Turns headerless raw pixel dumps into displayable BGRA8 frames.
//!
//! The crate ships a fixed registry of renderers covering semi-planar,
//! planar and packed YUV, packed RGB, grayscale and Bayer mosaic dumps.
//! Sources are read strictly forward, frames stream row by row and every
//! render can be cancelled between rows.

mod bayer;
mod cancel;
mod error;
mod format;
mod gray;
mod layout;
mod numerics;
mod packed;
mod planar;
mod registry;
mod renderer;
mod rgb;
mod semi_planar;
mod semi_planar16;
mod sink;
mod source;
mod transform;

pub use bayer::BayerRenderer;
pub use cancel::CancelSignal;
pub use cancel::CancelToken;
pub use cancel::NeverCancel;
pub use error::LayoutMismatch;
pub use error::MismatchedSize;
pub use error::RenderError;
pub use format::BayerPattern;
pub use format::BytesPacking;
pub use format::ChromaOrder;
pub use format::ChromaSubsampling;
pub use format::Endianness;
pub use format::Packed422Order;
pub use format::PackedChannels;
pub use format::PixelFormat;
pub use format::RenderingOptions;
pub use gray::GrayRenderer;
pub use layout::PlaneDescriptor;
pub use packed::Packed422Renderer;
pub use planar::PlanarRenderer;
pub use registry::RendererRegistry;
pub use renderer::RawRenderer;
pub use renderer::RenderOutcome;
pub use renderer::RenderStage;
pub use rgb::PackedRgbRenderer;
pub use semi_planar::SemiPlanarRenderer;
pub use semi_planar16::SemiPlanar16Renderer;
pub use sink::BgraBitmap;
pub use sink::BitmapSink;
pub use sink::BufferStoreMut;
pub use source::DataSource;
pub use source::ReaderSource;
pub use source::SliceSource;
pub use transform::get_inverse_transform;
pub use transform::get_yuv_range;
pub use transform::yuv422_to_bgra;
pub use transform::CbCrInverseTransform;
pub use transform::YuvBias;
pub use transform::YuvChromaRange;
pub use transform::YuvRange;
pub use transform::YuvStandardMatrix;
