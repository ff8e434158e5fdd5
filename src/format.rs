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
use crate::transform::{YuvRange, YuvStandardMatrix};

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// Chroma sub-sampling class of a raw format.
pub enum ChromaSubsampling {
    Yuv420 = 0,
    Yuv422 = 1,
    Yuv444 = 2,
    /// Formats without a chroma plane notion, grayscale, packed RGB and mosaics.
    None = 3,
}

impl From<u8> for ChromaSubsampling {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => ChromaSubsampling::Yuv420,
            1 => ChromaSubsampling::Yuv422,
            2 => ChromaSubsampling::Yuv444,
            3 => ChromaSubsampling::None,
            _ => {
                panic!("Unknown value")
            }
        }
    }
}

impl ChromaSubsampling {
    /// Sub-sampled classes constrain surface dimensions to even values.
    #[inline(always)]
    pub const fn is_subsampled(&self) -> bool {
        matches!(self, ChromaSubsampling::Yuv420 | ChromaSubsampling::Yuv422)
    }
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Endianness {
    BigEndian = 0,
    LittleEndian = 1,
}

impl From<u8> for Endianness {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => Endianness::BigEndian,
            1 => Endianness::LittleEndian,
            _ => {
                panic!("Unknown value")
            }
        }
    }
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// Position of the significant bits within a 16-bit storage cell.
pub enum BytesPacking {
    MostSignificantBytes = 0,
    LeastSignificantBytes = 1,
}

impl From<u8> for BytesPacking {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => BytesPacking::MostSignificantBytes,
            1 => BytesPacking::LeastSignificantBytes,
            _ => {
                panic!("Unknown value")
            }
        }
    }
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
/// Order of the two interleaved chroma components within a sample pair.
pub enum ChromaOrder {
    UV = 0,
    VU = 1,
}

impl From<u8> for ChromaOrder {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => ChromaOrder::UV,
            1 => ChromaOrder::VU,
            _ => {
                panic!("Unknown value")
            }
        }
    }
}

impl ChromaOrder {
    #[inline(always)]
    pub const fn get_u_position(&self) -> usize {
        match self {
            ChromaOrder::UV => 0,
            ChromaOrder::VU => 1,
        }
    }

    #[inline(always)]
    pub const fn get_v_position(&self) -> usize {
        match self {
            ChromaOrder::UV => 1,
            ChromaOrder::VU => 0,
        }
    }

    #[inline(always)]
    pub const fn flipped(self) -> Self {
        match self {
            ChromaOrder::UV => ChromaOrder::VU,
            ChromaOrder::VU => ChromaOrder::UV,
        }
    }
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// Byte positions of the four components within a packed 4:2:2 macropixel.
pub enum Packed422Order {
    Yuyv = 0,
    Uyvy = 1,
    Yvyu = 2,
    Vyuy = 3,
}

impl From<u8> for Packed422Order {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => Packed422Order::Yuyv,
            1 => Packed422Order::Uyvy,
            2 => Packed422Order::Yvyu,
            3 => Packed422Order::Vyuy,
            _ => {
                panic!("Unknown value")
            }
        }
    }
}

impl Packed422Order {
    #[inline(always)]
    pub const fn get_u_position(&self) -> usize {
        match self {
            Packed422Order::Yuyv => 1,
            Packed422Order::Uyvy => 0,
            Packed422Order::Yvyu => 3,
            Packed422Order::Vyuy => 2,
        }
    }

    #[inline(always)]
    pub const fn get_v_position(&self) -> usize {
        match self {
            Packed422Order::Yuyv => 3,
            Packed422Order::Uyvy => 2,
            Packed422Order::Yvyu => 1,
            Packed422Order::Vyuy => 0,
        }
    }

    #[inline(always)]
    pub const fn get_first_y_position(&self) -> usize {
        match self {
            Packed422Order::Yuyv => 0,
            Packed422Order::Uyvy => 1,
            Packed422Order::Yvyu => 0,
            Packed422Order::Vyuy => 1,
        }
    }

    #[inline(always)]
    pub const fn get_second_y_position(&self) -> usize {
        match self {
            Packed422Order::Yuyv => 2,
            Packed422Order::Uyvy => 3,
            Packed422Order::Yvyu => 2,
            Packed422Order::Vyuy => 3,
        }
    }

    /// The same macropixel with U and V positions exchanged.
    #[inline(always)]
    pub const fn swapped_chroma(self) -> Self {
        match self {
            Packed422Order::Yuyv => Packed422Order::Yvyu,
            Packed422Order::Uyvy => Packed422Order::Vyuy,
            Packed422Order::Yvyu => Packed422Order::Yuyv,
            Packed422Order::Vyuy => Packed422Order::Uyvy,
        }
    }
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// Channel order of a packed RGB-family pixel.
pub enum PackedChannels {
    Rgb = 0,
    Rgba = 1,
    Bgra = 2,
    Bgr = 3,
}

impl From<u8> for PackedChannels {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => PackedChannels::Rgb,
            1 => PackedChannels::Rgba,
            2 => PackedChannels::Bgra,
            3 => PackedChannels::Bgr,
            _ => {
                panic!("Unknown value")
            }
        }
    }
}

impl PackedChannels {
    #[inline(always)]
    pub const fn get_channels_count(&self) -> usize {
        match self {
            PackedChannels::Rgb | PackedChannels::Bgr => 3,
            PackedChannels::Rgba | PackedChannels::Bgra => 4,
        }
    }

    #[inline(always)]
    pub const fn has_alpha(&self) -> bool {
        match self {
            PackedChannels::Rgb | PackedChannels::Bgr => false,
            PackedChannels::Rgba | PackedChannels::Bgra => true,
        }
    }

    #[inline(always)]
    pub const fn get_r_channel_offset(&self) -> usize {
        match self {
            PackedChannels::Rgb | PackedChannels::Rgba => 0,
            PackedChannels::Bgra | PackedChannels::Bgr => 2,
        }
    }

    #[inline(always)]
    pub const fn get_g_channel_offset(&self) -> usize {
        1
    }

    #[inline(always)]
    pub const fn get_b_channel_offset(&self) -> usize {
        match self {
            PackedChannels::Rgb | PackedChannels::Rgba => 2,
            PackedChannels::Bgra | PackedChannels::Bgr => 0,
        }
    }

    #[inline(always)]
    pub const fn get_a_channel_offset(&self) -> usize {
        match self {
            PackedChannels::Rgb | PackedChannels::Bgr => 0,
            PackedChannels::Rgba | PackedChannels::Bgra => 3,
        }
    }
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// Color filter arrangement of the top-left 2x2 quad of a mosaic.
pub enum BayerPattern {
    Rggb = 0,
    Bggr = 1,
    Grbg = 2,
    Gbrg = 3,
}

impl From<u8> for BayerPattern {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => BayerPattern::Rggb,
            1 => BayerPattern::Bggr,
            2 => BayerPattern::Grbg,
            3 => BayerPattern::Gbrg,
            _ => {
                panic!("Unknown value")
            }
        }
    }
}

impl BayerPattern {
    /// (column, row) of the red sample within a 2x2 quad.
    #[inline(always)]
    pub const fn red_position(&self) -> (usize, usize) {
        match self {
            BayerPattern::Rggb => (0, 0),
            BayerPattern::Bggr => (1, 1),
            BayerPattern::Grbg => (1, 0),
            BayerPattern::Gbrg => (0, 1),
        }
    }

    /// (column, row) of the blue sample within a 2x2 quad.
    #[inline(always)]
    pub const fn blue_position(&self) -> (usize, usize) {
        match self {
            BayerPattern::Rggb => (1, 1),
            BayerPattern::Bggr => (0, 0),
            BayerPattern::Grbg => (0, 1),
            BayerPattern::Gbrg => (1, 0),
        }
    }

    /// (column, row) pairs of the two green samples within a 2x2 quad.
    #[inline(always)]
    pub const fn green_positions(&self) -> [(usize, usize); 2] {
        match self {
            BayerPattern::Rggb | BayerPattern::Bggr => [(1, 0), (0, 1)],
            BayerPattern::Grbg | BayerPattern::Gbrg => [(0, 0), (1, 1)],
        }
    }
}

/// Immutable description of one registered raw format.
///
/// Identity is carried by `name`; entries are never mutated after registration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PixelFormat {
    pub name: &'static str,
    pub subsampling: ChromaSubsampling,
    /// Significant bits per component, 8..=16.
    pub bit_depth: u32,
    pub planes: u32,
}

impl PixelFormat {
    pub const fn new(
        name: &'static str,
        subsampling: ChromaSubsampling,
        bit_depth: u32,
        planes: u32,
    ) -> PixelFormat {
        PixelFormat {
            name,
            subsampling,
            bit_depth,
            planes,
        }
    }

    /// Bytes occupied by one stored component, 1 for 8-bit formats and 2 for
    /// anything stored in 16-bit cells.
    #[inline(always)]
    pub const fn component_size(&self) -> u32 {
        if self.bit_depth > 8 {
            2
        } else {
            1
        }
    }
}

/// Per-call parameters orthogonal to the format itself.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderingOptions {
    /// Byte order of multi-byte components as stored in the dump.
    pub endianness: Endianness,
    /// Alignment of significant bits within a 16-bit storage cell.
    pub bytes_packing: BytesPacking,
    /// Exchanges U and V interpretation for formats that carry both.
    pub swap_chroma: bool,
    pub matrix: YuvStandardMatrix,
    pub range: YuvRange,
}

impl Default for RenderingOptions {
    fn default() -> Self {
        RenderingOptions {
            endianness: Endianness::LittleEndian,
            bytes_packing: BytesPacking::LeastSignificantBytes,
            swap_chroma: false,
            matrix: YuvStandardMatrix::Bt601,
            range: YuvRange::Limited,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chroma_order_positions() {
        assert_eq!(ChromaOrder::UV.get_u_position(), 0);
        assert_eq!(ChromaOrder::UV.get_v_position(), 1);
        assert_eq!(ChromaOrder::VU.get_u_position(), 1);
        assert_eq!(ChromaOrder::VU.get_v_position(), 0);
        assert_eq!(ChromaOrder::UV.flipped(), ChromaOrder::VU);
    }

    #[test]
    fn packed_order_positions_cover_macropixel() {
        for order in [
            Packed422Order::Yuyv,
            Packed422Order::Uyvy,
            Packed422Order::Yvyu,
            Packed422Order::Vyuy,
        ] {
            let mut seen = [false; 4];
            seen[order.get_u_position()] = true;
            seen[order.get_v_position()] = true;
            seen[order.get_first_y_position()] = true;
            seen[order.get_second_y_position()] = true;
            assert_eq!(seen, [true; 4], "macropixel positions overlap for {:?}", order);
        }
    }

    #[test]
    fn bayer_positions_cover_quad() {
        for pattern in [
            BayerPattern::Rggb,
            BayerPattern::Bggr,
            BayerPattern::Grbg,
            BayerPattern::Gbrg,
        ] {
            let mut seen = [[false; 2]; 2];
            let (rc, rr) = pattern.red_position();
            seen[rr][rc] = true;
            let (bc, br) = pattern.blue_position();
            seen[br][bc] = true;
            for (gc, gr) in pattern.green_positions() {
                seen[gr][gc] = true;
            }
            assert_eq!(seen, [[true; 2]; 2], "quad positions overlap for {:?}", pattern);
        }
    }

    #[test]
    fn component_sizes() {
        let p010 = PixelFormat::new("P010", ChromaSubsampling::Yuv420, 10, 2);
        assert_eq!(p010.component_size(), 2);
        let nv12 = PixelFormat::new("NV12", ChromaSubsampling::Yuv420, 8, 2);
        assert_eq!(nv12.component_size(), 1);
    }
}
