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
use crate::numerics::qrshr;

/// Fixed-point precision of the integer YCbCr inverse transform.
pub(crate) const PRECISION: i32 = 13;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
/// Declares YUV range TV (limited) or Full
pub enum YuvRange {
    /// Limited range Y ∈ [16 << (depth - 8), 16 << (depth - 8) + 224 << (depth - 8)], UV ∈ [-1 << (depth - 1), -1 << (depth - 1) + 1 << (depth - 1)]
    Limited,
    /// Full range Y ∈ [0, 2^bit_depth - 1], UV ∈ [-1 << (depth - 1), -1 << (depth - 1) + 2^bit_depth - 1]
    Full,
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub struct YuvChromaRange {
    pub bias_y: u32,
    pub bias_uv: u32,
    pub range_y: u32,
    pub range_uv: u32,
    pub range: YuvRange,
}

pub const fn get_yuv_range(depth: u32, range: YuvRange) -> YuvChromaRange {
    match range {
        YuvRange::Limited => YuvChromaRange {
            bias_y: 16 << (depth - 8),
            bias_uv: 1 << (depth - 1),
            range_y: 219 << (depth - 8),
            range_uv: 224 << (depth - 8),
            range,
        },
        YuvRange::Full => YuvChromaRange {
            bias_y: 0,
            bias_uv: 1 << (depth - 1),
            range_uv: (1 << depth) - 1,
            range_y: (1 << depth) - 1,
            range,
        },
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
/// Declares standard prebuilt YUV conversion matrices, check [ITU-R](https://www.itu.int/rec/T-REC-H.273/en) information for more info
pub enum YuvStandardMatrix {
    Bt601,
    Bt709,
    Bt2020,
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub struct YuvBias {
    pub kr: f32,
    pub kb: f32,
}

impl YuvStandardMatrix {
    pub const fn get_kr_kb(self) -> YuvBias {
        match self {
            YuvStandardMatrix::Bt601 => YuvBias {
                kr: 0.299f32,
                kb: 0.114f32,
            },
            YuvStandardMatrix::Bt709 => YuvBias {
                kr: 0.2126f32,
                kb: 0.0722f32,
            },
            YuvStandardMatrix::Bt2020 => YuvBias {
                kr: 0.2627f32,
                kb: 0.0593f32,
            },
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct CbCrInverseTransform<T> {
    pub y_coef: T,
    pub cr_coef: T,
    pub cb_coef: T,
    pub g_coeff_1: T,
    pub g_coeff_2: T,
}

impl CbCrInverseTransform<f32> {
    /// Integral transformation adds an error not less than 1%
    pub fn to_integers(self, precision: u32) -> CbCrInverseTransform<i32> {
        let precision_scale: i32 = 1i32 << (precision as i32);
        CbCrInverseTransform::<i32> {
            y_coef: (self.y_coef * precision_scale as f32).round() as i32,
            cr_coef: (self.cr_coef * precision_scale as f32).round() as i32,
            cb_coef: (self.cb_coef * precision_scale as f32).round() as i32,
            g_coeff_1: (self.g_coeff_1 * precision_scale as f32).round() as i32,
            g_coeff_2: (self.g_coeff_2 * precision_scale as f32).round() as i32,
        }
    }
}

/// Transformation YUV to RGB with coefficients as specified in [ITU-R](https://www.itu.int/rec/T-REC-H.273/en)
pub fn get_inverse_transform(
    range_bgra: u32,
    range_y: u32,
    range_uv: u32,
    kr: f32,
    kb: f32,
) -> CbCrInverseTransform<f32> {
    let range_uv = range_bgra as f32 / range_uv as f32;
    let y_coef = range_bgra as f32 / range_y as f32;
    let cr_coef = (2f32 * (1f32 - kr)) * range_uv;
    let cb_coef = (2f32 * (1f32 - kb)) * range_uv;
    let kg = 1.0f32 - kr - kb;
    let g_coeff_1 = (2f32 * ((1f32 - kr) * kr / kg)) * range_uv;
    let g_coeff_2 = (2f32 * ((1f32 - kb) * kb / kg)) * range_uv;
    CbCrInverseTransform {
        y_coef,
        cr_coef,
        cb_coef,
        g_coeff_1,
        g_coeff_2,
    }
}

/// Prepared integer YCbCr to BGRA conversion for 8-bit components.
///
/// Coefficients are fixed-point with [`PRECISION`] fractional bits, the output
/// is clamped to `[0, 255]` and alpha is forced opaque.
#[derive(Debug, Copy, Clone)]
pub(crate) struct YuvToBgra {
    y_coef: i32,
    cr_coef: i32,
    cb_coef: i32,
    g_coef_1: i32,
    g_coef_2: i32,
    bias_y: i32,
    bias_uv: i32,
}

impl YuvToBgra {
    pub(crate) fn new(range: YuvRange, matrix: YuvStandardMatrix) -> YuvToBgra {
        let chroma_range = get_yuv_range(8, range);
        let kr_kb = matrix.get_kr_kb();
        let transform = get_inverse_transform(
            255,
            chroma_range.range_y,
            chroma_range.range_uv,
            kr_kb.kr,
            kr_kb.kb,
        )
        .to_integers(PRECISION as u32);
        YuvToBgra {
            y_coef: transform.y_coef,
            cr_coef: transform.cr_coef,
            cb_coef: transform.cb_coef,
            g_coef_1: transform.g_coeff_1,
            g_coef_2: transform.g_coeff_2,
            bias_y: chroma_range.bias_y as i32,
            bias_uv: chroma_range.bias_uv as i32,
        }
    }

    #[inline(always)]
    pub(crate) fn bgra(&self, y: u8, cb: u8, cr: u8) -> [u8; 4] {
        let y_value = (y as i32 - self.bias_y) * self.y_coef;
        let cb_value = cb as i32 - self.bias_uv;
        let cr_value = cr as i32 - self.bias_uv;

        let r = qrshr::<PRECISION, 8>(y_value + self.cr_coef * cr_value);
        let b = qrshr::<PRECISION, 8>(y_value + self.cb_coef * cb_value);
        let g = qrshr::<PRECISION, 8>(y_value - self.g_coef_1 * cr_value - self.g_coef_2 * cb_value);
        [b as u8, g as u8, r as u8, 255]
    }

    #[inline(always)]
    pub(crate) fn bgra_pair(&self, y0: u8, y1: u8, cb: u8, cr: u8) -> ([u8; 4], [u8; 4]) {
        (self.bgra(y0, cb, cr), self.bgra(y1, cb, cr))
    }
}

/// Converts two luma samples sharing one chroma pair into two BGRA pixels.
///
/// This is the conformance reference for all YUV renderers in the crate; the
/// streaming paths use the same prepared transform per call instead of
/// rebuilding it per pixel pair.
///
/// # Arguments
///
/// * `y0` - First luma sample.
/// * `y1` - Second luma sample.
/// * `u` - Shared blue-difference chroma sample.
/// * `v` - Shared red-difference chroma sample.
/// * `range` - YUV values range.
/// * `matrix` - YUV conversion matrix.
pub fn yuv422_to_bgra(
    y0: u8,
    y1: u8,
    u: u8,
    v: u8,
    range: YuvRange,
    matrix: YuvStandardMatrix,
) -> ([u8; 4], [u8; 4]) {
    YuvToBgra::new(range, matrix).bgra_pair(y0, y1, u, v)
}
