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
use crate::error::{LayoutMismatch, MismatchedSize, RenderError};

/// Describes how samples of one plane are laid out in the source stream.
///
/// Both strides are expressed in bytes. The pixel stride is the distance
/// between the first bytes of two horizontally adjacent samples, the row
/// stride is the distance between the first bytes of two vertically
/// adjacent rows. A row stride larger than the tightly packed row declares
/// trailing padding which is consumed but never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneDescriptor {
    /// Distance in bytes between two horizontally adjacent samples.
    pub pixel_stride: u32,
    /// Distance in bytes between the first bytes of two consecutive rows.
    pub row_stride: u32,
}

impl PlaneDescriptor {
    pub const fn new(pixel_stride: u32, row_stride: u32) -> Self {
        PlaneDescriptor {
            pixel_stride,
            row_stride,
        }
    }
}

/// Validates one plane descriptor against the minimum sample geometry.
///
/// `samples_per_row` is the number of samples one row of this plane holds
/// after sub-sampling was applied, `min_pixel_stride` the smallest distance
/// that still fits one sample.
pub(crate) fn check_plane(
    plane: usize,
    descriptor: PlaneDescriptor,
    min_pixel_stride: u32,
    samples_per_row: u32,
) -> Result<(), RenderError> {
    if descriptor.pixel_stride < min_pixel_stride {
        return Err(RenderError::InvalidLayout(LayoutMismatch {
            plane,
            expected: min_pixel_stride as u64,
            received: descriptor.pixel_stride as u64,
        }));
    }
    let required_row = descriptor.pixel_stride as u64 * samples_per_row as u64;
    if (descriptor.row_stride as u64) < required_row {
        return Err(RenderError::InvalidLayout(LayoutMismatch {
            plane,
            expected: required_row,
            received: descriptor.row_stride as u64,
        }));
    }
    Ok(())
}

/// Checks that the caller supplied exactly the plane count the format needs.
pub(crate) fn check_plane_count(
    layout: &[PlaneDescriptor],
    expected: usize,
) -> Result<(), RenderError> {
    if layout.len() != expected {
        return Err(RenderError::PlaneCountMismatch(MismatchedSize {
            expected: expected as u64,
            received: layout.len() as u64,
        }));
    }
    Ok(())
}

/// Tightly packed layout for a luma plane followed by an interleaved
/// chroma plane, as NV12/P010 style formats expect it.
pub(crate) fn semi_planar_layout(width: u32, component_size: u32) -> Vec<PlaneDescriptor> {
    vec![
        PlaneDescriptor::new(component_size, width * component_size),
        PlaneDescriptor::new(component_size * 2, width * component_size),
    ]
}

/// Tightly packed three plane 4:2:0 layout with half width chroma planes.
pub(crate) fn planar420_layout(width: u32, component_size: u32) -> Vec<PlaneDescriptor> {
    let half_width = width / 2;
    vec![
        PlaneDescriptor::new(component_size, width * component_size),
        PlaneDescriptor::new(component_size, half_width * component_size),
        PlaneDescriptor::new(component_size, half_width * component_size),
    ]
}

/// Tightly packed single plane layout for packed, gray and bayer formats.
pub(crate) fn single_plane_layout(width: u32, pixel_stride: u32) -> Vec<PlaneDescriptor> {
    vec![PlaneDescriptor::new(pixel_stride, width * pixel_stride)]
}

/// Bytes one row of a plane occupies in the stream, honoring declared padding.
pub(crate) fn row_span(tight_row_bytes: u64, declared_row_stride: u64) -> u64 {
    tight_row_bytes.max(declared_row_stride)
}
