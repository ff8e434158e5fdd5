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
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct MismatchedSize {
    pub expected: u64,
    pub received: u64,
}

/// Describes a plane whose declared strides cannot hold one row at the
/// requested width.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct LayoutMismatch {
    pub plane: usize,
    pub expected: u64,
    pub received: u64,
}

#[derive(Debug)]
pub enum RenderError {
    InvalidLayout(LayoutMismatch),
    PlaneCountMismatch(MismatchedSize),
    InsufficientSource(MismatchedSize),
    DestinationSizeMismatch(MismatchedSize),
    ZeroBaseSize,
    SizeOverflow,
    UnsupportedFormat(String),
    Io(std::io::Error),
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::InvalidLayout(fault) => f.write_fmt(format_args!(
                "Plane {} layout is invalid, stride must be at least {}, but it is {}",
                fault.plane, fault.expected, fault.received
            )),
            RenderError::PlaneCountMismatch(size) => f.write_fmt(format_args!(
                "Layout must describe {} planes, but it describes {}",
                size.expected, size.received
            )),
            RenderError::InsufficientSource(size) => f.write_fmt(format_args!(
                "Source is too small, render requires {} bytes, but only {} were available",
                size.expected, size.received
            )),
            RenderError::DestinationSizeMismatch(size) => f.write_fmt(format_args!(
                "Destination must have size at least {} but it is {}",
                size.expected, size.received
            )),
            RenderError::ZeroBaseSize => f.write_str("Zero sized surfaces are not supported"),
            RenderError::SizeOverflow => f.write_str("Image size overflows addressing capabilities"),
            RenderError::UnsupportedFormat(name) => {
                f.write_fmt(format_args!("Pixel format '{}' is not registered", name))
            }
            RenderError::Io(err) => f.write_fmt(format_args!("Source I/O failure: {}", err)),
        }
    }
}

impl Error for RenderError {}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Io(err)
    }
}

#[inline]
pub(crate) fn check_overflow_v2(v0: usize, v1: usize) -> Result<(), RenderError> {
    let (_, overflow) = v0.overflowing_mul(v1);
    if overflow {
        return Err(RenderError::SizeOverflow);
    }
    Ok(())
}

#[inline]
pub(crate) fn check_overflow_v3(v0: usize, v1: usize, v2: usize) -> Result<(), RenderError> {
    let (product0, overflow) = v0.overflowing_mul(v1);
    if overflow {
        return Err(RenderError::SizeOverflow);
    }
    let (_, overflow) = product0.overflowing_mul(v2);
    if overflow {
        return Err(RenderError::SizeOverflow);
    }
    Ok(())
}

#[inline]
pub(crate) fn check_bgra_destination(
    frame: &[u8],
    row_pitch: usize,
    width: u32,
    height: u32,
) -> Result<(), RenderError> {
    if width == 0 || height == 0 {
        return Err(RenderError::ZeroBaseSize);
    }
    check_overflow_v3(width as usize, height as usize, 4)?;
    check_overflow_v2(row_pitch, height as usize)?;
    if row_pitch < width as usize * 4 {
        return Err(RenderError::DestinationSizeMismatch(MismatchedSize {
            expected: width as u64 * 4,
            received: row_pitch as u64,
        }));
    }
    if frame.len() < row_pitch * height as usize {
        return Err(RenderError::DestinationSizeMismatch(MismatchedSize {
            expected: row_pitch as u64 * height as u64,
            received: frame.len() as u64,
        }));
    }
    Ok(())
}
