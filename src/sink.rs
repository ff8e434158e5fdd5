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
use crate::error::{check_bgra_destination, RenderError};
use std::fmt::Debug;

#[derive(Debug)]
pub enum BufferStoreMut<'a, T: Copy + Debug> {
    Borrowed(&'a mut [T]),
    Owned(Vec<T>),
}

impl<T: Copy + Debug> BufferStoreMut<'_, T> {
    pub fn borrow(&self) -> &[T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }

    pub fn as_mut(&mut self) -> &mut [T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }
}

/// Destination surface the renderers paint into.
///
/// The frame is a single BGRA8 buffer with `row_pitch` bytes per row,
/// renderers address rows through the pitch so padded frames work.
pub trait BitmapSink {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Bytes between the first bytes of two consecutive destination rows.
    fn row_pitch(&self) -> usize;
    fn frame_mut(&mut self) -> &mut [u8];
}

/// BGRA8 frame over either an owned allocation or a caller provided slice.
#[derive(Debug)]
pub struct BgraBitmap<'a> {
    frame: BufferStoreMut<'a, u8>,
    width: u32,
    height: u32,
    row_pitch: usize,
}

impl<'a> BgraBitmap<'a> {
    /// Allocates a zeroed, tightly packed frame.
    pub fn alloc(width: u32, height: u32) -> Self {
        let row_pitch = width as usize * 4;
        let frame = vec![0u8; row_pitch * height as usize];
        BgraBitmap {
            frame: BufferStoreMut::Owned(frame),
            width,
            height,
            row_pitch,
        }
    }

    /// Wraps a caller owned frame, validating pitch and length up front.
    pub fn from_slice(
        frame: &'a mut [u8],
        width: u32,
        height: u32,
        row_pitch: usize,
    ) -> Result<Self, RenderError> {
        check_bgra_destination(frame, row_pitch, width, height)?;
        Ok(BgraBitmap {
            frame: BufferStoreMut::Borrowed(frame),
            width,
            height,
            row_pitch,
        })
    }

    pub fn data(&self) -> &[u8] {
        self.frame.borrow()
    }
}

impl BitmapSink for BgraBitmap<'_> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn row_pitch(&self) -> usize {
        self.row_pitch
    }

    fn frame_mut(&mut self) -> &mut [u8] {
        self.frame.as_mut()
    }
}
