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
use crate::error::{MismatchedSize, RenderError};
use std::io::{Read, Seek, SeekFrom};

/// Forward only byte supplier the renderers pull raw planes from.
///
/// A renderer asks for the total size once during validation and then
/// consumes the stream strictly front to back, so implementations never
/// need to support seeking backwards.
pub trait DataSource {
    /// Total number of bytes this source can deliver.
    fn size(&self) -> u64;
    /// Fills `buf` completely or fails. Running out of bytes mid stream
    /// reports how much was requested against how much was left.
    fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<(), RenderError>;
}

/// In memory source over a borrowed byte slice.
pub struct SliceSource<'a> {
    data: &'a [u8],
    cursor: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        SliceSource { data, cursor: 0 }
    }

    /// Bytes handed out so far.
    pub fn consumed(&self) -> u64 {
        self.cursor as u64
    }
}

impl DataSource for SliceSource<'_> {
    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<(), RenderError> {
        let remaining = self.data.len() - self.cursor;
        if remaining < buf.len() {
            return Err(RenderError::InsufficientSource(MismatchedSize {
                expected: buf.len() as u64,
                received: remaining as u64,
            }));
        }
        let end = self.cursor + buf.len();
        buf.copy_from_slice(&self.data[self.cursor..end]);
        self.cursor = end;
        Ok(())
    }
}

/// Source over any `Read + Seek` transport, typically a file.
///
/// The size is measured once on construction by seeking to the end and
/// back, afterwards the reader is only pulled forward.
pub struct ReaderSource<R> {
    inner: R,
    size: u64,
    consumed: u64,
}

impl<R: Read + Seek> ReaderSource<R> {
    pub fn new(mut inner: R) -> std::io::Result<Self> {
        let size = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(ReaderSource {
            inner,
            size,
            consumed: 0,
        })
    }
}

impl<R: Read + Seek> DataSource for ReaderSource<R> {
    fn size(&self) -> u64 {
        self.size
    }

    fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<(), RenderError> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.consumed += buf.len() as u64;
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
                Err(RenderError::InsufficientSource(MismatchedSize {
                    expected: buf.len() as u64,
                    received: self.size.saturating_sub(self.consumed),
                }))
            }
            Err(err) => Err(RenderError::Io(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn slice_source_tracks_consumption() {
        let data = [1u8, 2, 3, 4, 5];
        let mut source = SliceSource::new(&data);
        assert_eq!(source.size(), 5);
        let mut buf = [0u8; 3];
        source.read_exact_into(&mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3]);
        assert_eq!(source.consumed(), 3);
        let mut rest = [0u8; 2];
        source.read_exact_into(&mut rest).unwrap();
        assert_eq!(rest, [4, 5]);
        assert_eq!(source.consumed(), 5);
    }

    #[test]
    fn slice_source_reports_shortfall() {
        let data = [0u8; 4];
        let mut source = SliceSource::new(&data);
        let mut buf = [0u8; 6];
        let err = source.read_exact_into(&mut buf).unwrap_err();
        match err {
            RenderError::InsufficientSource(sizes) => {
                assert_eq!(sizes.expected, 6);
                assert_eq!(sizes.received, 4);
            }
            _ => panic!("expected insufficient source"),
        }
    }

    #[test]
    fn reader_source_measures_and_reads() {
        let cursor = Cursor::new(vec![9u8, 8, 7, 6]);
        let mut source = ReaderSource::new(cursor).unwrap();
        assert_eq!(source.size(), 4);
        let mut buf = [0u8; 4];
        source.read_exact_into(&mut buf).unwrap();
        assert_eq!(buf, [9, 8, 7, 6]);
    }

    #[test]
    fn reader_source_eof_is_insufficient_source() {
        let cursor = Cursor::new(vec![1u8, 2]);
        let mut source = ReaderSource::new(cursor).unwrap();
        let mut buf = [0u8; 3];
        assert!(matches!(
            source.read_exact_into(&mut buf),
            Err(RenderError::InsufficientSource(_))
        ));
    }
}
