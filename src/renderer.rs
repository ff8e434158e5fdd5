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
use crate::cancel::CancelSignal;
use crate::error::{MismatchedSize, RenderError};
use crate::format::{PixelFormat, RenderingOptions};
use crate::layout::PlaneDescriptor;
use crate::sink::BitmapSink;
use crate::source::DataSource;

/// How a render call ended. Cancellation is a regular outcome, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Completed,
    Cancelled,
}

/// Phase a render call is in, reported through debug logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    Validating,
    StreamingLuma,
    StreamingChroma,
    Done,
    Cancelled,
}

/// One raw format family turned into displayable BGRA8.
///
/// Implementations are stateless, every call carries its own scratch, so
/// one renderer instance may serve concurrent renders.
pub trait RawRenderer: Send + Sync {
    /// Format this renderer was registered for.
    fn format(&self) -> PixelFormat;

    /// Tightly packed plane layout for the given base dimensions.
    fn default_layout(&self, width: u32, height: u32) -> Vec<PlaneDescriptor>;

    /// Bytes one frame occupies in the source under the given layout.
    ///
    /// Returns 0 when either dimension collapses to nothing.
    fn source_size(
        &self,
        width: u32,
        height: u32,
        options: &RenderingOptions,
        layout: &[PlaneDescriptor],
    ) -> u64;

    /// Rough pixel capacity of a source of `source_size` bytes, used to
    /// seed dimension guesses in a viewer.
    fn pixel_count(&self, source_size: u64) -> u64;

    /// Streams one frame from `source` into `sink`.
    ///
    /// All validation happens before the first source byte is pulled.
    /// The signal is polled between rows, a raised signal ends the call
    /// with [`RenderOutcome::Cancelled`] and whole rows in the frame.
    fn render(
        &self,
        source: &mut dyn DataSource,
        sink: &mut dyn BitmapSink,
        options: &RenderingOptions,
        layout: &[PlaneDescriptor],
        cancel: &dyn CancelSignal,
    ) -> Result<RenderOutcome, RenderError>;
}

/// Sub-sampled and mosaic formats pair rows and columns, odd tails are cut.
#[inline]
pub(crate) const fn clamp_even(v: u32) -> u32 {
    v & !1
}

/// Fails before any byte is pulled when the source cannot hold one frame.
pub(crate) fn precheck_source(
    source: &dyn DataSource,
    required: u64,
) -> Result<(), RenderError> {
    let available = source.size();
    if available < required {
        log::debug!(
            "source holds {} bytes but the frame needs {}",
            available,
            required
        );
        return Err(RenderError::InsufficientSource(MismatchedSize {
            expected: required,
            received: available,
        }));
    }
    Ok(())
}

/// Re-validates the sink geometry against the dimensions being rendered.
pub(crate) fn check_sink(
    sink: &mut dyn BitmapSink,
    width: u32,
    height: u32,
) -> Result<(), RenderError> {
    let pitch = sink.row_pitch();
    let needed_row = width as u64 * 4;
    if (pitch as u64) < needed_row {
        return Err(RenderError::DestinationSizeMismatch(MismatchedSize {
            expected: needed_row,
            received: pitch as u64,
        }));
    }
    let needed = pitch as u64 * height as u64;
    let frame_len = sink.frame_mut().len() as u64;
    if frame_len < needed {
        return Err(RenderError::DestinationSizeMismatch(MismatchedSize {
            expected: needed,
            received: frame_len,
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SliceSource;

    #[test]
    fn even_clamping() {
        assert_eq!(clamp_even(7), 6);
        assert_eq!(clamp_even(6), 6);
        assert_eq!(clamp_even(1), 0);
        assert_eq!(clamp_even(0), 0);
    }

    #[test]
    fn source_precheck() {
        let data = [0u8; 10];
        let source = SliceSource::new(&data);
        assert!(precheck_source(&source, 10).is_ok());
        assert!(matches!(
            precheck_source(&source, 11),
            Err(RenderError::InsufficientSource(_))
        ));
    }
}
