//! Streaming PCM reader: fills fixed-size buffers from variable-size frames.
//!
//! Per fill:
//! 1. Drain the samples left over from a partially consumed frame
//! 2. Pull frames from the source until the buffer is full or the source
//!    ends / fails
//! 3. If the buffer fills mid-frame, remember the frame and the exact
//!    interleaved position reached for the next fill

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use log::{debug, warn};

use crate::buffer::IntBuffer;
use crate::error::Error;
use crate::format::{Format, StreamInfo};
use crate::source::{FlacSource, Frame, FrameSource};

/// Smallest buffer `read_all` fills per call.
const READ_ALL_CHUNK: usize = 4096;

/// Position of the reader within the stream.
#[derive(Debug)]
enum ReaderState {
    /// No partially consumed frame.
    Idle,
    /// `frame` has been emitted up to (not including) interleaved position `next`.
    Resuming { frame: Frame, next: usize },
    /// The source reported end of stream.
    Finished,
    /// The source reported an error; nothing more is pulled from it.
    Failed,
}

/// How a fill ended.
#[derive(Debug)]
pub enum FillStatus {
    /// The buffer is full and the stream may have more samples.
    Continue,
    /// The stream is exhausted. Samples written by this fill are still valid.
    EndOfStream,
    /// The source failed. Samples written by this fill before the failure are valid.
    SourceError(Error),
}

/// Result of one [`PcmReader::fill_buffer`] call.
#[derive(Debug)]
pub struct Fill {
    /// Number of samples written to the buffer.
    pub written: usize,
    pub status: FillStatus,
}

impl Fill {
    fn new(written: usize, status: FillStatus) -> Self {
        Fill { written, status }
    }

    pub fn is_end_of_stream(&self) -> bool {
        matches!(self.status, FillStatus::EndOfStream)
    }

    /// Convert into `(samples written, end of stream)`, turning a source
    /// error into `Err`.
    pub fn into_result(self) -> Result<(usize, bool), Error> {
        match self.status {
            FillStatus::Continue => Ok((self.written, false)),
            FillStatus::EndOfStream => Ok((self.written, true)),
            FillStatus::SourceError(e) => Err(e),
        }
    }
}

/// Reads a frame source as a flat stream of interleaved samples.
///
/// Samples are interleaved in channel order: `[c0[0], c1[0], c0[1], c1[1], ...]`.
/// Values are native i32 at the source bit depth.
pub struct PcmReader<S: FrameSource> {
    source: S,
    info: StreamInfo,
    state: ReaderState,
}

impl PcmReader<FlacSource<File>> {
    /// Open a FLAC file by path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Ok(Self::new(FlacSource::open(path)?))
    }
}

impl<R: Read> PcmReader<FlacSource<R>> {
    /// Create a reader over any `Read` yielding a FLAC stream.
    pub fn from_reader(input: R) -> Result<Self, Error> {
        Ok(Self::new(FlacSource::new(input)?))
    }
}

impl<S: FrameSource> PcmReader<S> {
    pub fn new(source: S) -> Self {
        let info = source.stream_info();
        PcmReader {
            source,
            info,
            state: ReaderState::Idle,
        }
    }

    /// Channel count and sample rate of the stream.
    pub fn format(&self) -> Format {
        self.info.format()
    }

    /// Bit depth of the decoded samples.
    pub fn sample_bit_depth(&self) -> u32 {
        self.info.bits_per_sample
    }

    pub fn stream_info(&self) -> &StreamInfo {
        &self.info
    }

    /// Play time of the stream, if the stream header declares its length.
    pub fn duration(&self) -> Option<Duration> {
        self.info.duration()
    }

    /// The underlying frame source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fill `buf` with up to `buf.capacity()` interleaved samples.
    ///
    /// The buffer's previous contents are discarded and its format fields are
    /// set from the stream. Frames that do not fit are carried over to the
    /// next call, so splitting a stream into fills of any sizes yields the
    /// same samples as a single large fill.
    ///
    /// After `EndOfStream` every further fill returns `EndOfStream` with no
    /// samples; after `SourceError` every further fill fails with
    /// [`Error::Halted`]. A zero-capacity buffer always yields `Continue`
    /// without touching the source.
    pub fn fill_buffer(&mut self, buf: &mut IntBuffer) -> Fill {
        buf.format = self.info.format();
        buf.source_bit_depth = self.info.bits_per_sample;
        buf.clear();

        if buf.capacity() == 0 {
            return Fill::new(0, FillStatus::Continue);
        }

        match std::mem::replace(&mut self.state, ReaderState::Idle) {
            ReaderState::Idle => {}
            ReaderState::Resuming { frame, next } => {
                if let Some(next) = copy_interleaved(&frame, next, buf) {
                    self.state = ReaderState::Resuming { frame, next };
                    return Fill::new(buf.len(), FillStatus::Continue);
                }
                self.source.recycle(frame);
                if buf.is_full() {
                    return Fill::new(buf.len(), FillStatus::Continue);
                }
            }
            ReaderState::Finished => {
                self.state = ReaderState::Finished;
                return Fill::new(0, FillStatus::EndOfStream);
            }
            ReaderState::Failed => {
                self.state = ReaderState::Failed;
                return Fill::new(0, FillStatus::SourceError(Error::Halted));
            }
        }

        loop {
            let frame = match self.source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    debug!("end of stream");
                    self.state = ReaderState::Finished;
                    return Fill::new(buf.len(), FillStatus::EndOfStream);
                }
                Err(e) => {
                    warn!("decode failed after {} samples in this fill: {e}", buf.len());
                    self.state = ReaderState::Failed;
                    return Fill::new(buf.len(), FillStatus::SourceError(e));
                }
            };

            if let Some(next) = copy_interleaved(&frame, 0, buf) {
                self.state = ReaderState::Resuming { frame, next };
                return Fill::new(buf.len(), FillStatus::Continue);
            }
            self.source.recycle(frame);
            if buf.is_full() {
                return Fill::new(buf.len(), FillStatus::Continue);
            }
        }
    }

    /// Decode the rest of the stream into one vector.
    pub fn read_all(&mut self) -> Result<Vec<i32>, Error> {
        let frame_len = self.info.max_block_size as usize * self.info.channels as usize;
        let mut buf = IntBuffer::with_capacity(frame_len.max(READ_ALL_CHUNK));
        let mut samples = Vec::new();
        loop {
            let fill = self.fill_buffer(&mut buf);
            samples.extend_from_slice(buf.filled());
            match fill.status {
                FillStatus::Continue => {}
                FillStatus::EndOfStream => return Ok(samples),
                FillStatus::SourceError(e) => return Err(e),
            }
        }
    }

    /// End the session, closing the frame source.
    pub fn close(self) -> Result<(), Error> {
        if let ReaderState::Resuming { frame, next } = &self.state {
            debug!(
                "closing with {} samples of the current frame unread",
                frame.len() - next
            );
        }
        self.source.close()
    }
}

/// Copy samples of `frame` from interleaved position `start` into `buf`.
///
/// Returns the position of the first sample that did not fit, or `None` if
/// the frame was drained.
fn copy_interleaved(frame: &Frame, start: usize, buf: &mut IntBuffer) -> Option<usize> {
    let mut pos = start;
    while pos < frame.len() {
        if !buf.push(frame.interleaved(pos)) {
            return Some(pos);
        }
        pos += 1;
    }
    None
}
