//! Frame sources: producers of decoded FLAC frames.
//!
//! The reader only needs "give me the next frame" and the static stream
//! properties, so decoding sits behind the [`FrameSource`] trait. The
//! production implementation wraps `claxon`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use claxon::FlacReader;
use claxon::frame::Block;
use log::{debug, trace};

use crate::error::Error;
use crate::format::StreamInfo;

/// One decoded frame: `block_size` samples for each channel.
///
/// Samples are stored channel-major (all of channel 0, then all of channel 1,
/// ...), which is how the bitstream decoder produces them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    block_size: usize,
    channels: usize,
    samples: Vec<i32>,
}

impl Frame {
    /// Build a frame from per-channel sample arrays, in channel order.
    ///
    /// All channels must hold the same number of samples.
    pub fn from_channels<C: AsRef<[i32]>>(channels: &[C]) -> Result<Frame, Error> {
        let block_size = channels.first().map_or(0, |c| c.as_ref().len());
        let mut samples = Vec::with_capacity(block_size * channels.len());
        for (ch, data) in channels.iter().enumerate() {
            let data = data.as_ref();
            if data.len() != block_size {
                return Err(Error::UnsupportedFormat(format!(
                    "channel {ch} has {} samples, expected {block_size}",
                    data.len()
                )));
            }
            samples.extend_from_slice(data);
        }
        Ok(Frame {
            block_size,
            channels: channels.len(),
            samples,
        })
    }

    fn from_block(block: Block) -> Frame {
        let block_size = block.duration() as usize;
        let channels = block.channels() as usize;
        let mut samples = block.into_buffer();
        samples.truncate(block_size * channels);
        Frame {
            block_size,
            channels,
            samples,
        }
    }

    /// Number of inter-channel samples in the block.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Total number of samples across all channels.
    pub fn len(&self) -> usize {
        self.block_size * self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The subframe of channel `ch`.
    pub fn channel(&self, ch: usize) -> &[i32] {
        let start = ch * self.block_size;
        &self.samples[start..start + self.block_size]
    }

    pub fn sample(&self, ch: usize, index: usize) -> i32 {
        self.samples[ch * self.block_size + index]
    }

    /// Sample at position `pos` of the interleaved order
    /// `[c0[0], c1[0], ..., c0[1], c1[1], ...]`.
    pub fn interleaved(&self, pos: usize) -> i32 {
        self.sample(pos % self.channels, pos / self.channels)
    }

    /// Give up the frame, returning its storage for reuse.
    pub fn into_buffer(self) -> Vec<i32> {
        self.samples
    }
}

/// A producer of decoded frames for one decode session.
pub trait FrameSource {
    /// Static properties of the stream. Must not change during the session.
    fn stream_info(&self) -> StreamInfo;

    /// Decode the next frame. `Ok(None)` signals the end of the stream.
    fn next_frame(&mut self) -> Result<Option<Frame>, Error>;

    /// Hand back a fully consumed frame so its storage can be reused.
    fn recycle(&mut self, frame: Frame) {
        let _ = frame;
    }

    /// End the session, releasing the underlying stream.
    fn close(self) -> Result<(), Error>
    where
        Self: Sized;
}

/// Frame source decoding a FLAC stream with `claxon`.
pub struct FlacSource<R: Read> {
    reader: FlacReader<R>,
    info: StreamInfo,
    /// Storage of the last recycled frame, reused by the next decode.
    spare: Vec<i32>,
    frames_decoded: u64,
}

impl FlacSource<File> {
    /// Open a FLAC file by path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path)?;
        Self::new(file)
    }
}

impl<R: Read> FlacSource<R> {
    /// Parse the FLAC header from `input`.
    ///
    /// Fails with [`Error::SourceOpen`] when the stream is not valid FLAC.
    pub fn new(input: R) -> Result<Self, Error> {
        let reader = FlacReader::new(input).map_err(Error::SourceOpen)?;
        let info = StreamInfo::from(reader.streaminfo());
        debug!(
            "opened FLAC stream: {}ch, {}Hz, {}bit, block size {}..={}, {:?} samples",
            info.channels,
            info.sample_rate,
            info.bits_per_sample,
            info.min_block_size,
            info.max_block_size,
            info.total_samples
        );
        Ok(FlacSource {
            reader,
            info,
            spare: Vec::new(),
            frames_decoded: 0,
        })
    }

    /// Number of frames decoded so far.
    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }
}

impl<R: Read> FrameSource for FlacSource<R> {
    fn stream_info(&self) -> StreamInfo {
        self.info
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, Error> {
        let buffer = std::mem::take(&mut self.spare);
        let block = self
            .reader
            .blocks()
            .read_next_or_eof(buffer)
            .map_err(Error::SourceDecode)?;

        match block {
            Some(block) => {
                self.frames_decoded += 1;
                trace!(
                    "frame {}: {} samples x {} channels",
                    self.frames_decoded,
                    block.duration(),
                    block.channels()
                );
                Ok(Some(Frame::from_block(block)))
            }
            None => Ok(None),
        }
    }

    fn recycle(&mut self, frame: Frame) {
        self.spare = frame.into_buffer();
    }

    fn close(self) -> Result<(), Error> {
        debug!("closing FLAC stream after {} frames", self.frames_decoded);
        drop(self.reader.into_inner());
        Ok(())
    }
}
