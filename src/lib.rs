//! Streaming FLAC decoder front end producing interleaved integer PCM.
//!
//! FLAC frames come in variable block sizes; callers usually want fixed-size
//! buffers. [`PcmReader`] bridges the two: each [`PcmReader::fill_buffer`]
//! call fills a caller-allocated [`IntBuffer`], carrying any part of a frame
//! that did not fit over to the next call.
//!
//! Frame decoding is done by `claxon` behind the [`FrameSource`] trait; WAV
//! output is written by `hound` behind the [`PcmSink`] trait.
//!
//! # Example
//!
//! ```no_run
//! use flac_pcm::{FillStatus, IntBuffer, PcmReader};
//!
//! let mut reader = PcmReader::open("track.flac").unwrap();
//! let format = reader.format();
//! println!("{}ch, {}Hz, {}bit", format.channels, format.sample_rate, reader.sample_bit_depth());
//!
//! let mut buf = IntBuffer::with_capacity(4096);
//! loop {
//!     let fill = reader.fill_buffer(&mut buf);
//!     // buf.filled() holds fill.written interleaved samples
//!     match fill.status {
//!         FillStatus::Continue => {}
//!         FillStatus::EndOfStream => break,
//!         FillStatus::SourceError(e) => panic!("{e}"),
//!     }
//! }
//! reader.close().unwrap();
//! ```

mod buffer;
pub mod convert;
mod decode;
pub mod error;
mod format;
pub mod sink;
pub mod source;

pub use buffer::IntBuffer;
pub use convert::{ConvertOptions, ConvertSummary, convert, convert_file, output_path_for};
pub use decode::{Fill, FillStatus, PcmReader};
pub use error::Error;
pub use format::{Format, StreamInfo};
pub use sink::{PcmSink, WavSink};
pub use source::{FlacSource, Frame, FrameSource};
