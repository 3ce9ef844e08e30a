//! FLAC to WAV conversion: pumps a reader into a sink.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::buffer::IntBuffer;
use crate::decode::{FillStatus, PcmReader};
use crate::error::Error;
use crate::format::Format;
use crate::sink::{PcmSink, WavSink};
use crate::source::FrameSource;

/// Default buffer capacity, in samples.
pub const DEFAULT_BUFFER_SIZE: usize = 1_000_000;

/// Options controlling a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Capacity of the sample buffer passed between reader and sink.
    pub buffer_size: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl ConvertOptions {
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    fn validate(&self) -> Result<(), Error> {
        if self.buffer_size == 0 {
            return Err(Error::InvalidOptions("buffer size must be at least 1".into()));
        }
        Ok(())
    }
}

/// What a finished conversion wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertSummary {
    /// Samples written across all channels.
    pub samples: u64,
    /// Samples written per channel.
    pub frames_per_channel: u64,
    pub format: Format,
    pub bits_per_sample: u32,
}

/// Copy every sample of `reader` into `sink`, then finalize the sink and
/// close the reader.
///
/// The first source or sink error aborts the conversion. Samples already
/// handed to the sink stay written.
pub fn convert<S, K>(
    mut reader: PcmReader<S>,
    mut sink: K,
    options: &ConvertOptions,
) -> Result<ConvertSummary, Error>
where
    S: FrameSource,
    K: PcmSink,
{
    options.validate()?;

    let format = reader.format();
    let bits_per_sample = reader.sample_bit_depth();
    let mut buf = IntBuffer::with_capacity(options.buffer_size);
    let mut samples = 0u64;

    loop {
        let fill = reader.fill_buffer(&mut buf);
        if !buf.is_empty() {
            sink.write(&buf)?;
            samples += buf.len() as u64;
        }
        match fill.status {
            FillStatus::Continue if fill.written > 0 => {}
            FillStatus::Continue | FillStatus::EndOfStream => break,
            FillStatus::SourceError(e) => return Err(e),
        }
    }

    sink.finalize()?;
    reader.close()?;

    let channels = format.channels.max(1) as u64;
    debug!("converted {samples} samples");
    Ok(ConvertSummary {
        samples,
        frames_per_channel: samples / channels,
        format,
        bits_per_sample,
    })
}

/// Convert the FLAC file at `input` into a WAV file at `output`.
pub fn convert_file<P, Q>(
    input: P,
    output: Q,
    options: &ConvertOptions,
) -> Result<ConvertSummary, Error>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    options.validate()?;

    let reader = PcmReader::open(input.as_ref())?;
    let format = reader.format();
    info!(
        "{}: {}ch, {}Hz, {}bit",
        input.as_ref().display(),
        format.channels,
        format.sample_rate,
        reader.sample_bit_depth()
    );
    let sink = WavSink::create(output.as_ref(), format, reader.sample_bit_depth())?;
    convert(reader, sink, options)
}

/// Output path for `input`: the same path with a `.wav` extension.
pub fn output_path_for<P: AsRef<Path>>(input: P) -> PathBuf {
    input.as_ref().with_extension("wav")
}
