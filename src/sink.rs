//! PCM sinks: consumers of filled sample buffers.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use log::debug;

use crate::buffer::IntBuffer;
use crate::error::Error;
use crate::format::Format;

/// Destination for interleaved PCM produced by a reader.
pub trait PcmSink {
    /// Write the filled region of `buf`.
    fn write(&mut self, buf: &IntBuffer) -> Result<(), Error>;

    /// Flush container headers and trailers. Nothing may be written afterwards.
    fn finalize(self) -> Result<(), Error>
    where
        Self: Sized;
}

/// Integer PCM WAVE writer.
///
/// Bit depths that are not a multiple of 8 are stored in the next wider
/// byte-aligned container, left-justified.
pub struct WavSink<W: Write + Seek> {
    writer: WavWriter<W>,
    /// Left shift applied to each sample to fill the container width.
    shift: u32,
    samples_written: u64,
}

impl WavSink<BufWriter<File>> {
    /// Create (or truncate) a WAV file at `path`.
    pub fn create<P: AsRef<Path>>(
        path: P,
        format: Format,
        bits_per_sample: u32,
    ) -> Result<Self, Error> {
        let (spec, shift) = wav_spec(format, bits_per_sample)?;
        let writer = WavWriter::create(path, spec)?;
        Ok(Self::with_writer(writer, spec, shift))
    }
}

impl<W: Write + Seek> WavSink<W> {
    /// Write a WAV stream to any seekable writer.
    pub fn new(output: W, format: Format, bits_per_sample: u32) -> Result<Self, Error> {
        let (spec, shift) = wav_spec(format, bits_per_sample)?;
        let writer = WavWriter::new(output, spec)?;
        Ok(Self::with_writer(writer, spec, shift))
    }

    fn with_writer(writer: WavWriter<W>, spec: WavSpec, shift: u32) -> Self {
        debug!(
            "writing WAV: {}ch, {}Hz, {}bit container",
            spec.channels, spec.sample_rate, spec.bits_per_sample
        );
        WavSink {
            writer,
            shift,
            samples_written: 0,
        }
    }

    /// Number of samples (across all channels) written so far.
    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }
}

impl<W: Write + Seek> PcmSink for WavSink<W> {
    fn write(&mut self, buf: &IntBuffer) -> Result<(), Error> {
        for &sample in buf.filled() {
            self.writer.write_sample(sample << self.shift)?;
        }
        self.samples_written += buf.len() as u64;
        Ok(())
    }

    fn finalize(self) -> Result<(), Error> {
        debug!("finalizing WAV after {} samples", self.samples_written);
        self.writer.finalize()?;
        Ok(())
    }
}

/// WAVE header for a stream, plus the left shift that maps source samples
/// into the container width.
fn wav_spec(format: Format, bits_per_sample: u32) -> Result<(WavSpec, u32), Error> {
    if format.channels == 0 || format.channels > u16::MAX as u32 {
        return Err(Error::UnsupportedFormat(format!(
            "{} channels",
            format.channels
        )));
    }
    if format.sample_rate == 0 {
        return Err(Error::UnsupportedFormat("sample rate of 0 Hz".into()));
    }
    if bits_per_sample == 0 || bits_per_sample > 32 {
        return Err(Error::UnsupportedFormat(format!(
            "{bits_per_sample} bits per sample"
        )));
    }

    let container_bits = bits_per_sample.div_ceil(8) * 8;
    let spec = WavSpec {
        channels: format.channels as u16,
        sample_rate: format.sample_rate,
        bits_per_sample: container_bits as u16,
        sample_format: SampleFormat::Int,
    };
    Ok((spec, container_bits - bits_per_sample))
}
