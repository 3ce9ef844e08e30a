use std::time::Duration;

/// Channel layout and rate of a PCM stream.
///
/// The zero value (`Format::default()`) stands in for "no stream".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Format {
    /// Number of interleaved channels.
    pub channels: u32,
    /// Sample rate in Hz (e.g. 44100).
    pub sample_rate: u32,
}

/// Static properties of a FLAC stream, read once from its STREAMINFO block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamInfo {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of channels (1-8).
    pub channels: u32,
    /// Bits per sample (4-32).
    pub bits_per_sample: u32,
    /// Smallest block size used in the stream, in inter-channel samples.
    pub min_block_size: u16,
    /// Largest block size used in the stream, in inter-channel samples.
    pub max_block_size: u16,
    /// Samples per channel, if the encoder recorded it.
    pub total_samples: Option<u64>,
}

impl StreamInfo {
    pub fn format(&self) -> Format {
        Format {
            channels: self.channels,
            sample_rate: self.sample_rate,
        }
    }

    /// Total number of interleaved samples (samples per channel × channels).
    pub fn total_interleaved_samples(&self) -> Option<u64> {
        self.total_samples.map(|n| n * self.channels as u64)
    }

    /// Play time of the stream, when the total sample count is known.
    pub fn duration(&self) -> Option<Duration> {
        let total = self.total_samples?;
        if self.sample_rate == 0 {
            return None;
        }
        let rate = self.sample_rate as u64;
        let secs = total / rate;
        let nanos = (total % rate) * 1_000_000_000 / rate;
        Some(Duration::new(secs, nanos as u32))
    }
}

impl From<claxon::metadata::StreamInfo> for StreamInfo {
    fn from(info: claxon::metadata::StreamInfo) -> Self {
        StreamInfo {
            sample_rate: info.sample_rate,
            channels: info.channels,
            bits_per_sample: info.bits_per_sample,
            min_block_size: info.min_block_size,
            max_block_size: info.max_block_size,
            total_samples: info.samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(total: Option<u64>) -> StreamInfo {
        StreamInfo {
            sample_rate: 44100,
            channels: 2,
            bits_per_sample: 16,
            min_block_size: 4096,
            max_block_size: 4096,
            total_samples: total,
        }
    }

    #[test]
    fn format_snapshot() {
        let f = info(None).format();
        assert_eq!(f.channels, 2);
        assert_eq!(f.sample_rate, 44100);
        assert_eq!(Format::default(), Format { channels: 0, sample_rate: 0 });
    }

    #[test]
    fn duration_from_total_samples() {
        assert_eq!(info(None).duration(), None);
        assert_eq!(info(Some(88200)).duration(), Some(Duration::from_secs(2)));
        assert_eq!(
            info(Some(66150)).duration(),
            Some(Duration::from_millis(1500))
        );
        assert_eq!(info(Some(10)).total_interleaved_samples(), Some(20));
    }

    #[test]
    fn zero_rate_has_no_duration() {
        let mut i = info(Some(100));
        i.sample_rate = 0;
        assert_eq!(i.duration(), None);
    }
}
