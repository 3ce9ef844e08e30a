//! Test fixture: a minimal FLAC writer.
//!
//! Produces real FLAC streams (STREAMINFO + fixed-blocksize frames with
//! verbatim 16-bit subframes and valid CRCs) so the claxon-backed path can be
//! tested without binary fixtures.

#![allow(dead_code)]

/// An encoded stream and the byte offset of each frame in it.
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub frame_offsets: Vec<usize>,
}

/// Size of a frame header as written here: sync + codes (4 bytes), frame
/// number (1), block size (1), CRC-8 (1).
pub const FRAME_HEADER_LEN: usize = 7;

struct BitWriter {
    bytes: Vec<u8>,
    acc: u64,
    nbits: u32,
}

impl BitWriter {
    fn new() -> Self {
        BitWriter {
            bytes: Vec::new(),
            acc: 0,
            nbits: 0,
        }
    }

    fn write(&mut self, value: u64, bits: u32) {
        for i in (0..bits).rev() {
            self.acc = (self.acc << 1) | ((value >> i) & 1);
            self.nbits += 1;
            if self.nbits == 8 {
                self.bytes.push(self.acc as u8);
                self.acc = 0;
                self.nbits = 0;
            }
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        assert_eq!(self.nbits, 0, "unaligned write");
        self.bytes
    }
}

fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &b in data {
        crc ^= b;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 { (crc << 1) ^ 0x07 } else { crc << 1 };
        }
    }
    crc
}

fn crc16(data: &[u8]) -> u16 {
    let mut crc = 0u16;
    for &b in data {
        crc ^= (b as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 { (crc << 1) ^ 0x8005 } else { crc << 1 };
        }
    }
    crc
}

/// Encode 16-bit `channels` (all the same length) as FLAC, cutting frames
/// of `block_size` samples; the last frame holds the remainder.
///
/// `block_size` must be in 16..=256 and the stream must have fewer than 128
/// frames.
pub fn encode(sample_rate: u32, block_size: usize, channels: &[Vec<i16>]) -> Encoded {
    assert!((16..=256).contains(&block_size));
    assert!((1..=8).contains(&channels.len()));
    let total = channels[0].len();
    assert!(channels.iter().all(|c| c.len() == total));

    let mut bytes = b"fLaC".to_vec();

    // STREAMINFO, flagged as the last metadata block.
    let mut info = BitWriter::new();
    info.write(1, 1);
    info.write(0, 7);
    info.write(34, 24);
    info.write(block_size as u64, 16);
    info.write(block_size as u64, 16);
    info.write(0, 24);
    info.write(0, 24);
    info.write(sample_rate as u64, 20);
    info.write(channels.len() as u64 - 1, 3);
    info.write(15, 5);
    info.write(total as u64, 36);
    for _ in 0..16 {
        info.write(0, 8);
    }
    bytes.extend(info.into_bytes());

    let mut frame_offsets = Vec::new();
    for (number, start) in (0..total).step_by(block_size).enumerate() {
        assert!(number < 128);
        let len = block_size.min(total - start);
        frame_offsets.push(bytes.len());

        let mut header = BitWriter::new();
        header.write(0b11_1111_1111_1110, 14);
        header.write(0, 1); // reserved
        header.write(0, 1); // fixed block size
        header.write(0b0110, 4); // 8-bit block size at end of header
        header.write(0b0000, 4); // sample rate from STREAMINFO
        header.write(channels.len() as u64 - 1, 4); // independent channels
        header.write(0b100, 3); // 16 bits per sample
        header.write(0, 1); // reserved
        header.write(number as u64, 8);
        header.write(len as u64 - 1, 8);
        let mut frame = header.into_bytes();
        frame.push(crc8(&frame));

        for channel in channels {
            frame.push(0b0000_0010); // verbatim, no wasted bits
            for &s in &channel[start..start + len] {
                frame.extend_from_slice(&s.to_be_bytes());
            }
        }
        let crc = crc16(&frame);
        frame.extend_from_slice(&crc.to_be_bytes());

        bytes.extend(frame);
    }

    Encoded {
        bytes,
        frame_offsets,
    }
}

/// Interleave per-channel samples: `[c0[0], c1[0], ..., c0[1], ...]`.
pub fn interleave(channels: &[Vec<i16>]) -> Vec<i32> {
    let len = channels[0].len();
    (0..len)
        .flat_map(|i| channels.iter().map(move |c| c[i] as i32))
        .collect()
}

/// Deterministic test signal: `len` samples for each of `count` channels.
pub fn signal(count: usize, len: usize) -> Vec<Vec<i16>> {
    (0..count)
        .map(|ch| {
            (0..len)
                .map(|i| {
                    let v = (i as i32 * 37 + ch as i32 * 1000) % 20000 - 10000;
                    if ch % 2 == 1 { -v as i16 } else { v as i16 }
                })
                .collect()
        })
        .collect()
}
