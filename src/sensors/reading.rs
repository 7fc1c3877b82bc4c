//! Raw peripheral samples and their decoding.
//!
//! NAU7802-style converters return a conversion result as three bytes,
//! most significant first, in 24-bit two's complement.

use crate::errors::SensorError;

/// Number of bytes in one conversion result
pub const RAW_READING_LEN: usize = 3;

const SIGN_BIT: i32 = 0x80_0000;
const SAMPLE_MASK: i32 = 0xFF_FFFF;

/// Exactly three bytes read back from a peripheral after channel selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawReading([u8; RAW_READING_LEN]);

impl RawReading {
    pub fn new(bytes: [u8; RAW_READING_LEN]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; RAW_READING_LEN] {
        self.0
    }

    /// Sign-extend the 24-bit sample into an `i32`.
    pub fn decode(&self) -> i32 {
        let [b0, b1, b2] = self.0;
        let value = (b0 as i32) << 16 | (b1 as i32) << 8 | b2 as i32;
        if value & SIGN_BIT != 0 {
            value | !SAMPLE_MASK
        } else {
            value
        }
    }
}

impl TryFrom<&[u8]> for RawReading {
    type Error = SensorError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; RAW_READING_LEN] = bytes
            .try_into()
            .map_err(|_| SensorError::MalformedReading { len: bytes.len() })?;
        Ok(Self(bytes))
    }
}

impl From<RawReading> for i32 {
    fn from(reading: RawReading) -> Self {
        reading.decode()
    }
}

/// Decode a conversion result, returning `0` for anything that is not exactly
/// three bytes.
///
/// A zero is indistinguishable from a genuine zero sample. Prefer
/// `RawReading::try_from` where a malformed buffer should be an error.
pub fn decode_adc_bytes(bytes: &[u8]) -> i32 {
    RawReading::try_from(bytes).map(|r| r.decode()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(v: u32) -> [u8; 3] {
        [(v >> 16) as u8, (v >> 8) as u8, v as u8]
    }

    #[test]
    fn test_decode_scenarios() {
        assert_eq!(RawReading::new([0x00, 0x00, 0x01]).decode(), 1);
        assert_eq!(RawReading::new([0xFF, 0xFF, 0xFF]).decode(), -1);
        assert_eq!(RawReading::new([0x80, 0x00, 0x00]).decode(), -8_388_608);
        assert_eq!(RawReading::new([0x7F, 0xFF, 0xFF]).decode(), 8_388_607);
        assert_eq!(RawReading::new([0x00, 0x00, 0x00]).decode(), 0);
    }

    #[test]
    fn test_decode_is_big_endian() {
        assert_eq!(RawReading::new([0x01, 0x02, 0x03]).decode(), 0x01_02_03);
        assert_eq!(RawReading::new([0x12, 0x34, 0x56]).decode(), 0x12_34_56);
    }

    #[test]
    fn test_decode_full_24_bit_space() {
        for v in 0u32..0x100_0000 {
            let expected = if v < 0x80_0000 {
                v as i32
            } else {
                v as i32 - 0x100_0000
            };
            let bytes = encode(v);
            assert_eq!(RawReading::new(bytes).decode(), expected, "input {:#08x}", v);
        }
    }

    #[test]
    fn test_decode_is_pure() {
        let reading = RawReading::new([0xC0, 0xFF, 0xEE]);
        let first = reading.decode();
        for _ in 0..8 {
            assert_eq!(reading.decode(), first);
        }
        assert_eq!(i32::from(reading), first);
    }

    #[test]
    fn test_sentinel_for_wrong_length() {
        assert_eq!(decode_adc_bytes(&[]), 0);
        assert_eq!(decode_adc_bytes(&[0xFF]), 0);
        assert_eq!(decode_adc_bytes(&[0xFF, 0xFF]), 0);
        assert_eq!(decode_adc_bytes(&[0xFF, 0xFF, 0xFF, 0xFF]), 0);
        assert_eq!(decode_adc_bytes(&[0xFF, 0xFF, 0xFF]), -1);
    }

    #[test]
    fn test_strict_path_rejects_wrong_length() {
        let err = RawReading::try_from(&[0x01, 0x02][..]).unwrap_err();
        assert!(matches!(err, SensorError::MalformedReading { len: 2 }));

        let reading = RawReading::try_from(&[0x80, 0x00, 0x00][..]).unwrap();
        assert_eq!(reading.bytes(), [0x80, 0x00, 0x00]);
        assert_eq!(reading.decode(), -8_388_608);
    }
}
