//! Fixed-width hex encoding of device samples.

/// Number of bytes in one device sample.
pub const SAMPLE_LEN: usize = 8;

/// One fixed-size sample read from the device. Exists only within a single
/// loop iteration; its encoded form is the only thing that outlives it.
pub type Sample = [u8; SAMPLE_LEN];

/// Encode a sample as `0x` followed by two lowercase hex digits per byte,
/// most-significant nibble first, input order preserved.
pub fn encode_sample(sample: &Sample) -> String {
    format!("0x{}", hex::encode(sample))
}
