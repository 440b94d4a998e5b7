//! # Clear Value Encoding
//!
//! Clear values travel to the verification entry point ABI-encoded: one
//! 32-byte big-endian word per value, in handle order. The decryption proof
//! covers exactly these bytes.

use crate::errors::EncodingError;
use primitive_types::U256;

/// Size of one ABI word in bytes.
pub const ABI_WORD_SIZE: usize = 32;

/// Encode clear values as consecutive 32-byte big-endian words.
pub fn encode_clear_values(values: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * ABI_WORD_SIZE);
    for value in values {
        let mut word = [0u8; ABI_WORD_SIZE];
        U256::from(*value).to_big_endian(&mut word);
        out.extend_from_slice(&word);
    }
    out
}

/// Decode consecutive 32-byte words into clear values.
pub fn decode_clear_values(bytes: &[u8]) -> Result<Vec<u32>, EncodingError> {
    if bytes.len() % ABI_WORD_SIZE != 0 {
        return Err(EncodingError::MisalignedPayload { len: bytes.len() });
    }

    bytes
        .chunks(ABI_WORD_SIZE)
        .enumerate()
        .map(|(index, word)| {
            let value = U256::from_big_endian(word);
            if value > U256::from(u32::MAX) {
                return Err(EncodingError::ValueOutOfRange { index });
            }
            Ok(value.low_u32())
        })
        .collect()
}
