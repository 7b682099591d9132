//! Versioned record framing.
//!
//! Every record value starts with an `i32` version. Decoding accepts any
//! version between the record's basic floor and the writer's current version;
//! anything newer is a hard `TooNew` error rather than a silent truncation.
//! Encoding always emits the current version, never the version read.

use sigmad_primitives::encoding::{DecodeError, Decoder, Encoder};

use crate::error::WalletDbError;

pub fn write_version(encoder: &mut Encoder, version: i32) {
    encoder.write_i32_le(version);
}

pub fn read_version(
    decoder: &mut Decoder,
    record: &'static str,
    basic: i32,
    current: i32,
) -> Result<i32, WalletDbError> {
    let version = decoder.read_i32_le()?;
    if version > current {
        return Err(WalletDbError::TooNew {
            record,
            version,
            supported: current,
        });
    }
    if version < basic {
        return Err(WalletDbError::Corrupt("record version below supported floor"));
    }
    Ok(version)
}

/// Start a record key: the string prefix, then type-specific bytes.
pub fn key_for(prefix: &str) -> Encoder {
    let mut encoder = Encoder::new();
    encoder.write_var_str(prefix);
    encoder
}

/// The bare prefix bytes, for prefix scans.
pub fn prefix_bytes(prefix: &str) -> Vec<u8> {
    key_for(prefix).into_inner()
}

/// Read the prefix off a raw record key, leaving the decoder positioned at
/// the type-specific remainder.
pub fn read_key_prefix<'a>(decoder: &mut Decoder<'a>) -> Result<String, DecodeError> {
    decoder.read_var_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_floor_and_ceiling() {
        let mut encoder = Encoder::new();
        write_version(&mut encoder, 10);
        let bytes = encoder.into_inner();

        let mut decoder = Decoder::new(&bytes);
        assert_eq!(read_version(&mut decoder, "t", 1, 10).unwrap(), 10);

        let mut decoder = Decoder::new(&bytes);
        assert!(matches!(
            read_version(&mut decoder, "t", 1, 9),
            Err(WalletDbError::TooNew { version: 10, supported: 9, .. })
        ));

        let mut decoder = Decoder::new(&bytes);
        assert!(matches!(
            read_version(&mut decoder, "t", 11, 12),
            Err(WalletDbError::Corrupt(_))
        ));
    }

    #[test]
    fn key_prefix_round_trip() {
        let mut encoder = key_for("hdmint");
        encoder.write_u8(0xaa);
        let key = encoder.into_inner();

        let mut decoder = Decoder::new(&key);
        assert_eq!(read_key_prefix(&mut decoder).unwrap(), "hdmint");
        assert_eq!(decoder.read_u8().unwrap(), 0xaa);
        assert!(decoder.is_empty());
    }
}
