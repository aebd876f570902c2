use pretty_assertions::assert_eq;
use smf_codec::{MAX_VLQ, decode_vlq, encode_vlq};

/// Values around every size boundary plus a spread across the whole range.
fn samples() -> impl Iterator<Item = u32> {
    let boundaries = [0u32, 1 << 7, 1 << 14, 1 << 21, 1 << 28]
        .into_iter()
        .flat_map(|b| [b.saturating_sub(1), b, b + 1]);
    let spread = (0..4096u32).map(|i| i.wrapping_mul(0x9E37_79B9) & MAX_VLQ);
    boundaries.chain(spread).filter(|v| *v <= MAX_VLQ)
}

#[test]
fn decode_inverts_encode() {
    for value in samples() {
        let encoded = encode_vlq(value);
        assert_eq!(
            decode_vlq(encoded.as_bytes()),
            Ok((value, encoded.len())),
            "value {value:#X}"
        );
    }
}

#[test]
fn size_grows_every_seven_bits() {
    for value in samples() {
        let expected = match value {
            0..=0x7F => 1,
            0x80..=0x3FFF => 2,
            0x4000..=0x1F_FFFF => 3,
            _ => 4,
        };
        assert_eq!(encode_vlq(value).len(), expected, "value {value:#X}");
    }
}

#[test]
fn only_the_last_byte_terminates() {
    for value in samples() {
        let encoded = encode_vlq(value);
        let (last, rest) = encoded.as_bytes().split_last().unwrap();
        assert_eq!(last & 0x80, 0);
        assert!(rest.iter().all(|b| b & 0x80 != 0));
    }
}

#[test]
fn trailing_bytes_are_left_alone() {
    let mut bytes = encode_vlq(300).as_bytes().to_vec();
    bytes.extend_from_slice(&[0xFF, 0x2F, 0x00]);
    assert_eq!(decode_vlq(&bytes), Ok((300, 2)));
}
