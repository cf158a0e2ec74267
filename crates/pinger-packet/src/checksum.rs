//! The ones'-complement Internet checksum described in RFC 1071.
//!
//! This code is derived from [`libpnet`] which is available under the Apache 2.0 license.
//!
//! [`libpnet`]: https://github.com/libpnet/libpnet

/// The index of the 16-bit word holding the checksum in an `ICMPv4` header.
const ICMP_CHECKSUM_WORD: usize = 1;

/// Calculate the Internet checksum over an arbitrary buffer.
///
/// The data is summed as big-endian 16-bit words, an odd trailing byte is
/// padded with zero and the carries are folded back in.
///
/// Summing a message which already contains a correct checksum yields zero.
#[must_use]
pub fn checksum(data: &[u8]) -> u16 {
    compute(data, None)
}

/// Calculate the checksum for an `ICMPv4` message.
///
/// The checksum field of `data` is treated as zero.
#[must_use]
pub fn icmp_ipv4_checksum(data: &[u8]) -> u16 {
    compute(data, Some(ICMP_CHECKSUM_WORD))
}

/// Verify the checksum embedded in a received `ICMPv4` message.
#[must_use]
pub fn verify_icmp_ipv4_checksum(data: &[u8]) -> bool {
    !data.is_empty() && checksum(data) == 0
}

fn compute(data: &[u8], ignore_word: Option<usize>) -> u16 {
    if data.is_empty() {
        return 0;
    }
    finalize_checksum(sum_be_words(data, ignore_word))
}

fn sum_be_words(data: &[u8], ignore_word: Option<usize>) -> u32 {
    let mut words = data.chunks_exact(2);
    let mut sum = words
        .by_ref()
        .enumerate()
        .filter(|(i, _)| Some(*i) != ignore_word)
        .map(|(_, word)| u32::from(u16::from_be_bytes([word[0], word[1]])))
        .sum::<u32>();
    if let [last] = words.remainder() {
        if Some(data.len() / 2) != ignore_word {
            sum += u32::from(*last) << 8;
        }
    }
    sum
}

const fn finalize_checksum(mut sum: u32) -> u16 {
    while sum >> 16 != 0 {
        sum = (sum >> 16) + (sum & 0xFFFF);
    }
    !sum as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use test_case::test_case;

    #[test]
    fn test_empty_checksum() {
        assert_eq!(0, checksum(&[]));
        assert_eq!(0, icmp_ipv4_checksum(&[]));
        assert!(!verify_icmp_ipv4_checksum(&[]));
    }

    #[test_case(&[0x00], 0xffff; "single zero byte")]
    #[test_case(&[0x01], 0xfeff; "odd byte is padded")]
    #[test_case(&hex!("00 01 f2 03 f4 f5 f6 f7"), 0x220d; "rfc 1071 example")]
    #[test_case(&hex!("ff ff ff ff"), 0x0000; "carry folding")]
    fn test_checksum(data: &[u8], expected: u16) {
        assert_eq!(expected, checksum(data));
    }

    #[test]
    fn test_icmp_ipv4_checksum() {
        let bytes = hex!(
            "
            0b 00 88 eb 00 00 00 00 45 00 00 54 b0 de 00 00
            01 11 75 21 c0 a8 01 c9 8e fa 42 2e 62 57 81 95
            00 40 87 e7 00 00 00 00 00 00 00 00 00 00 00 00
            00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00
            00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00
            00 00 00 00 00 00 00 00
            "
        );
        assert_eq!(35051, icmp_ipv4_checksum(&bytes));
        assert!(verify_icmp_ipv4_checksum(&bytes));
    }

    #[test]
    fn test_icmp_ipv4_checksum_ignores_checksum_field() {
        let zeroed = hex!("08 00 00 00 04 d2 00 0a");
        let filled = hex!("08 00 ff ff 04 d2 00 0a");
        assert_eq!(0xf323, icmp_ipv4_checksum(&zeroed));
        assert_eq!(0xf323, icmp_ipv4_checksum(&filled));
    }

    #[test]
    fn test_verify_detects_corruption() {
        let mut bytes = hex!("00 00 fb 23 04 d2 00 0a");
        assert!(verify_icmp_ipv4_checksum(&bytes));
        bytes[7] = 0x0b;
        assert!(!verify_icmp_ipv4_checksum(&bytes));
    }
}
