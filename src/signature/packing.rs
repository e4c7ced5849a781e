//! Byte-level primitives composed by the X-Bogus signer
//!
//! Every function here works on explicit byte sequences. Strings only enter
//! through [`latin1_bytes`] / [`str_to_array`] and only leave through the
//! alphabet encoder.

use super::error::{Result, SignatureError};

/// Length of an MD5 digest rendered as lowercase hex.
pub const HEX_DIGEST_LEN: usize = 32;

/// Output alphabet of the 4-char encoder (6 bits per character).
pub const ALPHABET: &[u8; 64] = b"Dkdpgh4ZKsQB80/Mfvw36XI1R25-WUAlEi7NLboqYTOPuzmFjJnryx9HVGcaStCe";

const UNMAPPED: u8 = 0xff;

/// Nibble values for ASCII `0-9` and `a-f`. Uppercase hex is deliberately unmapped.
static HEX_NIBBLES: [u8; 128] = build_nibble_table();

const fn build_nibble_table() -> [u8; 128] {
    let mut table = [UNMAPPED; 128];
    let mut i = 0;
    while i < 10 {
        table[b'0' as usize + i] = i as u8;
        i += 1;
    }
    let mut i = 0;
    while i < 6 {
        table[b'a' as usize + i] = 10 + i as u8;
        i += 1;
    }
    table
}

/// Look up the 4-bit value of a hex digit, `None` for anything unmapped.
pub fn hex_nibble(c: char) -> Option<u8> {
    let code = c as u32;
    if code >= 128 {
        return None;
    }
    match HEX_NIBBLES[code as usize] {
        UNMAPPED => None,
        value => Some(value),
    }
}

/// Decode a string of hex pairs, `None` if any character is unmapped or the
/// length is odd.
pub fn decode_hex_pairs(input: &str) -> Option<Vec<u8>> {
    let chars: Vec<char> = input.chars().collect();
    if chars.len() % 2 != 0 {
        return None;
    }

    chars
        .chunks_exact(2)
        .map(|pair| Some((hex_nibble(pair[0])? << 4) | hex_nibble(pair[1])?))
        .collect()
}

/// Encode a string as ISO-8859-1, one byte per character.
pub fn latin1_bytes(input: &str) -> Result<Vec<u8>> {
    input
        .chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(|| SignatureError::NonLatin1 {
            input: input.to_string(),
        })
}

/// Convert a string into the integer array the signer hashes.
///
/// Strings of at most 32 characters are hex-decoded pair by pair; longer
/// strings map each character to its ordinal. Short strings that are not
/// valid lowercase hex also fall back to ordinals.
pub fn str_to_array(input: &str) -> Result<Vec<u8>> {
    if input.chars().count() <= HEX_DIGEST_LEN {
        if let Some(bytes) = decode_hex_pairs(input) {
            return Ok(bytes);
        }
    }
    latin1_bytes(input)
}

/// Lowercase hex MD5 of raw bytes.
pub fn md5_hex(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}

/// MD5 of a string after [`str_to_array`] conversion.
pub fn md5_str(input: &str) -> Result<String> {
    Ok(md5_hex(&str_to_array(input)?))
}

/// Hex-decode an MD5 hex digest into its 16 integers.
pub fn digest_array(hex: &str) -> Result<[u8; 16]> {
    decode_hex_pairs(hex)
        .and_then(|bytes| <[u8; 16]>::try_from(bytes).ok())
        .ok_or_else(|| SignatureError::InvalidDigest(hex.to_string()))
}

/// RC4 keystream state. Consumed by [`Rc4::apply`], so a state is never
/// reused across two messages.
#[derive(Clone)]
pub struct Rc4 {
    state: [u8; 256],
    i: u8,
    j: u8,
}

impl Rc4 {
    /// Run the key schedule. The key is used cyclically.
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.is_empty() {
            return Err(SignatureError::EmptyKey);
        }

        let mut state = [0u8; 256];
        for (idx, slot) in state.iter_mut().enumerate() {
            *slot = idx as u8;
        }

        let mut j = 0u8;
        for i in 0..256 {
            j = j.wrapping_add(state[i]).wrapping_add(key[i % key.len()]);
            state.swap(i, j as usize);
        }

        Ok(Self { state, i: 0, j: 0 })
    }

    /// XOR `data` with the keystream.
    pub fn apply(mut self, data: &[u8]) -> Vec<u8> {
        data.iter().map(|&byte| byte ^ self.next_byte()).collect()
    }

    fn next_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.state[self.i as usize]);
        self.state.swap(self.i as usize, self.j as usize);
        let idx = self.state[self.i as usize].wrapping_add(self.state[self.j as usize]);
        self.state[idx as usize]
    }
}

/// One-shot RC4 with a fresh state.
pub fn rc4_encrypt(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    Ok(Rc4::new(key)?.apply(data))
}

/// Pack three bytes into 24 bits and emit four alphabet characters.
pub fn encode_triple(a1: u8, a2: u8, a3: u8) -> [u8; 4] {
    let packed = (u32::from(a1) << 16) | (u32::from(a2) << 8) | u32::from(a3);
    [
        ALPHABET[((packed >> 18) & 0x3f) as usize],
        ALPHABET[((packed >> 12) & 0x3f) as usize],
        ALPHABET[((packed >> 6) & 0x3f) as usize],
        ALPHABET[(packed & 0x3f) as usize],
    ]
}

/// Encode a buffer made of whole 3-byte groups.
pub fn encode_groups(data: &[u8]) -> Result<String> {
    if data.len() % 3 != 0 {
        return Err(SignatureError::Assembly { len: data.len() });
    }

    let mut out = String::with_capacity(data.len() / 3 * 4);
    for group in data.chunks_exact(3) {
        out.extend(encode_triple(group[0], group[1], group[2]).map(char::from));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reverse_alphabet() -> [u8; 256] {
        let mut reverse = [0u8; 256];
        for (pos, &c) in ALPHABET.iter().enumerate() {
            reverse[c as usize] = pos as u8;
        }
        reverse
    }

    fn decode_quad(reverse: &[u8; 256], quad: [u8; 4]) -> u32 {
        quad.iter()
            .fold(0u32, |acc, &c| (acc << 6) | u32::from(reverse[c as usize]))
    }

    #[test]
    fn test_hex_nibble_table() {
        assert_eq!(hex_nibble('0'), Some(0));
        assert_eq!(hex_nibble('9'), Some(9));
        assert_eq!(hex_nibble('a'), Some(10));
        assert_eq!(hex_nibble('f'), Some(15));
        assert_eq!(hex_nibble('A'), None);
        assert_eq!(hex_nibble('g'), None);
        assert_eq!(hex_nibble('\u{00ff}'), None);
        assert_eq!(hex_nibble('中'), None);
    }

    #[test]
    fn test_str_to_array_hex_branch() {
        let array = str_to_array("d41d8cd98f00b204e9800998ecf8427e").unwrap();
        assert_eq!(
            array,
            vec![212, 29, 140, 217, 143, 0, 178, 4, 233, 128, 9, 152, 236, 248, 66, 126]
        );
    }

    #[test]
    fn test_str_to_array_ordinal_branch() {
        let input = "d41d8cd98f00b204e9800998ecf8427e0";
        let array = str_to_array(input).unwrap();
        assert_eq!(array.len(), 33);
        assert_eq!(array, input.as_bytes());
    }

    #[test]
    fn test_str_to_array_short_non_hex_uses_ordinals() {
        assert_eq!(str_to_array("aweme_id=123").unwrap(), b"aweme_id=123".to_vec());
        assert_eq!(str_to_array("abc").unwrap(), b"abc".to_vec());
    }

    #[test]
    fn test_str_to_array_rejects_non_latin1() {
        let result = str_to_array("视频");
        assert!(matches!(result, Err(SignatureError::NonLatin1 { .. })));
    }

    #[test]
    fn test_digest_array_both_branches_have_16_entries() {
        let short = digest_array(&md5_str("d41d8cd98f00b204e9800998ecf8427e").unwrap()).unwrap();
        let long = digest_array(&md5_str(&"x".repeat(40)).unwrap()).unwrap();
        assert_eq!(short.len(), 16);
        assert_eq!(long.len(), 16);
        assert_ne!(short, long);
    }

    #[test]
    fn test_digest_array_rejects_non_digest() {
        assert!(digest_array("abcd").is_err());
        assert!(digest_array("zz1d8cd98f00b204e9800998ecf8427e").is_err());
    }

    #[test]
    fn test_rc4_known_vector() {
        let out = rc4_encrypt(b"Key", b"Plaintext").unwrap();
        assert_eq!(out, vec![0xbb, 0xf3, 0x16, 0xe8, 0xd9, 0x40, 0xaf, 0x0a, 0xd3]);
    }

    #[test]
    fn test_rc4_is_its_own_inverse() {
        let key = [0x00, 0x01, 0x0c];
        let plain = b"Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_vec();
        let cipher = rc4_encrypt(&key, &plain).unwrap();
        assert_ne!(cipher, plain);
        assert_eq!(rc4_encrypt(&key, &cipher).unwrap(), plain);
    }

    #[test]
    fn test_rc4_rejects_empty_key() {
        assert!(matches!(Rc4::new(&[]), Err(SignatureError::EmptyKey)));
    }

    #[test]
    fn test_encode_triple_vectors() {
        assert_eq!(&encode_triple(0, 0, 0), b"DDDD");
        assert_eq!(&encode_triple(255, 255, 255), b"eeee");
        assert_eq!(&encode_triple(2, 255, 0x41), b"DFtk");
    }

    #[test]
    fn test_encode_triple_is_injective() {
        let reverse = reverse_alphabet();
        for packed in 0u32..(1 << 24) {
            let quad = encode_triple((packed >> 16) as u8, (packed >> 8) as u8, packed as u8);
            assert_eq!(decode_quad(&reverse, quad), packed);
        }
    }

    #[test]
    fn test_encode_groups_rejects_partial_group() {
        assert!(matches!(
            encode_groups(&[1u8; 20]),
            Err(SignatureError::Assembly { len: 20 })
        ));
        assert_eq!(encode_groups(&[0u8; 6]).unwrap(), "DDDDDDDD");
    }
}
