use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use time::OffsetDateTime;
use tracing::trace;

use super::error::Result;
use super::packing::{
    digest_array, encode_groups, latin1_bytes, md5_hex, md5_str, rc4_encrypt, str_to_array,
};

/// Constant mixed into every token alongside the timestamp.
pub const FIXED_CONSTANT: u32 = 536_919_696;

const UA_KEY: [u8; 3] = [0x00, 0x01, 0x0c];

/// `"Ã¿"` as ISO-8859-1 bytes.
const GARBLE_KEY: [u8; 2] = [0xc3, 0xbf];

const GARBLE_PREFIX: [u8; 2] = [2, 255];

/// MD5 of the empty input, hashed again to form the constant digest.
const EMPTY_MD5_HEX: &str = "d41d8cd98f00b204e9800998ecf8427e";

/// Leading fields. The second one is 0.00390625 cast to an integer.
const HEADER: [u8; 4] = [64, 0, 1, 12];

const FIELD_COUNT: usize = 19;

/// Position `k` of the encoded string takes element `REORDER[k]` of the
/// evens-then-odds sequence.
const REORDER: [usize; FIELD_COUNT] = [0, 10, 1, 11, 2, 12, 3, 13, 4, 14, 5, 15, 6, 16, 7, 17, 8, 18, 9];

/// A query string with its `X-Bogus` token appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedQuery {
    /// `<query>&X-Bogus=<token>`
    pub query: String,
    pub token: String,
}

/// X-Bogus signer bound to one user agent.
///
/// The user-agent digest and the constant digest are computed once; signing
/// a query is pure CPU work and never suspends.
#[derive(Debug, Clone)]
pub struct XBogus {
    user_agent: String,
    ua_digest: [u8; 16],
    const_digest: [u8; 16],
}

impl XBogus {
    /// Prepare a signer. Fails if the user agent is not ISO-8859-1.
    pub fn new(user_agent: impl Into<String>) -> Result<Self> {
        let user_agent = user_agent.into();

        let ua_cipher = rc4_encrypt(&UA_KEY, &latin1_bytes(&user_agent)?)?;
        let ua_digest = digest_array(&md5_str(&BASE64.encode(ua_cipher))?)?;
        let const_digest = digest_array(&md5_hex(&str_to_array(EMPTY_MD5_HEX)?))?;

        Ok(Self {
            user_agent,
            ua_digest,
            const_digest,
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Sign `query` with the current wall-clock second.
    pub fn sign(&self, query: &str) -> Result<SignedQuery> {
        self.sign_at(query, OffsetDateTime::now_utc().unix_timestamp())
    }

    /// Sign `query` as if the clock read `unix_seconds`.
    pub fn sign_at(&self, query: &str, unix_seconds: i64) -> Result<SignedQuery> {
        let param_digest = query_digest(query)?;
        let fields = self.assemble_fields(&param_digest, unix_seconds);

        let interleaved = interleave(&fields);
        let reordered: Vec<u8> = REORDER.iter().map(|&idx| interleaved[idx]).collect();

        let mut garbled = GARBLE_PREFIX.to_vec();
        garbled.extend(rc4_encrypt(&GARBLE_KEY, &reordered)?);

        let token = encode_groups(&garbled)?;
        trace!(unix_seconds, %token, "Computed X-Bogus token");

        Ok(SignedQuery {
            query: format!("{query}&X-Bogus={token}"),
            token,
        })
    }

    /// The 18 signed fields followed by their XOR checksum.
    fn assemble_fields(&self, param_digest: &[u8; 16], unix_seconds: i64) -> [u8; FIELD_COUNT] {
        let mut fields = [0u8; FIELD_COUNT];
        fields[..4].copy_from_slice(&HEADER);
        fields[4] = param_digest[14];
        fields[5] = param_digest[15];
        fields[6] = self.const_digest[14];
        fields[7] = self.const_digest[15];
        fields[8] = self.ua_digest[14];
        fields[9] = self.ua_digest[15];
        // Only the low 32 bits of the timestamp are signed.
        fields[10..14].copy_from_slice(&(unix_seconds as u32).to_be_bytes());
        fields[14..18].copy_from_slice(&FIXED_CONSTANT.to_be_bytes());
        fields[18] = fields[..18].iter().fold(0, |acc, &b| acc ^ b);
        fields
    }
}

/// Two MD5 rounds over the query string.
fn query_digest(query: &str) -> Result<[u8; 16]> {
    let first = digest_array(&md5_str(query)?)?;
    digest_array(&md5_hex(&first))
}

/// Even-indexed elements followed by odd-indexed elements.
fn interleave(fields: &[u8; FIELD_COUNT]) -> [u8; FIELD_COUNT] {
    let mut out = [0u8; FIELD_COUNT];
    let evens = fields.iter().step_by(2);
    let odds = fields.iter().skip(1).step_by(2);
    for (slot, &value) in out.iter_mut().zip(evens.chain(odds)) {
        *slot = value;
    }
    out
}
