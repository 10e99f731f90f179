/*
[INPUT]:  Secret key and the exact encoded query/body bytes
[OUTPUT]: Lowercase hex HMAC-SHA256 signature
[POS]:    Auth layer - keyed signing for SIGNED endpoints
[UPDATE]: When changing signing algorithm or digest encoding
*/

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Stateless HMAC-SHA256 signer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSigner;

impl HmacSigner {
    /// Sign `payload` with `secret` and return the 64-char lowercase hex digest.
    ///
    /// `payload` must be the byte sequence that goes on the wire, already in
    /// its final parameter order.
    pub fn sign(secret: &str, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}
