/*
[INPUT]:  API key/secret pairs and canonical request payloads
[OUTPUT]: Redacted credentials and HMAC-SHA256 request signatures
[POS]:    Auth layer - credential handling and request signing
[UPDATE]: When credential sources or the signing algorithm change
*/

pub mod credentials;
pub mod signer;

pub use credentials::ApiCredentials;
pub use signer::HmacSigner;
