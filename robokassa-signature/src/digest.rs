//! Hex digests over UTF-8 preimages.

use robokassa_types::{ConfigError, HashAlgorithm};
use sha2::{Digest, Sha256, Sha384, Sha512};

/// Lowercase hex digest of `preimage` under `algorithm`.
pub fn digest(algorithm: HashAlgorithm, preimage: &str) -> String {
    let bytes = preimage.as_bytes();
    match algorithm {
        HashAlgorithm::Md5 => format!("{:x}", md5::compute(bytes)),
        HashAlgorithm::Sha256 => hex::encode(Sha256::digest(bytes)),
        HashAlgorithm::Sha384 => hex::encode(Sha384::digest(bytes)),
        HashAlgorithm::Sha512 => hex::encode(Sha512::digest(bytes)),
    }
}

/// Like [`digest`], resolving the algorithm from its identifier.
pub fn digest_named(algorithm: &str, preimage: &str) -> Result<String, ConfigError> {
    let algorithm: HashAlgorithm = algorithm.parse()?;
    Ok(digest(algorithm, preimage))
}
