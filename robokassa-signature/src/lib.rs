//! # Robokassa Signature
//!
//! Computes and verifies the digests that authenticate payment URLs and
//! ResultURL callbacks. Everything here is a pure function of its inputs.
//!
//! The preimage is a `:`-joined list of transaction fields, the shared
//! secret, and the sorted `key=value` custom data pairs:
//!
//! - payment URL: `MerchantLogin:OutSum:InvId[:OutSumCurrency]:Password1[:Shp_k=v...]`
//! - ResultURL:   `OutSum[:InvId]:Password2[:Shp_k=v...]`

pub mod digest;
pub mod engine;

pub use digest::{digest, digest_named};
pub use engine::{
    DELIMITER, SignatureEngine, inbound_preimage, outbound_preimage, signatures_match,
    signing_pairs,
};
