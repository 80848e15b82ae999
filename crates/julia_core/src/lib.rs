//! Public library API for decoding and validating flat key/value stream payloads.

/// Payload decoding, schema construction, value parsing, path lookup, and enum codecs.
pub mod stream;
