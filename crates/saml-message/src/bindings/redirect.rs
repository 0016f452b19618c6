//! HTTP-Redirect message encoding (raw DEFLATE + base64).

use base64::Engine;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::{Read, Write};

use crate::error::{SamlError, SamlResult};

use super::{decode_base64, utf8};

/// Upper bound on inflated message size.
pub const MAX_INFLATED_BYTES: usize = 512 * 1024;

/// Deflates and base64-encodes a message.
///
/// # Errors
///
/// Returns [`SamlError::Compression`] if the encoder fails.
pub fn encode(xml: &str) -> SamlResult<String> {
    let compressed = deflate_compress(xml.as_bytes())?;
    Ok(base64::engine::general_purpose::STANDARD.encode(compressed))
}

/// Base64-decodes and inflates a message.
///
/// # Errors
///
/// Returns [`SamlError::Decode`] for invalid base64, a corrupt DEFLATE
/// stream, output over [`MAX_INFLATED_BYTES`], or non-UTF-8 content.
pub fn decode(raw: &str) -> SamlResult<String> {
    let compressed = decode_base64(raw)?;
    utf8(deflate_decompress(&compressed, MAX_INFLATED_BYTES)?)
}

fn deflate_compress(data: &[u8]) -> SamlResult<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| SamlError::Compression(format!("deflate failed: {e}")))?;
    encoder
        .finish()
        .map_err(|e| SamlError::Compression(format!("deflate finish failed: {e}")))
}

fn deflate_decompress(data: &[u8], limit: usize) -> SamlResult<Vec<u8>> {
    let mut decoder = DeflateDecoder::new(data).take(limit as u64 + 1);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| SamlError::Decode(format!("inflate failed: {e}")))?;
    if decompressed.len() > limit {
        return Err(SamlError::Decode(format!(
            "inflated message exceeds {limit} bytes"
        )));
    }
    Ok(decompressed)
}
