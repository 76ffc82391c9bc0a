//! Text-safe tensor codec: `base64(gzip(safetensors))`.
//!
//! Used wherever a tensor has to travel through something that only carries
//! text, e.g. a manifest value or a log line.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use candle_core::safetensors::SliceSafetensors;
use candle_core::{Device, Error, Result, Tensor};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use std::fs;
use std::io::{Read, Write};

/// Name of the single entry inside the safetensors payload.
pub const TENSOR_NAME: &str = "tensor";

pub fn encode(tensor: &Tensor) -> Result<String> {
    let raw = to_safetensors(tensor)?;
    let compressed = compress(&raw)?;
    Ok(STANDARD.encode(compressed))
}

/// Decode onto the CPU.
pub fn decode(text: &str) -> Result<Tensor> {
    decode_on(text, &Device::Cpu)
}

pub fn decode_on(text: &str, device: &Device) -> Result<Tensor> {
    let compressed = STANDARD.decode(text.trim()).map_err(Error::wrap)?;
    let raw = decompress(&compressed)?;
    from_safetensors(&raw, device)
}

/// candle only writes safetensors to a path, so the bytes take a detour
/// through a scratch directory.
pub fn to_safetensors(tensor: &Tensor) -> Result<Vec<u8>> {
    let tensor = tensor.to_device(&Device::Cpu)?.contiguous()?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("tensor.safetensors");
    tensor.save_safetensors(TENSOR_NAME, &path)?;

    Ok(fs::read(&path)?)
}

pub fn from_safetensors(bytes: &[u8], device: &Device) -> Result<Tensor> {
    let st = SliceSafetensors::new(bytes)?;
    st.load(TENSOR_NAME, device)
}

fn compress(bytes: &[u8]) -> Result<Vec<u8>> {
    // flate2 writes mtime 0 into the gzip header, so output is deterministic.
    let mut encoder = GzEncoder::new(Vec::with_capacity(bytes.len() / 2), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
