use crate::errors::CoreError;

/// Magic bytes identifying a holdings cache file.
pub const MAGIC: &[u8; 4] = b"HLDC";

/// Current file format version.
pub const CURRENT_VERSION: u16 = 1;

/// Header size in bytes:
/// magic(4) + version(2) + saved_at(8) + payload_len(8) = 22
pub const MIN_HEADER_SIZE: usize = 22;

/// Header read from a cache file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheHeader {
    pub version: u16,
    /// Unix timestamp in milliseconds of the write that produced the file.
    pub saved_at_millis: i64,
    pub payload_len: u64,
}

/// Write a complete cache file to bytes.
///
/// Layout:
/// ```text
/// [HLDC: 4B] [version: 2B LE] [saved_at_millis: 8B LE] [payload_len: 8B LE]
/// [payload: variable, bincode Vec<HoldingRecord>]
/// ```
pub fn write_file(version: u16, saved_at_millis: i64, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MIN_HEADER_SIZE + payload.len());

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&version.to_le_bytes());
    buf.extend_from_slice(&saved_at_millis.to_le_bytes());
    buf.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    buf.extend_from_slice(payload);

    buf
}

/// Parse the header from raw file bytes.
/// Returns the header and the payload slice.
pub fn read_file(data: &[u8]) -> Result<(CacheHeader, &[u8]), CoreError> {
    if data.len() < MIN_HEADER_SIZE {
        return Err(CoreError::InvalidCacheFormat(
            "File too small to be a holdings cache".into(),
        ));
    }

    if &data[0..4] != MAGIC {
        return Err(CoreError::InvalidCacheFormat(
            "Invalid magic bytes, not a holdings cache".into(),
        ));
    }

    let mut offset = 4;

    let version = u16::from_le_bytes([data[offset], data[offset + 1]]);
    offset += 2;

    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let saved_at_millis = i64::from_le_bytes(
        data[offset..offset + 8].try_into().map_err(|_| {
            CoreError::InvalidCacheFormat("Failed to read saved_at".into())
        })?,
    );
    offset += 8;

    let payload_len = u64::from_le_bytes(
        data[offset..offset + 8].try_into().map_err(|_| {
            CoreError::InvalidCacheFormat("Failed to read payload length".into())
        })?,
    );
    offset += 8;

    let available = (data.len() - offset) as u64;
    if available < payload_len {
        return Err(CoreError::InvalidCacheFormat(format!(
            "File truncated: expected {payload_len} bytes of payload, got {available}"
        )));
    }

    let payload = &data[offset..offset + payload_len as usize];

    let header = CacheHeader {
        version,
        saved_at_millis,
        payload_len,
    };

    Ok((header, payload))
}
