use heapless::String as HeaplessString;
use serde::Serialize;
use std::hash::Hasher;
use std::str::FromStr;
use twox_hash::XxHash64;

/// Hashes serializable data into an i64 using CBOR serialization and XxHash64.
///
/// This provides a stable hash across different runs and systems by:
/// - Serializing the data to CBOR format (deterministic binary representation)
/// - Using XxHash64 with a fixed seed (0) for consistent hashing
pub fn hash_as_i64<T: Serialize>(data: &T) -> Result<i64, String> {
    let mut hasher = XxHash64::with_seed(0);
    let mut cbor = Vec::new();
    ciborium::ser::into_writer(data, &mut cbor)
        .map_err(|e| format!("Failed to serialize data for hashing: {e}"))?;
    hasher.write(&cbor);
    Ok(hasher.finish() as i64)
}

/// Copies `value` into a bounded string, naming the field on overflow.
pub fn bounded<const N: usize>(field: &str, value: &str) -> Result<HeaplessString<N>, String> {
    HeaplessString::from_str(value)
        .map_err(|_| format!("Value for '{field}' is too long (max {N} chars)"))
}

/// Like [`bounded`] for optional input; blank strings become `None`.
pub fn bounded_opt<const N: usize>(
    field: &str,
    value: Option<&str>,
) -> Result<Option<HeaplessString<N>>, String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => bounded(field, v).map(Some),
        _ => Ok(None),
    }
}
