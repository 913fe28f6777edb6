//! Row decoding shared by the repositories.

use commission_core_db::utils::bounded;
use heapless::String as HeaplessString;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

/// Decode a model from a fetched row.
pub trait TryFromRow<R>: Sized {
    fn try_from_row(row: &R) -> Result<Self, Box<dyn Error + Send + Sync>>;
}

/// Read a text column into a bounded string. Column widths equal the model
/// bounds, so an overflow means schema and model disagree.
pub fn get_heapless_string<const N: usize>(
    row: &PgRow,
    column: &str,
) -> Result<HeaplessString<N>, Box<dyn Error + Send + Sync>> {
    let value: String = row.try_get(column)?;
    Ok(bounded(column, &value)?)
}

/// Nullable variant of [`get_heapless_string`]. Stored text is kept as is,
/// blank values are not folded into `None`.
pub fn get_optional_heapless_string<const N: usize>(
    row: &PgRow,
    column: &str,
) -> Result<Option<HeaplessString<N>>, Box<dyn Error + Send + Sync>> {
    let value: Option<String> = row.try_get(column)?;
    Ok(value.map(|text| bounded(column, &text)).transpose()?)
}
