// year_data BLOB: [version: u8][wincode Vec<YearMax>].
// Undefined maxima are encoded as NaN so the payload stays a plain f64.

use std::collections::BTreeMap;

use wincode::{SchemaRead, SchemaWrite};

pub(super) const YEAR_BLOB_VERSION: u8 = 1;

#[derive(Debug, Clone, SchemaRead, SchemaWrite)]
struct YearMax {
    year: String,
    max_value: f64,
}

pub(super) fn encode_year_maxima(
    by_year: &BTreeMap<String, Option<f64>>,
) -> Result<Vec<u8>, String> {
    let rows: Vec<YearMax> = by_year
        .iter()
        .map(|(year, v)| YearMax {
            year: year.clone(),
            max_value: v.unwrap_or(f64::NAN),
        })
        .collect();
    let payload = wincode::serialize(&rows).map_err(|e| e.to_string())?;
    Ok(with_version_prefix(YEAR_BLOB_VERSION, payload))
}

pub(super) fn decode_year_maxima(bytes: &[u8]) -> Result<BTreeMap<String, Option<f64>>, String> {
    if blob_version(bytes) != YEAR_BLOB_VERSION {
        return Err(format!("unknown year_data version {}", blob_version(bytes)));
    }
    let rows: Vec<YearMax> = wincode::deserialize(&bytes[1..]).map_err(|e| e.to_string())?;
    Ok(rows
        .into_iter()
        .map(|r| {
            let v = r.max_value.is_finite().then_some(r.max_value);
            (r.year, v)
        })
        .collect())
}

fn with_version_prefix(version: u8, payload: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + payload.len());
    out.push(version);
    out.extend_from_slice(&payload);
    out
}

fn blob_version(bytes: &[u8]) -> u8 {
    if bytes.is_empty() { 0 } else { bytes[0] }
}
