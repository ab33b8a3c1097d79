//! Positional navigation and value coercion
//!
//! Every report document nests its row list under the same fixed prefix;
//! only the final data-member segment differs per report. The paths are
//! positional (array indices are part of the contract), so a missing
//! segment means the upstream schema changed and decoding must stop.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

/// Primary result-set rows: `DM0` under the first projection
pub const PRIMARY_ROWS: &str = "results[0].result.data.dsr.DS[0].PH[0].DM0";

/// Secondary result-set rows used by the delta-encoded manufacturer report
pub const MANUFACTURER_ROWS: &str = "results[0].result.data.dsr.DS[0].PH[1].DM1";

/// Manufacturer value dictionary for the delta-encoded report
pub const MANUFACTURER_DICT: &str = "results[0].result.data.dsr.DS[0].ValueDicts.D0";

/// Walk a dot-notation path with positional `[idx]` segments.
///
/// Fails with `UnexpectedResponseShape` naming the longest prefix that
/// could not be resolved, so schema drift reports point at the exact
/// missing segment.
pub fn extract_path<'a>(value: &'a Value, path: &str) -> Result<&'a Value> {
    let mut current = value;
    let mut walked = String::new();

    for part in path.split('.') {
        let (name, index) = match part.find('[') {
            Some(bracket) => {
                let index: usize = part[bracket + 1..part.len() - 1]
                    .parse()
                    .map_err(|_| Error::shape(path))?;
                (&part[..bracket], Some(index))
            }
            None => (part, None),
        };

        if !walked.is_empty() {
            walked.push('.');
        }
        walked.push_str(name);

        if !name.is_empty() {
            current = current.get(name).ok_or_else(|| Error::shape(walked.clone()))?;
        }

        if let Some(index) = index {
            walked.push_str(&format!("[{index}]"));
            current = current.get(index).ok_or_else(|| Error::shape(walked.clone()))?;
        }
    }

    Ok(current)
}

/// Resolve a path that must lead to an array of row elements
pub fn extract_rows<'a>(doc: &'a Value, path: &str) -> Result<&'a Vec<Value>> {
    extract_path(doc, path)?
        .as_array()
        .ok_or_else(|| Error::shape(path))
}

/// Decode a millisecond Unix epoch value into a UTC date-time.
///
/// The backend serializes timestamps either as numbers or as numeric
/// strings; both forms are accepted. No timezone adjustment is applied.
pub fn decode_timestamp(raw: &Value) -> Result<NaiveDateTime> {
    let millis = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| Error::malformed_timestamp(raw.to_string()))?;

    DateTime::from_timestamp_millis(millis as i64)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| Error::malformed_timestamp(raw.to_string()))
}

/// Get a required field of a row element
pub fn element_field<'a>(element: &'a Value, key: &str) -> Result<&'a Value> {
    element
        .get(key)
        .ok_or_else(|| Error::shape(format!("element.{key}")))
}

/// Coerce a raw cell into an integer count
pub fn as_i64(value: &Value, context: &str) -> Result<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| Error::shape(context)),
        Value::String(s) => s.parse::<i64>().map_err(|_| Error::shape(context)),
        _ => Err(Error::shape(context)),
    }
}

/// Coerce a raw cell into a float
pub fn as_f64(value: &Value, context: &str) -> Result<f64> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| Error::shape(context)),
        Value::String(s) => s.parse::<f64>().map_err(|_| Error::shape(context)),
        _ => Err(Error::shape(context)),
    }
}
