//! Report decoders
//!
//! One pure function per report. The uniform reports (by-day, by-age,
//! by-region, age-range) share the `G0` group key / `X` series layout; the
//! supply report carries a flat `C` cell array with carry-forward defaults;
//! the delta-encoded manufacturer report run-length-encodes repeated fields
//! behind the `R` discriminator and is decoded as an explicit state machine.

use super::path::{
    as_f64, as_i64, decode_timestamp, element_field, extract_rows, MANUFACTURER_DICT,
    MANUFACTURER_ROWS, PRIMARY_ROWS,
};
use crate::error::{Error, Result};
use crate::types::{
    Manufacturer, VaccinationByAgeRow, VaccinationByDayRow, VaccinationByManufacturerRow,
    VaccinationByRegionRow, VaccinationDose, VaccineSupplyUsage,
};
use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::warn;

/// Marker key flagging a supply record as the first appearance of a shipment
const NEW_SHIPMENT_KEY: &str = "Ø";

// ============================================================================
// Uniform category reports
// ============================================================================

/// Decode daily first/second dose totals.
///
/// Early records predate the second-dose rollout and carry a single series;
/// their second dose is 0.
pub fn vaccinations_by_day(doc: &Value) -> Result<Vec<VaccinationByDayRow>> {
    let rows = extract_rows(doc, PRIMARY_ROWS)?;
    let mut parsed = Vec::with_capacity(rows.len());

    for element in rows {
        let date = decode_timestamp(element_field(element, "G0")?)?;
        let series = element_field(element, "X")?
            .as_array()
            .ok_or_else(|| Error::shape("element.X"))?;

        let first = series
            .first()
            .and_then(|s| s.get("M0"))
            .ok_or_else(|| Error::shape("element.X[0].M0"))?;
        let first_dose = as_i64(first, "element.X[0].M0")?;

        let second_dose = match series.get(1) {
            Some(s) => {
                let m0 = s.get("M0").ok_or_else(|| Error::shape("element.X[1].M0"))?;
                as_i64(m0, "element.X[1].M0")?
            }
            None => 0,
        };

        parsed.push(VaccinationByDayRow {
            date,
            first_dose,
            second_dose,
        });
    }

    Ok(parsed)
}

/// A dose series cell pair: `C[0]` is share*100, `C[1]` is the count
fn dose_pair(series: &[Value], index: usize) -> Result<(i64, f64)> {
    let context = format!("element.X[{index}].C");
    let cells = series
        .get(index)
        .and_then(|s| s.get("C"))
        .and_then(Value::as_array)
        .ok_or_else(|| Error::shape(context.as_str()))?;

    let share = as_f64(
        cells.first().ok_or_else(|| Error::shape(context.as_str()))?,
        &context,
    )? / 100.0;
    let count = as_i64(
        cells.get(1).ok_or_else(|| Error::shape(context.as_str()))?,
        &context,
    )?;
    Ok((count, share))
}

/// Decode per-age-group coverage
pub fn vaccinations_by_age(doc: &Value) -> Result<Vec<VaccinationByAgeRow>> {
    let rows = extract_rows(doc, PRIMARY_ROWS)?;
    let mut parsed = Vec::with_capacity(rows.len());

    for element in rows {
        let g0 = element_field(element, "G0")?;
        let age_group = g0.as_str().map_or_else(|| g0.to_string(), str::to_string);
        let series = element_field(element, "X")?
            .as_array()
            .ok_or_else(|| Error::shape("element.X"))?;

        let (count_first, share_first) = dose_pair(series, 0)?;
        let (count_second, share_second) = dose_pair(series, 1)?;

        parsed.push(VaccinationByAgeRow {
            age_group,
            count_first,
            count_second,
            share_first,
            share_second,
        });
    }

    Ok(parsed)
}

/// Decode per-region coverage
pub fn vaccinations_by_region(doc: &Value) -> Result<Vec<VaccinationByRegionRow>> {
    let rows = extract_rows(doc, PRIMARY_ROWS)?;
    let mut parsed = Vec::with_capacity(rows.len());

    for element in rows {
        let g0 = element_field(element, "G0")?;
        let region = g0.as_str().map_or_else(|| g0.to_string(), str::to_string);
        let series = element_field(element, "X")?
            .as_array()
            .ok_or_else(|| Error::shape("element.X"))?;

        let (count_first, share_first) = dose_pair(series, 0)?;
        let (count_second, share_second) = dose_pair(series, 1)?;

        parsed.push(VaccinationByRegionRow {
            region,
            count_first,
            count_second,
            share_first,
            share_second,
        });
    }

    Ok(parsed)
}

/// Decode one dose time series for a single age range
pub fn vaccinations_by_age_range(doc: &Value) -> Result<Vec<VaccinationDose>> {
    let rows = extract_rows(doc, PRIMARY_ROWS)?;
    let mut parsed = Vec::with_capacity(rows.len());

    for element in rows {
        let date = decode_timestamp(element_field(element, "G0")?)?;
        let m0 = element_field(element, "X")?
            .as_array()
            .and_then(|series| series.first())
            .and_then(|s| s.get("M0"))
            .ok_or_else(|| Error::shape("element.X[0].M0"))?;
        let dose = as_i64(m0, "element.X[0].M0")?;

        parsed.push(VaccinationDose { date, dose });
    }

    Ok(parsed)
}

// ============================================================================
// Supply & usage
// ============================================================================

/// Decode cumulative supplied/used doses.
///
/// A record marked with the shipment sentinel introduces a new delivery:
/// `C[1]` (default 0) is the supplied total and nothing was used yet. For
/// ordinary records the backend omits a cell whose value equals the
/// previous day's, so `used` (`C[1]`) and `supplied` (`C[2]`) each fall
/// back to the last emitted row, never to a global default. The first
/// record must be complete; needing carry-forward there is an input
/// contract violation.
pub fn vaccines_supplied_and_used(doc: &Value) -> Result<Vec<VaccineSupplyUsage>> {
    let rows = extract_rows(doc, PRIMARY_ROWS)?;
    let mut parsed: Vec<VaccineSupplyUsage> = Vec::with_capacity(rows.len());

    for (i, element) in rows.iter().enumerate() {
        let cells = element_field(element, "C")?
            .as_array()
            .ok_or_else(|| Error::shape("element.C"))?;
        let date = decode_timestamp(cells.first().ok_or_else(|| Error::shape("element.C[0]"))?)?;

        let (supplied, used) = if element.get(NEW_SHIPMENT_KEY).is_some() {
            let supplied = match cells.get(1) {
                Some(v) => as_i64(v, "element.C[1]")?,
                None => 0,
            };
            (supplied, 0)
        } else {
            let used = match cells.get(1) {
                Some(v) => as_i64(v, "element.C[1]")?,
                None => carry_forward(&parsed, i, |row| row.used)?,
            };
            let supplied = match cells.get(2) {
                Some(v) => as_i64(v, "element.C[2]")?,
                None => carry_forward(&parsed, i, |row| row.supplied)?,
            };
            (supplied, used)
        };

        parsed.push(VaccineSupplyUsage {
            date,
            supplied,
            used,
        });
    }

    Ok(parsed)
}

fn carry_forward<F>(parsed: &[VaccineSupplyUsage], index: usize, field: F) -> Result<i64>
where
    F: Fn(&VaccineSupplyUsage) -> i64,
{
    parsed
        .last()
        .map(field)
        .ok_or_else(|| Error::shape(format!("{PRIMARY_ROWS}[{index}].C (carry-forward with no prior row)")))
}

// ============================================================================
// Manufacturer supply (delta-encoded)
// ============================================================================

/// Which fields a delta-encoded record omits because they repeat the
/// previous record's
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowDiscriminator {
    /// `R` absent: full record, all three fields present
    Full,
    /// `R` = 1: same date as previous
    SameDate,
    /// `R` = 2: same manufacturer as previous
    SameManufacturer,
    /// `R` = 6: same manufacturer and value as previous
    SameManufacturerAndValue,
}

impl RowDiscriminator {
    fn from_element(element: &Value) -> Result<Self> {
        match element.get("R") {
            None => Ok(Self::Full),
            Some(raw) => {
                let r = raw.as_i64().ok_or_else(|| Error::shape("element.R"))?;
                match r {
                    1 => Ok(Self::SameDate),
                    2 => Ok(Self::SameManufacturer),
                    6 => Ok(Self::SameManufacturerAndValue),
                    other => Err(Error::unknown_discriminator(other)),
                }
            }
        }
    }
}

/// Decoder state threaded through the delta-encoded sequence
#[derive(Debug, Clone, Copy)]
struct DeltaState {
    date: NaiveDateTime,
    manufacturer: Manufacturer,
    value: i64,
}

impl DeltaState {
    /// Full record: all three fields from `C`
    fn full(cells: &[Value]) -> Result<Self> {
        Ok(Self {
            date: decode_timestamp(cell(cells, 0)?)?,
            manufacturer: Manufacturer::from_supply_index(as_i64(cell(cells, 1)?, "element.C[1]")?)?,
            value: as_i64(cell(cells, 2)?, "element.C[2]")?,
        })
    }

    /// `R` = 1: keep the date, read manufacturer and value
    fn same_date(self, cells: &[Value]) -> Result<Self> {
        Ok(Self {
            date: self.date,
            manufacturer: Manufacturer::from_supply_index(as_i64(cell(cells, 0)?, "element.C[0]")?)?,
            value: as_i64(cell(cells, 1)?, "element.C[1]")?,
        })
    }

    /// `R` = 2: keep the manufacturer, read date and value
    fn same_manufacturer(self, cells: &[Value]) -> Result<Self> {
        Ok(Self {
            date: decode_timestamp(cell(cells, 0)?)?,
            manufacturer: self.manufacturer,
            value: as_i64(cell(cells, 1)?, "element.C[1]")?,
        })
    }

    /// `R` = 6: keep manufacturer and value, read the date
    fn same_manufacturer_and_value(self, cells: &[Value]) -> Result<Self> {
        Ok(Self {
            date: decode_timestamp(cell(cells, 0)?)?,
            manufacturer: self.manufacturer,
            value: self.value,
        })
    }

    fn into_row(self) -> VaccinationByManufacturerRow {
        self.manufacturer.supply_row(self.date, self.value)
    }
}

fn cell(cells: &[Value], index: usize) -> Result<&Value> {
    cells
        .get(index)
        .ok_or_else(|| Error::shape(format!("element.C[{index}]")))
}

/// Decode the delta-encoded per-manufacturer supply events.
///
/// Emits one row per element, in input order, with only the resolved
/// manufacturer's field populated. Multiple rows may share a date.
pub fn vaccines_supplied_by_manufacturer(
    doc: &Value,
) -> Result<Vec<VaccinationByManufacturerRow>> {
    let rows = extract_rows(doc, MANUFACTURER_ROWS)?;
    let dict = extract_rows(doc, MANUFACTURER_DICT)?;
    if dict.len() > 3 {
        warn!(
            manufacturers = dict.len(),
            "value dictionary lists more manufacturers than this decoder maps"
        );
    }

    let mut parsed = Vec::with_capacity(rows.len());
    let mut state: Option<DeltaState> = None;

    for (i, element) in rows.iter().enumerate() {
        let cells = element_field(element, "C")?
            .as_array()
            .ok_or_else(|| Error::shape("element.C"))?;

        let next = match RowDiscriminator::from_element(element)? {
            RowDiscriminator::Full => DeltaState::full(cells)?,
            discriminator => {
                let prev = state.ok_or_else(|| {
                    Error::shape(format!(
                        "{MANUFACTURER_ROWS}[{i}] (delta record before any full record)"
                    ))
                })?;
                match discriminator {
                    RowDiscriminator::SameDate => prev.same_date(cells)?,
                    RowDiscriminator::SameManufacturer => prev.same_manufacturer(cells)?,
                    RowDiscriminator::SameManufacturerAndValue => {
                        prev.same_manufacturer_and_value(cells)?
                    }
                    RowDiscriminator::Full => unreachable!("handled above"),
                }
            }
        };

        parsed.push(next.into_row());
        state = Some(next);
    }

    Ok(parsed)
}

// ============================================================================
// Manufacturer supply (cumulative)
// ============================================================================

/// Decode cumulative per-manufacturer supply totals.
///
/// Each element's series holds exactly one entry carrying `M0`; that
/// entry's `I` index picks the manufacturer (1 = moderna, 2 = pfizer,
/// absent = az). Any other index is upstream schema drift and errors
/// instead of being attributed to a default manufacturer.
pub fn vaccines_supplied_by_manufacturer_cumulative(
    doc: &Value,
) -> Result<Vec<VaccinationByManufacturerRow>> {
    let rows = extract_rows(doc, PRIMARY_ROWS)?;
    let mut parsed = Vec::with_capacity(rows.len());

    for element in rows {
        let date = decode_timestamp(element_field(element, "G0")?)?;
        let series = element_field(element, "X")?
            .as_array()
            .ok_or_else(|| Error::shape("element.X"))?;
        let entry = series
            .iter()
            .find(|x| x.get("M0").is_some())
            .ok_or_else(|| Error::shape("element.X[].M0"))?;

        let value = as_i64(element_field(entry, "M0")?, "element.X[].M0")?;
        let manufacturer = match entry.get("I") {
            None => Manufacturer::AstraZeneca,
            Some(raw) => {
                let index = raw.as_i64().ok_or_else(|| Error::shape("element.X[].I"))?;
                match index {
                    1 => Manufacturer::Moderna,
                    2 => Manufacturer::Pfizer,
                    other => return Err(Error::unknown_manufacturer(other)),
                }
            }
        };

        parsed.push(manufacturer.supply_row(date, value));
    }

    Ok(parsed)
}
