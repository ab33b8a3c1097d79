//! Fixed query payloads for the analytics endpoint
//!
//! The dashboard backend is a PowerBI "public reports" query service: every
//! report is one `SemanticQueryDataShapeCommand` POSTed to the same
//! endpoint. The payloads here are dashboard-specific configuration, not
//! logic: each builder returns the exact request body for one report.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

/// Public analytics query endpoint
pub const QUERY_ENDPOINT: &str =
    "https://wabi-west-europe-api.analysis.windows.net/public/reports/querydata?synchronous=true";

/// Header carrying the public report's resource key
pub const RESOURCE_KEY_HEADER: &str = "X-PowerBI-ResourceKey";

/// Resource key of the published vaccination dashboard
pub const RESOURCE_KEY: &str = "a1b40a9e-5d6f-4cd9-8f4a-930ab6a550cc";

const DATASET_ID: &str = "7b40529e-a50e-4dd3-8fe8-997894b4cdaa";
const REPORT_ID: &str = "b201281d-b2e7-4470-9f4e-0b3063794c76";
const MODEL_ID: i64 = 159824;

// ============================================================================
// Envelope helpers
// ============================================================================

/// Wrap one command into the endpoint's query envelope
fn envelope(command: Value) -> Value {
    json!({
        "version": "1.0.0",
        "queries": [{
            "Query": { "Commands": [command] },
            "CacheKey": "",
            "QueryId": "",
            "ApplicationContext": {
                "DatasetId": DATASET_ID,
                "Sources": [{ "ReportId": REPORT_ID }]
            }
        }],
        "cancelQueries": [],
        "modelId": MODEL_ID
    })
}

fn shape_command(query: Value, binding: Value) -> Value {
    json!({
        "SemanticQueryDataShapeCommand": {
            "Query": query,
            "Binding": binding
        }
    })
}

fn column(source: &str, property: &str) -> Value {
    json!({
        "Column": {
            "Expression": { "SourceRef": { "Source": source } },
            "Property": property
        }
    })
}

fn measure(source: &str, property: &str) -> Value {
    json!({
        "Measure": {
            "Expression": { "SourceRef": { "Source": source } },
            "Property": property
        }
    })
}

fn select(expression: Value, name: &str) -> Value {
    let mut expr = expression;
    expr["Name"] = json!(name);
    expr
}

fn grouped_binding(projections: &[i64]) -> Value {
    json!({
        "Primary": { "Groupings": [{ "Projections": projections }] },
        "Version": 1
    })
}

// ============================================================================
// Per-report payloads
// ============================================================================

/// Daily first/second dose running totals
pub fn vaccinations_by_day() -> Value {
    envelope(shape_command(
        json!({
            "Version": 2,
            "From": [{ "Name": "c", "Entity": "eRCO_podatki", "Type": 0 }],
            "Select": [
                select(column("c", "Datum"), "eRCO_podatki.Datum"),
                select(
                    measure("c", "Tekoča vsota za mero Precepljenost v polju Datum"),
                    "eRCO_podatki.Precepljenost_1"
                ),
                select(
                    measure("c", "Tekoča vsota za mero Precepljenost2 v polju Datum"),
                    "eRCO_podatki.Precepljenost_2"
                ),
            ],
            "OrderBy": [{ "Direction": 1, "Expression": column("c", "Datum") }]
        }),
        grouped_binding(&[0, 1, 2]),
    ))
}

/// First/second dose counts and shares per age group
pub fn vaccinations_by_age() -> Value {
    envelope(shape_command(
        json!({
            "Version": 2,
            "From": [{ "Name": "c", "Entity": "eRCO_podatki", "Type": 0 }],
            "Select": [
                select(column("c", "Starostni razred"), "eRCO_podatki.Starostni razred"),
                select(measure("c", "Delež cepljenih 1"), "eRCO_podatki.Delež_1"),
                select(measure("c", "Št. cepljenih 1"), "eRCO_podatki.Število_1"),
                select(measure("c", "Delež cepljenih 2"), "eRCO_podatki.Delež_2"),
                select(measure("c", "Št. cepljenih 2"), "eRCO_podatki.Število_2"),
            ],
            "OrderBy": [{ "Direction": 1, "Expression": column("c", "Starostni razred") }]
        }),
        grouped_binding(&[0, 1, 2, 3, 4]),
    ))
}

/// Cumulative supplied and used doses per day
pub fn vaccines_supplied_and_used() -> Value {
    envelope(shape_command(
        json!({
            "Version": 2,
            "From": [
                { "Name": "c", "Entity": "eRCO_podatki", "Type": 0 },
                { "Name": "d", "Entity": "eRCO_dobave", "Type": 0 }
            ],
            "Select": [
                select(column("c", "Datum"), "eRCO_podatki.Datum"),
                select(
                    measure("c", "Tekoča vsota za mero Skupaj cepljenja v polju Datum"),
                    "eRCO_podatki.Porabljeno"
                ),
                select(
                    measure("d", "Tekoča vsota za mero Skupna dobava v polju Datum"),
                    "eRCO_dobave.Dobavljeno"
                ),
            ],
            "OrderBy": [{ "Direction": 1, "Expression": column("c", "Datum") }]
        }),
        grouped_binding(&[0, 1, 2]),
    ))
}

/// First/second dose counts and shares per administrative region
pub fn vaccinations_by_region() -> Value {
    envelope(shape_command(
        json!({
            "Version": 2,
            "From": [{ "Name": "c", "Entity": "eRCO_podatki", "Type": 0 }],
            "Select": [
                select(column("c", "Regija"), "eRCO_podatki.Regija"),
                select(measure("c", "Delež cepljenih 1"), "eRCO_podatki.Delež_1"),
                select(measure("c", "Št. cepljenih 1"), "eRCO_podatki.Število_1"),
                select(measure("c", "Delež cepljenih 2"), "eRCO_podatki.Delež_2"),
                select(measure("c", "Št. cepljenih 2"), "eRCO_podatki.Število_2"),
            ],
            "OrderBy": [{ "Direction": 1, "Expression": column("c", "Regija") }]
        }),
        grouped_binding(&[0, 1, 2, 3, 4]),
    ))
}

/// Per-manufacturer supply events (delta-encoded by the backend)
pub fn vaccines_supplied_by_manufacturer() -> Value {
    envelope(shape_command(
        json!({
            "Version": 2,
            "From": [{ "Name": "d", "Entity": "eRCO_dobave", "Type": 0 }],
            "Select": [
                select(column("d", "Datum"), "eRCO_dobave.Datum"),
                select(column("d", "Proizvajalec"), "eRCO_dobave.Proizvajalec"),
                select(measure("d", "Skupna dobava"), "eRCO_dobave.Dobava"),
            ],
            "OrderBy": [{ "Direction": 1, "Expression": column("d", "Datum") }]
        }),
        json!({
            "Primary": { "Groupings": [{ "Projections": [0] }] },
            "Secondary": { "Groupings": [{ "Projections": [1] }] },
            "Projections": [2],
            "Version": 1
        }),
    ))
}

/// Cumulative per-manufacturer supply totals per day
pub fn vaccines_supplied_by_manufacturer_cumulative() -> Value {
    envelope(shape_command(
        json!({
            "Version": 2,
            "From": [{ "Name": "d", "Entity": "eRCO_dobave", "Type": 0 }],
            "Select": [
                select(column("d", "Datum"), "eRCO_dobave.Datum"),
                select(column("d", "Proizvajalec"), "eRCO_dobave.Proizvajalec"),
                select(
                    measure("d", "Tekoča vsota za mero Skupna dobava v polju Datum"),
                    "eRCO_dobave.Dobava_kum"
                ),
            ],
            "OrderBy": [{ "Direction": 1, "Expression": column("d", "Datum") }]
        }),
        grouped_binding(&[0, 1, 2]),
    ))
}

// ============================================================================
// Age-range requests
// ============================================================================

/// Dose time-series request for one age range
///
/// `dose` selects the per-dose running-total measure (1 or 2); the range is
/// applied as an `In` filter on the age-group column.
fn age_range_dose(range: &str, dose: u8) -> Value {
    let dose_measure = match dose {
        1 => "Tekoča vsota za mero Precepljenost v polju Datum",
        _ => "Tekoča vsota za mero Precepljenost2 v polju Datum",
    };

    envelope(shape_command(
        json!({
            "Version": 2,
            "From": [{ "Name": "c", "Entity": "eRCO_podatki", "Type": 0 }],
            "Select": [
                select(column("c", "Datum"), "eRCO_podatki.Datum"),
                select(measure("c", dose_measure), format!("eRCO_podatki.Doza_{dose}").as_str()),
            ],
            "Where": [{
                "Condition": {
                    "In": {
                        "Expressions": [column("c", "Starostni razred")],
                        "Values": [[{ "Literal": { "Value": format!("'{range}'") } }]]
                    }
                }
            }],
            "OrderBy": [{ "Direction": 1, "Expression": column("c", "Datum") }]
        }),
        grouped_binding(&[0, 1]),
    ))
}

/// First-dose request for one age range
pub fn age_range_dose1(range: &str) -> Value {
    age_range_dose(range, 1)
}

/// Second-dose request for one age range
pub fn age_range_dose2(range: &str) -> Value {
    age_range_dose(range, 2)
}

/// Fixed table of (range key → dose1/dose2 request descriptors)
///
/// Drives the aggregate by-age-range report; extending coverage to a new
/// bracket means adding its key here.
pub static AGE_RANGE_REQUESTS: Lazy<Vec<(&'static str, (Value, Value))>> = Lazy::new(|| {
    ["75-79", "80-84", "85-89", "90+"]
        .into_iter()
        .map(|range| (range, (age_range_dose1(range), age_range_dose2(range))))
        .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let payload = vaccinations_by_day();
        assert_eq!(payload["version"], "1.0.0");
        assert_eq!(payload["modelId"], MODEL_ID);
        assert_eq!(payload["queries"].as_array().unwrap().len(), 1);
        assert_eq!(
            payload["queries"][0]["ApplicationContext"]["DatasetId"],
            DATASET_ID
        );
        assert!(payload["queries"][0]["Query"]["Commands"][0]
            .get("SemanticQueryDataShapeCommand")
            .is_some());
    }

    #[test]
    fn test_age_range_filter_targets_requested_range() {
        let payload = age_range_dose1("90+");
        let condition = &payload["queries"][0]["Query"]["Commands"][0]
            ["SemanticQueryDataShapeCommand"]["Query"]["Where"][0]["Condition"];
        assert_eq!(condition["In"]["Values"][0][0]["Literal"]["Value"], "'90+'");
    }

    #[test]
    fn test_age_range_doses_differ_only_in_measure() {
        let dose1 = age_range_dose1("85-89");
        let dose2 = age_range_dose2("85-89");
        assert_ne!(dose1, dose2);
    }

    #[test]
    fn test_age_range_table_is_ordered_and_complete() {
        let keys: Vec<&str> = AGE_RANGE_REQUESTS.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["75-79", "80-84", "85-89", "90+"]);
    }
}
