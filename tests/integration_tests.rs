//! Integration tests using a mock query endpoint
//!
//! Exercises the full flow per report: fixed query payload → HTTP POST →
//! result-document decoding → typed rows.

use nijz_vaccinations::query;
use nijz_vaccinations::{DashboardClient, DashboardClientConfig, Error};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Midnight UTC, epoch milliseconds
const DEC_26: i64 = 1_608_940_800_000;
const DEC_27: i64 = 1_609_027_200_000;
const DEC_30: i64 = 1_609_286_400_000;

fn uniform_doc(dm0: Value) -> Value {
    json!({
        "results": [{
            "result": {
                "data": {
                    "dsr": {
                        "DS": [{ "PH": [{ "DM0": dm0 }] }]
                    }
                }
            }
        }]
    })
}

fn client_for(server: &MockServer) -> DashboardClient {
    let config = DashboardClientConfig::builder()
        .endpoint(format!("{}/public/reports/querydata", server.uri()))
        .build();
    DashboardClient::with_config(config).unwrap()
}

async fn mount_doc(server: &MockServer, doc: Value) {
    Mock::given(method("POST"))
        .and(path("/public/reports/querydata"))
        .and(header(query::RESOURCE_KEY_HEADER, query::RESOURCE_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(doc))
        .mount(server)
        .await;
}

// ============================================================================
// Report round trips
// ============================================================================

#[tokio::test]
async fn test_vaccinations_by_day_end_to_end() {
    let server = MockServer::start().await;
    mount_doc(
        &server,
        uniform_doc(json!([
            { "G0": DEC_26, "X": [{ "M0": 10 }] },
            { "G0": DEC_27, "X": [{ "M0": 520 }, { "M0": 3 }] },
        ])),
    )
    .await;

    let rows = client_for(&server).vaccinations_by_day().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].first_dose, 10);
    assert_eq!(rows[0].second_dose, 0);
    assert_eq!(rows[1].second_dose, 3);
    assert!(rows[0].date < rows[1].date);
}

#[tokio::test]
async fn test_vaccinations_by_age_end_to_end() {
    let server = MockServer::start().await;
    mount_doc(
        &server,
        uniform_doc(json!([
            { "G0": "90+", "X": [{ "C": [41.5, 5_601] }, { "C": [3.2, 430] }] },
        ])),
    )
    .await;

    let rows = client_for(&server).vaccinations_by_age().await.unwrap();
    assert_eq!(rows[0].age_group, "90+");
    assert_eq!(rows[0].count_first, 5_601);
    assert!((rows[0].share_second - 0.032).abs() < 1e-9);
}

#[tokio::test]
async fn test_vaccines_supplied_and_used_end_to_end() {
    let server = MockServer::start().await;
    mount_doc(
        &server,
        uniform_doc(json!([
            { "C": [DEC_26, 9_750], "Ø": 1 },
            { "C": [DEC_27, 505, 9_750] },
            { "C": [DEC_30, 2_049] },
        ])),
    )
    .await;

    let rows = client_for(&server)
        .vaccines_supplied_and_used()
        .await
        .unwrap();
    assert_eq!(rows[0].used, 0);
    assert_eq!(rows[2].supplied, rows[1].supplied);
}

#[tokio::test]
async fn test_vaccines_supplied_by_manufacturer_end_to_end() {
    let server = MockServer::start().await;
    mount_doc(
        &server,
        json!({
            "results": [{
                "result": {
                    "data": {
                        "dsr": {
                            "DS": [{
                                "PH": [
                                    { "DM0": [] },
                                    { "DM1": [
                                        { "C": [DEC_26, 0, 9_750] },
                                        { "R": 2, "C": [DEC_30, 8_190] }
                                    ] }
                                ],
                                "ValueDicts": {
                                    "D0": ["Pfizer-BioNTech", "Moderna", "AstraZeneca"]
                                }
                            }]
                        }
                    }
                }
            }]
        }),
    )
    .await;

    let rows = client_for(&server)
        .vaccines_supplied_by_manufacturer()
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].pfizer, Some(8_190));
    assert_eq!(rows[1].moderna, None);
    assert_eq!(rows[1].az, None);
}

#[tokio::test]
async fn test_vaccinations_by_age_range_90_pairs_both_doses() {
    let server = MockServer::start().await;

    // Dose1 is requested first; the one-shot mock answers it, the fallback
    // answers dose2.
    Mock::given(method("POST"))
        .and(path("/public/reports/querydata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(uniform_doc(json!([
            { "G0": DEC_26, "X": [{ "M0": 3 }] },
            { "G0": DEC_27, "X": [{ "M0": 41 }] },
        ]))))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/public/reports/querydata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(uniform_doc(json!([
            { "G0": DEC_27, "X": [{ "M0": 1 }] },
        ]))))
        .mount(&server)
        .await;

    let pair = client_for(&server)
        .vaccinations_by_age_range_90()
        .await
        .unwrap();
    assert_eq!(pair.dose1.len(), 2);
    assert_eq!(pair.dose2.len(), 1);
    assert!(pair.dose1.len() >= pair.dose2.len());
    assert_eq!(pair.dose2[0].dose, 1);
}

#[tokio::test]
async fn test_vaccinations_by_age_range_covers_every_configured_range() {
    let server = MockServer::start().await;
    mount_doc(
        &server,
        uniform_doc(json!([
            { "G0": DEC_26, "X": [{ "M0": 7 }] },
        ])),
    )
    .await;

    let ranges = client_for(&server)
        .vaccinations_by_age_range()
        .await
        .unwrap();
    let keys: Vec<&str> = ranges.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["75-79", "80-84", "85-89", "90+"]);
    for pair in ranges.values() {
        assert!(pair.dose1.len() >= pair.dose2.len());
    }
}

// ============================================================================
// Failure propagation
// ============================================================================

#[tokio::test]
async fn test_non_success_status_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/public/reports/querydata"))
        .respond_with(ResponseTemplate::new(404).set_body_string("report gone"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .vaccinations_by_day()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_schema_drift_aborts_the_report_call() {
    let server = MockServer::start().await;
    mount_doc(&server, json!({ "results": [{ "result": {} }] })).await;

    let err = client_for(&server)
        .vaccinations_by_region()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnexpectedResponseShape { .. }));
    assert!(err.is_schema_drift());
}
