//! Public report surface
//!
//! One function per published report, each a single fetch-and-decode pass:
//! POST the report's fixed query payload, validate the HTTP outcome, and
//! run the matching decoder over the JSON body. Nothing is cached or
//! retried; every call returns a fresh snapshot.
//!
//! Reports exist both as methods on [`DashboardClient`] (reuse one client
//! across calls) and as free functions that construct a default client.

use crate::decode;
use crate::error::Result;
use crate::http::{DashboardClient, QueryOptions};
use crate::query;
use crate::types::{
    VaccinationByAgeRange, VaccinationByAgeRow, VaccinationByDayRow,
    VaccinationByManufacturerRow, VaccinationByRegionRow, VaccineSupplyUsage,
};
use serde_json::Value;
use std::collections::BTreeMap;

/// Fetch one report: send `payload`, then apply `decode_fn` to the body.
///
/// Decoder errors propagate unchanged; a non-success HTTP outcome fails the
/// whole call. This is the crate's only I/O path; decoders themselves
/// never touch the network.
pub async fn fetch_report<T, F>(
    client: &DashboardClient,
    payload: &Value,
    decode_fn: F,
) -> Result<Vec<T>>
where
    F: FnOnce(&Value) -> Result<Vec<T>>,
{
    fetch_report_with_options(client, payload, &QueryOptions::default(), decode_fn).await
}

/// Fetch one report with a per-call deadline and extra headers
pub async fn fetch_report_with_options<T, F>(
    client: &DashboardClient,
    payload: &Value,
    options: &QueryOptions,
    decode_fn: F,
) -> Result<Vec<T>>
where
    F: FnOnce(&Value) -> Result<Vec<T>>,
{
    let doc = client.post_query_with_options(payload, options).await?;
    decode_fn(&doc)
}

impl DashboardClient {
    /// Daily first/second dose administration totals
    pub async fn vaccinations_by_day(&self) -> Result<Vec<VaccinationByDayRow>> {
        fetch_report(
            self,
            &query::vaccinations_by_day(),
            decode::vaccinations_by_day,
        )
        .await
    }

    /// Coverage counts and shares per age group
    pub async fn vaccinations_by_age(&self) -> Result<Vec<VaccinationByAgeRow>> {
        fetch_report(
            self,
            &query::vaccinations_by_age(),
            decode::vaccinations_by_age,
        )
        .await
    }

    /// Cumulative supplied and used doses per day
    pub async fn vaccines_supplied_and_used(&self) -> Result<Vec<VaccineSupplyUsage>> {
        fetch_report(
            self,
            &query::vaccines_supplied_and_used(),
            decode::vaccines_supplied_and_used,
        )
        .await
    }

    /// Coverage counts and shares per administrative region
    pub async fn vaccinations_by_region(&self) -> Result<Vec<VaccinationByRegionRow>> {
        fetch_report(
            self,
            &query::vaccinations_by_region(),
            decode::vaccinations_by_region,
        )
        .await
    }

    /// Per-manufacturer supply events, one row per event
    pub async fn vaccines_supplied_by_manufacturer(
        &self,
    ) -> Result<Vec<VaccinationByManufacturerRow>> {
        fetch_report(
            self,
            &query::vaccines_supplied_by_manufacturer(),
            decode::vaccines_supplied_by_manufacturer,
        )
        .await
    }

    /// Cumulative per-manufacturer supply totals
    pub async fn vaccines_supplied_by_manufacturer_cumulative(
        &self,
    ) -> Result<Vec<VaccinationByManufacturerRow>> {
        fetch_report(
            self,
            &query::vaccines_supplied_by_manufacturer_cumulative(),
            decode::vaccines_supplied_by_manufacturer_cumulative,
        )
        .await
    }

    /// Paired dose1/dose2 time series for the "90+" age range
    pub async fn vaccinations_by_age_range_90(&self) -> Result<VaccinationByAgeRange> {
        self.age_range_pair(&query::age_range_dose1("90+"), &query::age_range_dose2("90+"))
            .await
    }

    /// Paired dose1/dose2 time series for every configured age range,
    /// keyed by the range label
    pub async fn vaccinations_by_age_range(
        &self,
    ) -> Result<BTreeMap<String, VaccinationByAgeRange>> {
        let mut ranges = BTreeMap::new();
        for (key, (dose1_payload, dose2_payload)) in query::AGE_RANGE_REQUESTS.iter() {
            let pair = self.age_range_pair(dose1_payload, dose2_payload).await?;
            ranges.insert((*key).to_string(), pair);
        }
        Ok(ranges)
    }

    async fn age_range_pair(
        &self,
        dose1_payload: &Value,
        dose2_payload: &Value,
    ) -> Result<VaccinationByAgeRange> {
        let dose1 = fetch_report(self, dose1_payload, decode::vaccinations_by_age_range).await?;
        let dose2 = fetch_report(self, dose2_payload, decode::vaccinations_by_age_range).await?;
        Ok(VaccinationByAgeRange { dose1, dose2 })
    }
}

// ============================================================================
// Free convenience functions
// ============================================================================

/// Fetch daily first/second dose totals with a default client
pub async fn vaccinations_by_day() -> Result<Vec<VaccinationByDayRow>> {
    DashboardClient::new().vaccinations_by_day().await
}

/// Fetch per-age-group coverage with a default client
pub async fn vaccinations_by_age() -> Result<Vec<VaccinationByAgeRow>> {
    DashboardClient::new().vaccinations_by_age().await
}

/// Fetch cumulative supplied/used doses with a default client
pub async fn vaccines_supplied_and_used() -> Result<Vec<VaccineSupplyUsage>> {
    DashboardClient::new().vaccines_supplied_and_used().await
}

/// Fetch per-region coverage with a default client
pub async fn vaccinations_by_region() -> Result<Vec<VaccinationByRegionRow>> {
    DashboardClient::new().vaccinations_by_region().await
}

/// Fetch per-manufacturer supply events with a default client
pub async fn vaccines_supplied_by_manufacturer() -> Result<Vec<VaccinationByManufacturerRow>> {
    DashboardClient::new().vaccines_supplied_by_manufacturer().await
}

/// Fetch cumulative per-manufacturer supply totals with a default client
pub async fn vaccines_supplied_by_manufacturer_cumulative(
) -> Result<Vec<VaccinationByManufacturerRow>> {
    DashboardClient::new()
        .vaccines_supplied_by_manufacturer_cumulative()
        .await
}

/// Fetch the "90+" age-range dose pair with a default client
pub async fn vaccinations_by_age_range_90() -> Result<VaccinationByAgeRange> {
    DashboardClient::new().vaccinations_by_age_range_90().await
}

/// Fetch every configured age-range dose pair with a default client
pub async fn vaccinations_by_age_range() -> Result<BTreeMap<String, VaccinationByAgeRange>> {
    DashboardClient::new().vaccinations_by_age_range().await
}
