//! Response decoders
//!
//! The backend returns one compact, run-length-encoded result document per
//! query. Each decoder here is a pure function from that document to a
//! sequence of typed rows; all of them share the positional navigation
//! convention in [`path`] and the millisecond-epoch timestamp rule.
//!
//! Decoders perform no I/O and keep no state across calls.

mod decoders;
mod path;

pub use decoders::{
    vaccinations_by_age, vaccinations_by_age_range, vaccinations_by_day, vaccinations_by_region,
    vaccines_supplied_and_used, vaccines_supplied_by_manufacturer,
    vaccines_supplied_by_manufacturer_cumulative,
};
pub use path::{decode_timestamp, extract_path};
