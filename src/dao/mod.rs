//! Lookup table access
//!
//! The service only needs "lookup by address" from each table. Backends
//! report a miss as `Ok(None)` and reserve `Err` for broken databases.

mod maxmind;

pub use maxmind::MaxMindDatabase;

use crate::error::Result;
use crate::model::{AsnRecord, PlaceRecord};

/// Read-only access to the ASN and City tables.
pub trait GeoDatabase: Send + Sync {
    fn lookup_asn(&self, address: &str) -> Result<Option<AsnRecord>>;

    fn lookup_place(&self, address: &str) -> Result<Option<PlaceRecord>>;
}
