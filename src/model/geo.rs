use chrono::{DateTime, Utc};
use serde::Serialize;

/// `[code, name]` pair as exposed in the JSON body. Either half may be null.
pub type NamedCode = (Option<String>, Option<String>);

/// Facts from the ASN table. Fields are populated together or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AsnRecord {
    pub asn: Option<u32>,
    /// CIDR of the matched network
    pub asn_network: String,
    pub asn_organization: Option<String>,
}

/// Facts from the City table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceRecord {
    pub city: Option<String>,
    pub continent: NamedCode,
    pub country: NamedCode,
    #[serde(rename = "subdivisions")]
    pub subdivision_most_specific: NamedCode,
}

/// Merged response for one address.
///
/// Field order is alphabetical so that serialization yields sorted keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoResponse {
    pub address: String,
    #[serde(flatten)]
    pub asn: Option<AsnRecord>,
    #[serde(flatten)]
    pub place: Option<PlaceRecord>,
}

impl GeoResponse {
    pub fn new(address: String) -> Self {
        Self {
            address,
            asn: None,
            place: None,
        }
    }
}

/// Build information for one lookup table, logged at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseMetadata {
    pub database_type: String,
    pub description: Option<String>,
    pub build_epoch: u64,
}

impl DatabaseMetadata {
    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.build_epoch)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}
