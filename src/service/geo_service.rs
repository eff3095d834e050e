use std::sync::Arc;

use tracing::debug;

use crate::dao::GeoDatabase;
use crate::error::Result;
use crate::model::GeoResponse;

/// Merges the ASN and City lookups for one address.
#[derive(Clone)]
pub struct GeoService {
    database: Arc<dyn GeoDatabase>,
}

impl GeoService {
    pub fn new(database: Arc<dyn GeoDatabase>) -> Self {
        Self { database }
    }

    /// Both tables are queried independently; a miss in one leaves its
    /// fields out of the response. Database failures propagate.
    pub fn lookup(&self, address: &str) -> Result<GeoResponse> {
        let mut response = GeoResponse::new(address.to_string());

        response.asn = self.database.lookup_asn(address)?;
        if response.asn.is_none() {
            debug!("{} not found in ASN database", address);
        }

        response.place = self.database.lookup_place(address)?;
        if response.place.is_none() {
            debug!("{} not found in City database", address);
        }

        debug!("resp: {:?}", response);
        Ok(response)
    }
}
