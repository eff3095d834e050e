//! `X-Client-Geo` summary header
//!
//! `<city>,<subdivision>/<country>; <asn_organization> (<asn>);`
//!
//! Each text field is form encoded on its own. Missing values are written
//! as `None` and every `None` in the result is then replaced with `-`.

use actix_web::http::header::HeaderValue;
use url::form_urlencoded::byte_serialize;

use crate::error::{GeoError, Result};
use crate::model::GeoResponse;

pub const X_CLIENT_GEO: &str = "X-Client-Geo";

const MISSING: &str = "None";

pub fn encode(response: &GeoResponse) -> Result<HeaderValue> {
    let place = response.place.as_ref();
    let asn = response.asn.as_ref();

    let city = quote(place.and_then(|p| p.city.as_deref()));
    let subdivision = quote(place.and_then(|p| p.subdivision_most_specific.1.as_deref()));
    let country = quote(place.and_then(|p| p.country.0.as_deref()));
    let organization = quote(asn.and_then(|a| a.asn_organization.as_deref()));
    let number = asn
        .and_then(|a| a.asn)
        .map_or_else(|| MISSING.to_string(), |n| n.to_string());

    let summary = format!("{city},{subdivision}/{country}; {organization} ({number});")
        .replace(MISSING, "-");

    HeaderValue::from_str(&summary)
        .map_err(|e| GeoError::Other(format!("invalid {} value {:?}: {}", X_CLIENT_GEO, summary, e)))
}

fn quote(value: Option<&str>) -> String {
    byte_serialize(value.unwrap_or(MISSING).as_bytes()).collect()
}
