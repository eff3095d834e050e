mod geo;

pub use geo::{AsnRecord, DatabaseMetadata, GeoResponse, NamedCode, PlaceRecord};
