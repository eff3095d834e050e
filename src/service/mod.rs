pub mod geo_service;
pub mod policy;
pub mod resolver;
pub mod summary;

pub use geo_service::GeoService;
