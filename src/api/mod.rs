//! HTTP surface of the geo service
//!
//! Every path is served by one handler which tells help, ping and
//! lookup requests apart.

mod access_log;
mod handlers;
pub mod models;
mod routes;

use actix_web::middleware::DefaultHeaders;
use actix_web::web;

pub use access_log::AccessLog;

/// Value of the `Server` response header
pub const SERVER_NAME: &str = "Rust/Actix/Geo";

/// Initialize API routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/{tail:.*}").to(handlers::dispatch));
}

pub fn default_headers() -> DefaultHeaders {
    DefaultHeaders::new().add(("Server", SERVER_NAME))
}
