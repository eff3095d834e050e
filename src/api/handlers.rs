//! API request handlers

use std::borrow::Cow;

use actix_web::http::header::{ContentType, HeaderMap};
use actix_web::http::Method;
use actix_web::{web, HttpRequest, HttpResponse};
use tracing::{debug, info};

use crate::api::models::PingResponse;
use crate::api::routes::Route;
use crate::error::Result;
use crate::service::policy::{BodyMode, QueryFlags};
use crate::service::summary::{self, X_CLIENT_GEO};
use crate::service::{resolver, GeoService};

pub const HELP: &str = include_str!("help.txt");

const X_FORWARDED_FOR: &str = "X-Forwarded-For";
const FORWARDED: &str = "Forwarded";
const X_AUTH_ONLY: &str = "X-Auth-Only";

/// Entry point for every path
pub async fn dispatch(req: HttpRequest, service: web::Data<GeoService>) -> Result<HttpResponse> {
    if req.method() != Method::GET {
        return Ok(HttpResponse::MethodNotAllowed().finish());
    }

    match Route::from_path(req.path()) {
        Route::Help => Ok(help()),
        Route::Lookup { address } => lookup(&req, &service, address),
    }
}

fn help() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(HELP)
}

fn ping() -> Result<HttpResponse> {
    let mut body = serde_json::to_string(&PingResponse::pong())?;
    body.push('\n');
    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(body))
}

/// A present header always yields a value; invalid UTF-8 is replaced.
fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<Cow<'a, str>> {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()))
}

/// An empty `X-Auth-Only` value does not count.
fn auth_only_header(headers: &HeaderMap) -> bool {
    headers
        .get(X_AUTH_ONLY)
        .is_some_and(|value| !value.is_empty())
}

fn lookup(
    req: &HttpRequest,
    service: &GeoService,
    path_address: Option<&str>,
) -> Result<HttpResponse> {
    if req.path().ends_with("/ping") {
        return ping();
    }

    let headers = req.headers();
    let x_forwarded_for = header(headers, X_FORWARDED_FOR);
    let forwarded = header(headers, FORWARDED);
    debug!(
        "path_address: {:?}, x_forwarded_for: {:?}, forwarded: {:?}",
        path_address, x_forwarded_for, forwarded
    );

    let Some(address) = resolver::resolve(
        path_address,
        x_forwarded_for.as_deref(),
        forwarded.as_deref(),
    ) else {
        return Ok(HttpResponse::NoContent().finish());
    };

    let response = service.lookup(&address)?;

    let mut builder = HttpResponse::Ok();
    // Missing lookups render as `-` slots, so the header is sent even on a double miss.
    match summary::encode(&response) {
        Ok(value) => {
            info!(
                "{:<15} ---> '{}: {}'",
                address,
                X_CLIENT_GEO,
                value.to_str().unwrap_or_default()
            );
            builder.insert_header((X_CLIENT_GEO, value));
        }
        Err(e) => debug!("Skipping {} header: {}", X_CLIENT_GEO, e),
    }

    let mode = BodyMode::decide(
        QueryFlags::from_query(req.query_string()),
        auth_only_header(headers),
    );
    match mode.render(&response)? {
        Some(body) => Ok(builder.content_type(ContentType::json()).body(body)),
        None => Ok(builder.finish()),
    }
}
