//! Access log middleware
//!
//! One line per completed request:
//! `<status> <method> <url> <duration>ms <forwarded>`.

use std::rc::Rc;
use std::time::Instant;

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::Error;
use futures::future::{ready, LocalBoxFuture, Ready};
use tracing::{error, info, warn, Level};

#[derive(Clone, Default)]
pub struct AccessLog;

impl<S, B> Transform<S, ServiceRequest> for AccessLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessLogService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessLogService {
            service: Rc::new(service),
        }))
    }
}

pub struct AccessLogService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AccessLogService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let start = Instant::now();

        let method = req.method().to_string();
        let full_url = {
            let info = req.connection_info();
            format!("{}://{}{}", info.scheme(), info.host(), req.uri())
        };
        let forwarded = req
            .headers()
            .get("Forwarded")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("-")
            .to_string();

        Box::pin(async move {
            let result = srv.call(req).await;

            let status = match &result {
                Ok(response) => response.status(),
                Err(e) => e.as_response_error().status_code(),
            };
            let duration = start.elapsed().as_secs_f64() * 1000.0;
            let line = format!(
                "{} {} {} {:.2}ms {}",
                status.as_u16(),
                method,
                full_url,
                duration,
                forwarded
            );

            let level = level_for(status);
            if level == Level::INFO {
                info!(target: "access_log", "{}", line);
            } else if level == Level::WARN {
                warn!(target: "access_log", "{}", line);
            } else {
                error!(target: "access_log", "{}", line);
            }

            result
        })
    }
}

/// 404s and anything below 400 are routine.
fn level_for(status: StatusCode) -> Level {
    match status.as_u16() {
        404 => Level::INFO,
        code if code < 400 => Level::INFO,
        code if code < 500 => Level::WARN,
        _ => Level::ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::{self, TestRequest};
    use actix_web::{web, App, HttpResponse};

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(StatusCode::OK), Level::INFO);
        assert_eq!(level_for(StatusCode::NO_CONTENT), Level::INFO);
        assert_eq!(level_for(StatusCode::NOT_FOUND), Level::INFO);
        assert_eq!(level_for(StatusCode::METHOD_NOT_ALLOWED), Level::WARN);
        assert_eq!(level_for(StatusCode::INTERNAL_SERVER_ERROR), Level::ERROR);
    }

    #[actix_web::test]
    async fn test_passes_response_through() {
        let app = test::init_service(
            App::new()
                .wrap(AccessLog)
                .route("/", web::get().to(|| async { HttpResponse::Accepted().body("ok") })),
        )
        .await;
        let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        assert_eq!(test::read_body(resp).await, "ok");
    }
}
