/*!
API server middleware.
*/
use crate::DIRECTORY_API_TARGET;
use http::{header::HOST, Request, Response};
use std::{fmt::Display, time::Duration};
use tower_http::{
    request_id::{MakeRequestId, RequestId},
    trace::{MakeSpan, OnFailure, OnRequest, OnResponse},
};
use tracing::{field, Span};
use uuid::Uuid;

/// Correlation id generator for incoming requests.
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        Uuid::new_v4().to_string().parse().map(RequestId::new).ok()
    }
}

/// Span and event hooks for request tracing.
#[derive(Clone, Debug)]
pub struct RequestLogger;

/// Each request span carries the requestId, uri and method.
impl<B> MakeSpan<B> for RequestLogger {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let req_id = request
            .extensions()
            .get::<RequestId>()
            .map(|r| r.header_value().to_str().unwrap_or_default())
            .unwrap_or_default();

        let host = request
            .headers()
            .get(HOST)
            .map(|v| v.to_str().unwrap_or_default())
            .unwrap_or("Unknown host");

        tracing::info_span!(
          DIRECTORY_API_TARGET,
          "requestId" = req_id,
          "uri" = request.uri().path(),
          "method" = request.method().as_str(),
          "statusCode" = field::Empty,
          "failureClass" = field::Empty,
          %host
        )
    }
}

impl<B> OnRequest<B> for RequestLogger {
    fn on_request(&mut self, request: &Request<B>, _span: &Span) {
        tracing::info!(
            "request started {} {}",
            request.method(),
            request.uri().path()
        )
    }
}

impl<B> OnResponse<B> for RequestLogger {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        span.record("statusCode", field::display(response.status().as_str()));
        tracing::info!(
            "response completed with status {} in {} ms",
            response.status(),
            latency.as_millis()
        );
    }
}

impl<C: Display> OnFailure<C> for RequestLogger {
    fn on_failure(&mut self, failure_classification: C, latency: Duration, span: &Span) {
        span.record("failureClass", field::display(&failure_classification));
        tracing::error!(
            "request failed with {failure_classification} in {} ms",
            latency.as_millis()
        );
    }
}
