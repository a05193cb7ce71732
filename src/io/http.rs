//! HTTP endpoint for listing and submitting reviews
//!
//! - `GET /health` - liveness probe
//! - `GET <any path>?start_date=&end_date=&location=` - filtered, sentiment-annotated reviews
//! - `POST <any path>` (form-encoded `Location`, `ReviewBody`) - validate a new review
//!
//! Uses hyper for the HTTP server, one task per connection.

use crate::infra::Config;
use crate::services::{ReviewQuery, ReviewService};
use anyhow::Context;
use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::header::{ALLOW, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use url::form_urlencoded;

/// Decoded `key=value` pairs from a query string or form body.
/// Blank values are treated as absent; the first non-blank value wins.
#[derive(Debug, Default)]
struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    fn parse(input: &[u8]) -> Self {
        let pairs = form_urlencoded::parse(input)
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        Self { pairs }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

#[derive(Serialize)]
struct Message<'a> {
    message: &'a str,
}

fn json_response<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(value) {
        Ok(body) => Response::builder()
            .status(status)
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))
            .expect("static response should not fail"),
        Err(e) => {
            error!(error = %e, "response_serialize_failed");
            message_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}

fn message_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::to_vec(&Message { message }).unwrap_or_default();
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))
        .expect("static response should not fail")
}

/// List reviews matching the query string
pub fn handle_get(service: &ReviewService, query: Option<&str>) -> Response<Full<Bytes>> {
    let params = Params::parse(query.unwrap_or_default().as_bytes());
    let query = ReviewQuery {
        start_date: params.get("start_date"),
        end_date: params.get("end_date"),
        location: params.get("location"),
    };

    match service.query(&query) {
        Ok(reviews) => {
            info!(
                start_date = ?query.start_date,
                end_date = ?query.end_date,
                location = ?query.location,
                count = %reviews.len(),
                "reviews_served"
            );
            json_response(StatusCode::OK, &reviews)
        }
        Err(e) => {
            warn!(error = %e, "reviews_query_rejected");
            message_response(StatusCode::BAD_REQUEST, "invalid date")
        }
    }
}

/// Validate a form-encoded review submission
pub fn handle_post(service: &ReviewService, body: &[u8]) -> Response<Full<Bytes>> {
    let params = Params::parse(body);

    match service.submit(params.get("Location"), params.get("ReviewBody")) {
        Ok(review) => {
            info!(review_id = %review.id, location = %review.location, "review_submitted");
            json_response(StatusCode::CREATED, &review)
        }
        Err(e) => {
            warn!(reason = %e.as_str(), "submission_rejected");
            message_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
    }
}

/// Handle HTTP requests
async fn handle_request(
    req: Request<hyper::body::Incoming>,
    service: Arc<ReviewService>,
    max_body_bytes: usize,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();

    match (&parts.method, parts.uri.path()) {
        (&Method::GET, "/health") => Ok(Response::builder()
            .status(StatusCode::OK)
            .body(Full::new(Bytes::from("ok")))
            .expect("static response should not fail")),
        (&Method::GET, _) => Ok(handle_get(&service, parts.uri.query())),
        (&Method::POST, _) => match Limited::new(body, max_body_bytes).collect().await {
            Ok(collected) => Ok(handle_post(&service, &collected.to_bytes())),
            Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
                warn!(limit = %max_body_bytes, "request_body_too_large");
                Ok(message_response(StatusCode::PAYLOAD_TOO_LARGE, "request body too large"))
            }
            Err(e) => {
                warn!(error = %e, "request_body_read_failed");
                Ok(message_response(StatusCode::BAD_REQUEST, "unreadable request body"))
            }
        },
        _ => Ok(Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header(ALLOW, "GET, POST")
            .body(Full::new(Bytes::new()))
            .expect("static response should not fail")),
    }
}

/// Serve connections from an already bound listener until shutdown
pub async fn serve(
    listener: TcpListener,
    service: Arc<ReviewService>,
    max_body_bytes: usize,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, peer)) => {
                        debug!(peer = %peer, "connection_accepted");
                        let io = TokioIo::new(stream);
                        let service = service.clone();

                        tokio::spawn(async move {
                            let svc = service_fn(move |req| {
                                let service = service.clone();
                                async move { handle_request(req, service, max_body_bytes).await }
                            });

                            if let Err(e) = http1::Builder::new().serve_connection(io, svc).await {
                                error!(error = %e, "http_connection_error");
                            }
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "http_accept_error");
                    }
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("http_server_shutdown");
                    return Ok(());
                }
            }
        }
    }
}

/// Bind the configured address and serve until shutdown
pub async fn start_server(
    config: &Config,
    service: Arc<ReviewService>,
    shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind((config.bind_address(), config.port()))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.bind_address(), config.port()))?;
    let addr = listener.local_addr()?;

    info!(addr = %addr, reviews = %service.store().len(), "http_server_started");
    serve(listener, service, config.max_body_bytes(), shutdown).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Review, ReviewId, TIMESTAMP_FORMAT};
    use crate::io::store::ReviewStore;
    use crate::services::{
        InvalidDatePolicy, LexiconScorer, ReviewAnnotator, SubmissionValidator, TextNormalizer,
    };
    use chrono::NaiveDateTime;

    fn review(id: &str, location: &str, ts: &str, body: &str) -> Review {
        Review {
            id: ReviewId::from(id),
            location: location.to_string(),
            timestamp: NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).unwrap(),
            body: body.to_string(),
        }
    }

    fn service(policy: InvalidDatePolicy) -> ReviewService {
        let store = ReviewStore::new(vec![
            review("1", "San Diego, California", "2024-01-05 23:59:00", "Great burritos!"),
            review("2", "San Diego, California", "2024-01-06 00:00:01", "Terrible parking"),
            review("3", "El Paso, Texas", "2024-01-02 12:00:00", "Nice staff"),
        ]);
        let annotator =
            ReviewAnnotator::new(TextNormalizer::default(), Arc::new(LexiconScorer::default()));
        ReviewService::new(Arc::new(store), annotator, SubmissionValidator::default(), policy)
    }

    async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_params_first_non_blank_value_wins() {
        let params = Params::parse(b"location=&location=san+diego&start_date=2024-01-01%2010%3A00%3A00");
        assert_eq!(params.get("location"), Some("san diego"));
        assert_eq!(params.get("start_date"), Some("2024-01-01 10:00:00"));
        assert_eq!(params.get("end_date"), None);
    }

    #[tokio::test]
    async fn test_get_without_query_lists_all() {
        let resp = handle_get(&service(InvalidDatePolicy::Ignore), None);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");

        let json = body_json(resp).await;
        let ids: Vec<&str> = json.as_array().unwrap().iter().map(|r| r["ReviewId"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
        for r in json.as_array().unwrap() {
            for key in ["neg", "neu", "pos", "compound"] {
                assert!(r["sentiment"][key].is_f64(), "{r}");
            }
        }
    }

    #[tokio::test]
    async fn test_get_filters_by_location_and_bare_end_date() {
        let resp = handle_get(
            &service(InvalidDatePolicy::Ignore),
            Some("location=san%20diego&end_date=2024-01-05"),
        );
        let json = body_json(resp).await;
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["ReviewId"], "1");
        assert_eq!(rows[0]["Timestamp"], "2024-01-05 23:59:00");
        assert!(rows[0]["sentiment"]["compound"].as_f64().unwrap() > 0.0);
    }

    #[tokio::test]
    async fn test_get_with_bad_date_depends_on_policy() {
        let resp = handle_get(&service(InvalidDatePolicy::Ignore), Some("start_date=yesterday"));
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await.as_array().unwrap().len(), 3);

        let resp = handle_get(&service(InvalidDatePolicy::Reject), Some("start_date=yesterday"));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["message"], "invalid date");
    }

    #[tokio::test]
    async fn test_post_validation_messages() {
        let svc = service(InvalidDatePolicy::Ignore);
        let cases: [(&[u8], &str); 4] = [
            (b"Location=&ReviewBody=great", "missing location"),
            (b"ReviewBody=great", "missing location"),
            (b"Location=Nowhere%2C+Nowhere&ReviewBody=great", "invalid location"),
            (b"Location=Denver%2C+Colorado&ReviewBody=", "no review body"),
        ];
        for (body, message) in cases {
            let resp = handle_post(&svc, body);
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(resp).await["message"], message);
        }
    }

    #[tokio::test]
    async fn test_post_success_echoes_review() {
        let svc = service(InvalidDatePolicy::Ignore);
        let resp = handle_post(&svc, b"Location=Denver%2C+Colorado&ReviewBody=Loved+it");
        assert_eq!(resp.status(), StatusCode::CREATED);

        let json = body_json(resp).await;
        assert_eq!(json["Location"], "Denver, Colorado");
        assert_eq!(json["ReviewBody"], "Loved it");
        assert!(uuid::Uuid::parse_str(json["ReviewId"].as_str().unwrap()).is_ok());
        let ts = json["Timestamp"].as_str().unwrap();
        assert!(NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).is_ok(), "{ts}");
        assert_eq!(json.as_object().unwrap().len(), 4);

        assert_eq!(svc.store().len(), 3);
    }
}
