//! Redirect-following fetch with status classification and one overall
//! deadline.
//!
//! # Design
//! `Transport` owns an [`HttpSend`] and loops over redirect hops instead of
//! recursing. Before every hop it checks the remaining redirect budget and
//! the remaining time, so an exhausted budget never sends another request
//! and a hop only gets whatever is left of the deadline.
//!
//! Statuses 2xx, 404 and 500 all return the body verbatim. The 500 case is
//! intentional: the service reports most failures inside the JSON envelope,
//! so the decoder gets to read it before anything is classified as fatal.

use std::time::{Duration, Instant};

use tracing::{debug, info};
use url::Url;

use crate::error::{ClientError, Result};
use crate::http::{HttpRequest, HttpSend};

/// How a single response status is handled by the redirect loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// Return the body to the caller (2xx, 404, 500).
    PassThrough,
    /// Follow the `Location` header (3xx).
    Redirect,
    /// Fail with [`ClientError::Transport`].
    Fatal,
}

/// Classify an HTTP status for the fetch loop.
pub fn classify(status: u16) -> StatusClass {
    match status {
        200..=299 | 404 | 500 => StatusClass::PassThrough,
        300..=399 => StatusClass::Redirect,
        _ => StatusClass::Fatal,
    }
}

#[derive(Debug, Clone)]
pub struct Transport<S> {
    sender: S,
    timeout: Duration,
    debug: bool,
}

impl<S: HttpSend> Transport<S> {
    pub fn new(sender: S, timeout: Duration, debug: bool) -> Self {
        Self {
            sender,
            timeout,
            debug,
        }
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `uri`, following redirects, and return the final body.
    ///
    /// `redirect_budget` counts requests: with a budget of `n` at most `n`
    /// requests are sent, and a budget of zero fails without touching the
    /// network.
    pub fn fetch(&self, uri: &str, redirect_budget: u32) -> Result<Vec<u8>> {
        self.execute(HttpRequest::get(uri), redirect_budget)
    }

    /// Send `request`, following redirects with the same method and body.
    pub fn execute(&self, request: HttpRequest, redirect_budget: u32) -> Result<Vec<u8>> {
        let deadline = Instant::now() + self.timeout;
        let mut request = request;
        let mut remaining = redirect_budget;

        loop {
            if remaining == 0 {
                return Err(ClientError::RedirectLoop {
                    limit: redirect_budget,
                });
            }
            let time_left = deadline
                .checked_duration_since(Instant::now())
                .filter(|left| !left.is_zero())
                .ok_or(ClientError::Timeout {
                    limit: self.timeout,
                })?;

            if self.debug {
                info!(uri = %request.url, "visiting");
            }

            let response = match self.sender.send(&request, time_left) {
                Err(ClientError::Timeout { .. }) => {
                    return Err(ClientError::Timeout {
                        limit: self.timeout,
                    })
                }
                other => other?,
            };
            debug!(uri = %request.url, status = response.status, "response received");

            match classify(response.status) {
                StatusClass::PassThrough => return Ok(response.body),
                StatusClass::Redirect => {
                    let location =
                        response
                            .header("location")
                            .ok_or_else(|| ClientError::Transport {
                                status: response.status,
                                reason: "redirect without Location header".to_string(),
                            })?;
                    let next = resolve_location(&request.url, location)?;
                    request = request.redirected(next);
                    remaining -= 1;
                }
                StatusClass::Fatal => {
                    return Err(ClientError::Transport {
                        status: response.status,
                        reason: response.reason,
                    })
                }
            }
        }
    }
}

/// Resolve a `Location` header value against the URL that produced it.
fn resolve_location(current: &str, location: &str) -> Result<String> {
    let base = Url::parse(current).map_err(|e| ClientError::Transport {
        status: 0,
        reason: format!("invalid request URL {current}: {e}"),
    })?;
    base.join(location)
        .map(String::from)
        .map_err(|e| ClientError::Transport {
            status: 0,
            reason: format!("invalid redirect location {location}: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    use super::*;
    use crate::http::{HttpMethod, HttpResponse};

    /// Replays canned responses and records every request it receives.
    struct Scripted {
        responses: RefCell<VecDeque<Result<HttpResponse>>>,
        seen: RefCell<Vec<HttpRequest>>,
        calls: Cell<usize>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<HttpResponse>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                seen: RefCell::new(Vec::new()),
                calls: Cell::new(0),
            }
        }
    }

    impl HttpSend for Scripted {
        fn send(&self, request: &HttpRequest, _timeout: Duration) -> Result<HttpResponse> {
            self.calls.set(self.calls.get() + 1);
            self.seen.borrow_mut().push(request.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .expect("scripted sender ran out of responses")
        }
    }

    fn response(status: u16, body: &str) -> Result<HttpResponse> {
        Ok(HttpResponse {
            status,
            reason: String::new(),
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        })
    }

    fn redirect(location: &str) -> Result<HttpResponse> {
        Ok(HttpResponse {
            status: 302,
            reason: "Found".to_string(),
            headers: vec![("Location".to_string(), location.to_string())],
            body: Vec::new(),
        })
    }

    fn transport(responses: Vec<Result<HttpResponse>>) -> Transport<Scripted> {
        Transport::new(Scripted::new(responses), Duration::from_secs(5), false)
    }

    #[test]
    fn classify_statuses() {
        assert_eq!(classify(200), StatusClass::PassThrough);
        assert_eq!(classify(204), StatusClass::PassThrough);
        assert_eq!(classify(404), StatusClass::PassThrough);
        assert_eq!(classify(301), StatusClass::Redirect);
        assert_eq!(classify(308), StatusClass::Redirect);
        assert_eq!(classify(401), StatusClass::Fatal);
        assert_eq!(classify(502), StatusClass::Fatal);
    }

    #[test]
    fn status_500_passes_body_through_on_purpose() {
        // The envelope carries the diagnosis for 500s; the transport must not
        // turn them into transport errors.
        assert_eq!(classify(500), StatusClass::PassThrough);
        let t = transport(vec![response(500, r#"{"error":"boom"}"#)]);
        let body = t.fetch("http://api.test/v3.1/organizations", 2).unwrap();
        assert_eq!(body, br#"{"error":"boom"}"#);
    }

    #[test]
    fn success_returns_body_verbatim() {
        let t = transport(vec![response(200, r#"{"data":[]}"#)]);
        let body = t.fetch("http://api.test/v3.1/people", 2).unwrap();
        assert_eq!(body, br#"{"data":[]}"#);
        assert_eq!(t.sender().calls.get(), 1);
    }

    #[test]
    fn not_found_returns_body_verbatim() {
        let t = transport(vec![response(404, r#"{"data":null}"#)]);
        assert_eq!(t.fetch("http://api.test/x", 1).unwrap(), br#"{"data":null}"#);
    }

    #[test]
    fn chains_within_budget_reach_final_body() {
        for budget in 1..=4u32 {
            // budget requests: budget - 1 redirects followed by the final body.
            let mut script: Vec<_> = (1..budget).map(|i| redirect(&format!("/hop/{i}"))).collect();
            script.push(response(200, "final"));
            let t = transport(script);
            let body = t.fetch("http://api.test/start", budget).unwrap();
            assert_eq!(body, b"final", "budget {budget}");
            assert_eq!(t.sender().calls.get(), budget as usize);
        }
    }

    #[test]
    fn chain_longer_than_budget_fails_without_extra_request() {
        for budget in 1..=4u32 {
            let script: Vec<_> = (0..=budget).map(|i| redirect(&format!("/hop/{i}"))).collect();
            let t = transport(script);
            let err = t.fetch("http://api.test/start", budget).unwrap_err();
            assert!(matches!(err, ClientError::RedirectLoop { limit } if limit == budget));
            assert_eq!(t.sender().calls.get(), budget as usize);
        }
    }

    #[test]
    fn zero_budget_sends_nothing() {
        let t = transport(Vec::new());
        let err = t.fetch("http://api.test/start", 0).unwrap_err();
        assert!(matches!(err, ClientError::RedirectLoop { limit: 0 }));
        assert_eq!(t.sender().calls.get(), 0);
    }

    #[test]
    fn relative_location_is_resolved_against_current_url() {
        let t = transport(vec![redirect("/v3.1/people/jane?user_key=k"), response(200, "ok")]);
        t.fetch("http://api.test/v3.1/people/old?user_key=k", 2).unwrap();
        let seen = t.sender().seen.borrow();
        assert_eq!(seen[1].url, "http://api.test/v3.1/people/jane?user_key=k");
    }

    #[test]
    fn absolute_location_is_followed_verbatim() {
        let t = transport(vec![redirect("https://other.test/data"), response(200, "ok")]);
        t.fetch("http://api.test/start", 2).unwrap();
        assert_eq!(t.sender().seen.borrow()[1].url, "https://other.test/data");
    }

    #[test]
    fn redirect_preserves_post_body() {
        let t = transport(vec![redirect("/moved"), response(200, "ok")]);
        let req = HttpRequest::post_json("http://api.test/batch_search", "{\"requests\":[]}".into());
        t.execute(req, 2).unwrap();
        let seen = t.sender().seen.borrow();
        assert_eq!(seen[1].method, HttpMethod::Post);
        assert_eq!(seen[1].body.as_deref(), Some("{\"requests\":[]}"));
    }

    #[test]
    fn redirect_without_location_is_transport_error() {
        let t = transport(vec![response(301, "")]);
        let err = t.fetch("http://api.test/start", 2).unwrap_err();
        assert!(matches!(err, ClientError::Transport { status: 301, .. }));
    }

    #[test]
    fn unrecognized_status_is_transport_error() {
        let t = transport(vec![Ok(HttpResponse {
            status: 503,
            reason: "Service Unavailable".to_string(),
            headers: Vec::new(),
            body: b"down".to_vec(),
        })]);
        let err = t.fetch("http://api.test/start", 2).unwrap_err();
        match err {
            ClientError::Transport { status, reason } => {
                assert_eq!(status, 503);
                assert_eq!(reason, "Service Unavailable");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn sender_timeout_reports_overall_limit() {
        let t = transport(vec![Err(ClientError::Timeout {
            limit: Duration::from_millis(3),
        })]);
        let err = t.fetch("http://api.test/start", 2).unwrap_err();
        assert!(matches!(err, ClientError::Timeout { limit } if limit == Duration::from_secs(5)));
    }

    #[test]
    fn expired_deadline_fails_before_next_hop() {
        struct Slow;
        impl HttpSend for Slow {
            fn send(&self, _request: &HttpRequest, _timeout: Duration) -> Result<HttpResponse> {
                std::thread::sleep(Duration::from_millis(30));
                redirect("/again")
            }
        }
        let t = Transport::new(Slow, Duration::from_millis(20), false);
        let err = t.fetch("http://api.test/start", 10).unwrap_err();
        assert!(matches!(err, ClientError::Timeout { .. }));
    }

    #[test]
    fn debug_flag_does_not_change_outcomes() {
        let chain = || vec![redirect("/hop/1"), redirect("/hop/2"), response(200, "final")];
        let endless = || vec![redirect("/a"), redirect("/b"), redirect("/c")];

        for debug in [false, true] {
            let t = Transport::new(Scripted::new(chain()), Duration::from_secs(5), debug);
            assert_eq!(t.fetch("http://api.test/start", 3).unwrap(), b"final", "debug={debug}");
            assert_eq!(t.sender().calls.get(), 3, "debug={debug}");
            let urls: Vec<_> = t.sender().seen.borrow().iter().map(|r| r.url.clone()).collect();
            assert_eq!(
                urls,
                vec!["http://api.test/start", "http://api.test/hop/1", "http://api.test/hop/2"],
                "debug={debug}"
            );

            let t = Transport::new(Scripted::new(endless()), Duration::from_secs(5), debug);
            let err = t.fetch("http://api.test/start", 2).unwrap_err();
            assert!(matches!(err, ClientError::RedirectLoop { limit: 2 }), "debug={debug}");
            assert_eq!(t.sender().calls.get(), 2, "debug={debug}");

            let t = Transport::new(Scripted::new(vec![response(503, "down")]), Duration::from_secs(5), debug);
            let err = t.fetch("http://api.test/start", 2).unwrap_err();
            assert!(matches!(err, ClientError::Transport { status: 503, .. }), "debug={debug}");
        }
    }

    #[test]
    fn network_errors_propagate() {
        let t = transport(vec![Err(ClientError::Network("connection refused".into()))]);
        let err = t.fetch("http://api.test/start", 2).unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }
}
