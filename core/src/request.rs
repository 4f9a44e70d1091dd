//! One outbound HTTP GET bound to a single transport exchange.
//!
//! # Design
//! `Request` owns its boxed `Transport` exclusively: construction configures
//! the exchange (URI, method), `execute` drives it to completion on the
//! calling thread, and dropping the `Request` releases the exchange handle.
//! Construction failures tear the partially built state down completely —
//! the boxed transport is dropped before the error is returned, so no handle
//! outlives a failed constructor. A `Request` must not be driven by two
//! concurrent `execute` calls; `&mut self` enforces that at compile time.

use crate::cookie::{self, CookieMatch};
use crate::error::HttpError;
use crate::headers::DEFAULT_HEADERS;
use crate::response::Response;
use crate::transport::{Method, Step, Transport};

/// How `set_header` treats empty names and values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Silently skip the header.
    #[default]
    Permissive,
    /// Reject with `InvalidArgument`.
    Strict,
}

/// A synchronous HTTP GET request against one URI.
pub struct Request {
    uri: String,
    transport: Box<dyn Transport>,
    validation: ValidationMode,
    cookie_match: CookieMatch,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("uri", &self.uri)
            .field("validation", &self.validation)
            .field("cookie_match", &self.cookie_match)
            .finish_non_exhaustive()
    }
}

impl Request {
    /// Create a request bound to `uri`, taking ownership of the transport
    /// exchange. The method is fixed to GET.
    ///
    /// Fails with `InvalidArgument` on an empty URI and with `Transport`
    /// when the collaborator refuses the URI or the method. On every failure
    /// branch the transport is dropped, releasing its handle.
    pub fn new(uri: &str, mut transport: Box<dyn Transport>) -> Result<Self, HttpError> {
        if uri.is_empty() {
            log::warn!("refusing to create request with empty uri");
            return Err(HttpError::InvalidArgument("empty uri"));
        }
        transport.set_uri(uri).map_err(|e| {
            log::warn!("invalid uri {uri}: {e}");
            HttpError::Transport(format!("set uri: {e}"))
        })?;
        transport.set_method(Method::Get).map_err(|e| {
            log::warn!("cannot select GET for {uri}: {e}");
            HttpError::Transport(format!("set method: {e}"))
        })?;
        Ok(Request {
            uri: uri.to_string(),
            transport,
            validation: ValidationMode::default(),
            cookie_match: CookieMatch::default(),
        })
    }

    /// The target URI. Immutable after creation.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Select strict or permissive handling of empty header inputs.
    pub fn set_validation_mode(&mut self, mode: ValidationMode) {
        self.validation = mode;
    }

    /// Select how cookie names are matched by [`Request::cookie`].
    pub fn set_cookie_match(&mut self, mode: CookieMatch) {
        self.cookie_match = mode;
    }

    /// Attach a request header.
    ///
    /// Under `Permissive` validation an empty name or value is silently
    /// skipped; under `Strict` it is an `InvalidArgument` error.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), HttpError> {
        if name.is_empty() || value.is_empty() {
            return match self.validation {
                ValidationMode::Permissive => Ok(()),
                ValidationMode::Strict => {
                    Err(HttpError::InvalidArgument("empty header name or value"))
                }
            };
        }
        self.transport.set_header(name, value);
        Ok(())
    }

    /// Apply the fixed browser-profile header set, in its fixed order.
    pub fn apply_default_headers(&mut self) {
        for (name, value) in DEFAULT_HEADERS {
            self.transport.set_header(name, value);
        }
    }

    /// Read a response header by name.
    pub fn header(&self, name: &str) -> Result<String, HttpError> {
        if name.is_empty() {
            log::warn!("header lookup with empty name");
            return Err(HttpError::InvalidArgument("empty header name"));
        }
        match self.transport.header(name) {
            Some(value) => Ok(value),
            None => {
                log::warn!("no {name} header in response");
                Err(HttpError::HeaderNotFound)
            }
        }
    }

    /// Extract a named cookie value from the response's `Set-Cookie` header.
    pub fn cookie(&self, name: &str) -> Result<String, HttpError> {
        if name.is_empty() {
            log::warn!("cookie lookup with empty name");
            return Err(HttpError::InvalidArgument("empty cookie name"));
        }
        let raw = self.header("Set-Cookie")?;
        match cookie::extract(&raw, name, self.cookie_match) {
            Some(value) => Ok(value),
            None => {
                log::warn!("no cookie named {name}");
                Err(HttpError::CookieNotFound)
            }
        }
    }

    /// Drive the exchange to completion, accumulating the body chunk by
    /// chunk, and return the finished response.
    ///
    /// Blocks the calling thread until the transport reports done or error.
    /// On any failure the accumulated bytes are dropped and nothing partial
    /// is exposed.
    pub fn execute(&mut self) -> Result<Response, HttpError> {
        self.transport.prepare().map_err(|e| {
            log::warn!("prepare failed for {}: {e}", self.uri);
            HttpError::Transport(format!("prepare: {e}"))
        })?;

        let mut body: Vec<u8> = Vec::new();
        loop {
            let step = self.transport.step();
            if step == Step::Failed {
                log::warn!("processing step failed for {}", self.uri);
                return Err(HttpError::Transport("processing step failed".to_string()));
            }
            // A step with no chunk is valid; append preserves arrival order.
            if let Some(chunk) = self.transport.chunk() {
                body.extend_from_slice(chunk);
            }
            if step == Step::Done {
                break;
            }
        }

        let len = body.len();
        body.push(0);
        Ok(Response::from_terminated(self.transport.status_code(), body, len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Scripted transport: replays a fixed sequence of step outcomes and
    /// chunks, echoes headers set on it, and counts steps through a shared
    /// probe so tests can observe it after the request takes ownership.
    struct ScriptedTransport {
        sent_headers: Vec<(String, String)>,
        response_headers: Vec<(String, String)>,
        script: Vec<(Step, Option<Vec<u8>>)>,
        cursor: usize,
        current: Option<Vec<u8>>,
        fail_set_uri: bool,
        fail_prepare: bool,
        status: u16,
        steps_taken: Arc<AtomicUsize>,
        _alive: Arc<()>,
    }

    impl ScriptedTransport {
        fn new() -> Self {
            ScriptedTransport {
                sent_headers: Vec::new(),
                response_headers: Vec::new(),
                script: Vec::new(),
                cursor: 0,
                current: None,
                fail_set_uri: false,
                fail_prepare: false,
                status: 200,
                steps_taken: Arc::new(AtomicUsize::new(0)),
                _alive: Arc::new(()),
            }
        }

        fn with_script(script: Vec<(Step, Option<Vec<u8>>)>) -> Self {
            ScriptedTransport {
                script,
                ..ScriptedTransport::new()
            }
        }

        fn with_response_header(name: &str, value: &str) -> Self {
            ScriptedTransport {
                response_headers: vec![(name.to_string(), value.to_string())],
                ..ScriptedTransport::new()
            }
        }
    }

    impl Transport for ScriptedTransport {
        fn set_uri(&mut self, _uri: &str) -> Result<(), TransportError> {
            if self.fail_set_uri {
                return Err(TransportError("uri refused".to_string()));
            }
            Ok(())
        }

        fn set_method(&mut self, _method: Method) -> Result<(), TransportError> {
            Ok(())
        }

        fn set_header(&mut self, name: &str, value: &str) {
            self.sent_headers.push((name.to_string(), value.to_string()));
        }

        fn header(&self, name: &str) -> Option<String> {
            self.response_headers
                .iter()
                .chain(self.sent_headers.iter())
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.clone())
        }

        fn prepare(&mut self) -> Result<(), TransportError> {
            if self.fail_prepare {
                return Err(TransportError("prepare refused".to_string()));
            }
            Ok(())
        }

        fn step(&mut self) -> Step {
            self.steps_taken.fetch_add(1, Ordering::SeqCst);
            match self.script.get(self.cursor) {
                Some((step, chunk)) => {
                    self.cursor += 1;
                    self.current = chunk.clone();
                    *step
                }
                None => {
                    self.current = None;
                    Step::Done
                }
            }
        }

        fn chunk(&self) -> Option<&[u8]> {
            self.current.as_deref()
        }

        fn status_code(&self) -> u16 {
            self.status
        }
    }

    fn request(transport: ScriptedTransport) -> Request {
        Request::new("http://example.test/", Box::new(transport)).unwrap()
    }

    #[test]
    fn new_rejects_empty_uri() {
        let err = Request::new("", Box::new(ScriptedTransport::new())).unwrap_err();
        assert!(matches!(err, HttpError::InvalidArgument(_)));
    }

    #[test]
    fn new_configures_uri_and_get_method() {
        let req = request(ScriptedTransport::new());
        assert_eq!(req.uri(), "http://example.test/");
    }

    #[test]
    fn new_releases_transport_when_uri_is_refused() {
        let mut transport = ScriptedTransport::new();
        transport.fail_set_uri = true;
        let probe = Arc::clone(&transport._alive);

        let err = Request::new("http://example.test/", Box::new(transport)).unwrap_err();
        assert!(matches!(err, HttpError::Transport(_)));
        assert_eq!(Arc::strong_count(&probe), 1, "transport not released");
    }

    #[test]
    fn create_then_drop_leaves_nothing_outstanding() {
        let transport = ScriptedTransport::new();
        let probe = Arc::clone(&transport._alive);

        let req = request(transport);
        assert_eq!(Arc::strong_count(&probe), 2);
        drop(req);
        assert_eq!(Arc::strong_count(&probe), 1);
    }

    #[test]
    fn set_header_then_get_it_back() {
        let mut req = request(ScriptedTransport::new());
        req.set_header("X-Session", "deadbeef").unwrap();
        assert_eq!(req.header("X-Session").unwrap(), "deadbeef");
    }

    #[test]
    fn permissive_mode_skips_empty_inputs() {
        let mut req = request(ScriptedTransport::new());
        req.set_header("", "value").unwrap();
        req.set_header("name", "").unwrap();
        assert!(matches!(req.header("name"), Err(HttpError::HeaderNotFound)));
    }

    #[test]
    fn strict_mode_rejects_empty_inputs() {
        let mut req = request(ScriptedTransport::new());
        req.set_validation_mode(ValidationMode::Strict);
        let err = req.set_header("", "value").unwrap_err();
        assert!(matches!(err, HttpError::InvalidArgument(_)));
    }

    #[test]
    fn default_headers_apply_the_whole_profile() {
        let mut req = request(ScriptedTransport::new());
        req.apply_default_headers();

        for (name, value) in DEFAULT_HEADERS {
            assert_eq!(req.header(name).unwrap(), value);
        }
        assert!(req.header("User-Agent").unwrap().starts_with("Mozilla/5.0"));
    }

    #[test]
    fn execute_concatenates_chunks_in_step_order() {
        let transport = ScriptedTransport::with_script(vec![
            (Step::Pending, Some(b"Hello, ".to_vec())),
            (Step::Pending, Some(b"World!".to_vec())),
            (Step::Done, None),
        ]);
        let mut req = request(transport);

        let resp = req.execute().unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.len(), 13);
        assert_eq!(resp.body(), b"Hello, World!");
        assert_eq!(resp.body_with_terminator().last(), Some(&0));
    }

    #[test]
    fn execute_reads_chunk_on_the_done_step() {
        let transport = ScriptedTransport::with_script(vec![
            (Step::Pending, Some(b"ab".to_vec())),
            (Step::Done, Some(b"cd".to_vec())),
        ]);
        let resp = request(transport).execute().unwrap();
        assert_eq!(resp.body(), b"abcd");
    }

    #[test]
    fn execute_skips_steps_without_chunks() {
        let transport = ScriptedTransport::with_script(vec![
            (Step::Pending, None),
            (Step::Pending, Some(b"data".to_vec())),
            (Step::Pending, Some(Vec::new())),
            (Step::Done, None),
        ]);
        let resp = request(transport).execute().unwrap();
        assert_eq!(resp.body(), b"data");
        assert_eq!(resp.len(), 4);
    }

    #[test]
    fn execute_with_empty_body_reports_zero_length() {
        let transport = ScriptedTransport::with_script(vec![(Step::Done, None)]);
        let resp = request(transport).execute().unwrap();
        assert_eq!(resp.len(), 0);
        assert_eq!(resp.body_with_terminator(), &[0]);
    }

    #[test]
    fn execute_is_binary_safe() {
        let transport = ScriptedTransport::with_script(vec![
            (Step::Pending, Some(vec![0x00, 0xff, 0x00])),
            (Step::Done, Some(vec![0x7f])),
        ]);
        let resp = request(transport).execute().unwrap();
        assert_eq!(resp.body(), &[0x00, 0xff, 0x00, 0x7f]);
        assert_eq!(resp.len(), 4);
    }

    #[test]
    fn prepare_failure_never_reaches_processing() {
        let mut transport = ScriptedTransport::new();
        transport.fail_prepare = true;
        let steps = Arc::clone(&transport.steps_taken);

        let err = request(transport).execute().unwrap_err();
        assert!(matches!(err, HttpError::Transport(_)));
        assert_eq!(steps.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn step_error_aborts_without_partial_body() {
        let transport = ScriptedTransport::with_script(vec![
            (Step::Pending, Some(b"partial".to_vec())),
            (Step::Failed, None),
        ]);
        let err = request(transport).execute().unwrap_err();
        assert!(matches!(err, HttpError::Transport(_)));
    }

    #[test]
    fn cookie_is_extracted_from_set_cookie_header() {
        let transport =
            ScriptedTransport::with_response_header("Set-Cookie", "a=1; sess=abc123; path=/");
        let req = request(transport);
        assert_eq!(req.cookie("sess").unwrap(), "abc123");
        assert_eq!(req.cookie("a").unwrap(), "1");
        assert!(matches!(req.cookie("missing"), Err(HttpError::CookieNotFound)));
    }

    #[test]
    fn cookie_without_set_cookie_header_is_header_not_found() {
        let req = request(ScriptedTransport::new());
        assert!(matches!(req.cookie("sess"), Err(HttpError::HeaderNotFound)));
    }

    #[test]
    fn cookie_with_empty_name_is_invalid_argument() {
        let req = request(ScriptedTransport::new());
        assert!(matches!(req.cookie(""), Err(HttpError::InvalidArgument(_))));
    }

    #[test]
    fn exact_cookie_match_requires_whole_token() {
        let transport = ScriptedTransport::with_response_header("Set-Cookie", "userid=5");
        let mut req = request(transport);
        assert_eq!(req.cookie("id").unwrap(), "5"); // default substring parse

        req.set_cookie_match(CookieMatch::Exact);
        assert!(matches!(req.cookie("id"), Err(HttpError::CookieNotFound)));
    }

    #[test]
    fn header_with_empty_name_is_invalid_argument() {
        let req = request(ScriptedTransport::new());
        assert!(matches!(req.header(""), Err(HttpError::InvalidArgument(_))));
    }
}
