use std::io;
use std::sync::Mutex;

use crate::cache::{NoCache, ResponseCache};

use super::*;

#[derive(Debug, Clone)]
pub(super) struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

#[derive(Debug)]
struct FakeTransportState {
    requests: Vec<HttpRequest>,
    response_status: u16,
    response_body: String,
    fail: bool,
}

impl FakeTransport {
    pub(super) fn new(response_status: u16, response_body: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeTransportState {
                requests: Vec::new(),
                response_status,
                response_body: response_body.into(),
                fail: false,
            })),
        }
    }

    pub(super) fn failing() -> Self {
        let transport = Self::new(0, "");
        transport.state.lock().unwrap().fail = true;
        transport
    }

    pub(super) fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(super) fn last_request(&self) -> HttpRequest {
        self.requests()
            .pop()
            .expect("no request reached the transport")
    }
}

impl HttpTransport for FakeTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let (fail, status, body) = {
                let mut state = self.state.lock().unwrap();
                state.requests.push(request);
                (
                    state.fail,
                    state.response_status,
                    state.response_body.clone(),
                )
            };
            if fail {
                return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused").into());
            }
            Ok(HttpResponse { status, body })
        })
    }
}

pub(super) fn assert_param(params: &[(String, String)], key: &str, value: &str) {
    assert!(
        params.iter().any(|(k, v)| k == key && v == value),
        "missing param {key}={value}; got: {params:?}"
    );
}

pub(super) fn make_client(transport: FakeTransport) -> NexmoClient {
    make_client_with_cache(transport, NoCache)
}

pub(super) fn make_client_with_cache(
    transport: FakeTransport,
    cache: impl ResponseCache + 'static,
) -> NexmoClient {
    NexmoClient {
        credentials: Credentials::new("key", "secret").unwrap(),
        base_url: "https://example.invalid/".to_owned(),
        format: ResponseFormat::Json,
        http: Arc::new(transport),
        cache: Arc::new(cache),
    }
}
