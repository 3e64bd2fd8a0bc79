//! In-process stub of the CRM backend.
//!
//! Each test starts its own server on an ephemeral port with a routing
//! closure and inspects the requests it recorded afterwards.

use std::convert::Infallible;
use std::sync::Arc;
use std::sync::Mutex;

use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::Request;
use hyper::Response;
use hyper::body::Bytes;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use freight_lib::CrmClient;
use freight_lib::auth::SharedTokenProvider;

/// A request as seen by the stub.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path and query, e.g. `/api/highlights/?table=clients`.
    pub uri: String,
    pub host: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn path(&self) -> &str {
        self.uri.split('?').next().unwrap_or(&self.uri)
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

type Handler = Arc<dyn Fn(&Recorded) -> (u16, String) + Send + Sync>;

pub struct StubBackend {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubBackend {
    /// Starts a server answering every request with `handler(request)`.
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&Recorded) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handler: Handler = Arc::new(handler);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = requests.clone();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let handler = handler.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let handler = handler.clone();
                        let log = log.clone();
                        async move {
                            let header = |name: &str| {
                                req.headers()
                                    .get(name)
                                    .and_then(|v| v.to_str().ok())
                                    .map(String::from)
                            };
                            let method = req.method().to_string();
                            let uri = req.uri().to_string();
                            let host = header("host").unwrap_or_default();
                            let authorization = header("authorization");
                            let content_type = header("content-type");
                            let body = req
                                .into_body()
                                .collect()
                                .await
                                .map(|b| b.to_bytes())
                                .unwrap_or_default();

                            let recorded = Recorded {
                                method,
                                uri,
                                host,
                                authorization,
                                content_type,
                                body: String::from_utf8_lossy(&body).into_owned(),
                            };
                            let (status, body) = handler(&recorded);
                            log.lock().unwrap().push(recorded);

                            let response = Response::builder()
                                .status(status)
                                .header("content-type", "application/json")
                                .body(Full::new(Bytes::from(body)))
                                .unwrap();
                            Ok::<_, Infallible>(response)
                        }
                    });
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}/api"),
            requests,
        }
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// Client pointed at this stub, authenticated with `token` if given.
    pub fn client(&self, token: Option<&str>) -> (CrmClient, SharedTokenProvider) {
        let tokens = match token {
            Some(t) => SharedTokenProvider::with_token(t),
            None => SharedTokenProvider::new(),
        };
        let client = CrmClient::builder()
            .url(&self.base_url)
            .token_provider(tokens.clone())
            .build();
        (client, tokens)
    }
}

pub fn ok(body: serde_json::Value) -> (u16, String) {
    (200, body.to_string())
}
