#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::Response;
use axum::Router;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use capital_rs::{CapitalClient, Configuration, ManualClock};
use chrono::{DateTime, TimeZone, Utc};
use rsa::pkcs8::EncodePublicKey;
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey};
use serde_json::{Value, json};


pub const API_KEY: &str = "test-api-key";
pub const IDENTIFIER: &str = "trader@example.com";
pub const PASSWORD: &str = "s3cret|pass";
pub const KEY_TIMESTAMP: i64 = 1_700_000_000_000;
pub const CST: &str = "cst-token-1";
pub const SECURITY_TOKEN: &str = "security-token-1";
pub const ROTATED_SECURITY_TOKEN: &str = "security-token-2";
const API_PREFIX: &str = "/api/v1";


/// A request as seen by the mock, path stripped of the API prefix.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}


pub struct MockState {
    private_key: RsaPrivateKey,
    public_key: String,
    requests: Mutex<Vec<RecordedRequest>>,
    canned: Mutex<HashMap<(Method, String), (StatusCode, String)>>,
    pub fail_logout: AtomicBool,
    pub omit_tokens: AtomicBool,
}


/// In-process stand-in for the REST API.
///
/// Serves the login handshake with a real RSA key pair, so a login only
/// succeeds when the password was encrypted the way the API expects.
/// Anything else answers from canned responses, or `{}`.
pub struct MockServer {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockServer {
    pub async fn start() -> MockServer {
        let private_key =
            RsaPrivateKey::new(&mut rand::thread_rng(), 1024).expect("key generation");
        let der = private_key
            .to_public_key()
            .to_public_key_der()
            .expect("public key der");
        let state = Arc::new(MockState {
            private_key,
            public_key: STANDARD.encode(der.as_bytes()),
            requests: Mutex::new(Vec::new()),
            canned: Mutex::new(HashMap::new()),
            fail_logout: AtomicBool::new(false),
            omit_tokens: AtomicBool::new(false),
        });

        let router = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router.into_make_service())
                .await
                .unwrap();
        });

        MockServer { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn public_key(&self) -> &str {
        &self.state.public_key
    }

    /// Answer `method path` (without the API prefix) with `body`.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.respond_raw(method, path, status, &body.to_string());
    }

    pub fn respond_raw(&self, method: Method, path: &str, status: u16, body: &str) {
        self.state.canned.lock().unwrap().insert(
            (method, path.to_string()),
            (StatusCode::from_u16(status).unwrap(), body.to_string()),
        );
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request recorded")
    }

    pub fn requests_to(&self, method: Method, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn fail_logout(&self) {
        self.state.fail_logout.store(true, Ordering::SeqCst);
    }

    pub fn omit_tokens(&self) {
        self.state.omit_tokens.store(true, Ordering::SeqCst);
    }
}


async fn handle(State(state): State<Arc<MockState>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let body = String::from_utf8_lossy(&bytes).to_string();
    let full_path = parts.uri.path();
    let path = full_path.strip_prefix(API_PREFIX).unwrap_or(full_path).to_string();

    state.requests.lock().unwrap().push(RecordedRequest {
        method: parts.method.clone(),
        path: path.clone(),
        query: parts.uri.query().map(str::to_string),
        headers: parts.headers.clone(),
        body: body.clone(),
    });

    let canned = state
        .canned
        .lock()
        .unwrap()
        .get(&(parts.method.clone(), path.clone()))
        .cloned();
    if let Some((status, canned)) = canned {
        return raw_response(status, canned, &[]);
    }

    match (parts.method.as_str(), path.as_str()) {
        ("GET", "/session/encryptionKey") => json_response(
            StatusCode::OK,
            json!({"encryptionKey": state.public_key, "timeStamp": KEY_TIMESTAMP}),
            &[],
        ),
        ("POST", "/session") => login(&state, &parts.headers, &body),
        ("GET", "/session") => json_response(StatusCode::OK, session_info(), &[]),
        ("PUT", "/session") => json_response(
            StatusCode::OK,
            json!({"trailingStopsEnabled": false, "dealingEnabled": true,
                   "hasActiveDemoAccounts": true, "hasActiveLiveAccounts": false}),
            &[("X-SECURITY-TOKEN", ROTATED_SECURITY_TOKEN)],
        ),
        ("DELETE", "/session") => {
            if state.fail_logout.load(Ordering::SeqCst) {
                json_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"errorCode": "error.internal"}),
                    &[],
                )
            } else {
                json_response(StatusCode::OK, json!({"status": "SUCCESS"}), &[])
            }
        }
        _ => json_response(StatusCode::OK, json!({}), &[]),
    }
}


fn login(state: &MockState, headers: &HeaderMap, body: &str) -> Response {
    let unauthorized = || {
        json_response(
            StatusCode::UNAUTHORIZED,
            json!({"errorCode": "error.invalid.details"}),
            &[],
        )
    };
    if headers.get("X-CAP-API-KEY").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
        return json_response(
            StatusCode::UNAUTHORIZED,
            json!({"errorCode": "error.invalid.api.key"}),
            &[],
        );
    }

    let request: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let password = request["password"].as_str().unwrap_or_default();
    let plain = if request["encryptedPassword"].as_bool() == Some(true) {
        match decrypt_password(&state.private_key, password) {
            Some(plain) => plain,
            None => return unauthorized(),
        }
    } else {
        password.to_string()
    };
    if request["identifier"] != IDENTIFIER || plain != format!("{PASSWORD}|{KEY_TIMESTAMP}") {
        return unauthorized();
    }

    if state.omit_tokens.load(Ordering::SeqCst) {
        json_response(StatusCode::OK, session_details(), &[("CST", CST)])
    } else {
        json_response(
            StatusCode::OK,
            session_details(),
            &[("CST", CST), ("X-SECURITY-TOKEN", SECURITY_TOKEN)],
        )
    }
}


/// Reverse of the client-side encryption: base64 ciphertext -> base64
/// payload -> `password|timestamp`.
pub fn decrypt_password(private_key: &RsaPrivateKey, encrypted: &str) -> Option<String> {
    let ciphertext = STANDARD.decode(encrypted).ok()?;
    let payload = private_key.decrypt(Pkcs1v15Encrypt, &ciphertext).ok()?;
    let decoded = STANDARD.decode(payload).ok()?;
    String::from_utf8(decoded).ok()
}


pub fn session_details() -> Value {
    json!({
        "accountType": "CFD",
        "accountInfo": {"balance": 1000.0, "deposit": 1000.0, "profitLoss": 0.0, "available": 950.0},
        "currencyIsoCode": "USD",
        "currencySymbol": "$",
        "currentAccountId": "acc-1",
        "streamingHost": "wss://api-streaming-capital.backend-capital.com/",
        "accounts": [
            {"accountId": "acc-1", "accountName": "Main", "preferred": true,
             "accountType": "CFD", "currency": "USD", "symbol": "$"},
            {"accountId": "acc-2", "accountName": "Second", "preferred": false,
             "accountType": "CFD", "currency": "EUR", "symbol": "€"}
        ],
        "clientId": "client-1",
        "timezoneOffset": 1,
        "hasActiveDemoAccounts": true,
        "hasActiveLiveAccounts": false,
        "trailingStopsEnabled": false
    })
}


pub fn session_info() -> Value {
    json!({
        "clientId": "client-1",
        "accountId": "acc-1",
        "timezoneOffset": 1,
        "locale": "en",
        "currency": "USD",
        "streamEndpoint": "wss://api-streaming-capital.backend-capital.com/"
    })
}


fn json_response(status: StatusCode, body: Value, headers: &[(&str, &str)]) -> Response {
    raw_response(status, body.to_string(), headers)
}


fn raw_response(status: StatusCode, body: String, headers: &[(&str, &str)]) -> Response {
    let mut builder = axum::http::Response::builder()
        .status(status)
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::from(body)).unwrap()
}


pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}


pub fn setup_client(server: &MockServer) -> (CapitalClient, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start_time()));
    let config = Configuration::new(API_KEY, true).with_base_url(server.base_url());
    let client = CapitalClient::with_clock(config, clock.clone()).expect("client");
    (client, clock)
}


/// Mock server plus a client that is already logged in at [`start_time`].
pub async fn setup_logged_in() -> (MockServer, CapitalClient, Arc<ManualClock>) {
    let server = MockServer::start().await;
    let (client, clock) = setup_client(&server);
    client
        .login(IDENTIFIER, PASSWORD, false)
        .await
        .expect("login against mock");
    (server, client, clock)
}
