//! FortiManager JSON-RPC client
//!
//! Every call is a POST of a single request object to `<host>/jsonrpc`:
//!
//! ```text
//! {"id": 1, "method": "get", "params": [{"url": "/pm/config/device/fgt1/vdom/root/firewall/policy"}],
//!  "session": "...", "verbose": 1}
//! ```
//!
//! The client is an explicit value owned by the provider. With password
//! credentials it logs in lazily on the first call and keeps the session id
//! behind an async mutex; with a token it sends a bearer header instead.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value as Json, json};
use tokio::sync::Mutex;

use crate::config::{ConfigError, Credentials, ProviderConfig};

/// Status code for a successful call
pub const STATUS_OK: i64 = 0;
/// Status code returned by `add` when an object with the same key exists
pub const STATUS_OBJECT_ALREADY_EXISTS: i64 = -2;
/// Status code returned when the addressed object does not exist
pub const STATUS_OBJECT_NOT_EXIST: i64 = -3;

const LOGIN_URL: &str = "/sys/login/user";
const LOGOUT_URL: &str = "/sys/logout";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} from {endpoint}")]
    HttpStatus { status: u16, endpoint: String },

    #[error("Failed to decode JSON-RPC response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Empty JSON-RPC result for {url}")]
    EmptyResult { url: String },

    #[error("{method} {url} failed with code {code}: {message}")]
    Status {
        method: Method,
        url: String,
        code: i64,
        message: String,
    },

    #[error("Login failed: {0}")]
    Login(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Whether the device reported that the object does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ClientError::Status {
                code: STATUS_OBJECT_NOT_EXIST,
                ..
            }
        )
    }

    /// Whether `add` was refused because the key is already taken
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            ClientError::Status {
                code: STATUS_OBJECT_ALREADY_EXISTS,
                ..
            }
        )
    }
}

/// JSON-RPC method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    Add,
    Update,
    Set,
    Delete,
    Move,
    Exec,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Add => "add",
            Method::Update => "update",
            Method::Set => "set",
            Method::Delete => "delete",
            Method::Move => "move",
            Method::Exec => "exec",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the request `params` array
#[derive(Debug, Clone, Default, Serialize)]
pub struct Params {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl Params {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_data(mut self, data: Json) -> Self {
        self.data = Some(data);
        self
    }
}

#[derive(Debug, Serialize)]
struct Request {
    id: u64,
    method: Method,
    params: Vec<Params>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session: Option<String>,
    verbose: u8,
}

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    result: Vec<ResultEntry>,
    #[serde(default)]
    session: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResultEntry {
    status: CallStatus,
    #[serde(default)]
    data: Option<Json>,
}

#[derive(Debug, Deserialize)]
struct CallStatus {
    code: i64,
    #[serde(default)]
    message: String,
}

/// FortiManager JSON-RPC client
pub struct FmgClient {
    http: reqwest::Client,
    endpoint: String,
    credentials: Credentials,
    session: Mutex<Option<String>>,
    next_id: AtomicU64,
}

impl fmt::Debug for FmgClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmgClient")
            .field("endpoint", &self.endpoint)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl FmgClient {
    /// Build a client from a validated provider configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let credentials = config.credentials()?;

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint(),
            credentials,
            session: Mutex::new(None),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    // =========================================================================
    // Object Operations
    // =========================================================================

    /// Fetch a single object or collection. `None` when it does not exist.
    pub async fn get(&self, url: &str) -> Result<Option<Json>, ClientError> {
        match self.call(Method::Get, Params::new(url)).await {
            Ok(data) => Ok(Some(data.unwrap_or(Json::Null))),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fetch a collection as an ordered list. A missing collection is empty.
    pub async fn list(&self, url: &str) -> Result<Vec<Json>, ClientError> {
        Ok(match self.get(url).await? {
            Some(Json::Array(items)) => items,
            Some(Json::Null) | None => Vec::new(),
            Some(other) => vec![other],
        })
    }

    /// Create an object in a collection. Returns the response data, which
    /// carries the mkey of server-assigned objects.
    pub async fn add(&self, url: &str, data: Json) -> Result<Option<Json>, ClientError> {
        self.call(Method::Add, Params::new(url).with_data(data))
            .await
    }

    /// Modify the given fields of an existing object
    pub async fn update(&self, url: &str, data: Json) -> Result<Option<Json>, ClientError> {
        self.call(Method::Update, Params::new(url).with_data(data))
            .await
    }

    /// Replace an object, creating it when missing
    pub async fn set(&self, url: &str, data: Json) -> Result<Option<Json>, ClientError> {
        self.call(Method::Set, Params::new(url).with_data(data))
            .await
    }

    pub async fn delete(&self, url: &str) -> Result<(), ClientError> {
        self.call(Method::Delete, Params::new(url)).await.map(|_| ())
    }

    /// Move the object at `url` before or after the sibling `target`
    pub async fn move_object(&self, url: &str, option: &str, target: &str) -> Result<(), ClientError> {
        let params = Params {
            url: url.to_string(),
            option: Some(option.to_string()),
            target: Some(target.to_string()),
            ..Default::default()
        };
        self.call(Method::Move, params).await.map(|_| ())
    }

    /// End the login session, if one was opened
    pub async fn logout(&self) -> Result<(), ClientError> {
        let session = self.session.lock().await.take();
        if let Some(session) = session {
            let response = self
                .send(Method::Exec, Params::new(LOGOUT_URL), Some(session))
                .await?;
            check_first(Method::Exec, LOGOUT_URL, response)?;
            log::debug!("logged out of {}", self.endpoint);
        }
        Ok(())
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// Execute one call and return the data of its first result entry
    pub async fn call(&self, method: Method, params: Params) -> Result<Option<Json>, ClientError> {
        let url = params.url.clone();
        let session = self.session().await?;
        let response = self.send(method, params, session).await?;
        check_first(method, &url, response)
    }

    async fn session(&self) -> Result<Option<String>, ClientError> {
        let (username, password) = match &self.credentials {
            Credentials::Token(_) => return Ok(None),
            Credentials::Password { username, password } => (username, password),
        };

        let mut session = self.session.lock().await;
        if let Some(existing) = session.as_ref() {
            return Ok(Some(existing.clone()));
        }

        let params =
            Params::new(LOGIN_URL).with_data(json!({ "user": username, "passwd": password }));
        let response = self.send(Method::Exec, params, None).await?;
        let opened = response.session.clone();
        check_first(Method::Exec, LOGIN_URL, response).map_err(|e| match e {
            ClientError::Status { message, .. } => ClientError::Login(message),
            other => other,
        })?;
        let opened =
            opened.ok_or_else(|| ClientError::Login("no session in login response".to_string()))?;

        log::debug!("logged in to {} as {}", self.endpoint, username);
        *session = Some(opened.clone());
        Ok(Some(opened))
    }

    async fn send(
        &self,
        method: Method,
        params: Params,
        session: Option<String>,
    ) -> Result<Response, ClientError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        log::debug!("jsonrpc #{} {} {}", id, method, params.url);

        let request = Request {
            id,
            method,
            params: vec![params],
            session,
            verbose: 1,
        };

        let mut builder = self.http.post(&self.endpoint).json(&request);
        if let Credentials::Token(token) = &self.credentials {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::HttpStatus {
                status: status.as_u16(),
                endpoint: self.endpoint.clone(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn check_first(method: Method, url: &str, response: Response) -> Result<Option<Json>, ClientError> {
    let entry = response
        .result
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::EmptyResult {
            url: url.to_string(),
        })?;

    if entry.status.code != STATUS_OK {
        return Err(ClientError::Status {
            method,
            url: url.to_string(),
            code: entry.status.code,
            message: entry.status.message,
        });
    }
    Ok(entry.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn token_client(server: &MockServer) -> FmgClient {
        FmgClient::new(&ProviderConfig {
            hostname: server.base_url(),
            token: Some("tok".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    fn ok(url: &str, data: Json) -> Json {
        json!({
            "id": 1,
            "result": [{"status": {"code": 0, "message": "OK"}, "url": url, "data": data}]
        })
    }

    #[tokio::test]
    async fn get_sends_bearer_token_and_returns_data() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/jsonrpc")
                    .header("Authorization", "Bearer tok")
                    .body_contains("\"method\":\"get\"")
                    .body_contains("\"verbose\":1");
                then.status(200)
                    .json_body(ok("/pm/config/adom/root/obj/firewall/address/web", json!({"name": "web"})));
            })
            .await;

        let client = token_client(&server);
        let data = client
            .get("/pm/config/adom/root/obj/firewall/address/web")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(data, Some(json!({"name": "web"})));
    }

    #[tokio::test]
    async fn get_missing_object_is_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/jsonrpc");
                then.status(200).json_body(json!({
                    "id": 1,
                    "result": [{"status": {"code": -3, "message": "Object does not exist"}, "url": "/x"}]
                }));
            })
            .await;

        let client = token_client(&server);
        assert_eq!(client.get("/x").await.unwrap(), None);
        assert!(client.list("/x").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/jsonrpc");
                then.status(200).json_body(json!({
                    "id": 1,
                    "result": [{"status": {"code": -10, "message": "The data is invalid"}, "url": "/x"}]
                }));
            })
            .await;

        let client = token_client(&server);
        let err = client.add("/x", json!({"name": "a"})).await.unwrap_err();
        match err {
            ClientError::Status { method, code, .. } => {
                assert_eq!(method, Method::Add);
                assert_eq!(code, -10);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn http_failure_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/jsonrpc");
                then.status(503);
            })
            .await;

        let client = token_client(&server);
        let err = client.delete("/x").await.unwrap_err();
        assert!(matches!(err, ClientError::HttpStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn move_sends_option_and_target() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/jsonrpc")
                    .body_contains("\"method\":\"move\"")
                    .body_contains("\"option\":\"before\"")
                    .body_contains("\"target\":\"3\"");
                then.status(200).json_body(ok("/p/5", Json::Null));
            })
            .await;

        let client = token_client(&server);
        client.move_object("/p/5", "before", "3").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn password_login_reuses_session() {
        let server = MockServer::start_async().await;
        let login = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/jsonrpc")
                    .body_contains("\"method\":\"exec\"")
                    .body_contains("/sys/login/user");
                then.status(200).json_body(json!({
                    "id": 1,
                    "result": [{"status": {"code": 0, "message": "OK"}, "url": "/sys/login/user"}],
                    "session": "sess-1"
                }));
            })
            .await;
        let get = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/jsonrpc")
                    .body_contains("\"method\":\"get\"")
                    .body_contains("\"session\":\"sess-1\"");
                then.status(200).json_body(ok("/x", json!([])));
            })
            .await;

        let client = FmgClient::new(&ProviderConfig {
            hostname: server.base_url(),
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
            ..Default::default()
        })
        .unwrap();

        client.list("/x").await.unwrap();
        client.list("/x").await.unwrap();

        login.assert_hits_async(1).await;
        get.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn rejected_login_is_a_login_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/jsonrpc");
                then.status(200).json_body(json!({
                    "id": 1,
                    "result": [{"status": {"code": -22, "message": "Login fail"}, "url": "/sys/login/user"}]
                }));
            })
            .await;

        let client = FmgClient::new(&ProviderConfig {
            hostname: server.base_url(),
            username: Some("admin".to_string()),
            password: Some("wrong".to_string()),
            ..Default::default()
        })
        .unwrap();

        let err = client.get("/x").await.unwrap_err();
        assert!(matches!(err, ClientError::Login(ref m) if m == "Login fail"));
    }

    #[test]
    fn new_rejects_incomplete_config() {
        let err = FmgClient::new(&ProviderConfig::default()).unwrap_err();
        assert!(matches!(err, ClientError::Config(ConfigError::MissingHostname)));
    }
}
