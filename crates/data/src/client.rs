//! HTTP implementation of [`RobotApi`] over `reqwest`.

use crate::api::{DeploymentResponse, LoginRequest, RobotApi, SynthesisRequest};
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, warn};
use traderobots_domain::entities::{
    ChatGroup, ChatMessage, Post, Robot, Session, SessionCookies, TradingAccount, UserProfile,
};
use traderobots_domain::value_objects::{DeploymentRequest, RobotId};

const CREATE_STRATEGY_PATH: &str = "/api/robots/create_winrate_robot/";
const ROBOTS_PATH: &str = "/api/robots/";
const ACCOUNTS_PATH: &str = "/api/accounts/";
const ACCOUNT_SYNC_PATH: &str = "/api/accounts/sync/";
const LOGIN_PATH: &str = "/api/users/login/";
const LOGOUT_PATH: &str = "/api/users/logout/";
const POSTS_PATH: &str = "/api/social/posts/";
const GROUPS_PATH: &str = "/api/social/groups/";
const MESSAGES_PATH: &str = "/api/social/messages/";

const SESSION_COOKIE: &str = "sessionid";
const CSRF_COOKIE: &str = "csrftoken";
const CSRF_HEADER: &str = "X-CSRFToken";

/// Backend client bound to one session.
///
/// The backend authenticates with its session cookie. Cookies stored on the
/// session are replayed through the client's jar, unsafe requests carry the
/// CSRF token, and a token header is added when the session has one.
///
/// The session is fixed at construction; after signing in or out, build a
/// new client with the new session.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    jar: Arc<Jar>,
    origin: Url,
    base_url: String,
    session: Session,
}

impl BackendClient {
    /// Creates a client for the configured backend.
    ///
    /// # Errors
    /// Returns [`ApiError::Transport`] if the API URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: &ClientConfig, session: Session) -> ApiResult<Self> {
        let base_url = config.api_url.trim_end_matches('/').to_string();
        let origin = Url::parse(&base_url)
            .map_err(|e| ApiError::Transport(format!("invalid API URL {base_url}: {e}")))?;

        let jar = Arc::new(Jar::default());
        if let Some(cookies) = session.cookies() {
            for (name, value) in [
                (SESSION_COOKIE, &cookies.session_id),
                (CSRF_COOKIE, &cookies.csrf_token),
            ] {
                if let Some(value) = value {
                    jar.add_cookie_str(&format!("{name}={value}; Path=/"), &origin);
                }
            }
            debug!("Restored session cookies");
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            jar,
            origin,
            base_url,
            session,
        })
    }

    /// The session this client authenticates with.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current value of a cookie the backend set for this origin.
    fn cookie(&self, name: &str) -> Option<String> {
        let header = self.jar.cookies(&self.origin)?;
        let raw = header.to_str().ok()?;
        raw.split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    }

    /// Session cookies currently held by the jar.
    fn session_cookies(&self) -> SessionCookies {
        SessionCookies {
            session_id: self.cookie(SESSION_COOKIE),
            csrf_token: self.cookie(CSRF_COOKIE),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "Backend request");

        let unsafe_method = !method.is_safe();
        let mut builder = self.http.request(method, url);
        if unsafe_method && let Some(csrf) = self.cookie(CSRF_COOKIE) {
            // Django also checks the referer on HTTPS.
            builder = builder
                .header(CSRF_HEADER, csrf)
                .header("Referer", format!("{}/", self.base_url));
        }
        match self.session.token() {
            Some(token) => builder.header("Authorization", format!("Token {token}")),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = ApiError::from_status(status, &body);
            warn!(status = status.as_u16(), error = %error, "Backend returned an error");
            return Err(error);
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl RobotApi for BackendClient {
    async fn create_strategy(&self, request: &SynthesisRequest) -> ApiResult<Robot> {
        info!(
            symbol = %request.symbol,
            timeframe = %request.timeframe,
            indicators = request.indicators.len(),
            "Submitting strategy for synthesis"
        );
        self.send(self.request(Method::POST, CREATE_STRATEGY_PATH).json(request))
            .await
    }

    async fn deploy_robot(
        &self,
        robot_id: &RobotId,
        request: &DeploymentRequest,
    ) -> ApiResult<DeploymentResponse> {
        let path = format!("{ROBOTS_PATH}{robot_id}/deploy/");
        info!(robot = %robot_id, account = %request.account_id, "Deploying robot");
        self.send(self.request(Method::POST, &path).json(request))
            .await
    }

    async fn list_robots(&self) -> ApiResult<Vec<Robot>> {
        self.send(self.request(Method::GET, ROBOTS_PATH)).await
    }

    async fn list_accounts(&self) -> ApiResult<Vec<TradingAccount>> {
        self.send(self.request(Method::GET, ACCOUNTS_PATH)).await
    }

    async fn sync_account(&self) -> ApiResult<TradingAccount> {
        self.send(self.request(Method::GET, ACCOUNT_SYNC_PATH))
            .await
    }

    async fn login(&self, credentials: &LoginRequest) -> ApiResult<UserProfile> {
        info!(username = %credentials.username, "Signing in");
        let mut user: UserProfile = self
            .send(self.request(Method::POST, LOGIN_PATH).json(credentials))
            .await?;

        user.cookies = self.session_cookies();
        if user.token.is_none() && user.cookies.session_id.is_none() {
            warn!(username = %user.username, "Login returned neither a token nor a session cookie");
        }
        Ok(user)
    }

    async fn logout(&self) -> ApiResult<()> {
        let _: serde_json::Value = self
            .send(self.request(Method::POST, LOGOUT_PATH))
            .await?;
        Ok(())
    }

    async fn list_posts(&self) -> ApiResult<Vec<Post>> {
        self.send(self.request(Method::GET, POSTS_PATH)).await
    }

    async fn list_groups(&self) -> ApiResult<Vec<ChatGroup>> {
        self.send(self.request(Method::GET, GROUPS_PATH)).await
    }

    async fn list_messages(&self) -> ApiResult<Vec<ChatMessage>> {
        self.send(self.request(Method::GET, MESSAGES_PATH)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::IndicatorSettings;
    use crate::session::SessionStore;
    use axum::Json;
    use axum::Router;
    use axum::extract::Path;
    use axum::http::header::{COOKIE, SET_COOKIE};
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::AppendHeaders;
    use axum::routing::{get, post};
    use serde_json::{Value, json};
    use std::time::Duration;
    use traderobots_domain::entities::UserProfile;
    use traderobots_domain::enums::{IndicatorKind, Symbol, Timeframe};
    use traderobots_domain::value_objects::{RiskSettings, RsiConfig};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client_for(url: &str, session: Session) -> BackendClient {
        let config = ClientConfig {
            timeout: Duration::from_secs(2),
            ..ClientConfig::default()
        }
        .with_api_url(url);
        BackendClient::new(&config, session).unwrap()
    }

    fn rsi_request() -> SynthesisRequest {
        SynthesisRequest {
            symbol: Symbol::Eurusd,
            timeframe: Timeframe::H1,
            indicators: vec![IndicatorKind::Rsi],
            risk: RiskSettings::default(),
            settings: IndicatorSettings {
                rsi_settings: Some(RsiConfig::default()),
                ..IndicatorSettings::default()
            },
        }
    }

    #[tokio::test]
    async fn test_create_strategy_posts_payload() {
        let router = Router::new().route(
            CREATE_STRATEGY_PATH,
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["indicators"], json!(["rsi"]));
                assert_eq!(body["risk"]["lot"], 0.01);
                (
                    StatusCode::CREATED,
                    Json(json!({
                        "id": 31,
                        "symbol": body["symbol"],
                        "win_rate": 64.2,
                        "mql5_code": "// generated"
                    })),
                )
            }),
        );
        let url = serve(router).await;

        let robot = client_for(&url, Session::Anonymous)
            .create_strategy(&rsi_request())
            .await
            .unwrap();

        assert_eq!(robot.id, RobotId::server("31"));
        assert_eq!(robot.mql5(), Some("// generated"));
    }

    #[tokio::test]
    async fn test_server_error_is_transport_class() {
        let router = Router::new().route(
            CREATE_STRATEGY_PATH,
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "MT5 terminal offline"})),
                )
            }),
        );
        let url = serve(router).await;

        let err = client_for(&url, Session::Anonymous)
            .create_strategy(&rsi_request())
            .await
            .unwrap_err();

        assert!(err.is_transport_class());
        assert_eq!(err.server_message(), Some("MT5 terminal offline"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(&format!("http://{addr}"), Session::Anonymous)
            .list_robots()
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[tokio::test]
    async fn test_deploy_surfaces_error_message() {
        let router = Router::new().route(
            "/api/robots/{id}/deploy/",
            post(|Path(id): Path<String>| async move {
                assert_eq!(id, "8");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "Account 4 is not connected"})),
                )
            }),
        );
        let url = serve(router).await;

        let err = client_for(&url, Session::Anonymous)
            .deploy_robot(
                &RobotId::server("8"),
                &DeploymentRequest::new("4", RiskSettings::deployment_default()),
            )
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ApiError::rejected(400, "Account 4 is not connected")
        );
    }

    #[tokio::test]
    async fn test_session_token_is_sent() {
        let router = Router::new().route(
            ACCOUNTS_PATH,
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get("Authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                if auth == "Token abc" {
                    (StatusCode::OK, Json(json!([{"id": 1, "mt5_login": "5100"}])))
                } else {
                    (StatusCode::UNAUTHORIZED, Json(json!({"detail": "no"})))
                }
            }),
        );
        let url = serve(router).await;

        let anonymous = client_for(&url, Session::Anonymous).list_accounts().await;
        assert_eq!(anonymous.unwrap_err(), ApiError::Unauthorized { status: 401 });

        let user = UserProfile {
            id: "1".to_string(),
            username: "ada".to_string(),
            email: String::new(),
            is_staff: false,
            is_superuser: false,
            token: Some("abc".to_string()),
            cookies: SessionCookies::default(),
        };
        let accounts = client_for(&url, Session::Authenticated(user))
            .list_accounts()
            .await
            .unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].id, "1");
    }

    fn has_session_cookie(headers: &HeaderMap) -> bool {
        headers
            .get(COOKIE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|cookies| cookies.split("; ").any(|c| c == "sessionid=abc"))
    }

    #[tokio::test]
    async fn test_cookie_login_carries_over_to_new_client() {
        let router = Router::new()
            .route(
                LOGIN_PATH,
                post(|| async {
                    (
                        AppendHeaders([
                            (SET_COOKIE, "csrftoken=csrf1; Path=/"),
                            (SET_COOKIE, "sessionid=abc; HttpOnly; Path=/"),
                        ]),
                        Json(json!({
                            "id": 2,
                            "username": "ada",
                            "email": "ada@example.com",
                            "profile": {"bio": ""},
                            "is_staff": false,
                            "is_superuser": false
                        })),
                    )
                }),
            )
            .route(
                ACCOUNTS_PATH,
                get(|headers: HeaderMap| async move {
                    if has_session_cookie(&headers) {
                        (StatusCode::OK, Json(json!([{"id": 1, "mt5_login": "5100"}])))
                    } else {
                        (StatusCode::FORBIDDEN, Json(json!({"detail": "no"})))
                    }
                }),
            )
            .route(
                CREATE_STRATEGY_PATH,
                post(|headers: HeaderMap| async move {
                    let csrf = headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok());
                    if has_session_cookie(&headers) && csrf == Some("csrf1") {
                        (StatusCode::CREATED, Json(json!({"id": 9, "symbol": "EURUSD"})))
                    } else {
                        (StatusCode::FORBIDDEN, Json(json!({"detail": "CSRF Failed"})))
                    }
                }),
            );
        let url = serve(router).await;

        let user = client_for(&url, Session::Anonymous)
            .login(&LoginRequest::new("ada", "pw"))
            .await
            .unwrap();
        assert_eq!(user.token, None);
        assert_eq!(user.cookies.session_id.as_deref(), Some("abc"));
        assert_eq!(user.cookies.csrf_token.as_deref(), Some("csrf1"));

        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save(&Session::Authenticated(user)).unwrap();

        let client = client_for(&url, store.load().unwrap());
        let accounts = client.list_accounts().await.unwrap();
        assert_eq!(accounts.len(), 1);

        let robot = client.create_strategy(&rsi_request()).await.unwrap();
        assert_eq!(robot.id, RobotId::server("9"));

        let anonymous = client_for(&url, Session::Anonymous).list_accounts().await;
        assert_eq!(anonymous.unwrap_err(), ApiError::Unauthorized { status: 403 });
    }

    #[tokio::test]
    async fn test_undecodable_body_is_decode_error() {
        let router = Router::new().route(ROBOTS_PATH, get(|| async { "not json" }));
        let url = serve(router).await;

        let err = client_for(&url, Session::Anonymous)
            .list_robots()
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        assert!(err.is_transport_class());
    }
}
