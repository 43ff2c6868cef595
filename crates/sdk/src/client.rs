use std::{sync::Arc, time::Duration};

use parking_lot::RwLock;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    error::{Result, SdkError},
    session::Session,
    types::{
        Acknowledgement, AdminDashboard, AuthResponse, CategoryCount, CheckoutRequest,
        CheckoutSession, ClientConfig, Dashboard, LeadMagnetResponse, LeadMagnetSignup,
        LoginRequest, PaymentStatus, Prompt, PromptFilter, RegisterRequest, Survey,
        SurveyResponse, User,
    },
};

/// Backend client
///
/// Every call goes to `<endpoint>/api/...`. The client owns an explicit
/// [`Session`]: login and registration store it, `logout` clears it, and a
/// 401 answer from the backend clears it too. Clones share the same session.
///
/// # Example
///
/// ```ignore
/// use bizprompt_sdk::{ApiClient, ClientConfig};
///
/// let client = ApiClient::new(ClientConfig::new("https://api.example.com"))?;
/// client.login("ada@example.com", "secret").await?;
///
/// let me = client.me().await?;
/// println!("Logged in as {}", me.display_name());
/// ```
#[derive(Clone)]
pub struct ApiClient {
    /// Configuration
    config: ClientConfig,

    /// Shared HTTP client
    http: reqwest::Client,

    /// Current session, if logged in
    session: Arc<RwLock<Option<Session>>>,
}

impl ApiClient {
    /// Create a new client without a session
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            config,
            http,
            session: Arc::new(RwLock::new(None)),
        })
    }

    /// Resume a previously stored session
    pub fn with_session(self, session: Session) -> Self {
        *self.session.write() = Some(session);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_some()
    }

    /// Drop the current session, returning it
    pub fn logout(&self) -> Option<Session> {
        let previous = self.session.write().take();
        if let Some(ref session) = previous {
            info!(email = %session.user.email, "Logged out");
        }
        previous
    }

    // ---- auth ----

    /// Log in with email and password; stores the session
    pub async fn login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Session> {
        let request = LoginRequest {
            email: email.into(),
            password: password.into(),
        };
        let response: AuthResponse = self.post("auth/login", &request).await?;
        Ok(self.store_session(response))
    }

    /// Create an account; stores the session
    pub async fn register(&self, request: &RegisterRequest) -> Result<Session> {
        let response: AuthResponse = self.post("auth/register", request).await?;
        Ok(self.store_session(response))
    }

    /// Fetch the logged-in user
    pub async fn me(&self) -> Result<User> {
        self.require_session()?;
        self.get("auth/me").await
    }

    fn store_session(&self, response: AuthResponse) -> Session {
        let session = Session::from(response);
        info!(
            email = %session.user.email,
            role = %session.user.role,
            "Session established"
        );
        *self.session.write() = Some(session.clone());
        session
    }

    // ---- lead magnet ----

    /// Sign up for the free prompts guide
    pub async fn submit_lead_magnet(&self, signup: &LeadMagnetSignup) -> Result<LeadMagnetResponse> {
        self.post("lead-magnet/signup", signup).await
    }

    // ---- prompt library ----

    pub async fn list_prompts(&self, filter: &PromptFilter) -> Result<Vec<Prompt>> {
        let request = self.request(Method::GET, "prompts").query(filter);
        self.execute(request, "prompts").await
    }

    /// Prompt counts per category
    pub async fn prompt_categories(&self) -> Result<Vec<CategoryCount>> {
        self.get("prompts/categories").await
    }

    /// Premium prompts; requires a paid or trial subscription
    pub async fn premium_prompts(&self) -> Result<Vec<Prompt>> {
        self.require_session()?;
        self.get("prompts/premium").await
    }

    /// Account info plus the unlocked categories
    pub async fn dashboard(&self) -> Result<Dashboard> {
        let user = self.me().await?;
        let categories = self.prompt_categories().await?;
        Ok(Dashboard { user, categories })
    }

    // ---- surveys ----

    pub async fn list_surveys(&self) -> Result<Vec<Survey>> {
        self.get("surveys").await
    }

    /// Submit answers to a survey on behalf of `user_email`
    pub async fn submit_survey_response(
        &self,
        survey_id: &str,
        user_email: &str,
        answers: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Acknowledgement> {
        let url = self.segment_url("surveys", &[survey_id, "responses"])?;
        let request = self
            .authorize(self.http.post(url))
            .query(&[("user_email", user_email)])
            .json(answers);
        self.execute(request, "surveys/responses").await
    }

    // ---- admin ----

    pub async fn admin_dashboard(&self) -> Result<AdminDashboard> {
        self.require_session()?;
        self.get("admin/dashboard").await
    }

    pub async fn admin_users(&self) -> Result<Vec<User>> {
        self.require_session()?;
        self.get("admin/users").await
    }

    pub async fn admin_survey_responses(&self) -> Result<Vec<SurveyResponse>> {
        self.require_session()?;
        self.get("admin/survey-responses").await
    }

    // ---- payments ----

    /// Create a hosted checkout session
    ///
    /// Fails with [`SdkError::MissingCheckoutUrl`] when the backend answers
    /// without a payment page to redirect to.
    pub async fn create_checkout(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        let session: CheckoutSession = self.post("payments/create-checkout", request).await?;

        match session.checkout_url.as_deref() {
            Some(url) if !url.is_empty() => {
                info!(
                    product = %request.product_type,
                    session_id = session.session_id.as_deref().unwrap_or(""),
                    "Checkout session created"
                );
                Ok(session)
            }
            _ => Err(SdkError::MissingCheckoutUrl),
        }
    }

    /// Read the payment status of a checkout session
    pub async fn payment_status(&self, session_id: &str) -> Result<PaymentStatus> {
        let url = self.segment_url("payments/status", &[session_id])?;
        let request = self.authorize(self.http.get(url));
        self.execute(request, "payments/status").await
    }

    // ---- plumbing ----

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.request(Method::GET, path);
        self.execute(request, path).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.request(Method::POST, path).json(body);
        self.execute(request, path).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.api_url(path);
        self.authorize(self.http.request(method, url))
    }

    /// Attach the bearer token when a session is present
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.read().as_ref() {
            Some(session) => request.header("Authorization", session.authorization()),
            None => request,
        }
    }

    /// Build `<api>/<base>/<segment>/...` with each segment percent-encoded
    fn segment_url(&self, base: &str, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.config.api_url(base))?;
        url.path_segments_mut()
            .map_err(|_| SdkError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .extend(segments);
        Ok(url)
    }

    fn require_session(&self) -> Result<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(SdkError::NotAuthenticated)
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder, path: &str) -> Result<T> {
        debug!(path = %path, "Sending request");
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            return Ok(serde_json::from_slice(&body)?);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(status, &body);

        if status == StatusCode::UNAUTHORIZED {
            if self.session.write().take().is_some() {
                warn!(path = %path, detail = %detail, "Session rejected by backend, cleared");
            }
            return Err(SdkError::Unauthorized(detail));
        }

        warn!(path = %path, status = status.as_u16(), detail = %detail, "Request failed");
        Err(SdkError::Api {
            status: status.as_u16(),
            detail,
        })
    }
}

/// Best-effort human message from an error response body
fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value.get("detail") {
            Some(serde_json::Value::String(detail)) => return detail.clone(),
            Some(other) => return other.to_string(),
            None => {}
        }
    }

    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        body.trim().to_string()
    }
}

/// Read the checkout session id from the URL the payment page redirected to
///
/// Returns `None` when the URL does not parse or the `session_id` parameter
/// is missing or empty.
pub fn session_id_from_redirect(redirect_url: &str) -> Option<String> {
    let url = match Url::parse(redirect_url) {
        Ok(url) => url,
        Err(e) => {
            debug!(error = %e, "Redirect URL does not parse");
            return None;
        }
    };
    url.query_pairs()
        .find(|(key, _)| key == "session_id")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::{HeaderMap, StatusCode as AxumStatus},
        response::IntoResponse,
        routing::{get, post},
    };
    use serde_json::json;

    use super::*;
    use crate::{session::tests::token_with_exp, types::ProductType};

    #[derive(Clone, Default)]
    struct Backend {
        status_calls: Arc<AtomicUsize>,
    }

    fn user_json() -> serde_json::Value {
        json!({
            "id": "u-1",
            "email": "ada@example.com",
            "first_name": "Ada",
            "role": "customer",
            "is_active": true,
            "subscription_status": "free"
        })
    }

    fn bearer(headers: &HeaderMap) -> Option<String> {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
    }

    async fn login(Json(body): Json<serde_json::Value>) -> impl IntoResponse {
        if body["password"] == "secret" {
            (
                AxumStatus::OK,
                Json(json!({
                    "access_token": token_with_exp(4_102_444_800),
                    "token_type": "bearer",
                    "user": user_json()
                })),
            )
        } else {
            (
                AxumStatus::UNAUTHORIZED,
                Json(json!({ "detail": "Invalid email or password" })),
            )
        }
    }

    async fn me(headers: HeaderMap) -> impl IntoResponse {
        match bearer(&headers) {
            Some(value) if value.starts_with("Bearer ") && !value.contains("revoked") => {
                (AxumStatus::OK, Json(user_json()))
            }
            _ => (
                AxumStatus::UNAUTHORIZED,
                Json(json!({ "detail": "Invalid authentication credentials" })),
            ),
        }
    }

    async fn categories() -> Json<serde_json::Value> {
        Json(json!([
            { "category": "email", "count": 12 },
            { "category": "sales", "count": 9 }
        ]))
    }

    async fn prompts(Query(params): Query<std::collections::HashMap<String, String>>) -> Json<serde_json::Value> {
        let category = params.get("category").cloned().unwrap_or_else(|| "email".to_string());
        Json(json!([
            { "id": "p-1", "title": "Follow-up", "category": category, "is_premium": false }
        ]))
    }

    async fn checkout(Json(body): Json<serde_json::Value>) -> impl IntoResponse {
        if body["product_type"] == "regular" {
            // Misconfigured backend: session without a payment page
            return Json(json!({ "session_id": "cs_test_regular" }));
        }
        Json(json!({
            "checkout_url": "https://checkout.example.com/pay/cs_test_presale",
            "session_id": "cs_test_presale"
        }))
    }

    async fn status(
        State(backend): State<Backend>,
        Path(session_id): Path<String>,
    ) -> impl IntoResponse {
        backend.status_calls.fetch_add(1, Ordering::SeqCst);
        if session_id == "cs_broken" {
            return (
                AxumStatus::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "Failed to check payment status" })),
            );
        }
        (
            AxumStatus::OK,
            Json(json!({
                "session_id": session_id,
                "payment_status": "paid",
                "amount": 37.0,
                "currency": "usd",
                "product_name": "AI Business Automation Toolkit - Presale"
            })),
        )
    }

    async fn survey_response(
        Path(survey_id): Path<String>,
        Query(params): Query<std::collections::HashMap<String, String>>,
        Json(body): Json<serde_json::Value>,
    ) -> impl IntoResponse {
        let ok = survey_id == "s-1"
            && params.get("user_email").map(String::as_str) == Some("ada@example.com")
            && body["q1"] == "yes";
        if ok {
            (
                AxumStatus::OK,
                Json(json!({ "success": true, "message": "Survey response submitted" })),
            )
        } else {
            (AxumStatus::NOT_FOUND, Json(json!({ "detail": "Survey not found" })))
        }
    }

    async fn spawn_backend() -> (ApiClient, Backend) {
        let backend = Backend::default();
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/me", get(me))
            .route("/api/prompts", get(prompts))
            .route("/api/prompts/categories", get(categories))
            .route("/api/payments/create-checkout", post(checkout))
            .route("/api/payments/status/{session_id}", get(status))
            .route("/api/surveys/{survey_id}/responses", post(survey_response))
            .with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = ApiClient::new(ClientConfig::new(format!("http://{}", addr))).unwrap();
        (client, backend)
    }

    #[tokio::test]
    async fn test_login_stores_session_and_authorizes() {
        let (client, _) = spawn_backend().await;
        assert!(matches!(client.me().await, Err(SdkError::NotAuthenticated)));

        let session = client.login("ada@example.com", "secret").await.unwrap();
        assert_eq!(session.user.email, "ada@example.com");
        assert_eq!(session.expires_at, Some(4_102_444_800));
        assert!(client.is_authenticated());

        let me = client.me().await.unwrap();
        assert_eq!(me.display_name(), "Ada");

        let dashboard = client.dashboard().await.unwrap();
        assert_eq!(dashboard.total_prompts(), 21);
    }

    #[tokio::test]
    async fn test_bad_credentials_surface_backend_detail() {
        let (client, _) = spawn_backend().await;
        let err = client.login("ada@example.com", "wrong").await.unwrap_err();
        match err {
            SdkError::Unauthorized(detail) => assert_eq!(detail, "Invalid email or password"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_rejected_token_clears_session() {
        let (client, _) = spawn_backend().await;
        let user = client.login("ada@example.com", "secret").await.unwrap().user;
        let client = client.with_session(Session::new("revoked-token", user));

        let err = client.me().await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(client.session().is_none());
    }

    #[tokio::test]
    async fn test_prompt_filter_is_sent_as_query() {
        let (client, _) = spawn_backend().await;
        let filter = PromptFilter::default().with_category("sales".parse().unwrap());
        let prompts = client.list_prompts(&filter).await.unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].category.as_str(), "sales");
    }

    #[tokio::test]
    async fn test_checkout_requires_payment_page() {
        let (client, _) = spawn_backend().await;

        let mut request = CheckoutRequest {
            product_type: ProductType::Presale,
            success_url: "https://shop.example.com/success".to_string(),
            cancel_url: "https://shop.example.com/".to_string(),
        };
        let session = client.create_checkout(&request).await.unwrap();
        assert_eq!(session.session_id.as_deref(), Some("cs_test_presale"));

        request.product_type = ProductType::Regular;
        let err = client.create_checkout(&request).await.unwrap_err();
        assert!(matches!(err, SdkError::MissingCheckoutUrl));
    }

    #[tokio::test]
    async fn test_payment_status() {
        let (client, backend) = spawn_backend().await;

        let status = client.payment_status("cs_test_presale").await.unwrap();
        assert!(status.is_paid());
        assert_eq!(status.session_id, "cs_test_presale");

        let err = client.payment_status("cs_broken").await.unwrap_err();
        match err {
            SdkError::Api { status, detail } => {
                assert_eq!(status, 500);
                assert_eq!(detail, "Failed to check payment status");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(backend.status_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_submit_survey_response() {
        let (client, _) = spawn_backend().await;
        let mut answers = serde_json::Map::new();
        answers.insert("q1".to_string(), json!("yes"));

        let ack = client
            .submit_survey_response("s-1", "ada@example.com", &answers)
            .await
            .unwrap();
        assert!(ack.success);

        let err = client
            .submit_survey_response("s-404", "ada@example.com", &answers)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_session_id_from_redirect() {
        assert_eq!(
            session_id_from_redirect("https://shop.example.com/success?session_id=cs_test_1")
                .as_deref(),
            Some("cs_test_1")
        );
        assert_eq!(
            session_id_from_redirect("https://shop.example.com/success?session_id="),
            None
        );
        assert_eq!(session_id_from_redirect("https://shop.example.com/success"), None);
        assert_eq!(session_id_from_redirect("not a url"), None);
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(
            error_detail(StatusCode::BAD_REQUEST, r#"{"detail": "Email already registered"}"#),
            "Email already registered"
        );
        assert_eq!(error_detail(StatusCode::BAD_GATEWAY, ""), "Bad Gateway");
        assert_eq!(error_detail(StatusCode::BAD_GATEWAY, "upstream down"), "upstream down");
    }
}
