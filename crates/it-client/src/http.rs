//! reqwest-backed gateway

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

use it_auth::Credentials;
use it_core::config::ClientConfig;
use it_core::{Id, ItError, ItResult};
use it_models::{Comment, Issue, TaxonomyEntry, TaxonomyKind, User};
use it_queries::QueryParams;

use crate::error;
use crate::gateway::TrackerGateway;

/// Header carrying the raw API token
pub const API_TOKEN_HEADER: &str = "X-Api-Token";
/// Per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Tracker API client over HTTP
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl HttpGateway {
    /// Build a client from configuration and resolved credentials
    pub fn new(config: &ClientConfig, credentials: Option<Credentials>) -> ItResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(config.api.user_agent.clone())
            .default_headers(headers)
            .connect_timeout(config.request_timeout().min(std::time::Duration::from_secs(10)))
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ItError::Internal(format!("could not initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url()?,
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Same client, different credentials
    pub fn with_credentials(&self, credentials: Option<Credentials>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            credentials,
        }
    }

    /// Absolute URL for an API path, keeping any path prefix of the base URL
    pub fn endpoint(&self, path: &str) -> ItResult<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ItError::Config(format!("invalid endpoint {}: {}", joined, e)))
    }

    /// Request with auth and correlation headers attached
    pub fn request(&self, method: Method, path: &str) -> ItResult<(RequestBuilder, Uuid)> {
        let request_id = Uuid::new_v4();
        let mut builder = self
            .client
            .request(method, self.endpoint(path)?)
            .header(REQUEST_ID_HEADER, request_id.to_string());

        if let Some(credentials) = &self.credentials {
            builder = builder
                .header(API_TOKEN_HEADER, credentials.token.expose())
                .header(AUTHORIZATION, credentials.token.bearer());
        }
        Ok((builder, request_id))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> ItResult<T> {
        let (builder, request_id) = self.request(Method::GET, path)?;
        let started = std::time::Instant::now();

        let response = builder
            .query(query)
            .send()
            .await
            .map_err(|e| error::from_reqwest(path, e))?;

        let status = response.status();
        tracing::debug!(
            %request_id,
            path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "GET completed"
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error::from_response(status.as_u16(), path, &body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| error::from_reqwest(path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| ItError::Decode(format!("{}: {}", path, e)))
    }
}

fn issue_path(id: Id) -> String {
    format!("/issues/{}", id)
}

fn comments_path(issue_id: Id) -> String {
    format!("/issues/{}/comments", issue_id)
}

#[async_trait]
impl TrackerGateway for HttpGateway {
    async fn list_issues(&self, params: &QueryParams) -> ItResult<Vec<Issue>> {
        self.get_json("/issues", &params.to_pairs()).await
    }

    async fn get_issue(&self, id: Id) -> ItResult<Issue> {
        self.get_json(&issue_path(id), &[]).await
    }

    async fn list_comments(&self, issue_id: Id) -> ItResult<Vec<Comment>> {
        self.get_json(&comments_path(issue_id), &[]).await
    }

    async fn list_taxonomy(&self, kind: TaxonomyKind) -> ItResult<Vec<TaxonomyEntry>> {
        self.get_json(kind.path(), &[]).await
    }

    async fn list_users(&self) -> ItResult<Vec<User>> {
        self.get_json("/users", &[]).await
    }

    async fn current_user(&self) -> ItResult<User> {
        self.get_json("/users/me", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use it_auth::ApiToken;
    use it_queries::{FilterDimension, FilterState, SortState};

    fn gateway(base_url: &str, credentials: Option<Credentials>) -> HttpGateway {
        let mut config = ClientConfig::default();
        config.api.base_url = base_url.to_string();
        HttpGateway::new(&config, credentials).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let gw = gateway("https://tracker.example.com/api/", None);
        assert_eq!(
            gw.endpoint("/issues").unwrap().as_str(),
            "https://tracker.example.com/api/issues"
        );
        assert_eq!(
            gw.endpoint("users/me").unwrap().as_str(),
            "https://tracker.example.com/api/users/me"
        );
    }

    #[test]
    fn test_anonymous_request_has_no_auth_headers() {
        let gw = gateway("http://localhost:3000", None);
        let (builder, request_id) = gw.request(Method::GET, "/types").unwrap();
        let request = builder.build().unwrap();

        assert!(request.headers().get(AUTHORIZATION).is_none());
        assert!(request.headers().get(API_TOKEN_HEADER).is_none());
        assert_eq!(
            request.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap(),
            request_id.to_string()
        );
    }

    #[test]
    fn test_authenticated_request_headers() {
        let creds = Credentials::configured(ApiToken::new("tok_abc").unwrap());
        let gw = gateway("http://localhost:3000", Some(creds));
        let (builder, _) = gw.request(Method::GET, "/users/me").unwrap();
        let request = builder.build().unwrap();

        assert_eq!(request.headers().get(API_TOKEN_HEADER).unwrap(), "tok_abc");
        assert_eq!(request.headers().get(AUTHORIZATION).unwrap(), "Bearer tok_abc");
    }

    #[test]
    fn test_issue_query_encoding() {
        let gw = gateway("http://localhost:3000", None);
        let mut filters = FilterState::new().with(FilterDimension::Type, 2);
        filters.set_search("login page");
        let params = QueryParams::build(&filters, &SortState::default());

        let (builder, _) = gw.request(Method::GET, "/issues").unwrap();
        let request = builder.query(&params.to_pairs()).build().unwrap();
        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("sort".to_string(), "updated_at".to_string()),
                ("direction".to_string(), "desc".to_string()),
                ("search".to_string(), "login page".to_string()),
                ("filter_type[]".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_issue_detail_paths() {
        let gw = gateway("https://tracker.example.com/api", None);
        assert_eq!(
            gw.endpoint(&issue_path(42)).unwrap().as_str(),
            "https://tracker.example.com/api/issues/42"
        );
        assert_eq!(
            gw.endpoint(&comments_path(42)).unwrap().as_str(),
            "https://tracker.example.com/api/issues/42/comments"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let creds = Credentials::configured(ApiToken::new("tok_secret_value").unwrap());
        let gw = gateway("http://localhost:3000", Some(creds));
        assert!(!format!("{:?}", gw).contains("tok_secret_value"));
    }
}
