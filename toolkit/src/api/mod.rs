// JSON API request helper. Failures are shown as notifications and then
// returned to the caller.
use crate::config::ApiSettings;
use crate::error::RequestError;
use crate::notify::Notifier;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// Merged over the default `Content-Type: application/json`
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Option<Url>,
    notifier: Notifier,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings, notifier: Notifier) -> Result<Self, RequestError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        let base_url = settings
            .base_url
            .as_deref()
            .map(|raw| Url::parse(raw).map_err(|e| RequestError::InvalidUrl(format!("{}: {}", raw, e))))
            .transpose()?;
        Ok(Self {
            http,
            base_url,
            notifier,
        })
    }

    /// Sends the request and returns the JSON body.
    pub async fn request(&self, url: &str, options: RequestOptions) -> Result<Value, RequestError> {
        self.request_as(url, options).await
    }

    /// Like [`ApiClient::request`], decoding the body into `T`.
    pub async fn request_as<T: DeserializeOwned>(&self, url: &str, options: RequestOptions) -> Result<T, RequestError> {
        let method = options.method.clone();
        match self.execute(url, options).await {
            Ok(value) => {
                tracing::info!(%method, url, "API request succeeded");
                Ok(value)
            }
            Err(e) => {
                tracing::error!(%method, url, error = %e, "API request failed");
                self.notifier.error(&format!("API Error: {}", e));
                Err(e)
            }
        }
    }

    async fn execute<T: DeserializeOwned>(&self, url: &str, options: RequestOptions) -> Result<T, RequestError> {
        let target = self.resolve(url)?;
        let headers = merge_headers(&options.headers)?;

        let mut builder = self.http.request(options.method, target).headers(headers);
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn resolve(&self, url: &str) -> Result<Url, RequestError> {
        let resolved = match &self.base_url {
            Some(base) => base.join(url),
            None => Url::parse(url),
        };
        resolved.map_err(|e| RequestError::InvalidUrl(format!("{}: {}", url, e)))
    }
}

// Caller headers replace defaults with the same name.
fn merge_headers(extra: &[(String, String)]) -> Result<HeaderMap, RequestError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| RequestError::InvalidHeader(name.clone()))?;
        let value = HeaderValue::from_str(value).map_err(|_| RequestError::InvalidHeader(name.as_str().to_string()))?;
        headers.insert(name, value);
    }
    Ok(headers)
}
