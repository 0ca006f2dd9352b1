use std::fmt::Display;

use reqwest::header::{HeaderValue, CONTENT_RANGE};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// A table read in PostgREST syntax: `?select=..&col=eq.v&order=col.desc`.
#[derive(Debug, Clone)]
pub struct Query {
    table: String,
    select: String,
    filters: Vec<(String, String)>,
    order: Option<String>,
    limit: Option<u32>,
    offset: Option<u32>,
}

impl Query {
    pub fn table(name: &str) -> Self {
        Self {
            table: name.to_string(),
            select: "*".into(),
            filters: Vec::new(),
            order: None,
            limit: None,
            offset: None,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.select = columns.split_whitespace().collect();
        self
    }

    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.into(), format!("eq.{value}")));
        self
    }

    pub fn gt(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.into(), format!("gt.{value}")));
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some(format!("{column}.desc"));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.select.clone())];
        params.extend(self.filters.iter().cloned());
        if let Some(order) = &self.order {
            params.push(("order".into(), order.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".into(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset".into(), offset.to_string()));
        }
        params
    }

    /// Filters only, for writes.
    fn filter_params(&self) -> Vec<(String, String)> {
        self.filters.clone()
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Thin client for the hosted backend's REST and RPC endpoints.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    rest_url: String,
    api_key: String,
}

impl BackendClient {
    pub fn new(http: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            rest_url: format!("{}/rest/v1", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
        }
    }

    fn url(&self, path: &str, params: &[(String, String)]) -> Result<Url, BackendError> {
        let raw = format!("{}/{}", self.rest_url, path);
        let parsed = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        };
        parsed.map_err(|e| BackendError::Unexpected(format!("bad url {raw}: {e}")))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Fetch all rows matching `query`.
    pub async fn select<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>, BackendError> {
        let url = self.url(&query.table, &query.params())?;
        let resp = check(self.request(Method::GET, url).send().await?).await?;
        Ok(resp.json().await?)
    }

    /// First matching row, if any.
    pub async fn select_optional<T: DeserializeOwned>(
        &self,
        query: &Query,
    ) -> Result<Option<T>, BackendError> {
        let rows: Vec<T> = self.select(&query.clone().limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    /// Exact row count via `HEAD` + `Prefer: count=exact`.
    pub async fn count(&self, query: &Query) -> Result<i64, BackendError> {
        let url = self.url(&query.table, &query.params())?;
        let resp = self
            .request(Method::HEAD, url)
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let resp = check(resp).await?;

        resp.headers()
            .get(CONTENT_RANGE)
            .and_then(parse_content_range_total)
            .ok_or_else(|| BackendError::Unexpected("missing Content-Range total".into()))
    }

    pub async fn insert<B: Serialize + ?Sized>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<(), BackendError> {
        let url = self.url(table, &[])?;
        let resp = self
            .request(Method::POST, url)
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    /// Patch every row matching the query's filters.
    pub async fn update<B: Serialize + ?Sized>(
        &self,
        query: &Query,
        body: &B,
    ) -> Result<(), BackendError> {
        let url = self.url(&query.table, &query.filter_params())?;
        let resp = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    /// Call a stored procedure and decode its JSON result.
    pub async fn rpc<A, T>(&self, function: &str, args: &A) -> Result<T, BackendError>
    where
        A: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(&format!("rpc/{function}"), &[])?;
        let resp = self.request(Method::POST, url).json(args).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Call a stored procedure that returns nothing useful.
    pub async fn rpc_void<A: Serialize + ?Sized>(
        &self,
        function: &str,
        args: &A,
    ) -> Result<(), BackendError> {
        let url = self.url(&format!("rpc/{function}"), &[])?;
        let resp = self.request(Method::POST, url).json(args).send().await?;
        check(resp).await?;
        Ok(())
    }
}

/// Turn non-2xx responses into `BackendError::Api`, keeping the backend's
/// `message` when it sends one.
async fn check(resp: Response) -> Result<Response, BackendError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or(body);

    metrics::counter!("backend_errors_total").increment(1);

    Err(BackendError::Api {
        status: status.as_u16(),
        message,
    })
}

/// `0-24/3573` or `*/42` → total.
fn parse_content_range_total(value: &HeaderValue) -> Option<i64> {
    value.to_str().ok()?.rsplit('/').next()?.parse().ok()
}
