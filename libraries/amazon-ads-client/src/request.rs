//! Request descriptors: endpoint paths, query parameters and bodies.

use crate::error::{AdsClientError, Result};
use reqwest::Method;
use serde_json::{Map, Value};
use url::Url;

/// Content type for JSON request bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Endpoint path, given either as one segment or as ordered segments.
///
/// Segments are joined with `/`. Leading and trailing slashes on each
/// segment are dropped, so `["v2/", "/stores"]` and `"v2/stores"` resolve
/// to the same path. Identifiers appended with [`ApiPath::child`] stay a
/// single segment: a `/`, `?` or `#` inside one is percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiPath {
    Segment(String),
    Segments(Vec<String>),
    /// A path followed by one opaque segment
    Child(Box<ApiPath>, String),
}

impl ApiPath {
    /// Path segments in order, before percent-encoding.
    pub fn segments(&self) -> Vec<String> {
        match self {
            ApiPath::Segment(s) => split_path(s),
            ApiPath::Segments(segments) => segments.iter().flat_map(|s| split_path(s)).collect(),
            ApiPath::Child(parent, segment) => {
                let mut segments = parent.segments();
                if !segment.is_empty() {
                    segments.push(segment.clone());
                }
                segments
            }
        }
    }

    /// Join the segments into a relative path without leading or trailing `/`.
    pub fn join(&self) -> String {
        self.segments().join("/")
    }

    /// Full URL of this path under `base_url`, each segment percent-encoded.
    pub fn to_url(&self, base_url: &str) -> Result<Url> {
        let mut url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| AdsClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| AdsClientError::InvalidUrl(format!("{} cannot be a base", base_url)))?
            .pop_if_empty()
            .extend(self.segments());
        Ok(url)
    }

    /// Append one opaque segment, such as a resource id.
    pub fn child(&self, segment: impl Into<String>) -> ApiPath {
        ApiPath::Child(Box::new(self.clone()), segment.into())
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl From<&str> for ApiPath {
    fn from(s: &str) -> Self {
        ApiPath::Segment(s.to_string())
    }
}

impl From<String> for ApiPath {
    fn from(s: String) -> Self {
        ApiPath::Segment(s)
    }
}

impl From<&String> for ApiPath {
    fn from(s: &String) -> Self {
        ApiPath::Segment(s.clone())
    }
}

impl From<Vec<String>> for ApiPath {
    fn from(segments: Vec<String>) -> Self {
        ApiPath::Segments(segments)
    }
}

impl From<Vec<&str>> for ApiPath {
    fn from(segments: Vec<&str>) -> Self {
        ApiPath::Segments(segments.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ApiPath {
    fn from(segments: [&str; N]) -> Self {
        ApiPath::Segments(segments.iter().map(|s| s.to_string()).collect())
    }
}

/// Query parameters: string keys mapped to JSON scalars or arrays.
pub type Params = Map<String, Value>;

/// Render query parameters as URL pairs.
///
/// Arrays become comma-joined lists; nulls are skipped.
pub fn query_pairs(params: &Params) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(key, value)| render_value(value).map(|v| (key.clone(), v)))
        .collect()
}

fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(render_value)
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}

/// A single outbound API call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: ApiPath,
    pub query: Option<Params>,
    pub body: Option<Value>,
    /// Overrides `application/json` for bodies
    pub content_type: Option<String>,
    /// Send the profile scope header when a profile id is configured
    pub scoped: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<ApiPath>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: None,
            content_type: None,
            scoped: true,
        }
    }

    pub fn get(path: impl Into<ApiPath>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<ApiPath>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<ApiPath>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<ApiPath>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, query: Option<Params>) -> Self {
        self.query = query;
        self
    }

    pub fn body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Send without the profile scope header.
    pub fn unscoped(mut self) -> Self {
        self.scoped = false;
        self
    }
}
