use axum::http::header::HOST;
use axum::http::HeaderMap;
use storyfeed_pipeline::AggregationPipeline;
use url::Url;

use crate::error::{ServerError, ServerResult};

/// Shared handler state. Cloned per request; the pipeline is `Arc`-backed.
#[derive(Clone, Debug)]
pub struct AppState {
    pub pipeline: AggregationPipeline,
    /// Fixed origin from configuration, if any.
    pub app_origin: Option<String>,
}

impl AppState {
    /// A configured origin is reduced to `scheme://host[:port]`. A value that
    /// does not parse is kept as given; [`ServerConfig::validate`] rejects it.
    ///
    /// [`ServerConfig::validate`]: crate::ServerConfig::validate
    pub fn new(pipeline: AggregationPipeline, app_origin: Option<String>) -> Self {
        Self {
            pipeline,
            app_origin: app_origin.map(|o| web_origin(&o).unwrap_or(o)),
        }
    }

    /// Origin for this request: the configured one, else
    /// `x-forwarded-proto` + `x-forwarded-host`, falling back to `http` and
    /// the `Host` header.
    pub fn origin(&self, headers: &HeaderMap) -> ServerResult<String> {
        if let Some(origin) = &self.app_origin {
            return Ok(origin.clone());
        }
        let host = first_value(headers, "x-forwarded-host")
            .or_else(|| first_value(headers, HOST.as_str()))
            .ok_or(ServerError::MissingOrigin)?;
        let proto = match first_value(headers, "x-forwarded-proto") {
            Some(p) if p.eq_ignore_ascii_case("https") => "https",
            _ => "http",
        };
        // A host header must name a host and nothing else.
        let url =
            Url::parse(&format!("{proto}://{host}")).map_err(|_| ServerError::MissingOrigin)?;
        let bare = url.path() == "/"
            && url.query().is_none()
            && url.fragment().is_none()
            && url.username().is_empty()
            && url.password().is_none();
        if !bare {
            return Err(ServerError::MissingOrigin);
        }
        Ok(url.origin().ascii_serialization())
    }
}

/// The `scheme://host[:port]` origin of an http(s) URL. Paths, queries and
/// default ports are dropped.
pub(crate) fn web_origin(raw: &str) -> Result<String, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("scheme {:?} is not http(s)", url.scheme()));
    }
    if url.host().is_none() {
        return Err("no host".into());
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err("credentials are not allowed".into());
    }
    Ok(url.origin().ascii_serialization())
}

// Proxies may append: `x-forwarded-host: a.io, b.io`. The first hop wins.
fn first_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
