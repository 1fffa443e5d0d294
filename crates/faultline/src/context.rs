//! Context attached to a log call

use http::{HeaderMap, Method, Request, Uri};
use faultline_core::AuthUser;

/// Optional fields the caller attaches to an entry
///
/// When `user_id` is set the auth adapter is not consulted; the context's
/// user fields are stored as given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogContext {
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub path: Option<String>,
    pub method: Option<String>,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl LogContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: AuthUser) -> Self {
        self.user_id = Some(user.id);
        self.user_email = user.email;
        self.user_name = user.name;
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Overlay request fields, keeping user and metadata
    pub fn with_request(mut self, request: RequestContext) -> Self {
        self.path = request.path;
        self.method = request.method;
        self.user_agent = request.user_agent;
        self.ip = request.ip;
        self
    }

    pub fn has_user(&self) -> bool {
        self.user_id.is_some()
    }
}

impl From<RequestContext> for LogContext {
    fn from(request: RequestContext) -> Self {
        LogContext::new().with_request(request)
    }
}

/// Request fields pulled from an HTTP request head
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub path: Option<String>,
    pub method: Option<String>,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

impl RequestContext {
    pub fn from_parts(method: &Method, uri: &Uri, headers: &HeaderMap) -> Self {
        Self {
            path: Some(uri.path().to_string()),
            method: Some(method.as_str().to_string()),
            user_agent: header_str(headers, "user-agent").map(String::from),
            ip: client_ip(headers),
        }
    }

    pub fn from_request<B>(request: &Request<B>) -> Self {
        Self::from_parts(request.method(), request.uri(), request.headers())
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Client address: first `x-forwarded-for` hop, then `x-real-ip`
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    header_str(headers, "x-forwarded-for")
        .and_then(|forwarded| forwarded.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .or_else(|| header_str(headers, "x-real-ip"))
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("https://shop.example.com/api/orders?id=7");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_forwarded_for_first_entry() {
        let req = request(&[("x-forwarded-for", " 1.2.3.4, 5.6.7.8"), ("x-real-ip", "9.9.9.9")]);
        let ctx = RequestContext::from_request(&req);
        assert_eq!(ctx.ip.as_deref(), Some("1.2.3.4"));
    }

    #[test]
    fn test_real_ip_fallback() {
        let req = request(&[("x-real-ip", "9.9.9.9")]);
        assert_eq!(RequestContext::from_request(&req).ip.as_deref(), Some("9.9.9.9"));

        let req = request(&[]);
        assert!(RequestContext::from_request(&req).ip.is_none());
    }

    #[test]
    fn test_path_method_and_agent() {
        let req = request(&[("user-agent", "curl/8.5")]);
        let ctx = RequestContext::from_request(&req);
        assert_eq!(ctx.path.as_deref(), Some("/api/orders"));
        assert_eq!(ctx.method.as_deref(), Some("POST"));
        assert_eq!(ctx.user_agent.as_deref(), Some("curl/8.5"));
    }

    #[test]
    fn test_request_overlay_keeps_user() {
        let ctx = LogContext::new()
            .with_user(AuthUser::new("u1"))
            .with_request(RequestContext::from_request(&request(&[])));
        assert!(ctx.has_user());
        assert_eq!(ctx.method.as_deref(), Some("POST"));
    }
}
