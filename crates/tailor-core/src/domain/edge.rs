//! Edge - エッジランタイムとの受け渡し型
//!
//! ランタイムから受け取るのは path / query / headers、返すのは追加するヘッダーだけ。
//! ここでは I/O を行わない。
//!
//! Cookie ヘッダーは複数行あり得るので、すべての行を順に探す（最初に見つかった値を採用）。

use serde::{Deserialize, Serialize};

/// A single header to append (`Set-Cookie`, the decisions header, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderField {
    pub name: String,
    pub value: String,
}

impl HeaderField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Inbound view of one HTTP transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeRequest {
    pub path: String,
    /// Raw query string without the leading `?`.
    pub query: Option<String>,
    pub headers: Vec<HeaderField>,
}

impl EdgeRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: None,
            headers: Vec::new(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query: String = query.into();
        self.query = Some(query.trim_start_matches('?').to_string());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(HeaderField::new(name, value));
        self
    }

    /// First header value matching `name`, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// First value of a query parameter, percent-decoded.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    /// Value of the named cookie, searched across every `Cookie` field.
    ///
    /// HTTP/2 clients may split cookies over several fields. A value wrapped
    /// in one pair of double quotes is unquoted.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .filter(|h| h.name.eq_ignore_ascii_case("cookie"))
            .flat_map(|h| h.value.split(';'))
            .find_map(|pair| {
                let (k, v) = pair.trim().split_once('=')?;
                (k.trim() == name).then(|| unquote(v.trim()))
            })
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = EdgeRequest::new("/").with_header("Cookie", "a=1");
        assert_eq!(req.header("cookie"), Some("a=1"));
        assert_eq!(req.header("COOKIE"), Some("a=1"));
        assert_eq!(req.header("x-missing"), None);
    }

    #[test]
    fn cookie_lookup_finds_named_cookie() {
        let req = EdgeRequest::new("/")
            .with_header("cookie", "foo=bar; mbox=session#S1#100|PC#V1#200; other=x");
        assert_eq!(req.cookie("mbox"), Some("session#S1#100|PC#V1#200"));
        assert_eq!(req.cookie("foo"), Some("bar"));
        assert_eq!(req.cookie("missing"), None);
    }

    #[test]
    fn cookie_lookup_without_header() {
        let req = EdgeRequest::new("/");
        assert_eq!(req.cookie("mbox"), None);
    }

    #[test]
    fn cookie_lookup_spans_split_cookie_fields() {
        let req = EdgeRequest::new("/")
            .with_header("cookie", "foo=bar")
            .with_header("Cookie", "mbox=session#S1#100|PC#V1.12_0#200");
        assert_eq!(req.cookie("mbox"), Some("session#S1#100|PC#V1.12_0#200"));
        assert_eq!(req.cookie("foo"), Some("bar"));
    }

    #[test]
    fn quoted_cookie_value_is_unquoted() {
        let req = EdgeRequest::new("/")
            .with_header("cookie", r#"mbox="session#S1#100|PC#V1#200"; lone=""#);
        assert_eq!(req.cookie("mbox"), Some("session#S1#100|PC#V1#200"));
        assert_eq!(req.cookie("lone"), Some("\""));
    }

    #[test]
    fn query_param_is_decoded() {
        let req = EdgeRequest::new("/").with_query("?x=1&mboxes=hero%2Cfooter");
        assert_eq!(req.query_param("mboxes").as_deref(), Some("hero,footer"));
        assert_eq!(req.query_param("x").as_deref(), Some("1"));
        assert_eq!(req.query_param("y"), None);
    }
}
