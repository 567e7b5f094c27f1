use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Characters left untouched when encoding free text into a query string:
/// ASCII alphanumerics plus `-_.~/`. Everything else becomes `%XX`.
const QUERY_TEXT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// HTTP verbs used by the remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request, built per call and discarded afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path suffix appended verbatim to the endpoint; always starts with `/`
    pub path: String,
    /// JSON payload; `None` means the request carries no body at all
    pub body: Option<Value>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach a JSON body.
    ///
    /// A body that serializes to `null`, `{}` or `[]` is dropped and the
    /// request goes out without a payload.
    pub fn with_json<B>(mut self, body: &B) -> serde_json::Result<Self>
    where
        B: Serialize + ?Sized,
    {
        let value = serde_json::to_value(body)?;
        self.body = if is_empty_payload(&value) {
            None
        } else {
            Some(value)
        };
        Ok(self)
    }

    /// Same as [`with_json`](Self::with_json) for an already-built value.
    pub fn with_value(mut self, body: Value) -> Self {
        self.body = if is_empty_payload(&body) {
            None
        } else {
            Some(body)
        };
        self
    }
}

fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Percent-encode free text for use as a query-string value.
pub fn encode_query_text(text: &str) -> String {
    utf8_percent_encode(text, QUERY_TEXT).to_string()
}
