//! SHIORI/3.0 request and response types
//!
//! These types define the wire protocol between a host application and
//! the bridge. A request is a status line (`GET SHIORI/3.0`) followed by
//! `Key: Value` header lines and a blank line; a response is a status
//! line (`SHIORI/3.0 200 OK`), optional header lines, a blank line, and
//! the dialog-script payload.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::charset::Charset;
use crate::error::{Result, ShioriError};

/// Protocol version spoken by this implementation
pub const PROTOCOL_VERSION: &str = "SHIORI/3.0";

/// Request methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Request expecting a scripted answer
    Get,
    /// One-way notification; answered with `204 No Content`
    Notify,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Notify => "NOTIFY",
        }
    }
}

impl std::str::FromStr for Method {
    type Err = ShioriError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "GET" => Ok(Self::Get),
            "NOTIFY" => Ok(Self::Notify),
            other => Err(ShioriError::MalformedRequest(format!(
                "unknown method: {other}"
            ))),
        }
    }
}

/// Response status codes
///
/// The full SHIORI/3.0 status-line vocabulary, not just `200 OK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    /// Scripted answer follows
    Ok,
    /// Understood, nothing to say
    NoContent,
    /// Communicate answer needs more references
    NotEnough,
    /// Advisory answer
    Advice,
    /// Request was malformed or out of order
    BadRequest,
    /// The engine failed internally
    InternalServerError,
}

impl StatusCode {
    /// Numeric code for the status line
    pub fn code(&self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::NoContent => 204,
            Self::NotEnough => 311,
            Self::Advice => 312,
            Self::BadRequest => 400,
            Self::InternalServerError => 500,
        }
    }

    /// Reason phrase for the status line
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NoContent => "No Content",
            Self::NotEnough => "Not Enough",
            Self::Advice => "Advice",
            Self::BadRequest => "Bad Request",
            Self::InternalServerError => "Internal Server Error",
        }
    }

    /// Resolve a numeric code from a parsed status line
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            200 => Some(Self::Ok),
            204 => Some(Self::NoContent),
            311 => Some(Self::NotEnough),
            312 => Some(Self::Advice),
            400 => Some(Self::BadRequest),
            500 => Some(Self::InternalServerError),
            _ => None,
        }
    }

    /// Check if this status carries a payload
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok | Self::NotEnough | Self::Advice)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}

/// A parsed SHIORI/3.0 request
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// Protocol version as received (e.g. "SHIORI/3.0")
    pub version: String,
    /// Event name from the `ID` header
    pub id: Option<String>,
    /// `ReferenceN` headers, index-addressed
    pub references: Vec<Option<String>>,
    /// Declared charset, if any
    pub charset: Option<Charset>,
    /// `Sender` header
    pub sender: Option<String>,
    /// Remaining headers
    pub headers: HashMap<String, String>,
}

impl Request {
    /// Parse a raw request.
    ///
    /// CRLF and bare LF line endings are both accepted. An empty input or
    /// a garbled status line is `MalformedRequest`; a version other than
    /// 3.x is `UnsupportedVersion`.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut lines = raw.split("\r\n").flat_map(|l| l.split('\n'));

        let status_line = lines
            .next()
            .filter(|l| !l.trim().is_empty())
            .ok_or_else(|| ShioriError::MalformedRequest("empty request".into()))?;

        let mut parts = status_line.split_whitespace();
        let method: Method = parts
            .next()
            .ok_or_else(|| ShioriError::MalformedRequest("missing method".into()))?
            .parse()?;
        let version = parts
            .next()
            .ok_or_else(|| ShioriError::MalformedRequest("missing version".into()))?
            .to_string();

        if !version.starts_with("SHIORI/3.") {
            return Err(ShioriError::UnsupportedVersion(version));
        }

        let mut request = Request {
            method,
            version,
            id: None,
            references: Vec::new(),
            charset: None,
            sender: None,
            headers: HashMap::new(),
        };

        for line in lines {
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }

            let Some((key, value)) = line.split_once(':') else {
                // Tolerate stray lines the way existing engines do
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if key == "ID" {
                request.id = Some(value.to_string());
            } else if let Some(index) = key.strip_prefix("Reference") {
                if let Ok(index) = index.parse::<usize>() {
                    request.set_reference(index, value.to_string());
                }
            } else if key == "Charset" {
                request.charset = Charset::from_label(value);
            } else if key == "Sender" {
                request.sender = Some(value.to_string());
            } else {
                request.headers.insert(key.to_string(), value.to_string());
            }
        }

        Ok(request)
    }

    /// Get a reference value by index
    pub fn reference(&self, index: usize) -> Option<&str> {
        self.references.get(index)?.as_deref()
    }

    fn set_reference(&mut self, index: usize, value: String) {
        if self.references.len() <= index {
            self.references.resize(index + 1, None);
        }
        self.references[index] = Some(value);
    }
}

/// A SHIORI/3.0 response under construction
#[derive(Debug, Clone)]
pub struct Response {
    /// Status for the first line
    pub status: StatusCode,
    /// Header lines, in emission order
    pub headers: Vec<(String, String)>,
    /// Dialog-script payload following the blank line
    pub body: String,
}

impl Response {
    /// Create a `200 OK` response carrying a script payload
    pub fn ok(script: impl Into<String>) -> Self {
        Self {
            status: StatusCode::Ok,
            headers: Vec::new(),
            body: script.into(),
        }
    }

    /// Create a `204 No Content` response
    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NoContent,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    /// Create a `400 Bad Request` response
    pub fn bad_request() -> Self {
        Self {
            status: StatusCode::BadRequest,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    /// Create a `500 Internal Server Error` response with a reason header
    pub fn server_error(reason: impl Into<String>) -> Self {
        Self {
            status: StatusCode::InternalServerError,
            headers: vec![("X-Error".to_string(), reason.into())],
            body: String::new(),
        }
    }

    /// Add a header line
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Serialize to wire bytes: status line, headers, blank line, payload.
    ///
    /// A success response with no headers therefore begins with the exact
    /// bytes `SHIORI/3.0 200 OK\r\n\r\n` followed by the script.
    pub fn to_wire(&self) -> Vec<u8> {
        let mut wire = format!("{PROTOCOL_VERSION} {}\r\n", self.status);

        for (key, value) in &self.headers {
            wire.push_str(key);
            wire.push_str(": ");
            wire.push_str(value);
            wire.push_str("\r\n");
        }

        wire.push_str("\r\n");
        wire.push_str(&self.body);
        wire.into_bytes()
    }
}

/// Builder for host-side requests
///
/// Produces the request text a host sends through the bridge, with the
/// `ID`, `ReferenceN`, `Charset`, and `Sender` headers in canonical form.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    headers: Vec<(String, String)>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: Method::Get,
            headers: Vec::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// Set the event name (`ID` header)
    pub fn event(self, event: &str) -> Self {
        self.header("ID", event)
    }

    pub fn reference(self, index: usize, value: &str) -> Self {
        let key = format!("Reference{index}");
        self.header(&key, value)
    }

    pub fn sender(self, sender: &str) -> Self {
        self.header("Sender", sender)
    }

    pub fn charset(self, charset: Charset) -> Self {
        self.header("Charset", charset.label())
    }

    /// Render the request text
    pub fn build(self) -> String {
        let mut request = format!("{} {PROTOCOL_VERSION}\r\n", self.method.as_str());

        for (key, value) in self.headers {
            request.push_str(&format!("{key}: {value}\r\n"));
        }

        request.push_str("\r\n");
        request
    }

    // ========== Canned events ==========

    /// `OnBoot` request
    pub fn on_boot() -> Self {
        Self::new().event("OnBoot").charset(Charset::Utf8)
    }

    /// `OnClose` request
    pub fn on_close() -> Self {
        Self::new().event("OnClose").charset(Charset::Utf8)
    }

    /// `OnSecondChange` notification
    pub fn on_second_change() -> Self {
        Self::new()
            .method(Method::Notify)
            .event("OnSecondChange")
            .charset(Charset::Utf8)
    }

    /// `OnMouseClick` request with coordinates and hit part
    pub fn on_mouse_click(x: i32, y: i32, part: &str) -> Self {
        Self::new()
            .event("OnMouseClick")
            .reference(0, &x.to_string())
            .reference(1, &y.to_string())
            .reference(2, part)
            .charset(Charset::Utf8)
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
