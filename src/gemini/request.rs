use percent_encoding::percent_decode_str;
use std::str::Utf8Error;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("malformed percent-escape in query")]
    InvalidEscape,
    #[error("query is not valid UTF-8 once decoded: {0}")]
    InvalidEncoding(#[from] Utf8Error),
}

/// Identity taken from the certificate a client presented during the TLS
/// handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    /// Subject common name, if the certificate has one.
    pub common_name: Option<String>,
}

impl ClientIdentity {
    pub fn new(common_name: impl Into<String>) -> Self {
        Self {
            common_name: Some(common_name.into()),
        }
    }
}

/// A parsed request line.
///
/// Lives for exactly one connection; nothing here is shared or persisted.
#[derive(Debug, Clone)]
pub struct Request {
    /// The full request URL, with relative lines resolved against a placeholder base
    pub url: Url,
    /// Percent-decoded path (e.g. "/blog/post")
    pub path: String,
    /// Raw, still-escaped query string, if the URL had one
    pub query: Option<String>,
    /// Certificate identity of the client, attached by the connection
    pub client: Option<ClientIdentity>,
}

impl Request {
    /// Builds a request from an already parsed URL.
    ///
    /// Returns `None` when the path does not percent-decode to UTF-8.
    pub fn from_url(url: Url) -> Option<Self> {
        let path = percent_decode_str(url.path()).decode_utf8().ok()?.into_owned();
        let query = url.query().map(str::to_string);

        Some(Self {
            url,
            path,
            query,
            client: None,
        })
    }

    pub fn with_client(mut self, client: Option<ClientIdentity>) -> Self {
        self.client = client;
        self
    }

    /// Decodes the query string as user input.
    ///
    /// `+` is treated as a space, like a form-encoded value. Returns
    /// `Ok("")` when there is no query. A `%` not followed by two hex
    /// digits is an error.
    pub fn input(&self) -> Result<String, InputError> {
        let raw = match &self.query {
            Some(q) => q.replace('+', " "),
            None => return Ok(String::new()),
        };

        if !has_valid_escapes(&raw) {
            return Err(InputError::InvalidEscape);
        }

        Ok(percent_decode_str(&raw).decode_utf8()?.into_owned())
    }

    /// Subject common name of the client certificate, if one was presented.
    pub fn common_name(&self) -> Option<&str> {
        self.client.as_ref()?.common_name.as_deref()
    }
}

fn has_valid_escapes(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}
