use bytes::Bytes;

/// Gemini status codes used by the server.
///
/// - `Input` (10): Ask the client for a line of input
/// - `Success` (20): Body follows, meta is its MIME type
/// - `TemporaryFailure` (42): Upstream or internal failure, try again later
/// - `NotFound` (51): No such resource
/// - `BadRequest` (59): Malformed request line
/// - `CertificateRequired` (60): Path needs a client certificate
/// - `CertificateNotAuthorized` (61): Presented certificate is not allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// 10 Input
    Input,
    /// 20 Success
    Success,
    /// 42 Temporary failure
    TemporaryFailure,
    /// 51 Not found
    NotFound,
    /// 59 Bad request
    BadRequest,
    /// 60 Client certificate required
    CertificateRequired,
    /// 61 Certificate not authorized
    CertificateNotAuthorized,
}

impl Status {
    /// Returns the two-digit numeric code.
    ///
    /// # Example
    ///
    /// ```
    /// # use capsule::gemini::response::Status;
    /// assert_eq!(Status::Success.code(), 20);
    /// assert_eq!(Status::CertificateRequired.code(), 60);
    /// ```
    pub fn code(&self) -> u8 {
        match self {
            Status::Input => 10,
            Status::Success => 20,
            Status::TemporaryFailure => 42,
            Status::NotFound => 51,
            Status::BadRequest => 59,
            Status::CertificateRequired => 60,
            Status::CertificateNotAuthorized => 61,
        }
    }

    /// Human-readable meta used when a response has nothing more specific to say.
    pub fn default_meta(&self) -> &'static str {
        match self {
            Status::Input => "Input",
            Status::Success => "application/octet-stream",
            Status::TemporaryFailure => "Temporary failure",
            Status::NotFound => "Not found",
            Status::BadRequest => "Bad request",
            Status::CertificateRequired => "Client certificate required",
            Status::CertificateNotAuthorized => "Certificate not authorized",
        }
    }

    pub fn allows_body(&self) -> bool {
        matches!(self, Status::Success)
    }
}

/// A complete response ready to be written to a client.
///
/// Only `Success` responses carry a body; every other status is a bare
/// status line.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: Status,
    pub meta: String,
    pub body: Bytes,
}

impl Response {
    /// A bare status line with the status' default meta.
    pub fn status(status: Status) -> Self {
        Self {
            status,
            meta: status.default_meta().to_string(),
            body: Bytes::new(),
        }
    }

    /// `20 <mime>` followed by `body`.
    pub fn success(mime: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status: Status::Success,
            meta: mime.into(),
            body: body.into(),
        }
    }

    /// `10 <prompt>`, asking the client to resend the URL with a query.
    pub fn input(prompt: impl Into<String>) -> Self {
        Self {
            status: Status::Input,
            meta: prompt.into(),
            body: Bytes::new(),
        }
    }

    pub fn not_found() -> Self {
        Self::status(Status::NotFound)
    }

    pub fn bad_request() -> Self {
        Self::status(Status::BadRequest)
    }

    pub fn temporary_failure() -> Self {
        Self::status(Status::TemporaryFailure)
    }

    /// Serialized status line, including the trailing CRLF.
    pub fn status_line(&self) -> String {
        format!("{} {}\r\n", self.status.code(), self.meta)
    }
}
