use crate::gemini::request::Request;
use thiserror::Error;
use url::Url;

/// Longest URL a client may send, excluding the line terminator.
pub const MAX_URL_LENGTH: usize = 1024;

/// Base used to resolve path-only request lines.
const RELATIVE_BASE: &str = "gemini://localhost/";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("request line is incomplete")]
    Incomplete,
    #[error("request line exceeds 1024 bytes")]
    TooLong,
    #[error("request line is not valid UTF-8")]
    InvalidEncoding,
    #[error("request line is empty")]
    Empty,
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request path is not valid UTF-8 once decoded")]
    InvalidPath,
}

/// Parses one request line from the front of `buf`.
///
/// Returns the request and the number of bytes consumed, terminator
/// included. A bare `\n` is accepted as a terminator as well as `\r\n`.
pub fn parse_request_line(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let Some(newline) = buf.iter().position(|&b| b == b'\n') else {
        // Allow room for the CRLF still to come
        if buf.len() > MAX_URL_LENGTH + 1 {
            return Err(ParseError::TooLong);
        }
        return Err(ParseError::Incomplete);
    };

    let mut line = &buf[..newline];
    if let Some(stripped) = line.strip_suffix(b"\r") {
        line = stripped;
    }

    if line.len() > MAX_URL_LENGTH {
        return Err(ParseError::TooLong);
    }

    let line = std::str::from_utf8(line).map_err(|_| ParseError::InvalidEncoding)?;
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }

    let url = parse_url(line)?;
    let request = Request::from_url(url).ok_or(ParseError::InvalidPath)?;

    Ok((request, newline + 1))
}

fn parse_url(line: &str) -> Result<Url, ParseError> {
    match Url::parse(line) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Ok(Url::parse(RELATIVE_BASE)?.join(line)?)
        }
        Err(e) => Err(e.into()),
    }
}
