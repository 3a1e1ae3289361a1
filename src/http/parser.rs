use crate::http::request::{Method, Request, RequestBuilder};

/// Default upper bound on the size of a request head.
pub const MAX_HEAD_BYTES: usize = 8 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Request line has fewer than two tokens, a bad path, or is not UTF-8
    InvalidRequest,
    InvalidMethod,
    InvalidVersion,
    /// Head grew past the configured limit without a blank line
    HeadTooLarge,
    /// No blank line yet, more bytes are needed
    Incomplete,
}

/// Parses a request head with the default size limit.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    parse_http_request_with_limit(buf, MAX_HEAD_BYTES)
}

/// Parses the request line and headers out of `buf`.
///
/// On success returns the request and the number of bytes consumed, up to and
/// including the `\r\n\r\n` terminator. Bytes after the terminator are left
/// alone: requests have no body.
pub fn parse_http_request_with_limit(
    buf: &[u8],
    max_head_bytes: usize,
) -> Result<(Request, usize), ParseError> {
    let headers_end = match find_headers_end(buf) {
        Some(end) if end + 4 <= max_head_bytes => end,
        Some(_) => return Err(ParseError::HeadTooLarge),
        None if buf.len() >= max_head_bytes => return Err(ParseError::HeadTooLarge),
        None => return Err(ParseError::Incomplete),
    };

    let head = std::str::from_utf8(&buf[..headers_end])
        .map_err(|_| ParseError::InvalidRequest)?;

    let mut lines = head.split("\r\n");
    let request_line = lines.next().ok_or(ParseError::InvalidRequest)?;
    let (method, target, version) = parse_request_line(request_line)?;

    let (path, query) = split_target(target);

    let mut builder = RequestBuilder::new()
        .method(method)
        .path(path)
        .version(version);

    if let Some(query) = query {
        builder = builder.query(query);
    }

    for line in lines {
        // Headers are carried along but never routed on, so a broken
        // line is dropped instead of failing the request.
        let Some((key, value)) = line.split_once(':') else {
            tracing::trace!(line, "Skipping malformed header line");
            continue;
        };

        builder = builder.header(key.trim(), value.trim());
    }

    let request = builder.build().map_err(|_| ParseError::InvalidRequest)?;

    Ok((request, headers_end + 4))
}

/// Splits `method SP path [SP version]` on single spaces.
fn parse_request_line(line: &str) -> Result<(Method, &str, &str), ParseError> {
    let mut parts = line.split(' ');

    let method_str = parts.next().ok_or(ParseError::InvalidRequest)?;
    let target = parts.next().ok_or(ParseError::InvalidRequest)?;
    let version = parts.next();

    if parts.next().is_some() {
        return Err(ParseError::InvalidRequest);
    }

    if method_str.is_empty() || !target.starts_with('/') {
        return Err(ParseError::InvalidRequest);
    }

    let method = Method::from_str(method_str).ok_or(ParseError::InvalidMethod)?;

    let version = match version {
        None => "HTTP/1.1",
        Some(v) if v.starts_with("HTTP/") && v.len() > "HTTP/".len() => v,
        Some(_) => return Err(ParseError::InvalidVersion),
    };

    Ok((method, target, version))
}

/// Separates the query string and drops any fragment.
fn split_target(target: &str) -> (&str, Option<&str>) {
    let target = target.split_once('#').map_or(target, |(before, _)| before);
    match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    }
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4)
        .position(|w| w == b"\r\n\r\n")
}
