use tinyserve::http::response::{NOT_FOUND_BODY, Response, ResponseBuilder, StatusCode};
use tinyserve::http::writer::{Framing, ResponseWriter, serialize_response};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
    assert_eq!(StatusCode::UnsupportedMediaType.as_u16(), 415);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
}

#[test]
fn test_status_code_display() {
    assert_eq!(StatusCode::Ok.to_string(), "200 OK");
    assert_eq!(StatusCode::NotFound.to_string(), "404 Not Found");
    assert_eq!(
        StatusCode::UnsupportedMediaType.to_string(),
        "415 Unsupported Media Type"
    );
}

#[test]
fn test_response_builder_defaults_to_text_plain() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(b"Hello, World!".to_vec())
        .build();

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.content_type, "text/plain");
    assert_eq!(response.body, b"Hello, World!".to_vec());
}

#[test]
fn test_error_helpers() {
    let not_found = Response::not_found();
    assert_eq!(not_found.status, StatusCode::NotFound);
    assert_eq!(not_found.content_type, "text/html");
    assert_eq!(not_found.body, NOT_FOUND_BODY);

    let not_allowed = Response::method_not_allowed();
    assert_eq!(not_allowed.status, StatusCode::MethodNotAllowed);
    assert_eq!(not_allowed.content_type, "text/plain");

    let unsupported = Response::unsupported_media_type();
    assert_eq!(unsupported.status, StatusCode::UnsupportedMediaType);
    assert_eq!(unsupported.body, b"Unsupported file type".to_vec());

    let internal = Response::internal_error();
    assert_eq!(internal.status, StatusCode::InternalServerError);
    assert_eq!(internal.content_type, "text/plain");
    assert_eq!(internal.body, b"500 Internal Server Error".to_vec());
}

#[test]
fn test_legacy_framing_is_byte_exact() {
    let response = Response::ok("text/plain", b"hello".to_vec());
    let bytes = serialize_response(&response, Framing::Legacy);

    assert_eq!(
        bytes,
        b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nhello\r\n\r\n".to_vec()
    );
}

#[test]
fn test_content_length_framing() {
    let response = Response::not_found();
    let bytes = serialize_response(&response, Framing::ContentLength);

    assert_eq!(
        bytes,
        b"HTTP/1.1 404 Not Found\r\nContent-Type: text/html\r\nContent-Length: 22\r\n\r\n<h1>404 Not Found</h1>"
            .to_vec()
    );
}

#[test]
fn test_binary_body_is_untouched() {
    let body = vec![0x89, b'P', b'N', b'G', 0x00, 0xff];
    let response = Response::ok("image/png", body.clone());
    let bytes = serialize_response(&response, Framing::Legacy);

    let header_end = bytes.windows(4).position(|w| w == b"\r\n\r\n").unwrap() + 4;
    assert_eq!(&bytes[header_end..header_end + body.len()], body.as_slice());
}

#[tokio::test]
async fn test_writer_writes_everything() {
    let response = Response::json(b"{}".to_vec());
    let mut writer = ResponseWriter::new(&response, Framing::Legacy);
    let mut out: Vec<u8> = Vec::new();

    writer.write_to_stream(&mut out).await.unwrap();

    assert_eq!(writer.remaining(), 0);
    assert_eq!(out, serialize_response(&response, Framing::Legacy));
}
