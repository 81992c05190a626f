mod common;

use common::Site;
use stile::http::parser::{parse_http_request, parse_query, ParseError, MAX_BODY_BYTES};
use stile::http::request::Method;
use stile::http::response::StatusCode;
use stile::store::FileError;

#[test]
fn test_parse_simple_get_request() {
    let site = Site::new();
    let req = b"GET /logo.png HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let (parsed, consumed) = parse_http_request(req, &site.files()).unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.path, "/logo.png");
    assert_eq!(parsed.version, "HTTP/1.1");
    assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
    assert!(parsed.body.is_empty());
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_post_request_with_body() {
    let site = Site::new();
    let req = b"POST /login HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\r\nhello";
    let (parsed, consumed) = parse_http_request(req, &site.files()).unwrap();

    assert_eq!(parsed.method, Method::POST);
    assert_eq!(parsed.path, "/login");
    assert_eq!(parsed.body, b"hello".to_vec());
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_body_never_reads_past_content_length() {
    let site = Site::new();
    let req = b"POST /login HTTP/1.1\r\nContent-Length: 3\r\n\r\nabcdef";
    let (parsed, consumed) = parse_http_request(req, &site.files()).unwrap();

    assert_eq!(parsed.body, b"abc".to_vec());
    assert_eq!(consumed, req.len() - 3);
}

#[test]
fn test_parse_multiple_headers() {
    let site = Site::new();
    let req = b"GET /path HTTP/1.1\r\nHost: example.com\r\nUser-Agent: test-client\r\nAccept: */*\r\n\r\n";
    let (parsed, _) = parse_http_request(req, &site.files()).unwrap();

    assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
    assert_eq!(parsed.headers.get("User-Agent").unwrap(), "test-client");
    assert_eq!(parsed.headers.get("Accept").unwrap(), "*/*");
}

#[test]
fn test_parse_duplicate_header_last_wins() {
    let site = Site::new();
    let req = b"GET / HTTP/1.1\r\nX-Tag: one\r\nX-Tag: two\r\n\r\n";
    let (parsed, _) = parse_http_request(req, &site.files()).unwrap();

    assert_eq!(parsed.header("X-Tag"), Some("two"));
}

#[test]
fn test_parse_header_line_without_colon_is_ignored() {
    let site = Site::new();
    let req = b"GET / HTTP/1.1\r\nBrokenHeader\r\nHost: ok\r\n\r\n";
    let (parsed, _) = parse_http_request(req, &site.files()).unwrap();

    assert_eq!(parsed.headers.len(), 1);
    assert_eq!(parsed.header("Host"), Some("ok"));
}

#[test]
fn test_parse_header_case_preservation() {
    let site = Site::new();
    let req = b"GET / HTTP/1.1\r\ncontent-type: application/json\r\n\r\n";
    let (parsed, _) = parse_http_request(req, &site.files()).unwrap();

    assert!(parsed.headers.contains_key("content-type"));
    assert!(!parsed.headers.contains_key("Content-Type"));
}

#[test]
fn test_parse_lowercase_content_length_still_frames_body() {
    let site = Site::new();
    let req = b"POST /login HTTP/1.1\r\ncontent-length: 2\r\n\r\nok";
    let (parsed, _) = parse_http_request(req, &site.files()).unwrap();

    assert_eq!(parsed.body, b"ok".to_vec());
    assert_eq!(parsed.content_length(), 2);
}

#[test]
fn test_parse_content_length_in_two_spellings_last_wins() {
    let site = Site::new();
    let req = b"POST /login HTTP/1.1\r\nContent-Length: 2\r\ncontent-length: 5\r\n\r\nhello";
    let (parsed, consumed) = parse_http_request(req, &site.files()).unwrap();

    assert_eq!(parsed.body, b"hello".to_vec());
    assert_eq!(consumed, req.len());
    assert_eq!(parsed.content_length(), 5);

    let spellings = parsed
        .headers
        .keys()
        .filter(|k| k.eq_ignore_ascii_case("content-length"))
        .count();
    assert_eq!(spellings, 1);
}

#[test]
fn test_parse_content_length_spellings_reversed() {
    let site = Site::new();
    let req = b"POST /login HTTP/1.1\r\ncontent-length: 5\r\nContent-Length: 2\r\n\r\nhello";
    let (parsed, consumed) = parse_http_request(req, &site.files()).unwrap();

    assert_eq!(parsed.body, b"he".to_vec());
    assert_eq!(consumed, req.len() - 3);
    assert_eq!(parsed.header("Content-Length"), Some("2"));
}

#[test]
fn test_parse_query_string_split_from_path() {
    let site = Site::new();
    let req = b"GET /docs/readme.txt?lang=en&flag&page=2 HTTP/1.1\r\n\r\n";
    let (parsed, _) = parse_http_request(req, &site.files()).unwrap();

    assert_eq!(parsed.path, "/docs/readme.txt");
    assert_eq!(parsed.query_param("lang"), Some("en"));
    assert_eq!(parsed.query_param("page"), Some("2"));
    assert_eq!(parsed.query_param("flag"), None);
    assert_eq!(parsed.query.len(), 2);
}

#[test]
fn test_parse_query_is_not_percent_decoded() {
    let query = parse_query("q=a%20b&x=1=2");

    assert_eq!(query.get("q").unwrap(), "a%20b");
    assert_eq!(query.get("x").unwrap(), "1=2");
}

#[test]
fn test_parse_directory_gets_index_html() {
    let site = Site::new();

    let (root, _) = parse_http_request(b"GET / HTTP/1.1\r\n\r\n", &site.files()).unwrap();
    assert_eq!(root.path, "/index.html");

    let (docs, _) = parse_http_request(b"GET /docs?x=1 HTTP/1.1\r\n\r\n", &site.files()).unwrap();
    assert_eq!(docs.path, "/docs/index.html");
    assert_eq!(docs.query_param("x"), Some("1"));
}

#[test]
fn test_parse_missing_path_is_left_alone() {
    let site = Site::new();
    let (parsed, _) = parse_http_request(b"GET /nope/ HTTP/1.1\r\n\r\n", &site.files()).unwrap();

    assert_eq!(parsed.path, "/nope/");
}

#[test]
fn test_parse_traversal_is_access_denied() {
    let site = Site::new();
    let result = parse_http_request(b"GET /../../etc/passwd HTTP/1.1\r\n\r\n", &site.files());

    match result {
        Err(e @ ParseError::File(FileError::AccessDenied)) => {
            assert_eq!(e.status(), StatusCode::Unauthorized);
        }
        other => panic!("expected access denied, got {:?}", other),
    }
}

#[test]
fn test_parse_incomplete_request_missing_blank_line() {
    let site = Site::new();
    let result = parse_http_request(b"GET / HTTP/1.1\r\nHost: example.com\r\n", &site.files());

    assert!(matches!(result, Err(ParseError::Incomplete)));
}

#[test]
fn test_parse_incomplete_request_partial_body() {
    let site = Site::new();
    let result = parse_http_request(b"POST /login HTTP/1.1\r\nContent-Length: 10\r\n\r\nhello", &site.files());

    assert!(matches!(result, Err(ParseError::Incomplete)));
}

#[test]
fn test_parse_empty_buffer_is_incomplete() {
    let site = Site::new();

    assert!(matches!(parse_http_request(b"", &site.files()), Err(ParseError::Incomplete)));
}

#[test]
fn test_parse_invalid_http_method() {
    let site = Site::new();

    for verb in ["INVALID", "PUT", "DELETE", "get"] {
        let req = format!("{} / HTTP/1.1\r\n\r\n", verb);
        let result = parse_http_request(req.as_bytes(), &site.files());
        let err = result.unwrap_err();
        assert!(matches!(err, ParseError::InvalidMethod), "{}", verb);
        assert_eq!(err.status(), StatusCode::BadRequest);
    }
}

#[test]
fn test_parse_wrong_token_count_is_invalid() {
    let site = Site::new();

    for line in ["GET /", "GET", "GET / HTTP/1.1 extra", "GET  / HTTP/1.1"] {
        let req = format!("{}\r\n\r\n", line);
        let result = parse_http_request(req.as_bytes(), &site.files());
        assert!(matches!(result, Err(ParseError::InvalidRequest)), "{:?}", line);
    }
}

#[test]
fn test_parse_target_must_be_absolute_path() {
    let site = Site::new();
    let result = parse_http_request(b"GET index.html HTTP/1.1\r\n\r\n", &site.files());

    assert!(matches!(result, Err(ParseError::InvalidRequest)));
}

#[test]
fn test_parse_invalid_content_length() {
    let site = Site::new();
    let result = parse_http_request(b"POST /login HTTP/1.1\r\nContent-Length: lots\r\n\r\n", &site.files());

    assert!(matches!(result, Err(ParseError::InvalidContentLength)));
}

#[test]
fn test_parse_huge_declared_body_is_rejected_early() {
    let site = Site::new();
    let mut req = b"POST /login HTTP/1.1\r\nContent-Length: 1000000000000\r\n\r\n".to_vec();
    req.extend(std::iter::repeat_n(b'x', 1024));

    let err = parse_http_request(&req, &site.files()).unwrap_err();
    assert!(matches!(err, ParseError::InvalidContentLength));
    assert_eq!(err.status(), StatusCode::BadRequest);
}

#[test]
fn test_parse_body_just_over_the_cap_is_rejected() {
    let site = Site::new();
    let req = format!("POST /login HTTP/1.1\r\nContent-Length: {}\r\n\r\n", MAX_BODY_BYTES + 1);
    let result = parse_http_request(req.as_bytes(), &site.files());

    assert!(matches!(result, Err(ParseError::InvalidContentLength)));
}

#[test]
fn test_parse_body_at_the_cap_is_accepted() {
    let site = Site::new();
    let mut req = format!("POST /login HTTP/1.1\r\nContent-Length: {}\r\n\r\n", MAX_BODY_BYTES).into_bytes();
    req.extend(std::iter::repeat_n(b'x', MAX_BODY_BYTES));
    let (parsed, consumed) = parse_http_request(&req, &site.files()).unwrap();

    assert_eq!(parsed.body.len(), MAX_BODY_BYTES);
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_bare_newlines() {
    let site = Site::new();
    let req = b"POST /login HTTP/1.1\nContent-Length: 2\n\nhi";
    let (parsed, consumed) = parse_http_request(req, &site.files()).unwrap();

    assert_eq!(parsed.body, b"hi".to_vec());
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_request_with_binary_body() {
    let site = Site::new();
    let req = b"POST /login HTTP/1.1\r\nContent-Length: 4\r\n\r\n\x00\x01\x02\x03";
    let (parsed, _) = parse_http_request(req, &site.files()).unwrap();

    assert_eq!(parsed.body, vec![0, 1, 2, 3]);
}
