use super::{MockConnection, MockNetwork};
use libhttp::network::Connection;
use libhttp::network::application::http::*;

const WIKIPEDIA: &[u8] = b"HTTP/1.1 200 OK\r\n\
    Content-Type: text/plain\r\n\
    Transfer-Encoding: chunked\r\n\
    \r\n\
    4\r\nWiki\r\n\
    5\r\npedia\r\n\
    E\r\n in\r\n\r\nchunks.\r\n\
    0\r\n\r\n";

fn exchange<const N: usize>(
    conn: MockConnection,
    method: Method,
) -> Result<RawResponse<MockConnection, N>, Error> {
    let (network, _wire) = MockNetwork::new(conn);
    let mut client: Client<MockNetwork, N> = Client::new(network);
    let mut request = Request::new(method, "http://example.com/resource")?;
    client.send(&Context::background(), &mut request)
}

fn drain<C: Connection, const N: usize>(
    response: &mut RawResponse<C, N>,
    step: usize,
) -> Result<Vec<u8>, Error> {
    let ctx = Context::background();
    let mut body = Vec::new();
    let mut buf = vec![0u8; step];
    loop {
        match response.read(&ctx, &mut buf)? {
            0 => return Ok(body),
            n => body.extend_from_slice(&buf[..n]),
        }
    }
}

#[test]
fn test_chunked_body_is_decoded() {
    let mut response = exchange::<1024>(MockConnection::new().respond(WIKIPEDIA), Method::Get).unwrap();
    assert_eq!(response.header("transfer-encoding"), Some("chunked"));
    assert!(matches!(response.body().body_mode(), BodyMode::Chunked { .. }));
    assert_eq!(drain(&mut response, 64).unwrap(), b"Wikipedia in\r\n\r\nchunks.");
    assert_eq!(response.body().total_read(), 23);
    assert_eq!(response.body().state(), SessionState::Done);
}

#[test]
fn test_chunked_body_survives_any_fragmentation() {
    for piece in [1, 2, 3, 5, 7, 11, 64] {
        for step in [1, 3, 16] {
            let conn = MockConnection::new().respond_in_pieces(WIKIPEDIA, piece);
            let mut response = exchange::<1024>(conn, Method::Get).unwrap();
            assert_eq!(
                drain(&mut response, step).unwrap(),
                b"Wikipedia in\r\n\r\nchunks.",
                "pieces of {piece}, reads of {step}"
            );
        }
    }
}

#[test]
fn test_chunked_body_with_small_read_buffer() {
    let mut response = exchange::<8>(MockConnection::new().respond(WIKIPEDIA), Method::Get).unwrap();
    assert_eq!(drain(&mut response, 5).unwrap(), b"Wikipedia in\r\n\r\nchunks.");
}

#[test]
fn test_chunk_extensions_and_uppercase_coding() {
    let response_bytes = b"HTTP/1.1 200 OK\r\ntransfer-encoding: gzip, CHUNKED\r\n\r\n\
        3;name=value\r\nabc\r\n0\r\n\r\n";
    let mut response = exchange::<1024>(MockConnection::new().respond(response_bytes), Method::Get).unwrap();
    assert_eq!(drain(&mut response, 16).unwrap(), b"abc");
}

#[test]
fn test_empty_chunked_body_ends_immediately() {
    let response_bytes = b"HTTP/1.1 200 OK\r\ntransfer-encoding: chunked\r\n\r\n0\r\n\r\n";
    let mut response = exchange::<1024>(MockConnection::new().respond(response_bytes), Method::Get).unwrap();
    assert_eq!(response.body().state(), SessionState::Done);
    assert_eq!(drain(&mut response, 16).unwrap(), b"");
}

#[test]
fn test_invalid_chunk_size_is_a_framing_error() {
    let response_bytes = b"HTTP/1.1 200 OK\r\ntransfer-encoding: chunked\r\n\r\nzz\r\n";
    let error = exchange::<1024>(MockConnection::new().respond(response_bytes), Method::Get).unwrap_err();
    assert_eq!(error, Error::ProtocolFraming(FramingError::InvalidChunkSize));
}

#[test]
fn test_chunk_without_crlf_is_a_framing_error() {
    let response_bytes = b"HTTP/1.1 200 OK\r\ntransfer-encoding: chunked\r\n\r\n4\r\nWikiXX0\r\n\r\n";
    let mut response = exchange::<1024>(MockConnection::new().respond(response_bytes), Method::Get).unwrap();
    let ctx = Context::background();
    let mut buf = [0u8; 16];
    assert_eq!(response.read(&ctx, &mut buf), Ok(4));
    assert_eq!(
        response.read(&ctx, &mut buf),
        Err(Error::ProtocolFraming(FramingError::InvalidChunkTrailer))
    );
}

#[test]
fn test_connection_closed_inside_chunk() {
    let response_bytes = b"HTTP/1.1 200 OK\r\ntransfer-encoding: chunked\r\n\r\na\r\nshort";
    let mut response = exchange::<1024>(MockConnection::new().respond(response_bytes), Method::Get).unwrap();
    assert_eq!(
        drain(&mut response, 16),
        Err(Error::Transport(TransportError::ConnectionClosed))
    );
}

#[test]
fn test_content_length_takes_precedence_over_chunked() {
    let response_bytes =
        b"HTTP/1.1 200 OK\r\ncontent-length: 3\r\ntransfer-encoding: chunked\r\n\r\nabc";
    let mut response = exchange::<1024>(MockConnection::new().respond(response_bytes), Method::Get).unwrap();
    assert_eq!(response.body().content_length(), Some(3));
    assert_eq!(drain(&mut response, 16).unwrap(), b"abc");
}

#[test]
fn test_content_length_spanning_many_fills() {
    let body: Vec<u8> = (0..1025u32).map(|i| (i % 251) as u8).collect();
    let mut response_bytes = b"HTTP/1.1 200 OK\r\ncontent-length: 1025\r\n\r\n".to_vec();
    response_bytes.extend_from_slice(&body);

    let conn = MockConnection::new().respond_in_pieces(&response_bytes, 100);
    let mut response = exchange::<64>(conn, Method::Get).unwrap();
    assert_eq!(drain(&mut response, 4096).unwrap(), body);

    let conn = MockConnection::new().respond(&response_bytes);
    let mut response = exchange::<1024>(conn, Method::Get).unwrap();
    assert_eq!(drain(&mut response, 4096).unwrap(), body);
    assert_eq!(response.body().total_read(), 1025);
}

#[test]
fn test_content_length_never_reads_past_the_body() {
    let conn = MockConnection::new()
        .respond(b"HTTP/1.1 200 OK\r\ncontent-length: 4\r\n\r\n")
        .respond(b"bodyEXTRA");
    let mut response = exchange::<1024>(conn, Method::Get).unwrap();
    assert_eq!(drain(&mut response, 64).unwrap(), b"body");
}

#[test]
fn test_connection_closed_before_content_length() {
    let response_bytes = b"HTTP/1.1 200 OK\r\ncontent-length: 10\r\n\r\nhello";
    let mut response = exchange::<1024>(MockConnection::new().respond(response_bytes), Method::Get).unwrap();
    assert_eq!(
        drain(&mut response, 64),
        Err(Error::Transport(TransportError::ConnectionClosed))
    );
    assert_eq!(response.body().total_read(), 5);
}

#[test]
fn test_invalid_content_length() {
    let response_bytes = b"HTTP/1.1 200 OK\r\ncontent-length: ten\r\n\r\n";
    let error = exchange::<1024>(MockConnection::new().respond(response_bytes), Method::Get).unwrap_err();
    assert_eq!(
        error,
        Error::ProtocolFraming(FramingError::InvalidContentLength)
    );
}

#[test]
fn test_close_delimited_body_ends_at_close() {
    let conn = MockConnection::new()
        .respond(b"HTTP/1.0 200 OK\r\nserver: legacy\r\n\r\nuntil ")
        .respond(b"the peer closes");
    let mut response = exchange::<1024>(conn, Method::Get).unwrap();
    assert_eq!(response.version(), (1, 0));
    assert_eq!(response.body().body_mode(), BodyMode::CloseDelimited);
    assert_eq!(drain(&mut response, 64).unwrap(), b"until the peer closes");
    assert_eq!(response.body().state(), SessionState::Done);
}

#[test]
fn test_head_response_has_no_body() {
    let conn = MockConnection::new().respond(b"HTTP/1.1 200 OK\r\ncontent-length: 1234\r\n\r\n");
    let mut response = exchange::<1024>(conn, Method::Head).unwrap();
    assert_eq!(response.header("content-length"), Some("1234"));
    assert_eq!(response.body().content_length(), Some(0));
    assert_eq!(drain(&mut response, 64).unwrap(), b"");
}

#[test]
fn test_no_content_and_not_modified_have_no_body() {
    for status in [&b"204 No Content"[..], &b"304 Not Modified"[..]] {
        let mut response_bytes = b"HTTP/1.1 ".to_vec();
        response_bytes.extend_from_slice(status);
        response_bytes.extend_from_slice(b"\r\ntransfer-encoding: chunked\r\n\r\n");
        let mut response = exchange::<1024>(MockConnection::new().respond(&response_bytes), Method::Get).unwrap();
        assert_eq!(response.body().state(), SessionState::Done);
        assert_eq!(drain(&mut response, 64).unwrap(), b"");
    }
}

#[test]
fn test_interim_responses_are_skipped() {
    let response_bytes = b"HTTP/1.1 103 Early Hints\r\nlink: </style.css>\r\n\r\n\
        HTTP/1.1 200 OK\r\ncontent-length: 2\r\n\r\nok";
    let mut response = exchange::<1024>(MockConnection::new().respond(response_bytes), Method::Get).unwrap();
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("link"), None);
    assert_eq!(drain(&mut response, 64).unwrap(), b"ok");
}

#[test]
fn test_header_split_across_reads() {
    let conn = MockConnection::new()
        .respond(b"HTTP/1.1 200 OK\r\nx-long-hea")
        .respond(b"der: some value\r")
        .respond(b"\ncontent-length: 1\r\n\r")
        .respond(b"\n!");
    let mut response = exchange::<1024>(conn, Method::Get).unwrap();
    assert_eq!(response.header("x-long-header"), Some("some value"));
    assert_eq!(drain(&mut response, 64).unwrap(), b"!");
}

#[test]
fn test_malformed_status_line() {
    let conn = MockConnection::new().respond(b"HTTP/1.1 2000 Too Much\r\n\r\n");
    let error = exchange::<1024>(conn, Method::Get).unwrap_err();
    assert!(matches!(error, Error::ProtocolFraming(_)));

    let conn = MockConnection::new().respond(b"SPDY/3 200 OK\r\n\r\n");
    let error = exchange::<1024>(conn, Method::Get).unwrap_err();
    assert_eq!(error, Error::ProtocolFraming(FramingError::InvalidStatusLine));
}

#[test]
fn test_connection_closed_before_head_completes() {
    let conn = MockConnection::new().respond(b"HTTP/1.1 200 OK\r\ncontent-le");
    let error = exchange::<1024>(conn, Method::Get).unwrap_err();
    assert_eq!(error, Error::Transport(TransportError::ConnectionClosed));
}

#[test]
fn test_into_parts_keeps_streaming() {
    let response = exchange::<1024>(MockConnection::new().respond(WIKIPEDIA), Method::Get).unwrap();
    let (head, mut session) = response.into_parts();
    assert_eq!(head.status_code, 200);
    assert_eq!(head.header("content-type"), Some("text/plain"));

    let ctx = Context::background();
    let mut buf = [0u8; 64];
    assert_eq!(session.read(&ctx, &mut buf), Ok(4));
    assert_eq!(&buf[..4], b"Wiki");
    assert_eq!(session.read(&ctx, &mut []), Ok(0));
    session.close().unwrap();
}

#[test]
fn test_wiki_chunks_reassemble_under_every_slicing() {
    let mut response_bytes = b"HTTP/1.1 200 OK\r\ntransfer-encoding: chunked\r\n\r\n".to_vec();
    response_bytes.extend_from_slice(b"4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n");
    for piece in 1..=response_bytes.len() {
        for step in 1..=10 {
            let conn = MockConnection::new().respond_in_pieces(&response_bytes, piece);
            let mut response = exchange::<1024>(conn, Method::Get).unwrap();
            assert_eq!(drain(&mut response, step).unwrap(), b"Wikipedia");
            let mut buf = [0u8; 8];
            assert_eq!(response.read(&Context::background(), &mut buf), Ok(0));
        }
    }
}

#[test]
fn test_content_length_is_exact_for_any_read_size() {
    let response_bytes = b"HTTP/1.1 200 OK\r\ncontent-length: 10\r\n\r\n0123456789";
    for step in 1..=12 {
        let conn = MockConnection::new().respond(response_bytes);
        let mut response = exchange::<1024>(conn, Method::Get).unwrap();
        let ctx = Context::background();
        let mut buf = vec![0u8; step];
        let mut reads = 0;
        let mut total = 0;
        loop {
            let n = response.read(&ctx, &mut buf).unwrap();
            if n == 0 {
                break;
            }
            reads += 1;
            total += n;
        }
        assert_eq!(total, 10);
        assert_eq!(reads, 10_usize.div_ceil(step));
        assert_eq!(response.read(&ctx, &mut buf), Ok(0));
    }
}

#[test]
fn test_long_and_numerous_response_headers_are_kept() {
    let policy = "a".repeat(600);
    let mut head = format!("HTTP/1.1 200 OK\r\ncontent-security-policy: {policy}\r\n");
    for i in 0..40 {
        head.push_str(&format!("x-ms-meta-h{i}: v{i}\r\n"));
    }
    head.push_str("content-length: 2\r\n\r\nok");

    for piece in [head.len(), 100, 7] {
        let conn = MockConnection::new().respond_in_pieces(head.as_bytes(), piece);
        let mut response = exchange::<256>(conn, Method::Get).unwrap();
        assert_eq!(response.header("content-security-policy"), Some(policy.as_str()));
        assert_eq!(response.header("x-ms-meta-h39"), Some("v39"));
        assert_eq!(response.headers().len(), 42);
        assert_eq!(drain(&mut response, 16).unwrap(), b"ok");
    }
}

#[test]
fn test_header_line_over_the_limit_fails_the_exchange() {
    let value = "a".repeat(MAX_LINE_LEN);
    let head = format!("HTTP/1.1 200 OK\r\nlocation: {value}\r\ncontent-length: 0\r\n\r\n");
    let conn = MockConnection::new().respond_in_pieces(head.as_bytes(), 128);
    let error = exchange::<1024>(conn, Method::Get).unwrap_err();
    assert_eq!(error, Error::ProtocolFraming(FramingError::HeaderTooLarge));
}
