use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::thread;
use std::time::Duration;
use stock_common::sse::SseDecoder;
use stock_common::tickers::Ticker;
use stock_common::Quote;
use stock_server::{ModelConfig, PriceModel, SseServer};

fn start_server(model: PriceModel, interval: Duration) -> SocketAddr {
    let server = SseServer::bind("127.0.0.1:0", model.into_shared(), interval).unwrap();
    let addr = server.local_addr().unwrap();
    thread::spawn(move || server.run());
    addr
}

fn aapl_at_100() -> PriceModel {
    PriceModel::with_starting_prices(&[(Ticker::AAPL, 100.0)], 20, StdRng::seed_from_u64(1))
}

fn send_request(addr: SocketAddr, method: &str, path: &str) -> BufReader<TcpStream> {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    write!(stream, "{method} {path} HTTP/1.1\r\nHost: localhost\r\nAccept: */*\r\n\r\n").unwrap();
    stream.flush().unwrap();
    BufReader::new(stream)
}

fn read_head(reader: &mut BufReader<TcpStream>) -> Vec<String> {
    let mut head = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end().to_string();
        if line.is_empty() {
            return head;
        }
        head.push(line);
    }
}

fn next_quote(reader: &mut BufReader<TcpStream>, decoder: &mut SseDecoder) -> Quote {
    loop {
        let mut line = String::new();
        assert!(reader.read_line(&mut line).unwrap() > 0, "stream ended early");
        if let Some(payload) = decoder.push_line(&line) {
            return Quote::from_json(&payload).unwrap();
        }
    }
}

#[test]
fn stream_endpoint_sends_sse_headers_and_frames() {
    let addr = start_server(aapl_at_100(), Duration::from_millis(20));
    let mut reader = send_request(addr, "GET", "/stream");

    let head = read_head(&mut reader);
    assert_eq!(head[0], "HTTP/1.1 200 OK");
    assert!(head.contains(&"Content-Type: text/event-stream".to_string()));
    assert!(head.contains(&"Cache-Control: no-cache".to_string()));
    assert!(head.contains(&"X-Accel-Buffering: no".to_string()));

    let mut decoder = SseDecoder::new();
    for expected_len in 2..=4 {
        let quote = next_quote(&mut reader, &mut decoder);
        assert_eq!(quote.symbol, Ticker::AAPL);
        assert_eq!(quote.history.len(), expected_len);
        assert_eq!(quote.history[0], 100.0);
        assert_eq!(quote.history.last().copied(), Some(quote.price));
    }
}

#[test]
fn frames_are_exact_data_lines() {
    let addr = start_server(aapl_at_100(), Duration::from_millis(20));
    let mut reader = send_request(addr, "GET", "/stream");
    read_head(&mut reader);

    let mut data = String::new();
    reader.read_line(&mut data).unwrap();
    let mut blank = String::new();
    reader.read_line(&mut blank).unwrap();

    assert!(data.starts_with("data: {\"symbol\": \"AAPL\", \"price\": "));
    assert!(data.ends_with("]}\n"));
    assert_eq!(blank, "\n");
}

#[test]
fn reconnecting_client_sees_the_shared_history_continue() {
    let addr = start_server(aapl_at_100(), Duration::from_millis(10));

    let mut first = send_request(addr, "GET", "/stream");
    read_head(&mut first);
    let quote = next_quote(&mut first, &mut SseDecoder::new());
    assert_eq!(quote.history.len(), 2);
    drop(first);

    let mut second = send_request(addr, "GET", "/stream");
    read_head(&mut second);
    let quote = next_quote(&mut second, &mut SseDecoder::new());
    assert!(quote.history.len() >= 3);
}

#[test]
fn history_never_exceeds_capacity_over_the_wire() {
    let model =
        PriceModel::with_starting_prices(&[(Ticker::MSFT, 200.0)], 3, StdRng::seed_from_u64(2));
    let addr = start_server(model, Duration::from_millis(1));
    let mut reader = send_request(addr, "GET", "/stream");
    read_head(&mut reader);

    let mut decoder = SseDecoder::new();
    for _ in 0..10 {
        assert!(next_quote(&mut reader, &mut decoder).history.len() <= 3);
    }
}

#[test]
fn index_page_lists_configured_symbols() {
    let config = ModelConfig::new(vec![Ticker::NFLX, Ticker::DIS], 120.0..250.0, 20).unwrap();
    let addr = start_server(PriceModel::seeded(&config, 1), Duration::from_secs(2));
    let mut reader = send_request(addr, "GET", "/");

    let head = read_head(&mut reader);
    assert_eq!(head[0], "HTTP/1.1 200 OK");
    let length: usize = head
        .iter()
        .find_map(|h| h.strip_prefix("Content-Length: "))
        .unwrap()
        .parse()
        .unwrap();

    let mut body = String::new();
    reader.read_to_string(&mut body).unwrap();
    assert_eq!(body.len(), length);
    assert!(body.contains("data-symbol=\"NFLX\""));
    assert!(body.contains("data-symbol=\"DIS\""));
    assert!(!body.contains("data-symbol=\"AAPL\""));
}

#[test]
fn unknown_routes_and_methods_are_rejected() {
    let addr = start_server(aapl_at_100(), Duration::from_secs(2));

    let mut reader = send_request(addr, "GET", "/missing");
    assert_eq!(read_head(&mut reader)[0], "HTTP/1.1 404 Not Found");

    let mut reader = send_request(addr, "POST", "/stream");
    assert_eq!(read_head(&mut reader)[0], "HTTP/1.1 405 Method Not Allowed");
}

#[test]
fn malformed_request_gets_bad_request() {
    let addr = start_server(aapl_at_100(), Duration::from_secs(2));
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream.write_all(b"HELLO\r\n\r\n").unwrap();

    let mut reader = BufReader::new(stream);
    assert_eq!(read_head(&mut reader)[0], "HTTP/1.1 400 Bad Request");
}
