//! Minimal HTTP/1.1 front for the quote stream.
//!
//! Only what a browser `EventSource` needs is understood: the request line is parsed,
//! headers are skipped, and every response closes the connection. `GET /stream` answers
//! with the SSE headers and then writes frames until the client disconnects.
use crate::model::price_model::SharedPriceModel;
use crate::model::quote_stream::QuoteStream;
use crate::page;
use log::{debug, error, info, warn};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use stock_common::net::{EVENT_STREAM_MIME, INDEX_PATH, STREAM_PATH};
use stock_common::{Result, StreamError};

/// Upper bound on request header lines read before giving up on a client.
const MAX_HEADER_LINES: usize = 100;

/// HTTP server that hands every connection its own quote stream.
///
/// Each accepted TCP connection is served on a dedicated thread. `GET /stream`
/// keeps the connection open and writes one SSE frame per tick until the client
/// goes away; `GET /` returns the dashboard page.
pub struct SseServer {
    /// The underlying TCP listening socket.
    pub(crate) listener: TcpListener,
    model: SharedPriceModel,
    interval: Duration,
    index_page: Arc<str>,
}

/// Method and path of a parsed request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    /// HTTP method, e.g. `GET`.
    pub method: String,
    /// Request target without its query string.
    pub path: String,
}

impl SseServer {
    /// Bind a new server to `bind_addr` (e.g., `127.0.0.1:5000`).
    pub fn bind(bind_addr: &str, model: SharedPriceModel, interval: Duration) -> Result<Self> {
        let listener = TcpListener::bind(bind_addr)?;
        let index_page = {
            let guard = model.lock()?;
            Arc::from(page::render_index(guard.symbols()))
        };
        Ok(Self {
            listener,
            model,
            interval,
            index_page,
        })
    }

    /// Address the server is listening on.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Blocking accept loop. Every connection is handled on its own thread;
    /// a failing connection never stops the loop.
    pub fn run(self) -> Result<()> {
        info!("SSE server is started on http://{}", self.listener.local_addr()?);

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let model = Arc::clone(&self.model);
                    let index_page = Arc::clone(&self.index_page);
                    let interval = self.interval;
                    thread::spawn(move || {
                        if let Err(e) = handle_connection(stream, model, interval, &index_page) {
                            error!("Connection error: {}", e);
                        }
                    });
                }
                Err(e) => error!("TCP connection error: {}", e),
            }
        }
        Ok(())
    }
}

/// Serve a single HTTP request on `stream`.
pub fn handle_connection(
    stream: TcpStream,
    model: SharedPriceModel,
    interval: Duration,
    index_page: &str,
) -> Result<()> {
    let peer = stream.peer_addr()?;
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;

    let head = match read_request_head(&mut reader) {
        Ok(head) => head,
        Err(StreamError::Http(reason)) => {
            warn!("Bad request from {}: {}", peer, reason);
            return write_response(&mut writer, "400 Bad Request", "text/plain", b"bad request\n");
        }
        Err(e) => return Err(e),
    };
    debug!("{} {} from {}", head.method, head.path, peer);

    match (head.method.as_str(), head.path.as_str()) {
        ("GET", STREAM_PATH) => {
            write_stream_head(&mut writer)?;
            info!("Quote stream opened for {}", peer);
            let sent = pump_frames(&mut writer, QuoteStream::new(model, interval), peer)?;
            info!("Quote stream for {} closed after {} frames", peer, sent);
            Ok(())
        }
        ("GET", INDEX_PATH) => write_response(
            &mut writer,
            "200 OK",
            "text/html; charset=utf-8",
            index_page.as_bytes(),
        ),
        ("GET", _) => write_response(&mut writer, "404 Not Found", "text/plain", b"not found\n"),
        _ => {
            warn!("Rejected {} {} from {}", head.method, head.path, peer);
            write_response(
                &mut writer,
                "405 Method Not Allowed",
                "text/plain",
                b"method not allowed\n",
            )
        }
    }
}

/// Read the request line and skip the headers up to the blank line.
pub fn read_request_head<R: BufRead>(reader: &mut R) -> Result<RequestHead> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(StreamError::Http("connection closed before request line".into()));
    }

    let mut parts = line.split_whitespace();
    let (method, target, version) = match (parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(t), Some(v)) if parts.next().is_none() => (m, t, v),
        _ => return Err(StreamError::Http(format!("malformed request line {:?}", line.trim_end()))),
    };
    if !version.starts_with("HTTP/1.") {
        return Err(StreamError::Http(format!("unsupported protocol {}", version)));
    }
    let path = target.split('?').next().unwrap_or(target);
    let head = RequestHead {
        method: method.to_string(),
        path: path.to_string(),
    };

    for _ in 0..MAX_HEADER_LINES {
        line.clear();
        if reader.read_line(&mut line)? == 0 || line.trim_end().is_empty() {
            return Ok(head);
        }
    }
    Err(StreamError::Http("too many header lines".into()))
}

fn write_stream_head<W: Write>(writer: &mut W) -> Result<()> {
    let head = format!(
        "HTTP/1.1 200 OK\r\n\
         Content-Type: {EVENT_STREAM_MIME}\r\n\
         Cache-Control: no-cache\r\n\
         X-Accel-Buffering: no\r\n\
         Connection: close\r\n\
         \r\n"
    );
    writer.write_all(head.as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn write_response<W: Write>(
    writer: &mut W,
    status: &str,
    content_type: &str,
    body: &[u8],
) -> Result<()> {
    let head = format!(
        "HTTP/1.1 {status}\r\n\
         Content-Type: {content_type}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n",
        body.len()
    );
    writer.write_all(head.as_bytes())?;
    writer.write_all(body)?;
    writer.flush()?;
    Ok(())
}

/// Write every frame to `writer`, flushing after each one.
///
/// Returns the number of frames delivered once the client has gone away or the
/// frames run out. A frame that could not be produced ends the loop with its error.
pub fn pump_frames<W, I>(writer: &mut W, frames: I, peer: SocketAddr) -> Result<u64>
where
    W: Write,
    I: IntoIterator<Item = Result<String>>,
{
    let mut sent = 0;
    for frame in frames {
        let frame = frame?;
        if let Err(e) = writer.write_all(frame.as_bytes()).and_then(|_| writer.flush()) {
            if is_disconnect(&e) {
                debug!("Write to {} failed: {}", peer, e);
                return Ok(sent);
            }
            return Err(e.into());
        }
        sent += 1;
        debug!("Sent frame #{} to {}", sent, peer);
    }
    Ok(sent)
}

fn is_disconnect(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::BrokenPipe
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected
            | ErrorKind::UnexpectedEof
            | ErrorKind::WriteZero
    )
}
