//! Reading the quote stream from the server.
//!
//! `QuoteListener::connect` performs the HTTP handshake for `GET /stream`;
//! `QuoteListener::spawn` then decodes SSE frames on a background thread and forwards
//! every quote to the main loop over a `crossbeam_channel`.
use crossbeam_channel::Sender;
use log::{debug, info};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::thread;
use stock_common::net::{EVENT_STREAM_MIME, STREAM_PATH};
use stock_common::sse::SseDecoder;
use stock_common::{Quote, Result, StreamError};

/// Message sent by the listener thread to the main loop.
#[derive(Debug)]
pub enum StreamEvent {
    /// A decoded quote.
    Quote(Quote),
    /// The stream ended; carries a human-readable reason.
    Closed(String),
}

/// Helper type for consuming the server's event stream.
pub struct QuoteListener;

impl QuoteListener {
    /// Open `GET /stream` on `server` and validate the response head.
    pub fn connect(server: &str) -> Result<BufReader<TcpStream>> {
        let mut stream = TcpStream::connect(server)?;
        info!("Connected to {}", stream.peer_addr()?);
        let request = format!(
            "GET {STREAM_PATH} HTTP/1.1\r\nHost: {server}\r\nAccept: {EVENT_STREAM_MIME}\r\nCache-Control: no-cache\r\n\r\n"
        );
        stream.write_all(request.as_bytes())?;
        stream.flush()?;

        let mut reader = BufReader::new(stream);
        Self::check_head(&mut reader)?;
        Ok(reader)
    }

    /// Read the response head and make sure it opens an event stream.
    pub fn check_head<R: BufRead>(reader: &mut R) -> Result<()> {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(StreamError::Http("server closed the connection".into()));
        }
        let status = line.trim_end().to_string();
        if status.split_whitespace().nth(1) != Some("200") {
            return Err(StreamError::Http(format!("unexpected status line {:?}", status)));
        }

        let mut is_event_stream = false;
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                return Err(StreamError::Http("response head truncated".into()));
            }
            let header = line.trim_end();
            if header.is_empty() {
                break;
            }
            if let Some((name, value)) = header.split_once(':') {
                if name.trim().eq_ignore_ascii_case("content-type")
                    && value.trim().starts_with(EVENT_STREAM_MIME)
                {
                    is_event_stream = true;
                }
            }
        }

        if is_event_stream {
            Ok(())
        } else {
            Err(StreamError::Http(format!("response is not {}", EVENT_STREAM_MIME)))
        }
    }

    /// Decode frames from `reader` until the server closes the stream, sending each
    /// quote to `tx`. Payloads that are not quotes are skipped.
    pub fn read_loop<R: BufRead>(mut reader: R, tx: &Sender<StreamEvent>) -> Result<()> {
        let mut decoder = SseDecoder::new();
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                return Ok(());
            }
            let Some(payload) = decoder.push_line(&line) else {
                continue;
            };
            match Quote::from_json(&payload) {
                Ok(quote) => tx
                    .send(StreamEvent::Quote(quote))
                    .map_err(|e| StreamError::ChannelSend(e.to_string()))?,
                Err(e) => debug!("Skipping payload {:?}: {}", payload, e),
            }
        }
    }

    /// Run `read_loop` on a background thread; a `Closed` event is sent when it ends.
    pub fn spawn<R: BufRead + Send + 'static>(reader: R, tx: Sender<StreamEvent>) {
        thread::spawn(move || {
            let reason = match Self::read_loop(reader, &tx) {
                Ok(()) => "server closed the stream".to_string(),
                Err(e) => e.to_string(),
            };
            let _ = tx.send(StreamEvent::Closed(reason));
        });
    }
}
