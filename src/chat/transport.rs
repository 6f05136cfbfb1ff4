//! Chat transport port and the TCP line-JSON implementation.
//!
//! The chat loop only needs "send text, receive text, report failure";
//! the wire is behind this port. Connection lifecycle events are
//! logged, never thrown through the prompt loop.

use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, BufReader, Write};
use std::net::TcpStream;

/// One message on the wire.
#[derive(Debug, Serialize, Deserialize)]
struct ChatFrame {
    text: String,
}

/// A live chat connection.
pub trait ChatTransport: Send {
    /// Transmit one message.
    fn send(&mut self, text: &str) -> io::Result<()>;

    /// Receive the next reply; `None` means the remote closed.
    fn recv(&mut self) -> io::Result<Option<String>>;
}

/// TCP transport speaking newline-delimited JSON frames.
pub struct TcpLineTransport {
    writer: TcpStream,
    reader: BufReader<TcpStream>,
    peer: String,
}

impl TcpLineTransport {
    /// Connect to a chat endpoint.
    pub fn connect(addr: &str) -> io::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        log::info!("chat connection opened: {addr}");
        let reader = BufReader::new(stream.try_clone()?);
        Ok(Self {
            writer: stream,
            reader,
            peer: addr.to_string(),
        })
    }
}

impl ChatTransport for TcpLineTransport {
    fn send(&mut self, text: &str) -> io::Result<()> {
        let frame = serde_json::to_string(&ChatFrame {
            text: text.to_string(),
        })?;
        self.writer.write_all(frame.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }

    fn recv(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line)?;
        if n == 0 {
            log::info!("chat connection closed: {}", self.peer);
            return Ok(None);
        }
        let frame: ChatFrame = serde_json::from_str(line.trim_end())?;
        Ok(Some(frame.text))
    }
}

impl Drop for TcpLineTransport {
    fn drop(&mut self) {
        log::debug!("chat connection dropped: {}", self.peer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_tcp_frames_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();

            let frame: ChatFrame = serde_json::from_str(line.trim_end()).unwrap();
            assert_eq!(frame.text, "ping");

            let mut stream = stream;
            stream
                .write_all(b"{\"text\":\"pong\"}\n")
                .unwrap();
        });

        let mut transport = TcpLineTransport::connect(&addr.to_string()).unwrap();
        transport.send("ping").unwrap();
        assert_eq!(transport.recv().unwrap().as_deref(), Some("pong"));

        // server hung up after replying
        assert_eq!(transport.recv().unwrap(), None);
        server.join().unwrap();
    }

    #[test]
    fn test_connect_failure_is_error() {
        // port 1 is essentially never listening
        assert!(TcpLineTransport::connect("127.0.0.1:1").is_err());
    }
}
