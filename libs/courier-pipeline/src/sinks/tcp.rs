use std::io::Write;
use std::net::TcpStream;

use courier_api::{EncodedPayload, MessageSink, PublishError};

use crate::framing::LengthPrefixed;

/// TCP sink: одно исходящее соединение, length-prefixed payload'ы.
///
/// При ошибке записи соединение дропается и делается один reconnect,
/// после чего ошибка пробрасывается. Всё сверх этого одного retry —
/// забота оператора, не этого слоя.
pub struct TcpSink {
    addr: String,
    framing: LengthPrefixed,
    stream: Option<TcpStream>,
    buf: Vec<u8>,
}

impl TcpSink {
    pub fn new(host: &str, port: u16, max_payload: usize) -> Self {
        Self {
            addr: format!("{host}:{port}"),
            framing: LengthPrefixed::new(max_payload),
            stream: None,
            buf: Vec::with_capacity(8192),
        }
    }

    fn ensure_connected(&mut self) -> Result<(), PublishError> {
        if self.stream.is_none() {
            let stream = TcpStream::connect(&self.addr)
                .map_err(|e| PublishError::io(format!("TCP connect to {}: {e}", self.addr)))?;
            tracing::info!(addr = %self.addr, "tcp sink connected");
            self.stream = Some(stream);
        }
        Ok(())
    }

    fn write_frame(&mut self) -> Result<(), PublishError> {
        self.ensure_connected()?;
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| PublishError::io(format!("tcp sink {}: not connected", self.addr)))?;
        stream
            .write_all(&self.buf)
            .map_err(|e| PublishError::io(format!("TCP write to {}: {e}", self.addr)))
    }
}

impl MessageSink for TcpSink {
    fn open(&mut self) -> Result<(), PublishError> {
        self.ensure_connected()
    }

    fn publish(&mut self, payload: &EncodedPayload) -> Result<(), PublishError> {
        self.buf.clear();
        self.framing.encode(payload.as_bytes(), &mut self.buf)?;

        match self.write_frame() {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(addr = %self.addr, error = %e, "send error, reconnecting");
                self.stream = None;
                self.write_frame()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_api::DataFormat;
    use std::io::Read;
    use std::net::TcpListener;

    #[test]
    fn delivers_framed_payloads() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = std::thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            let mut received = Vec::new();
            conn.read_to_end(&mut received).unwrap();
            received
        });

        let mut sink = TcpSink::new(&addr.ip().to_string(), addr.port(), 0);
        sink.open().unwrap();
        sink.publish(&EncodedPayload::new(b"hi".to_vec(), DataFormat::Raw))
            .unwrap();
        drop(sink);

        let received = server.join().unwrap();
        let framing = LengthPrefixed::new(0);
        let (payload, consumed) = framing.decode(&received).unwrap().unwrap();
        assert_eq!(payload, b"hi");
        assert_eq!(consumed, received.len());
    }

    #[test]
    fn connect_failure_is_io_error() {
        // Порт 1 на loopback практически никогда не слушается.
        let mut sink = TcpSink::new("127.0.0.1", 1, 0);
        assert!(sink.open().is_err());
    }
}
