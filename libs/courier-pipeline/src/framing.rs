use courier_api::PublishError;

/// Length-prefixed framing: 4-байтовый big-endian заголовок + payload.
///
/// Используется байт-стримовыми sink'ами (TCP, файл), чтобы принимающая
/// сторона могла разрезать поток обратно на отдельные payload'ы.
#[derive(Clone, Copy, Debug)]
pub struct LengthPrefixed {
    /// Максимальный размер payload в байтах (0 = без лимита).
    max_payload: usize,
}

impl LengthPrefixed {
    pub const HEADER_LEN: usize = 4;

    pub fn new(max_payload: usize) -> Self {
        Self { max_payload }
    }

    pub fn encode(&self, data: &[u8], buf: &mut Vec<u8>) -> Result<(), PublishError> {
        if self.max_payload > 0 && data.len() > self.max_payload {
            return Err(PublishError::encode(format!(
                "payload too large: {} bytes (max {})",
                data.len(),
                self.max_payload
            )));
        }
        buf.extend_from_slice(&(data.len() as u32).to_be_bytes());
        buf.extend_from_slice(data);
        Ok(())
    }

    /// Декодировать один frame с начала `buf`.
    ///
    /// Возвращает `Ok(None)`, пока в буфере ещё нет целого frame'а.
    /// При успехе — payload и число потреблённых байт.
    pub fn decode(&self, buf: &[u8]) -> Result<Option<(Vec<u8>, usize)>, PublishError> {
        if buf.len() < Self::HEADER_LEN {
            return Ok(None);
        }
        let len = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
        if self.max_payload > 0 && len > self.max_payload {
            return Err(PublishError::encode(format!(
                "payload too large: {len} bytes (max {})",
                self.max_payload
            )));
        }
        let total = Self::HEADER_LEN + len;
        if buf.len() < total {
            return Ok(None); // данных на целый frame ещё нет
        }
        Ok(Some((buf[Self::HEADER_LEN..total].to_vec(), total)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let framing = LengthPrefixed::new(0);
        let mut buf = Vec::new();
        framing.encode(b"hello", &mut buf).unwrap();
        framing.encode(b"", &mut buf).unwrap();

        let (first, consumed) = framing.decode(&buf).unwrap().unwrap();
        assert_eq!(first, b"hello");
        let (second, rest) = framing.decode(&buf[consumed..]).unwrap().unwrap();
        assert_eq!(second, b"");
        assert_eq!(consumed + rest, buf.len());
    }

    #[test]
    fn partial_frame_yields_none() {
        let framing = LengthPrefixed::new(0);
        let mut buf = Vec::new();
        framing.encode(b"payload", &mut buf).unwrap();

        assert!(framing.decode(&buf[..2]).unwrap().is_none());
        assert!(framing.decode(&buf[..buf.len() - 1]).unwrap().is_none());
    }

    #[test]
    fn max_payload_enforced_both_ways() {
        let framing = LengthPrefixed::new(4);
        let mut buf = Vec::new();
        assert!(framing.encode(b"toolong", &mut buf).is_err());

        let unlimited = LengthPrefixed::new(0);
        unlimited.encode(b"toolong", &mut buf).unwrap();
        assert!(framing.decode(&buf).is_err());
    }
}
