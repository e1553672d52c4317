use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use courier_api::{EncodedPayload, MessageSink, PublishError};

use crate::framing::LengthPrefixed;

/// Append-only файловый sink: один файл length-prefixed payload'ов.
///
/// Подходит для append-only данных — payload'ы только дописываются,
/// никогда не переписываются.
pub struct FileSink {
    path: PathBuf,
    framing: LengthPrefixed,
    file: Option<BufWriter<File>>,
    buf: Vec<u8>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            framing: LengthPrefixed::new(0),
            file: None,
            buf: Vec::with_capacity(8192),
        }
    }
}

impl MessageSink for FileSink {
    fn open(&mut self) -> Result<(), PublishError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| PublishError::io(format!("mkdir {}: {e}", parent.display())))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| PublishError::io(format!("open {}: {e}", self.path.display())))?;
        self.file = Some(BufWriter::new(file));
        tracing::info!(path = %self.path.display(), "file sink opened");
        Ok(())
    }

    fn publish(&mut self, payload: &EncodedPayload) -> Result<(), PublishError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| PublishError::io("file sink: publish before open"))?;
        self.buf.clear();
        self.framing.encode(payload.as_bytes(), &mut self.buf)?;
        file.write_all(&self.buf)
            .map_err(|e| PublishError::io(format!("write {}: {e}", self.path.display())))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), PublishError> {
        if let Some(file) = self.file.as_mut() {
            file.flush()
                .map_err(|e| PublishError::io(format!("flush {}: {e}", self.path.display())))?;
        }
        Ok(())
    }
}

/// Прочитать обратно все frame'ы из файла sink'а, старейшие первыми.
pub fn read_frames(path: impl AsRef<Path>) -> Result<Vec<Vec<u8>>, PublishError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| PublishError::io(format!("read {}: {e}", path.display())))?;

    let framing = LengthPrefixed::new(0);
    let mut frames = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        match framing.decode(&bytes[offset..])? {
            Some((payload, consumed)) => {
                frames.push(payload);
                offset += consumed;
            }
            None => {
                return Err(PublishError::io(format!(
                    "truncated frame at offset {offset} in {}",
                    path.display()
                )));
            }
        }
    }
    Ok(frames)
}
