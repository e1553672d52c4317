use std::fmt;

/// Категория ошибки публикации.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Io,
    Encode,
    Schema,
    Source,
}

/// Ошибка, которую возвращают методы encoder/source/sink trait'ов.
///
/// Encode либо полностью успешен (один целый payload), либо падает с этой
/// ошибкой — никаких частичных payload'ов и retry на этом слое.
#[derive(Debug)]
pub struct PublishError {
    pub kind: ErrorKind,
    pub message: String,
}

impl PublishError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Config, message: msg.into() }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Io, message: msg.into() }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Encode, message: msg.into() }
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Schema, message: msg.into() }
    }

    pub fn source(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Source, message: msg.into() }
    }

    /// Добавить контекст, сохранив исходный ErrorKind.
    ///
    /// Даёт: `"контекст: исходное сообщение"`.
    pub fn with_context(self, ctx: impl fmt::Display) -> Self {
        Self {
            kind: self.kind,
            message: format!("{ctx}: {}", self.message),
        }
    }
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for PublishError {}

// ---------------------------------------------------------------------------
// From impls: standard error types → PublishError with correct ErrorKind
// ---------------------------------------------------------------------------

impl From<std::io::Error> for PublishError {
    fn from(e: std::io::Error) -> Self {
        Self::io(e.to_string())
    }
}

impl From<serde_json::Error> for PublishError {
    fn from(e: serde_json::Error) -> Self {
        Self::encode(e.to_string())
    }
}
