use std::sync::Arc;

/// What a payload represents to the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Text,
    Link,
    File,
}

/// Optional descriptive data carried alongside a payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Original file name as supplied by the sender
    pub filename: Option<String>,
    /// MIME type as supplied by the sender
    pub content_type: Option<String>,
}

impl Metadata {
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// A payload with its kind and metadata.
///
/// Cloning is cheap: the bytes are shared, never copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    kind: ContentKind,
    bytes: Arc<[u8]>,
    metadata: Metadata,
}

impl Content {
    pub fn new(kind: ContentKind, bytes: impl Into<Arc<[u8]>>, metadata: Metadata) -> Self {
        Self {
            kind,
            bytes: bytes.into(),
            metadata,
        }
    }

    /// Plain text content
    pub fn text(text: impl Into<String>) -> Self {
        let text: String = text.into();
        Self::new(
            ContentKind::Text,
            text.into_bytes(),
            Metadata::default().with_content_type("text/plain; charset=utf-8"),
        )
    }

    /// One or more links, stored as text
    pub fn link(links: impl Into<String>) -> Self {
        let links: String = links.into();
        Self::new(
            ContentKind::Link,
            links.into_bytes(),
            Metadata::default().with_content_type("text/uri-list"),
        )
    }

    /// An uploaded file blob
    pub fn file(bytes: impl Into<Arc<[u8]>>, filename: impl Into<String>) -> Self {
        Self::new(
            ContentKind::File,
            bytes,
            Metadata::default().with_filename(filename),
        )
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the payload as UTF-8 text, if it is valid UTF-8
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
