//! User input: mode selection, the uploaded document, and bounded free text.
//!
//! Constraints are enforced when a value is *selected*, not when it is
//! submitted. An oversized or non-PDF file never becomes an
//! [`UploadedDocument`], so the orchestrator only has to answer "is anything
//! there?" and never needs to re-check size or type.

use crate::config::{ClientConfig, InputLimits, PDF_MIME_TYPE};
use crate::error::InputError;
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;

/// Which submission path is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Upload a PDF, with optional notes. (default)
    #[default]
    UploadDocument,
    /// Summarize pasted text.
    PasteText,
}

/// A selected document that satisfies the configured type and size limits.
#[derive(Clone)]
pub struct UploadedDocument {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl UploadedDocument {
    /// Wrap in-memory bytes, validating type and size.
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
        limits: &InputLimits,
    ) -> Result<Self, InputError> {
        let doc = Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        };
        doc.check(limits)?;
        Ok(doc)
    }

    /// Load a document from disk.
    ///
    /// The size is checked against file metadata before reading, so a
    /// 12 MiB file is rejected without being loaded. The type is inferred
    /// from the extension and confirmed by the `%PDF` magic bytes.
    pub async fn from_path(
        path: impl AsRef<Path>,
        limits: &InputLimits,
    ) -> Result<Self, InputError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let unreadable = |source| InputError::Unreadable {
            path: path.to_path_buf(),
            source,
        };

        let meta = tokio::fs::metadata(path).await.map_err(unreadable)?;
        let mime_type = guess_mime_type(path);
        if !limits.accepts_mime_type(mime_type) {
            return Err(InputError::UnsupportedType {
                name,
                mime_type: mime_type.to_string(),
            });
        }
        if meta.len() > limits.max_document_bytes {
            return Err(InputError::DocumentTooLarge {
                name,
                size: meta.len(),
                max: limits.max_document_bytes,
            });
        }

        let bytes = tokio::fs::read(path).await.map_err(unreadable)?;
        if !bytes.starts_with(b"%PDF") {
            return Err(InputError::UnsupportedType {
                name,
                mime_type: "unknown (missing %PDF header)".to_string(),
            });
        }

        debug!("Loaded document {} ({} bytes)", name, bytes.len());
        Self::new(name, mime_type, bytes, limits)
    }

    fn check(&self, limits: &InputLimits) -> Result<(), InputError> {
        if !limits.accepts_mime_type(&self.mime_type) {
            return Err(InputError::UnsupportedType {
                name: self.name.clone(),
                mime_type: self.mime_type.clone(),
            });
        }
        if self.byte_size() > limits.max_document_bytes {
            return Err(InputError::DocumentTooLarge {
                name: self.name.clone(),
                size: self.byte_size(),
                max: limits.max_document_bytes,
            });
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn byte_size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for UploadedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedDocument")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("byte_size", &self.byte_size())
            .finish()
    }
}

fn guess_mime_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_MIME_TYPE,
        _ => "application/octet-stream",
    }
}

/// Text bounded to a maximum number of characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreeText(String);

impl FreeText {
    pub fn new(text: impl Into<String>, max_chars: usize) -> Result<Self, InputError> {
        let text = text.into();
        let len = text.chars().count();
        if len > max_chars {
            return Err(InputError::TextTooLong {
                len,
                max: max_chars,
            });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// The text, or `None` when blank.
    pub fn non_blank(&self) -> Option<&str> {
        if self.is_blank() {
            None
        } else {
            Some(&self.0)
        }
    }
}

/// A value that is only meaningful until a recorded instant.
///
/// The consumer decides when to look, passing its own `now`; nothing fires
/// in the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiring<T> {
    value: T,
    expires_at: Instant,
}

impl<T> Expiring<T> {
    pub fn new(value: T, now: Instant, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: now + ttl,
        }
    }

    pub fn is_active(&self, now: Instant) -> bool {
        now < self.expires_at
    }

    pub fn get(&self, now: Instant) -> Option<&T> {
        self.is_active(now).then_some(&self.value)
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }
}

/// Everything the user has entered for the next submission.
#[derive(Debug, Clone)]
pub struct SubmissionInput {
    limits: InputLimits,
    paste_ttl: Duration,
    mode: InputMode,
    document: Option<UploadedDocument>,
    text: FreeText,
    notes: FreeText,
    title: Option<String>,
    pasted: Option<Expiring<()>>,
}

impl SubmissionInput {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            limits: config.limits.clone(),
            paste_ttl: config.paste_indicator,
            mode: InputMode::default(),
            document: None,
            text: FreeText::default(),
            notes: FreeText::default(),
            title: None,
            pasted: None,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
    }

    pub fn limits(&self) -> &InputLimits {
        &self.limits
    }

    /// Select a document, replacing any previous one.
    ///
    /// On error the previous selection is left untouched.
    pub fn select_document(&mut self, document: UploadedDocument) -> Result<(), InputError> {
        document.check(&self.limits)?;
        self.document = Some(document);
        Ok(())
    }

    /// Load and select a document from disk.
    pub async fn select_document_path(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<&UploadedDocument, InputError> {
        let document = UploadedDocument::from_path(path, &self.limits).await?;
        Ok(self.document.insert(document))
    }

    pub fn remove_document(&mut self) -> Option<UploadedDocument> {
        self.document.take()
    }

    pub fn document(&self) -> Option<&UploadedDocument> {
        self.document.as_ref()
    }

    /// Text to summarize in [`InputMode::PasteText`].
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), InputError> {
        self.text = FreeText::new(text, self.limits.max_text_chars)?;
        Ok(())
    }

    /// Like [`set_text`](Self::set_text), also raising the "just pasted"
    /// indicator until `now + paste_indicator`.
    pub fn paste_text(&mut self, text: impl Into<String>, now: Instant) -> Result<(), InputError> {
        self.set_text(text)?;
        self.pasted = Some(Expiring::new((), now, self.paste_ttl));
        Ok(())
    }

    pub fn just_pasted(&self, now: Instant) -> bool {
        self.pasted.is_some_and(|p| p.is_active(now))
    }

    pub fn text(&self) -> &FreeText {
        &self.text
    }

    /// Optional context sent alongside either kind of submission.
    pub fn set_notes(&mut self, notes: impl Into<String>) -> Result<(), InputError> {
        self.notes = FreeText::new(notes, self.limits.max_text_chars)?;
        Ok(())
    }

    pub fn notes(&self) -> &FreeText {
        &self.notes
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title.filter(|t| !t.trim().is_empty());
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}
