//! One file being edited: text plus path, language and encoding.

use encoding_rs::Encoding;
use std::path::{Path, PathBuf};
use webpad_buffer::TextBuffer;
use webpad_syntax::Language;

use crate::{CoreError, CoreResult};

/// File extensions the editor's dialogs filter on.
pub const FILE_EXTENSIONS: &[&str] = &["html", "css", "js"];

/// A document composes the text buffer with its on-disk identity.
///
/// ## Learning: Encodings Are Not Charsets in std
///
/// The standard library only speaks UTF-8. Users still have files in
/// 8-bit encodings like `cp1251`, so open and save go through
/// `encoding_rs`, which resolves WHATWG labels to encoders at runtime.
/// UTF-8 stays the default and is a zero-copy pass-through.
#[derive(Debug)]
pub struct Document {
    buffer: TextBuffer,
    path: Option<PathBuf>,
    name: String,
    language: Language,
    encoding: &'static Encoding,
}

impl Document {
    /// A new scratch document in the given language.
    pub fn new(language: Language) -> Self {
        Self {
            buffer: TextBuffer::new(),
            path: None,
            name: "untitled".to_string(),
            language,
            encoding: encoding_rs::UTF_8,
        }
    }

    /// Resolves an encoding label like `utf-8` or `cp1251`.
    pub fn encoding_for_label(label: &str) -> CoreResult<&'static Encoding> {
        Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| CoreError::UnknownEncoding(label.to_string()))
    }

    /// Loads a file, decoding it with the named encoding.
    ///
    /// The language comes from the file extension; unknown extensions
    /// highlight as HTML.
    pub fn open(path: impl AsRef<Path>, encoding_label: &str) -> CoreResult<Self> {
        let path = path.as_ref();
        let encoding = Self::encoding_for_label(encoding_label)?;
        let bytes = std::fs::read(path)?;
        let (text, malformed) = encoding.decode_without_bom_handling(&bytes);
        if malformed {
            return Err(CoreError::Decode {
                encoding: encoding.name().to_string(),
                path: path.to_path_buf(),
            });
        }
        let language = Language::from_path(path);
        tracing::info!(
            path = %path.display(),
            %language,
            encoding = encoding.name(),
            "opened file"
        );
        Ok(Self {
            buffer: TextBuffer::from_text(&text),
            name: display_name(path),
            path: Some(path.to_path_buf()),
            language,
            encoding,
        })
    }

    // ==================== Saving ====================

    /// Writes the buffer to the document's existing path.
    pub fn save(&mut self) -> CoreResult<PathBuf> {
        let path = self.path.clone().ok_or(CoreError::NoFilePath)?;
        self.write_to(&path)?;
        Ok(path)
    }

    /// Writes the buffer to `path` and adopts it as the document's home.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        self.write_to(path)?;
        self.path = Some(path.to_path_buf());
        self.name = display_name(path);
        Ok(())
    }

    fn write_to(&mut self, path: &Path) -> CoreResult<()> {
        let bytes = self.encoded_bytes()?;
        // Write a sibling temp file first so a failed save never
        // truncates the original
        let tmp = path.with_extension("webpad.tmp");
        std::fs::write(&tmp, &bytes)?;
        std::fs::rename(&tmp, path)?;
        self.buffer.mark_saved();
        tracing::info!(path = %path.display(), bytes = bytes.len(), "saved file");
        Ok(())
    }

    /// The full buffer text, encoded with the document's encoding.
    ///
    /// WHATWG `encode` never produces UTF-16 output: it falls back to
    /// UTF-8 and reports the encoding it actually used. The two UTF-16
    /// flavors therefore serialize their code units directly; any other
    /// fallback is refused the same way as an unmappable character.
    fn encoded_bytes(&self) -> CoreResult<Vec<u8>> {
        let text = self.buffer.text();
        if self.encoding == encoding_rs::UTF_16LE || self.encoding == encoding_rs::UTF_16BE {
            let big_endian = self.encoding == encoding_rs::UTF_16BE;
            let mut bytes = Vec::with_capacity(text.len() * 2);
            for unit in text.encode_utf16() {
                let pair = if big_endian {
                    unit.to_be_bytes()
                } else {
                    unit.to_le_bytes()
                };
                bytes.extend_from_slice(&pair);
            }
            return Ok(bytes);
        }
        let (bytes, used, unmappable) = self.encoding.encode(&text);
        if unmappable || used != self.encoding {
            return Err(CoreError::Encode {
                encoding: self.encoding.name().to_string(),
            });
        }
        Ok(bytes.into_owned())
    }

    // ==================== Accessors ====================

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    /// The file path, once the document has one.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Display name for title bars.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// The canonical name of the document's encoding.
    pub fn encoding_label(&self) -> &'static str {
        self.encoding.name()
    }

    /// Switches the encoding used for subsequent saves.
    pub fn set_encoding(&mut self, label: &str) -> CoreResult<()> {
        self.encoding = Self::encoding_for_label(label)?;
        Ok(())
    }

    pub fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "untitled".to_string())
}
