//! File uploads as `multipart/form-data`.
//!
//! Artifacts and test results are uploaded under the form field `files`.
//! Files opened from disk are streamed rather than read into memory.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Body;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use crate::error::Result;

/// Form field the API reads uploaded files from.
pub const FILES_FIELD: &str = "files";

/// Content of a file to upload.
#[derive(Debug)]
pub enum UploadSource {
    /// In-memory content.
    Bytes(Vec<u8>),
    /// An open file, streamed on send. The length is sent as `Content-Length`
    /// of the part when known.
    File { file: File, len: Option<u64> },
}

/// A named file to upload.
#[derive(Debug)]
pub struct UploadFile {
    pub file_name: String,
    pub source: UploadSource,
}

impl UploadFile {
    /// An upload from in-memory content.
    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            source: UploadSource::Bytes(bytes.into()),
        }
    }

    /// Opens `path` for a streamed upload, named after the path's last
    /// component.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`](crate::ClientError::Io) if the file cannot
    /// be opened.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).await?;
        let len = file.metadata().await.ok().map(|meta| meta.len());
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Ok(Self {
            file_name,
            source: UploadSource::File { file, len },
        })
    }

    fn into_part(self) -> Part {
        let part = match self.source {
            UploadSource::Bytes(bytes) => Part::bytes(bytes),
            UploadSource::File { file, len } => {
                let body = Body::wrap_stream(ReaderStream::new(file));
                match len {
                    Some(len) => Part::stream_with_length(body, len),
                    None => Part::stream(body),
                }
            }
        };
        part.file_name(self.file_name)
    }
}

/// Builds the upload form, one `files` part per file, in order.
pub(crate) fn upload_form(files: Vec<UploadFile>) -> Form {
    files
        .into_iter()
        .fold(Form::new(), |form, file| form.part(FILES_FIELD, file.into_part()))
}
