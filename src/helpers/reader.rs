use crate::error::SheetError;
use std::fs::File;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum UnifiedReaderError {
    #[error("No data from remote file: '{0}'")]
    RemoteFileNoDataError(String),
}

/// A unified reader over local workbook files and downloaded ones
pub(crate) enum UnifiedReader {
    /// Local file reader
    Local(BufReader<File>),
    /// Downloaded workbook (in-memory buffer)
    Remote(Cursor<Vec<u8>>),
}

impl UnifiedReader {
    /// Opens a workbook from either a local path or an http(s) URL.
    /// Remote workbooks are downloaded in full before reading starts.
    pub(crate) fn open(location: &str, timeout: Duration) -> Result<UnifiedReader, SheetError> {
        if Self::is_remote_url(location) {
            Self::download(location, timeout)
        } else {
            Self::open_path(Path::new(location))
        }
    }

    pub(crate) fn open_path(path: &Path) -> Result<UnifiedReader, SheetError> {
        let file = File::open(path)?;
        Ok(UnifiedReader::Local(BufReader::new(file)))
    }

    pub(crate) fn from_bytes(bytes: Vec<u8>) -> UnifiedReader {
        UnifiedReader::Remote(Cursor::new(bytes))
    }

    /// Checks if a location names a remote workbook
    pub(crate) fn is_remote_url(location: &str) -> bool {
        if let Ok(url) = Url::parse(location) {
            matches!(url.scheme(), "http" | "https")
        } else {
            false
        }
    }

    fn download(location: &str, timeout: Duration) -> Result<UnifiedReader, SheetError> {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        let response = agent.get(location).call().map_err(Box::new)?;
        let mut bytes = Vec::new();
        response.into_reader().read_to_end(&mut bytes)?;
        if bytes.is_empty() {
            Err(UnifiedReaderError::RemoteFileNoDataError(location.to_owned()))?;
        }
        tracing::debug!(location, bytes = bytes.len(), "downloaded workbook");
        Ok(Self::from_bytes(bytes))
    }
}

impl Read for UnifiedReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            UnifiedReader::Local(reader) => reader.read(buf),
            UnifiedReader::Remote(reader) => reader.read(buf),
        }
    }
}

impl Seek for UnifiedReader {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        match self {
            UnifiedReader::Local(reader) => reader.seek(pos),
            UnifiedReader::Remote(reader) => reader.seek(pos),
        }
    }
}
