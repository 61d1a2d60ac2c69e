//! Output sink
//!
//! Writes the hinted font to the requested destination or hands the
//! bytes back to the caller.

use std::io::Write;

use log::info;

use crate::error::{Error, Result};
use crate::options::OutputTarget;

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Bytes were written to the destination
    Written(usize),
    /// No destination was given
    Bytes(Vec<u8>),
}

impl Output {
    /// Returned bytes, if no destination was given
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::Written(_) => None,
        }
    }

    /// Number of bytes produced
    pub fn len(&self) -> usize {
        match self {
            Self::Written(n) => *n,
            Self::Bytes(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Deliver `bytes` to `target`
pub fn deliver(bytes: Vec<u8>, target: Option<OutputTarget>) -> Result<Output> {
    match target {
        None => Ok(Output::Bytes(bytes)),
        Some(OutputTarget::File(path)) => {
            std::fs::write(&path, &bytes)
                .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))?;
            info!("Wrote {} bytes: {}", bytes.len(), path.display());
            Ok(Output::Written(bytes.len()))
        }
        Some(OutputTarget::Writer(mut writer)) => {
            writer
                .write_all(&bytes)
                .and_then(|()| writer.flush())
                .map_err(|e| Error::io("Failed to write out_file", e))?;
            Ok(Output::Written(bytes.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Writer whose contents stay visible after being boxed
    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_bytes_returned_without_target() {
        let out = deliver(b"font".to_vec(), None).unwrap();
        assert_eq!(out.len(), 4);
        assert_eq!(out.into_bytes().unwrap(), b"font");
    }

    #[test]
    fn test_written_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ttf");
        let out = deliver(b"hinted".to_vec(), Some(OutputTarget::File(path.clone()))).unwrap();
        assert_eq!(out, Output::Written(6));
        assert_eq!(std::fs::read(path).unwrap(), b"hinted");
    }

    #[test]
    fn test_written_to_writer() {
        let sink = Shared::default();
        let out = deliver(b"abc".to_vec(), Some(OutputTarget::Writer(Box::new(sink.clone())))).unwrap();
        assert_eq!(out, Output::Written(3));
        assert_eq!(*sink.0.lock().unwrap(), b"abc");
    }
}
