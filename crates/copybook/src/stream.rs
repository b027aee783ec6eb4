//! Fixed-length record segmentation over a byte source.

use std::io::{ErrorKind, Read};

use tracing::debug;

use crate::data::Record;
use crate::error::CodecError;
use crate::layout::Copybook;

/// Splits a byte source into successive chunks of one record length.
///
/// A source that ends with fewer bytes than one full record yields the
/// remainder as a final short chunk rather than an error — legacy
/// datasets are routinely truncated and scanning must survive them.
/// One segmenter is bound to one source and is not restartable; it
/// owns a private buffer and must not be shared across threads
/// mid-iteration.
pub struct Segmenter<R: Read> {
    source: R,
    record_length: usize,
    buffer: Vec<u8>,
    done: bool,
}

impl<R: Read> Segmenter<R> {
    /// Bind a source to a record length.
    pub fn new(source: R, record_length: usize) -> Self {
        Self {
            source,
            record_length,
            buffer: vec![0u8; record_length],
            done: record_length == 0,
        }
    }

    fn next_chunk(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        if self.done {
            return Ok(None);
        }

        let mut filled = 0;
        while filled < self.record_length {
            match self.source.read(&mut self.buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.done = true;
                    return Err(e);
                }
            }
        }

        match filled {
            0 => {
                self.done = true;
                Ok(None)
            }
            n if n < self.record_length => {
                self.done = true;
                debug!(
                    expected = self.record_length,
                    actual = n,
                    "short trailing chunk"
                );
                Ok(Some(self.buffer[..n].to_vec()))
            }
            _ => Ok(Some(self.buffer.clone())),
        }
    }
}

impl<R: Read> Iterator for Segmenter<R> {
    type Item = std::io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}

/// Single-pass record decoding over a segmented byte source.
///
/// Each chunk decodes independently: an item-level `Err` (a short
/// trailing chunk, a corrupt field) leaves the iterator usable, so
/// scanners can skip bad records and keep going. I/O errors from the
/// source propagate unrecovered.
pub struct RecordStream<'a, R: Read> {
    copybook: &'a Copybook,
    segments: Segmenter<R>,
}

impl<'a, R: Read> RecordStream<'a, R> {
    pub(crate) fn new(copybook: &'a Copybook, source: R) -> Self {
        Self {
            copybook,
            segments: Segmenter::new(source, copybook.length()),
        }
    }
}

impl<'a, R: Read> Iterator for RecordStream<'a, R> {
    type Item = Result<Record<'a>, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.segments.next()? {
            Ok(chunk) => Some(self.copybook.decode(&chunk)),
            Err(e) => Some(Err(e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_exact_multiple_of_record_length() {
        let source = Cursor::new(b"aaaabbbbcccc".to_vec());
        let chunks: Vec<Vec<u8>> = Segmenter::new(source, 4).map(Result::unwrap).collect();
        assert_eq!(chunks, vec![b"aaaa".to_vec(), b"bbbb".to_vec(), b"cccc".to_vec()]);
    }

    #[test]
    fn test_short_tail_yielded_not_error() {
        // 2.5 records: two full chunks and one short one.
        let source = Cursor::new(b"aaaabbbbcc".to_vec());
        let chunks: Vec<Vec<u8>> = Segmenter::new(source, 4).map(Result::unwrap).collect();
        assert_eq!(chunks, vec![b"aaaa".to_vec(), b"bbbb".to_vec(), b"cc".to_vec()]);
    }

    #[test]
    fn test_empty_source() {
        let source = Cursor::new(Vec::new());
        assert_eq!(Segmenter::new(source, 4).count(), 0);
    }

    #[test]
    fn test_zero_length_records_yield_nothing() {
        let source = Cursor::new(b"data".to_vec());
        assert_eq!(Segmenter::new(source, 0).count(), 0);
    }

    #[test]
    fn test_exhausted_stays_exhausted() {
        let mut segmenter = Segmenter::new(Cursor::new(b"aaaa".to_vec()), 4);
        assert!(segmenter.next().is_some());
        assert!(segmenter.next().is_none());
        assert!(segmenter.next().is_none());
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::BrokenPipe, "gone"))
        }
    }

    #[test]
    fn test_io_error_propagates() {
        let mut segmenter = Segmenter::new(FailingReader, 4);
        assert!(segmenter.next().unwrap().is_err());
        assert!(segmenter.next().is_none());
    }
}
