//! Append Log
//!
//! A single file opened for append + read. Appends always land at the
//! physical end of the file; replay reads forward from an explicit
//! [`ReplayCursor`] held beside the file handle.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, ErrorKind, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};
use uuid::Uuid;

use super::{Record, ReplayCursor, SEPARATOR};
use crate::error::{Result, WalKvError};

/// Durable, append-only storage of records with sequential replay
#[derive(Debug)]
pub struct AppendLog {
    /// Stable path of the underlying file
    path: PathBuf,

    /// Append handle (O_APPEND)
    file: File,

    /// Buffered read handle; shares the file offset with `file`
    reader: BufReader<File>,

    /// Next record to replay
    cursor: ReplayCursor,

    /// The shared offset may no longer match the reader's buffer and must be
    /// reset to `cursor` before the next read
    reader_stale: bool,

    /// The last read at `cursor` found no complete record and nothing has
    /// been appended since
    at_end: bool,

    /// Bytes the file accepts before writes start failing
    #[cfg(test)]
    write_budget: Option<usize>,
}

impl AppendLog {
    /// Open an existing log, creating it if it does not exist.
    ///
    /// The replay cursor starts at the beginning of the file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path.as_ref(), false)
    }

    /// Create a fresh log named `{prefix}{uuid}` inside `dir`.
    ///
    /// Fails instead of reusing a file if the generated name already exists.
    pub fn create_in(dir: impl AsRef<Path>, prefix: &str) -> Result<Self> {
        let path = dir.as_ref().join(format!("{}{}", prefix, Uuid::new_v4()));
        Self::open_with(&path, true)
    }

    fn open_with(path: &Path, create_new: bool) -> Result<Self> {
        let mut options = OpenOptions::new();
        options.read(true).append(true);
        if create_new {
            options.create_new(true);
        } else {
            options.create(true);
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let file = options.open(path)?;
        let reader = BufReader::new(file.try_clone()?);

        debug!(path = %path.display(), create_new, "opened append log");

        Ok(Self {
            path: path.to_path_buf(),
            file,
            reader,
            cursor: ReplayCursor::start(),
            reader_stale: true,
            at_end: false,
            #[cfg(test)]
            write_budget: None,
        })
    }

    /// Append a record and sync it to stable storage.
    ///
    /// The write loops until the whole frame is written. If it fails part way
    /// the partial frame is cut off again; if that also fails the file ends
    /// with a fragment that replay treats as end-of-log.
    pub fn append_record(&mut self, record: &Record) -> Result<()> {
        let message = record.encode();
        let tail = self.len()?;

        // O_APPEND moves the shared offset to the end of the file.
        self.reader_stale = true;
        self.at_end = false;

        let written = match self.write_message(&message) {
            Ok(written) => written,
            Err(e) => {
                warn!(total = message.len(), error = %e, "append failed");
                self.discard_partial(tail);
                return Err(e.into());
            }
        };

        self.file.sync_all()?;

        trace!(key = record.key(), bytes = written, "appended record");
        Ok(())
    }

    #[cfg(not(test))]
    fn write_message(&mut self, message: &[u8]) -> io::Result<usize> {
        write_frame(&mut self.file, message)
    }

    #[cfg(test)]
    fn write_message(&mut self, message: &[u8]) -> io::Result<usize> {
        match self.write_budget {
            Some(budget) => {
                let mut out = tests::BudgetWriter {
                    inner: &mut self.file,
                    remaining: budget,
                };
                let result = write_frame(&mut out, message);
                self.write_budget = Some(out.remaining);
                result
            }
            None => write_frame(&mut self.file, message),
        }
    }

    /// Cut the file back to `tail` after a failed write.
    fn discard_partial(&mut self, tail: u64) {
        match self.len() {
            Ok(len) if len <= tail => {}
            _ => {
                let undo = self.file.set_len(tail).and_then(|_| self.file.sync_all());
                if let Err(e) = undo {
                    warn!(path = %self.path.display(), error = %e, "could not remove partial record");
                }
            }
        }
    }

    /// Read the record at the cursor and advance past it.
    ///
    /// Returns `Ok(None)` once no complete key/value pair remains. An
    /// unterminated trailing fragment is left unconsumed.
    pub fn read_next_record(&mut self) -> Result<Option<Record>> {
        self.at_end = false;
        if self.reader_stale {
            self.reader.seek(SeekFrom::Start(self.cursor.offset()))?;
            self.reader_stale = false;
        }

        let offset = self.cursor.offset();
        let (key, value) = match (self.read_field()?, self.read_field()?) {
            (Some(key), Some(value)) => (key, value),
            _ => {
                self.reader_stale = true;
                self.at_end = true;
                return Ok(None);
            }
        };

        let consumed = (key.len() + value.len() + 2) as u64;
        let decoded = decode_field(key, "key", offset)
            .and_then(|key| Ok((key, decode_field(value, "value", offset)?)));
        let (key, value) = match decoded {
            Ok(fields) => fields,
            Err(e) => {
                self.reader_stale = true;
                return Err(e);
            }
        };

        self.cursor.advance(consumed);
        Ok(Some(Record::from_fields(key, value)))
    }

    /// Read one separator-terminated field, without the separator.
    fn read_field(&mut self) -> Result<Option<Vec<u8>>> {
        let mut buf = Vec::new();
        let n = self.reader.read_until(SEPARATOR, &mut buf).map_err(|e| {
            self.reader_stale = true;
            WalKvError::from(e)
        })?;

        if n == 0 || buf.last() != Some(&SEPARATOR) {
            return Ok(None);
        }

        buf.pop();
        Ok(Some(buf))
    }

    /// Iterate over the remaining records from the cursor
    pub fn records(&mut self) -> Records<'_> {
        Records {
            log: self,
            done: false,
        }
    }

    /// Current replay position
    pub fn cursor(&self) -> ReplayCursor {
        self.cursor
    }

    /// Resume replay from a cursor previously taken from this log
    pub fn seek(&mut self, cursor: ReplayCursor) {
        self.cursor = cursor;
        self.reader_stale = true;
        self.at_end = false;
    }

    /// Restart replay from the first record
    pub fn rewind(&mut self) {
        self.seek(ReplayCursor::start());
    }

    /// Physical length of the file in bytes
    pub fn len(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Drop the unterminated fragment after the cursor and sync. Returns the
    /// bytes removed.
    ///
    /// Does nothing unless the last read at the cursor hit end-of-log, so
    /// complete records are never removed.
    pub(crate) fn truncate_to_cursor(&mut self) -> Result<u64> {
        if !self.at_end {
            return Ok(0);
        }

        let len = self.len()?;
        let keep = self.cursor.offset();
        if len <= keep {
            return Ok(0);
        }

        self.file.set_len(keep)?;
        self.file.sync_all()?;
        self.reader_stale = true;

        debug!(path = %self.path.display(), removed = len - keep, "truncated log tail");
        Ok(len - keep)
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sync and release the file
    pub fn close(self) -> Result<()> {
        self.file.sync_all()?;
        debug!(path = %self.path.display(), "closed append log");
        Ok(())
    }

    /// Let the file accept only `bytes` more bytes before writes fail.
    #[cfg(test)]
    pub(crate) fn limit_writes(&mut self, bytes: Option<usize>) {
        self.write_budget = bytes;
    }
}

/// Write all of `message`, resuming after short writes and retrying
/// interrupted ones. Returns the bytes written.
fn write_frame<W: Write>(out: &mut W, message: &[u8]) -> io::Result<usize> {
    let mut written = 0;
    while written < message.len() {
        match out.write(&message[written..]) {
            Ok(0) => {
                return Err(io::Error::new(
                    ErrorKind::WriteZero,
                    format!("wrote {} of {} bytes", written, message.len()),
                ));
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(written)
}

fn decode_field(bytes: Vec<u8>, name: &str, offset: u64) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| {
        WalKvError::WalCorruption(format!(
            "{} of record at offset {} is not valid UTF-8: {}",
            name,
            offset,
            e.utf8_error()
        ))
    })
}

/// Iterator over the remaining records of a log
///
/// Stops after the first error.
pub struct Records<'a> {
    log: &'a mut AppendLog,
    done: bool,
}

impl Iterator for Records<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.log.read_next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
