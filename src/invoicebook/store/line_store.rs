//! # Line Store
//!
//! Byte-exact management of newline-terminated lines in a single file. The
//! store knows nothing about what the lines contain.
//!
//! ## Removing a Line In Place
//!
//! [`LineStore::remove_line`] deletes the n-th line without a temporary file
//! or a full rewrite. It runs in three phases over one read/write handle:
//!
//! 1. **Locate**: scan forward to find the byte span `[start, end)` of line n,
//!    terminator included.
//! 2. **Shift**: copy everything after `end` backwards by `end - start` bytes,
//!    one fixed-size chunk at a time.
//! 3. **Truncate**: cut the file to its old length minus the span.
//!
//! A crash during the shift leaves the file too long (a duplicated tail) but
//! loses nothing except the target line.
//!
//! ```text
//! before:  L1\n L2\n L3\n L4\n        remove_line(2)
//!              ^start ^end
//! shift:   L1\n L3\n L4\n L4\n
//! trunc:   L1\n L3\n L4\n
//! ```

use crate::error::{LineResult, LineStoreError};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

const BUFFER_SIZE: usize = 4096;

/// Byte range of one physical line, terminator included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineSpan {
    start: u64,
    end: u64,
}

impl LineSpan {
    fn len(&self) -> u64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone)]
pub struct LineStore {
    path: PathBuf,
}

impl LineStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// True if the file exists and has zero length.
    pub fn is_empty(&self) -> LineResult<bool> {
        self.ensure_exists()?;
        Ok(fs::metadata(&self.path)?.len() == 0)
    }

    /// Creates a new, empty file (and any missing parent directories).
    /// Fails if the file already exists.
    pub fn initialize(&self) -> LineResult<()> {
        if self.path.exists() {
            return Err(LineStoreError::AlreadyExists(self.path.clone()));
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => LineStoreError::AlreadyExists(self.path.clone()),
                _ => LineStoreError::Io(e),
            })?;
        Ok(())
    }

    /// All lines in file order, terminators stripped.
    ///
    /// Lines are split on `\n` bytes, the same boundaries [`Self::remove_line`]
    /// counts. Invalid UTF-8 is replaced with U+FFFD rather than failing the
    /// whole read.
    pub fn read_all_lines(&self) -> LineResult<Vec<String>> {
        self.ensure_exists()?;
        let mut reader = BufReader::new(File::open(&self.path)?);
        let mut lines = Vec::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            lines.push(line_text(&buf));
        }
        Ok(lines)
    }

    /// The final line, or `None` if the file is absent or empty.
    ///
    /// Reads backwards from the end of the file so only the tail is touched.
    pub fn read_last_line(&self) -> LineResult<Option<String>> {
        if !self.exists() {
            return Ok(None);
        }
        let mut file = File::open(&self.path)?;
        let len = file.metadata()?.len();
        if len == 0 {
            return Ok(None);
        }

        let mut tail: Vec<u8> = Vec::new();
        let mut pos = len;
        while pos > 0 {
            let chunk = (BUFFER_SIZE as u64).min(pos);
            pos -= chunk;
            file.seek(SeekFrom::Start(pos))?;
            let mut buf = vec![0u8; chunk as usize];
            file.read_exact(&mut buf)?;
            buf.extend_from_slice(&tail);
            tail = buf;

            let body_end = if tail.ends_with(b"\n") {
                tail.len() - 1
            } else {
                tail.len()
            };
            if let Some(idx) = tail[..body_end].iter().rposition(|&b| b == b'\n') {
                tail.drain(..=idx);
                break;
            }
        }

        Ok(Some(line_text(&tail)))
    }

    pub fn append_line(&self, line: &str) -> LineResult<()> {
        self.append_lines([line])
    }

    /// Appends each line followed by `\n`, creating the file if needed.
    /// Nothing is written if any line contains an embedded newline.
    pub fn append_lines<I, S>(&self, lines: I) -> LineResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buf = String::new();
        for line in lines {
            let line = line.as_ref();
            if line.contains(|c: char| c == '\n' || c == '\r') {
                return Err(LineStoreError::InvalidArgument(
                    "line must not contain a line break".to_string(),
                ));
            }
            buf.push_str(line);
            buf.push('\n');
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(buf.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Truncates the file to zero length.
    pub fn clear(&self) -> LineResult<()> {
        self.ensure_exists()?;
        OpenOptions::new().write(true).open(&self.path)?.set_len(0)?;
        Ok(())
    }

    /// Removes the file. Absence is not an error.
    pub fn delete(&self) -> LineResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes line `line_number` (1-indexed) in place.
    ///
    /// On any precondition failure the file is left untouched.
    pub fn remove_line(&self, line_number: u64) -> LineResult<()> {
        if line_number < 1 {
            return Err(LineStoreError::InvalidArgument(
                "line number cannot be lower than 1".to_string(),
            ));
        }
        if self.is_empty()? {
            return Err(LineStoreError::EmptyFile(self.path.clone()));
        }

        let mut file = OpenOptions::new().read(true).write(true).open(&self.path)?;
        let original_len = file.metadata()?.len();

        let span = locate_line(&file, line_number)?.ok_or_else(|| {
            LineStoreError::InvalidArgument(format!(
                "line number {} is higher than file length",
                line_number
            ))
        })?;
        shift_tail(&mut file, span)?;
        file.set_len(original_len - span.len())?;
        file.sync_data()?;
        Ok(())
    }

    fn ensure_exists(&self) -> LineResult<()> {
        if self.exists() {
            Ok(())
        } else {
            Err(LineStoreError::NotFound(self.path.clone()))
        }
    }
}

/// Decodes one raw line, dropping its `\n` or `\r\n` terminator.
fn line_text(raw: &[u8]) -> String {
    let body = raw.strip_suffix(b"\n").unwrap_or(raw);
    let body = body.strip_suffix(b"\r").unwrap_or(body);
    String::from_utf8_lossy(body).into_owned()
}

/// Finds the byte span of line `line_number`, or `None` if the file has
/// fewer lines.
fn locate_line(file: &File, line_number: u64) -> LineResult<Option<LineSpan>> {
    let mut reader = BufReader::new(file);
    let mut scratch = Vec::new();
    let mut start = 0u64;
    let mut current = 0u64;
    loop {
        scratch.clear();
        let read = reader.read_until(b'\n', &mut scratch)? as u64;
        if read == 0 {
            return Ok(None);
        }
        current += 1;
        if current == line_number {
            return Ok(Some(LineSpan {
                start,
                end: start + read,
            }));
        }
        start += read;
    }
}

/// Moves every byte after `span` back by `span.len()`, overwriting the span.
fn shift_tail(file: &mut File, span: LineSpan) -> LineResult<()> {
    let mut buffer = [0u8; BUFFER_SIZE];
    let mut read_pos = span.end;
    let mut write_pos = span.start;
    loop {
        file.seek(SeekFrom::Start(read_pos))?;
        let read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        file.seek(SeekFrom::Start(write_pos))?;
        file.write_all(&buffer[..read])?;
        read_pos += read as u64;
        write_pos += read as u64;
    }
    Ok(())
}
