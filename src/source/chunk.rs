//! UTF-8 aware chunked reading.
//!
//! Readers deliver arbitrary byte boundaries; a multi-byte character may be
//! split across two reads. `ChunkReader` holds back an incomplete trailing
//! sequence until the next read completes it, so every chunk it yields is
//! valid text that can be appended to the document directly.

use std::io::{ErrorKind, Read};

use crate::model::error::InputError;

/// Bytes requested per read.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Reads text in chunks without splitting characters.
#[derive(Debug)]
pub struct ChunkReader<R: Read> {
    reader: R,
    pending: Vec<u8>,
    buffer: Vec<u8>,
    complete: bool,
}

impl<R: Read> ChunkReader<R> {
    /// Reader that reads [`CHUNK_SIZE`] bytes at a time.
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, CHUNK_SIZE)
    }

    /// Reader that reads `chunk_size` bytes at a time.
    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            pending: Vec::new(),
            buffer: vec![0; chunk_size.max(1)],
            complete: false,
        }
    }

    /// Read the next chunk of text.
    ///
    /// Returns `None` once the reader is exhausted. Invalid byte sequences are
    /// replaced with U+FFFD; a truncated sequence at end of input likewise.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` for read failures other than interruption.
    pub fn next_chunk(&mut self) -> Result<Option<String>, InputError> {
        while !self.complete {
            let read = match self.reader.read(&mut self.buffer) {
                Ok(read) => read,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            if read == 0 {
                self.complete = true;
                break;
            }

            self.pending.extend_from_slice(&self.buffer[..read]);
            let text = self.take_complete();
            if !text.is_empty() {
                return Ok(Some(text));
            }
        }

        if self.pending.is_empty() {
            return Ok(None);
        }
        tracing::debug!(bytes = self.pending.len(), "input ended inside a UTF-8 sequence");
        let tail = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        Ok(Some(tail))
    }

    /// Whether the reader reached end of input.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Decode everything in `pending` except an incomplete trailing sequence.
    fn take_complete(&mut self) -> String {
        let mut text = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(valid) => {
                    text.push_str(valid);
                    self.pending.clear();
                    return text;
                }
                Err(e) => {
                    let valid_up_to = e.valid_up_to();
                    // The prefix is valid, so lossy decoding copies it unchanged.
                    text.push_str(&String::from_utf8_lossy(&self.pending[..valid_up_to]));
                    match e.error_len() {
                        Some(invalid) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid_up_to + invalid);
                        }
                        None => {
                            self.pending.drain(..valid_up_to);
                            return text;
                        }
                    }
                }
            }
        }
    }
}
