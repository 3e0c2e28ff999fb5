//! Document input sources.
//!
//! The CLI plays the text producer: it reads a document from a file or from
//! piped stdin in chunks and feeds them to the viewer as they arrive.
//! - File: a document on disk
//! - Stdin: piped output of another program, possibly still being written
//! - Unified InputSource enum for both

use crate::model::error::InputError;
use std::fs::File;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

pub mod chunk;

pub use chunk::{ChunkReader, CHUNK_SIZE};

/// Unified input source for document text.
///
/// Sum type enforces exactly one variant.
#[derive(Debug)]
pub enum InputSource {
    /// Document file on disk.
    File {
        path: PathBuf,
        reader: ChunkReader<File>,
    },
    /// Piped stdin.
    Stdin(ChunkReader<std::io::Stdin>),
}

impl InputSource {
    /// Next chunk of text, `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` for I/O errors.
    pub fn next_chunk(&mut self) -> Result<Option<String>, InputError> {
        match self {
            InputSource::File { reader, .. } => reader.next_chunk(),
            InputSource::Stdin(reader) => reader.next_chunk(),
        }
    }

    /// Drain the source into `sink`. See [`pump`].
    pub fn pump<E>(&mut self, sink: impl FnMut(&str) -> Result<(), E>) -> Result<usize, E>
    where
        E: From<InputError>,
    {
        match self {
            InputSource::File { reader, .. } => pump(reader, sink),
            InputSource::Stdin(reader) => pump(reader, sink),
        }
    }

    /// Short description for log events.
    pub fn describe(&self) -> String {
        match self {
            InputSource::File { path, .. } => path.display().to_string(),
            InputSource::Stdin(_) => "stdin".to_string(),
        }
    }
}

/// Detect and create appropriate input source.
///
/// # Logic:
/// 1. If file path is provided: open it
/// 2. If stdin is piped: read stdin
/// 3. Else: return InputError::NoInput
///
/// # Errors
///
/// Returns `InputError::NoInput` if no file is provided and stdin is a terminal.
/// Returns `InputError::FileNotFound` if file does not exist.
/// Returns `InputError::Io` for other I/O errors.
pub fn detect_input_source(file: Option<PathBuf>) -> Result<InputSource, InputError> {
    match file {
        Some(path) => {
            if !path.exists() {
                return Err(InputError::FileNotFound { path });
            }
            let reader = ChunkReader::new(File::open(&path)?);
            Ok(InputSource::File { path, reader })
        }
        None => {
            let stdin = std::io::stdin();
            if stdin.is_terminal() {
                return Err(InputError::NoInput);
            }
            Ok(InputSource::Stdin(ChunkReader::new(stdin)))
        }
    }
}

/// Drain `reader`, calling `sink` with every chunk in order.
///
/// Stops at the first error from either side.
pub fn pump<R, E>(
    reader: &mut ChunkReader<R>,
    mut sink: impl FnMut(&str) -> Result<(), E>,
) -> Result<usize, E>
where
    R: Read,
    E: From<InputError>,
{
    let mut chunks = 0;
    while let Some(chunk) = reader.next_chunk()? {
        sink(&chunk)?;
        chunks += 1;
    }
    Ok(chunks)
}
