//! Active log file ownership
//!
//! The writer is the only owner of the open file handle. The handle and the
//! current/previous paths live behind one mutex, so appends never interleave
//! and readers never see a path pair from two different rotations.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};

/// Lifecycle of the file sink
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileSinkState {
    /// No file is open
    #[default]
    Disabled,
    /// Rotation is running; appends are dropped
    Opening,
    /// Appends go to the active file
    Active,
}

/// Information about the current log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileInfo {
    /// Full path to the active log file
    pub path: PathBuf,
    /// Full path to the most recent historical log, if one exists
    pub previous: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct WriterState {
    file: Option<File>,
    sink: FileSinkState,
    current_path: Option<PathBuf>,
    previous_path: Option<PathBuf>,
}

/// Exclusive, thread-safe owner of the active log file
#[derive(Debug, Default)]
pub struct FileWriter {
    inner: Mutex<WriterState>,
}

impl FileWriter {
    /// Create a writer with no file open
    pub fn new() -> Self {
        Self::default()
    }

    /// Close any open file and mark the sink as opening
    pub fn begin_opening(&self) {
        if let Ok(mut state) = self.inner.lock() {
            close_file(&mut state);
            state.sink = FileSinkState::Opening;
        }
    }

    /// Open `path` for appending and make it the active file
    ///
    /// On failure the sink is left disabled and the previous paths are kept.
    pub fn open(&self, path: &Path, previous: Option<PathBuf>) -> Result<LogFileInfo> {
        let opened = OpenOptions::new().create(true).append(true).open(path);

        let mut state = self
            .inner
            .lock()
            .map_err(|_| Error::Rotation("log file lock poisoned".to_string()))?;
        close_file(&mut state);

        match opened {
            Ok(file) => {
                state.file = Some(file);
                state.sink = FileSinkState::Active;
                state.current_path = Some(path.to_path_buf());
                state.previous_path = previous.clone();
                Ok(LogFileInfo {
                    path: path.to_path_buf(),
                    previous,
                })
            }
            Err(source) => {
                state.sink = FileSinkState::Disabled;
                Err(Error::FileOpenFailed {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    /// Append already formatted text to the active file
    ///
    /// Returns [`Error::WriteSkippedFileNotReady`] when no file is active.
    pub fn append(&self, text: &str) -> Result<()> {
        let mut state = self
            .inner
            .lock()
            .map_err(|_| Error::WriteSkippedFileNotReady)?;
        if state.sink != FileSinkState::Active {
            return Err(Error::WriteSkippedFileNotReady);
        }
        let file = state.file.as_mut().ok_or(Error::WriteSkippedFileNotReady)?;
        file.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Flush and release the file. Calling this twice is harmless.
    pub fn close(&self) {
        if let Ok(mut state) = self.inner.lock() {
            close_file(&mut state);
            state.sink = FileSinkState::Disabled;
        }
    }

    pub fn state(&self) -> FileSinkState {
        self.inner
            .lock()
            .map(|s| s.sink)
            .unwrap_or(FileSinkState::Disabled)
    }

    pub fn is_active(&self) -> bool {
        self.state() == FileSinkState::Active
    }

    /// Path of the file most recently opened
    pub fn current_path(&self) -> Option<PathBuf> {
        self.inner.lock().ok().and_then(|s| s.current_path.clone())
    }

    /// Path of the most recent historical file
    pub fn previous_path(&self) -> Option<PathBuf> {
        self.inner.lock().ok().and_then(|s| s.previous_path.clone())
    }

    /// Both paths, read under one lock
    pub fn info(&self) -> Option<LogFileInfo> {
        let state = self.inner.lock().ok()?;
        state.current_path.as_ref().map(|path| LogFileInfo {
            path: path.clone(),
            previous: state.previous_path.clone(),
        })
    }
}

fn close_file(state: &mut WriterState) {
    if let Some(mut file) = state.file.take() {
        let _ = file.flush();
        let _ = file.sync_all();
    }
}
