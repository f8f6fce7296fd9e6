//! Line-oriented edits of a single file on disk.
//!
//! A [`PatchBuilder`] records edits against one file and only touches the
//! file when [`PatchBuilder::apply`] or [`PatchBuilder::apply_sync`] is
//! called. The file is split on the configured end-of-line string, every
//! edit runs over the line list in registration order and the result is
//! joined back and written in place. There is no locking: concurrent
//! external edits of the same file are not detected.

use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_EOL;
use crate::error::Result;

type Action = Box<dyn Fn(Vec<String>) -> Vec<String> + Send + Sync>;

/// How file bytes are turned into text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    /// Invalid UTF-8 is an error.
    #[default]
    Utf8,
    /// Invalid sequences are replaced with U+FFFD.
    Utf8Lossy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOptions {
    pub encoding: Encoding,
    pub eol: String,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self { encoding: Encoding::default(), eol: DEFAULT_EOL.to_string() }
    }
}

/// Options of [`PatchBuilder::insert_after`] and [`PatchBuilder::insert_before`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOptions {
    /// Copy the leading spaces and tabs of the matched line onto the inserted one.
    pub preserve_indent: bool,
    /// Insert next to every matching line instead of the first one only.
    pub global: bool,
    /// Search from the end of the file. Implies a single match.
    pub reverse: bool,
}

impl Default for InsertOptions {
    fn default() -> Self {
        Self { preserve_indent: true, global: false, reverse: false }
    }
}

pub struct PatchBuilder {
    file: PathBuf,
    options: PatchOptions,
    actions: Vec<Action>,
}

impl PatchBuilder {
    pub fn new<P: AsRef<Path>>(file: P, options: PatchOptions) -> Self {
        Self { file: file.as_ref().to_path_buf(), options, actions: Vec::new() }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Number of recorded edits.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn insert_after(self, pointer: &str, text: &str, options: InsertOptions) -> Self {
        self.insert_line(true, pointer, text, options)
    }

    pub fn insert_before(self, pointer: &str, text: &str, options: InsertOptions) -> Self {
        self.insert_line(false, pointer, text, options)
    }

    fn insert_line(mut self, after: bool, pointer: &str, text: &str, options: InsertOptions) -> Self {
        let pointer = pointer.to_string();
        let text = text.to_string();
        let global = options.global && !options.reverse;

        self.actions.push(Box::new(move |mut lines| {
            let chunk = |line: &str| {
                if options.preserve_indent {
                    format!("{}{}", indent_of(line), text)
                } else {
                    text.clone()
                }
            };

            if options.reverse {
                if let Some(index) = lines.iter().rposition(|line| line.contains(&pointer)) {
                    let inserted = chunk(&lines[index]);
                    lines.insert(if after { index + 1 } else { index }, inserted);
                }
                return lines;
            }

            let mut index = 0;
            while index < lines.len() {
                if lines[index].contains(&pointer) {
                    let inserted = chunk(&lines[index]);
                    lines.insert(if after { index + 1 } else { index }, inserted);
                    if !global {
                        break;
                    }
                    // step over the inserted line as well as the matched one
                    index += 1;
                }
                index += 1;
            }
            lines
        }));
        self
    }

    /// Keeps only the lines accepted by `keep`.
    pub fn filter<F>(mut self, keep: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.actions.push(Box::new(move |lines| lines.into_iter().filter(|line| keep(line.as_str())).collect()));
        self
    }

    /// Rewrites every line independently.
    pub fn map<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.actions.push(Box::new(move |lines| lines.iter().map(|line| transform(line.as_str())).collect()));
        self
    }

    pub fn trim_lines(self) -> Self {
        self.map(|line| line.trim().to_string())
    }

    /// Slides a window of `window` lines over the file, one line at a time,
    /// splicing each window with what `transform` returns for it.
    ///
    /// A window of one is a plain [`map`](Self::map) whose output lines are
    /// joined with the end-of-line string. For larger windows the replaced
    /// chunk is spliced in as separate lines and the scan stops once fewer
    /// than `window` lines of the original length remain ahead.
    pub fn window_map<F>(mut self, transform: F, window: usize) -> Self
    where
        F: Fn(&[String]) -> Vec<String> + Send + Sync + 'static,
    {
        if window == 0 {
            return self;
        }

        if window == 1 {
            let eol = self.options.eol.clone();
            return self.map(move |line| transform(&[line.to_string()]).join(&eol));
        }

        self.actions.push(Box::new(move |mut lines| {
            let count = lines.len();
            let mut start = 0;
            let mut end = window.min(count);

            while start < count {
                let end_in_bounds = end.min(lines.len());
                let start_in_bounds = start.min(end_in_bounds);
                let replaced = transform(&lines[start_in_bounds..end_in_bounds]);
                lines.splice(start_in_bounds..end_in_bounds, replaced);

                start += 1;
                end = (start + window).min(count);
                if end - start < window {
                    start = count;
                }
            }
            lines
        }));
        self
    }

    /// Drops the most recently recorded edit.
    pub fn undo(mut self) -> Self {
        self.actions.pop();
        self
    }

    /// Runs the recorded edits over `lines`.
    pub fn apply_to_lines(&self, lines: Vec<String>) -> Vec<String> {
        self.actions.iter().fold(lines, |lines, action| action(lines))
    }

    /// Runs the recorded edits over `text`, split and joined on the
    /// configured end-of-line string.
    pub fn apply_to_str(&self, text: &str) -> String {
        let lines = text.split(self.options.eol.as_str()).map(str::to_string).collect();
        self.apply_to_lines(lines).join(&self.options.eol)
    }

    fn decode(&self, bytes: Vec<u8>) -> Result<String> {
        match self.options.encoding {
            Encoding::Utf8 => String::from_utf8(bytes).map_err(|e| {
                std::io::Error::new(std::io::ErrorKind::InvalidData, e).into()
            }),
            Encoding::Utf8Lossy => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        }
    }

    /// Reads the file, applies the edits and writes it back.
    ///
    /// Read, decode and write failures are returned to the caller.
    pub async fn apply(&self) -> Result<()> {
        if self.actions.is_empty() {
            return Ok(());
        }
        let text = self.decode(tokio::fs::read(&self.file).await?)?;
        log::debug!("patching {}", self.file.display());
        tokio::fs::write(&self.file, self.apply_to_str(&text)).await?;
        Ok(())
    }

    /// Blocking variant of [`PatchBuilder::apply`].
    pub fn apply_sync(&self) -> Result<()> {
        if self.actions.is_empty() {
            return Ok(());
        }
        let text = self.decode(std::fs::read(&self.file)?)?;
        log::debug!("patching {}", self.file.display());
        std::fs::write(&self.file, self.apply_to_str(&text))?;
        Ok(())
    }
}

/// Leading spaces and tabs of `line`.
fn indent_of(line: &str) -> &str {
    let end = line.find(|c| c != ' ' && c != '\t').unwrap_or(line.len());
    &line[..end]
}
