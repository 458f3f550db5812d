//! Streaming decoder for multi-record commit logs
//!
//! ## Format
//!
//! ```text
//! commit <id> [<parent>...] [(key=value)...]
//! tree <tree-id>
//! parent <parent-id>
//! [key: value]
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//! [extra headers, e.g. gpgsig, with " "-prefixed continuation lines]
//!
//!     <message, indented by four spaces>
//! ```
//!
//! Records follow each other until the end of the stream. Decoding is lazy:
//! one record is read per `next()` call, nothing is buffered ahead except a
//! single line of lookahead needed to find where a message ends.

use crate::artifacts::log::log_format::LogFormat;
use crate::artifacts::objects::actor::Signature;
use crate::artifacts::objects::annotations::Annotations;
use crate::artifacts::objects::commit::CommitData;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use derive_new::new;
use std::io::BufRead;
use std::iter::FusedIterator;
use tracing::{debug, trace};

const HEADER_PREFIX: &str = "commit ";
const MESSAGE_INDENT: &str = "    ";
/// Key used for header decorations that are not `key=value` pairs
pub const DECORATION_KEY: &str = "decoration";

/// A commit decoded from one log record
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct CommitRecord {
    pub id: ObjectId,
    pub data: CommitData,
}

/// Lazy, single-pass sequence of [`CommitRecord`]s read from a text stream
///
/// The stream is owned by the sequence and dropped with it. After the first
/// error the sequence is over: the error is yielded once, then `None`.
pub struct CommitStream<R> {
    reader: R,
    format: LogFormat,
    line_no: usize,
    peeked: Option<String>,
    finished: bool,
}

impl<R: BufRead> CommitStream<R> {
    /// Wrap a reader
    ///
    /// Fails with `Error::InvalidMode` for formats that cannot be decoded,
    /// without touching the reader.
    pub fn new(reader: R, format: LogFormat) -> Result<Self> {
        format.ensure_parsable()?;

        Ok(Self {
            reader,
            format,
            line_no: 0,
            peeked: None,
            finished: false,
        })
    }

    pub fn format(&self) -> &LogFormat {
        &self.format
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.peeked.take() {
            return Ok(Some(line));
        }

        let mut buffer = Vec::new();
        if self.reader.read_until(b'\n', &mut buffer)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;

        if buffer.last() == Some(&b'\n') {
            buffer.pop();
            if buffer.last() == Some(&b'\r') {
                buffer.pop();
            }
        }

        // Messages in legacy encodings must not abort the whole log
        Ok(Some(String::from_utf8_lossy(&buffer).into_owned()))
    }

    fn push_back(&mut self, line: String) {
        self.peeked = Some(line);
    }

    fn expect_line(&mut self, expected: &str) -> Result<String> {
        self.next_line()?.ok_or_else(|| {
            Error::parse(
                self.line_no,
                format!("truncated record: expected {expected}, found end of stream"),
            )
        })
    }

    fn read_record(&mut self) -> Result<Option<CommitRecord>> {
        let header = loop {
            match self.next_line()? {
                None => return Ok(None),
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => break line,
            }
        };

        let (id, header_parents, mut annotations) = self.parse_header(&header)?;
        trace!(line = self.line_no, %id, "reading commit record");

        let mut tree = None;
        let mut parents = Vec::new();
        let mut has_parent_lines = false;

        let author = loop {
            let line = self.expect_line("author line")?;

            if let Some(tree_id) = line.strip_prefix("tree ") {
                if tree.is_some() {
                    return Err(Error::format(self.line_no, "duplicate tree line"));
                }
                tree = Some(self.parse_id(tree_id)?);
            } else if let Some(parent_id) = line.strip_prefix("parent ") {
                has_parent_lines = true;
                let parent = self.parse_id(parent_id)?;
                if !parent.is_null() {
                    parents.push(parent);
                }
            } else if let Some(signature) = line.strip_prefix("author ") {
                break self.parse_signature(signature)?;
            } else if let Some((key, value)) = split_annotation(&line) {
                if !self.format.allows_annotations() {
                    return Err(Error::format(
                        self.line_no,
                        format!("annotation {key:?} is not allowed in {} mode", self.format),
                    ));
                }
                annotations.push(key, value);
            } else {
                return Err(Error::format(
                    self.line_no,
                    format!("expected tree, parent, annotation or author line, got {line:?}"),
                ));
            }
        };

        let tree = tree.ok_or_else(|| Error::format(self.line_no, "record has no tree line"))?;
        if !has_parent_lines {
            parents = header_parents;
        }

        let committer_line = self.expect_line("committer line")?;
        let committer = committer_line.strip_prefix("committer ").ok_or_else(|| {
            Error::format(
                self.line_no,
                format!("expected committer line, got {committer_line:?}"),
            )
        })?;
        let committer = self.parse_signature(committer)?;

        self.read_extra_headers(&mut annotations)?;
        let message = self.read_message()?;

        Ok(Some(CommitRecord::new(
            id,
            CommitData::new(tree, parents, author, committer, message, annotations),
        )))
    }

    /// `commit <id> [<parent>...] [(key=value)...]`
    fn parse_header(&self, line: &str) -> Result<(ObjectId, Vec<ObjectId>, Annotations)> {
        let rest = line.strip_prefix(HEADER_PREFIX).ok_or_else(|| {
            Error::format(self.line_no, format!("expected commit header, got {line:?}"))
        })?;

        let (ids, decorations) = match rest.find(" (") {
            Some(index) => (&rest[..index], Some(&rest[index + 1..])),
            None => (rest, None),
        };

        let mut ids = ids.split_whitespace();
        let id = ids
            .next()
            .ok_or_else(|| Error::format(self.line_no, "commit header without an id"))?;
        let id = self.parse_id(id)?;
        let parents = ids
            .map(|parent| self.parse_id(parent))
            .filter(|parent| !matches!(parent, Ok(parent) if parent.is_null()))
            .collect::<Result<Vec<_>>>()?;

        let mut annotations = Annotations::new();
        if let Some(decorations) = decorations {
            if !self.format.allows_annotations() {
                return Err(Error::format(
                    self.line_no,
                    format!("header decorations are not allowed in {} mode", self.format),
                ));
            }
            self.parse_decorations(decorations, &mut annotations)?;
        }

        Ok((id, parents, annotations))
    }

    /// `(HEAD -> main, tag: v1, dist=2) (x=y)`
    ///
    /// Each group is a comma separated list. `key=value` items become
    /// annotations, anything else (ref names) is kept under [`DECORATION_KEY`].
    fn parse_decorations(&self, mut text: &str, annotations: &mut Annotations) -> Result<()> {
        loop {
            text = text.trim_start();
            if text.is_empty() {
                return Ok(());
            }

            let inner = text
                .strip_prefix('(')
                .and_then(|rest| rest.find(')').map(|end| (&rest[..end], &rest[end + 1..])));
            let Some((group, rest)) = inner else {
                return Err(Error::format(
                    self.line_no,
                    format!("malformed header decoration {text:?}"),
                ));
            };

            for item in group.split(", ").map(str::trim).filter(|item| !item.is_empty()) {
                match item.split_once('=') {
                    Some((key, value)) if !key.contains(char::is_whitespace) => {
                        annotations.push(key, value.trim())
                    }
                    _ => annotations.push(DECORATION_KEY, item),
                }
            }
            text = rest;
        }
    }

    /// Headers between the committer line and the blank separator
    fn read_extra_headers(&mut self, annotations: &mut Annotations) -> Result<()> {
        let mut in_extra_header = false;

        loop {
            let line = self.expect_line("blank line before the message")?;
            if line.is_empty() {
                return Ok(());
            }

            if let Some(continuation) = line.strip_prefix(' ') {
                if !in_extra_header || !annotations.continue_last(continuation) {
                    return Err(Error::format(
                        self.line_no,
                        "expected a blank line between headers and message",
                    ));
                }
            } else {
                let (key, value) = line.split_once(' ').unwrap_or((line.as_str(), ""));
                annotations.push(key, value);
                in_extra_header = true;
            }
        }
    }

    fn read_message(&mut self) -> Result<String> {
        let mut message = String::new();
        let mut pending_blank_lines = 0;

        while let Some(line) = self.next_line()? {
            if is_header(&line) {
                self.push_back(line);
                break;
            }

            let text = match line.strip_prefix(MESSAGE_INDENT) {
                Some(text) => text,
                None if line.trim().is_empty() => "",
                None => {
                    return Err(Error::format(
                        self.line_no,
                        format!("expected indented message line, got {line:?}"),
                    ));
                }
            };

            if text.is_empty() {
                // Only part of the message if more text follows
                pending_blank_lines += 1;
                continue;
            }

            for _ in 0..pending_blank_lines {
                message.push('\n');
            }
            pending_blank_lines = 0;

            message.push_str(text);
            message.push('\n');
        }

        message.pop();
        Ok(message)
    }

    fn parse_id(&self, id: &str) -> Result<ObjectId> {
        let id = id.trim();
        if !ObjectId::is_valid(id) {
            return Err(Error::format(
                self.line_no,
                format!("invalid object id {id:?}"),
            ));
        }
        ObjectId::try_parse(id)
    }

    fn parse_signature(&self, value: &str) -> Result<Signature> {
        Signature::parse(value).map_err(|err| err.at_line(self.line_no))
    }
}

impl<R: BufRead> Iterator for CommitStream<R> {
    type Item = Result<CommitRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.read_record() {
            Ok(Some(record)) => {
                debug!(
                    id = %record.id,
                    parents = record.data.parent_ids().len(),
                    "decoded commit record"
                );
                Some(Ok(record))
            }
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                debug!(line = self.line_no, "commit stream aborted: {err}");
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

impl<R: BufRead> FusedIterator for CommitStream<R> {}

fn is_header(line: &str) -> bool {
    line.strip_prefix(HEADER_PREFIX)
        .and_then(|rest| rest.split_whitespace().next())
        .is_some_and(ObjectId::is_valid)
}

/// `key: value`, where the key is a single non-empty word
fn split_annotation(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key, value.trim()))
}
