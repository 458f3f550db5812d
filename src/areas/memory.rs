//! Backend serving captured log text
//!
//! Useful for replaying a saved `git log --pretty=raw` dump and for tests.
//! Records are served verbatim; `log` lists them in insertion order starting
//! at the requested revision, honouring skip and max-count. Path filters
//! are ignored since there are no trees to look into.

use crate::areas::backend::{LogBackend, LogReader};
use crate::artifacts::log::log_format::LogFormat;
use crate::artifacts::log::log_query::LogQuery;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use std::collections::HashMap;
use std::io::Cursor;

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    records: Vec<(ObjectId, String)>,
    positions: HashMap<ObjectId, usize>,
    numstats: HashMap<ObjectId, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a captured multi-record log into per-commit records
    pub fn from_log(text: &str) -> Result<Self> {
        let mut backend = Self::new();
        let mut current: Option<(ObjectId, String)> = None;

        for (index, line) in text.lines().enumerate() {
            let header_id = line
                .strip_prefix("commit ")
                .and_then(|rest| rest.split_whitespace().next())
                .filter(|id| ObjectId::is_valid(id));

            if let Some(id) = header_id {
                if let Some((id, record)) = current.take() {
                    backend.insert_record(id, record);
                }
                current = Some((ObjectId::try_parse(id)?, String::new()));
            }

            match current.as_mut() {
                Some((_, record)) => {
                    record.push_str(line);
                    record.push('\n');
                }
                None if line.trim().is_empty() => {}
                None => {
                    return Err(Error::format(
                        index + 1,
                        format!("expected commit header, got {line:?}"),
                    ));
                }
            }
        }

        if let Some((id, record)) = current {
            backend.insert_record(id, record);
        }
        Ok(backend)
    }

    /// Add or replace the record of one commit
    pub fn insert_record(&mut self, id: ObjectId, record: impl Into<String>) {
        let record = record.into();
        match self.positions.get(&id) {
            Some(&position) => self.records[position].1 = record,
            None => {
                self.positions.insert(id.clone(), self.records.len());
                self.records.push((id, record));
            }
        }
    }

    pub fn insert_numstat(&mut self, id: ObjectId, numstat: impl Into<String>) {
        self.numstats.insert(id, numstat.into());
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, revision: &str) -> Result<usize> {
        if revision == "HEAD" {
            return Ok(0);
        }
        let id = ObjectId::try_parse(revision)?;
        self.positions
            .get(&id)
            .copied()
            .ok_or_else(|| Error::Resolution(revision.to_string()))
    }
}

impl LogBackend for MemoryBackend {
    fn log(&self, query: &LogQuery, format: &LogFormat) -> Result<LogReader> {
        format.ensure_parsable()?;

        let start = self.position(query.revision())?;
        let text: String = self
            .records
            .iter()
            .skip(start + query.skipped())
            .take(query.limit().unwrap_or(usize::MAX))
            .map(|(_, record)| record.as_str())
            .collect();

        Ok(Box::new(Cursor::new(text.into_bytes())))
    }

    fn show(&self, id: &ObjectId) -> Result<LogReader> {
        let position = self.position(id.as_ref())?;
        Ok(Box::new(Cursor::new(
            self.records[position].1.clone().into_bytes(),
        )))
    }

    fn numstat(&self, id: &ObjectId, _parent: Option<&ObjectId>) -> Result<LogReader> {
        self.position(id.as_ref())?;
        let numstat = self.numstats.get(id).cloned().unwrap_or_default();
        Ok(Box::new(Cursor::new(numstat.into_bytes())))
    }
}
