//! Builders for synthetic histories used across unit tests

use crate::areas::memory::MemoryBackend;
use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;

pub const EMPTY_TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";
const SIGNATURE: &str = "Michael Trier <mtrier@gmail.com> 1210193388 -0400";

/// Deterministic id for a commit name: its hex bytes, zero padded
pub fn oid(name: &str) -> ObjectId {
    let hex: String = name.bytes().map(|byte| format!("{byte:02x}")).collect();
    ObjectId::try_parse(format!("{hex:0<40}")).expect("commit names are at most 20 bytes")
}

/// One record in the raw log layout, without decorations
pub fn raw_record(name: &str, parents: &[&str], message: &str) -> String {
    let mut record = format!("commit {}\ntree {EMPTY_TREE}\n", oid(name));
    for parent in parents {
        record.push_str(&format!("parent {}\n", oid(parent)));
    }
    record.push_str(&format!("author {SIGNATURE}\ncommitter {SIGNATURE}\n\n"));

    for line in message.lines() {
        if line.is_empty() {
            record.push('\n');
        } else {
            record.push_str(&format!("    {line}\n"));
        }
    }
    record.push('\n');
    record
}

/// Repository holding one record per `(name, parents)` entry, in order
pub fn graph_repository(graph: &[(&str, &[&str])]) -> Repository {
    let mut backend = MemoryBackend::new();
    for (name, parents) in graph {
        backend.insert_record(oid(name), raw_record(name, parents, &format!("commit {name}")));
    }
    Repository::new(backend)
}
