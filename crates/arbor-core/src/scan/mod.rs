//! Best-effort filesystem scanning utilities.
//!
//! Shared helpers for the session resolver's per-tool stores: bounded
//! directory walks, JSON/JSONL reading, id-shape validation, and working
//! directory comparison.
//!
//! Every function here fails softly. A missing directory, an unreadable
//! file, or a malformed document is an ordinary "nothing found" value,
//! never an error - the resolver folds these into "no candidate from this
//! source" and keeps searching.

pub mod fs;
pub mod ids;
pub mod json;
pub mod paths;

pub use fs::{file_mtime, walk_files};
pub use ids::{extract_uuid, is_canonical_uuid};
pub use json::{read_json, read_jsonl, string_field, timestamp_field};
pub use paths::paths_match;
