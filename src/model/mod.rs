// src/model/mod.rs
//! Flattened views over the platform's note payloads.

mod note;

pub use note::{format_upload_time, NoteKind, NoteSummary, UNTITLED};
