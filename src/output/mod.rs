// src/output/mod.rs
//! Output handling with planning kept apart from execution.

mod render;
mod types;
mod writer;

pub use render::ResultDocument;
pub use types::{DeliveryTarget, OutputPlan, OutputReport};
pub use writer::{deliver, deliver_all};
