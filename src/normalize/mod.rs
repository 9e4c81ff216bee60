//! Test-document normalization.
//!
//! Historical test documents exist in two shapes: a legacy nested one
//! (`reading.sections`, `writing.tasks`) and a flat one (`readingSections`,
//! `writingTasks`). The modules here reconcile the two, assign stable string
//! ids to nested entities, and fill per-type question content defaults.
//! Every function is total: malformed input is defaulted or passed through,
//! never rejected.

pub mod ids;
pub mod question;
pub mod structure;
