// The core module contains the record domain.
// Models, storage traits and services live here; nothing in core knows
// which database sits behind the traits.

#[path = "records/mod.rs"]
pub mod records;
