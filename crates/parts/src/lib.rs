//! Parts catalog domain module.
//!
//! This crate owns the `Part` record shape and every field rule that guards it,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod category;
pub mod input;
pub mod part;

pub use category::Category;
pub use input::{NewPart, PartFields, PartPatch};
pub use part::Part;
