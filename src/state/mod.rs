//! State slices composed by the store.
//!
//! DESIGN
//! ======
//! State is split by domain (`ui`, `session`, `user`) so consumers can depend
//! on small focused models. Each slice owns its default value, its action
//! enum, and an `apply` transition that mutates the slice in place.

pub mod session;
pub mod ui;
pub mod user;
