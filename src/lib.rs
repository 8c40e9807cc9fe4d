//! # qadesk
//!
//! Client-side state core for the qadesk collaborative visual-QA shell.
//!
//! This crate contains the three state slices (`ui`, `session`, `user`), the
//! store that composes them behind typed dispatch and selectors, the theme
//! persistence middleware, the startup theme initializer, and the storage /
//! document backends those pieces talk to. Browser backends are compiled in
//! with the `hydrate` feature; in-memory backends are always available.

pub mod config;
pub mod net;
pub mod replay;
pub mod state;
pub mod store;
pub mod util;

pub use config::StoreConfig;
pub use store::{Action, Store, init_store};
