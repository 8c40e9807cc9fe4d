//! Platform helpers shared by the store and the theme initializer.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns (storage, document
//! root, color-scheme query, clock) behind small traits so the store logic
//! runs the same in the browser, in native tools, and in tests.

pub mod dark_mode;
pub mod document;
pub mod environment;
pub mod storage;
pub mod time;
