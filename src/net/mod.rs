//! Network-facing collaborators of the client store.
//!
//! SYSTEM CONTEXT
//! ==============
//! Only authentication lives here today. There is no collaboration transport;
//! session and participant state is driven by local dispatch.

pub mod auth;
