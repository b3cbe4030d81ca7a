//! Shared types between the feedback chat frontend (WASM) and the backend.

pub mod domain;
pub mod shared;
