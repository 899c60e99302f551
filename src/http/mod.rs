//! HTTP surface: router assembly, shared state, middleware, response
//! helpers.

pub mod middleware;
pub mod response;
pub mod server;

pub use server::{AppState, Gateway};
