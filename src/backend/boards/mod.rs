//! Board Module
//!
//! Everything between the HTTP routes and the engine.
//!
//! - **`service`** - load, apply, save, publish
//! - **`handlers`** - axum handlers for the `/boards` routes
//! - **`types`** - request and response bodies

pub mod handlers;
pub mod service;
pub mod types;

pub use service::BoardService;
