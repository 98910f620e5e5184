//! Middleware Module
//!
//! Request processing shared by all board routes.
//!
//! - **`identity`** - trusted caller identity extracted from headers
//! - **`json`** - JSON bodies with rejections mapped to board errors

pub mod identity;
pub mod json;

pub use identity::{identity_from_headers, AuthUser};
pub use json::JsonBody;
