// rmcp's #[tool] macros generate code that calls these functions,
// but rustc/clippy can't trace through the macro-generated dispatching.
#![allow(dead_code)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod locator;
pub mod server;
pub mod session;
pub mod tools;
