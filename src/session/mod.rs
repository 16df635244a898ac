pub mod capabilities;
pub mod registry;

pub use capabilities::{BrowserKind, BrowserOptions, WindowSize};
pub use registry::{Session, SessionInfo, SessionRegistry};
