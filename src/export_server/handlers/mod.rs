//! Export server HTTP handlers.

mod export;
mod health;

pub use export::export_handler;
pub use health::health_handler;
