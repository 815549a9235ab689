#![allow(clippy::module_inception)]
pub mod middleware;
pub mod panic_recovery_middleware;

pub use middleware::{Middleware, compose};
pub use panic_recovery_middleware::PanicRecoveryMiddleware;
