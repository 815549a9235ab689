pub mod capability;
pub mod handler;
pub mod request;
pub mod session;
pub mod writer;

pub use capability::{Capability, CapabilityError};
pub use handler::Handler;
pub use http::Method; // Use standard HTTP Method
pub use request::Request;
pub use session::SessionWriter;
pub use writer::{
    Flusher, Hijacked, HijackedStream, Hijacker, PushOptions, Pusher, ResponseWriter,
};
