//! Helpers for the optional writer capabilities.
//!
//! Each helper checks whether the writer supports the capability before
//! using it. A missing flush is a no-op; a missing hijack or push is reported
//! as [`CapabilityError::NotSupported`].

use super::writer::{Hijacked, PushOptions, ResponseWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Hijack,
    Push,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::Hijack => f.write_str("hijack"),
            Capability::Push => f.write_str("push"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("{0} not supported by this response writer")]
    NotSupported(Capability),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub async fn flush(w: &mut dyn ResponseWriter) -> std::io::Result<()> {
    match w.flusher() {
        Some(f) => f.flush().await,
        None => Ok(()),
    }
}

pub async fn hijack(w: &mut dyn ResponseWriter) -> Result<Hijacked, CapabilityError> {
    let h = w
        .hijacker()
        .ok_or(CapabilityError::NotSupported(Capability::Hijack))?;
    Ok(h.hijack().await?)
}

pub async fn push(
    w: &mut dyn ResponseWriter,
    target: &str,
    opts: PushOptions,
) -> Result<(), CapabilityError> {
    let p = w
        .pusher()
        .ok_or(CapabilityError::NotSupported(Capability::Push))?;
    Ok(p.push(target, opts).await?)
}
