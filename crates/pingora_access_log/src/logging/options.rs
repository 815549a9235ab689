use serde::Deserialize;

/// Access-log options.
///
/// Derives `Deserialize` so it can sit inside a host's own config file; any
/// missing field takes its default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Emit ANSI-colored lines for terminals.
    pub color: bool,
}

impl Options {
    pub fn colored() -> Self {
        Self { color: true }
    }
}
