//! Facts about the host the launcher runs on.

use std::env;

/// Display variables consulted on X11/Wayland hosts.
const DISPLAY_VARS: [&str; 2] = ["DISPLAY", "WAYLAND_DISPLAY"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Host {
    /// A graphical display is available.
    pub display: bool,
}

impl Host {
    /// Detect the current host.
    ///
    /// Windows and macOS always have a display. Elsewhere a display is
    /// available if `DISPLAY` or `WAYLAND_DISPLAY` is set and non-empty.
    /// Values need not be valid unicode.
    pub fn detect() -> Self {
        if cfg!(any(target_os = "windows", target_os = "macos")) {
            return Self { display: true };
        }

        let display = DISPLAY_VARS
            .iter()
            .any(|var| env::var_os(var).is_some_and(|val| !val.is_empty()));

        Self { display }
    }
}
