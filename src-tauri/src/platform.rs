//! Platform selection: decides which view the webview renders.

use serde::Serialize;

/// The two mutually exclusive front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Tray app with the screen-region crop overlay.
    Desktop,
    /// Full-screen camera scan button.
    Mobile,
}

impl Platform {
    /// Maps a Tauri platform identifier to a view.
    ///
    /// Only `windows`, `linux` and `darwin` are desktop. Every other
    /// identifier, known or not, selects the mobile view: targets we
    /// don't recognise are assumed to be mobile shells.
    pub fn from_identifier(id: &str) -> Self {
        match id {
            "windows" | "linux" | "darwin" => Platform::Desktop,
            _ => Platform::Mobile,
        }
    }

    /// The view for the target this binary was compiled for.
    pub fn current() -> Self {
        Self::from_identifier(platform_identifier())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Desktop => "desktop",
            Platform::Mobile => "mobile",
        }
    }
}

/// Tauri-style platform identifier of the compile target.
///
/// Same spelling as `TAURI_ENV_PLATFORM` (macOS is `darwin`).
pub const fn platform_identifier() -> &'static str {
    if cfg!(target_os = "macos") {
        "darwin"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "linux") {
        "linux"
    } else if cfg!(target_os = "android") {
        "android"
    } else if cfg!(target_os = "ios") {
        "ios"
    } else {
        std::env::consts::OS
    }
}

/// Tauri command: tell the webview which view to render.
#[tauri::command]
pub fn current_view() -> serde_json::Value {
    let platform = Platform::current();
    log::debug!("[PLATFORM] {} -> {}", platform_identifier(), platform.as_str());

    serde_json::json!({
        "platform": platform_identifier(),
        "view": platform,
    })
}
