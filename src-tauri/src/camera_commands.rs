//! Tauri commands behind the mobile scan screen.
//!
//! Thin wrappers over [`ScanBridge`]; dialogs go through the native dialog
//! plugin.

use crate::dialog;
use crate::scanner::{DialogHost, DialogMessage, HostError, HostReply, ScanBridge, ScanProgress};
use async_trait::async_trait;
use tauri::{AppHandle, State};

struct NativeDialogs<'a>(&'a AppHandle);

#[async_trait]
impl DialogHost for NativeDialogs<'_> {
    async fn show_message(&self, message: &DialogMessage) -> Result<(), HostError> {
        dialog::show_message(self.0, message).await
    }
}

#[tauri::command]
pub fn scan_session(bridge: State<'_, ScanBridge>) -> Result<ScanProgress, String> {
    bridge.progress().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn scan_reset(bridge: State<'_, ScanBridge>) -> Result<ScanProgress, String> {
    bridge.reset().map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn scan_tap(
    app: AppHandle,
    bridge: State<'_, ScanBridge>,
) -> Result<ScanProgress, String> {
    bridge
        .tap(&NativeDialogs(&app))
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn scan_advance(
    app: AppHandle,
    bridge: State<'_, ScanBridge>,
    reply: HostReply,
) -> Result<ScanProgress, String> {
    bridge
        .advance(&NativeDialogs(&app), reply)
        .await
        .map_err(|e| e.to_string())
}
