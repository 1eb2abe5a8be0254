//! Native message dialogs via `tauri-plugin-dialog`.

use crate::scanner::{DialogKind, DialogMessage, HostError};
use tauri::AppHandle;
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

const TITLE: &str = "QR Snap";

fn native_kind(kind: DialogKind) -> MessageDialogKind {
    match kind {
        DialogKind::Info => MessageDialogKind::Info,
        DialogKind::Error => MessageDialogKind::Error,
    }
}

/// Shows a message dialog and resolves once the user dismisses it.
pub async fn show_message(app: &AppHandle, dialog: &DialogMessage) -> Result<(), HostError> {
    let (tx, rx) = tokio::sync::oneshot::channel();

    app.dialog()
        .message(dialog.message.as_str())
        .kind(native_kind(dialog.kind))
        .title(TITLE)
        .show(move |_| {
            let _ = tx.send(());
        });

    rx.await
        .map_err(|_| HostError::from("dialog closed without a response"))
}

/// Fire-and-forget error dialog.
#[cfg(desktop)]
pub fn notify_error(app: &AppHandle, message: &str) {
    app.dialog()
        .message(message)
        .kind(MessageDialogKind::Error)
        .title(TITLE)
        .show(|_| {});
}
