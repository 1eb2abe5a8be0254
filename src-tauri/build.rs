//! Build script for the QR Snap Tauri app.
//!
//! Only Tauri codegen is needed; it also emits the `desktop` / `mobile`
//! cfg flags the app code branches on.

fn main() {
    tauri_build::build();
}
