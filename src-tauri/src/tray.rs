//! System tray setup, menu handlers, and crop mode.
//!
//! The tray icon is the primary entry point on desktop.
//! Clicking it opens the crop overlay.

use crate::area_commands::deliver_codes;
use crate::capture::{self, CaptureState};
use crate::config::AppConfig;
use crate::{clipboard, decode};
use tauri::{
    image::Image as TauriImage,
    menu::{MenuBuilder, MenuItemBuilder},
    tray::TrayIconBuilder,
    AppHandle, Manager,
};

/// Label of the full-screen crop window.
pub const CROP_WINDOW_LABEL: &str = "crop";

/// Sets up the system tray icon with a click handler.
///
/// Left-click: opens the crop overlay.
/// Right-click: Scan / Crop / Load From Clipboard / Quit.
pub fn setup_tray(app: &AppHandle) -> Result<(), Box<dyn std::error::Error>> {
    let scan_item = MenuItemBuilder::with_id("scan", "Scan").build(app)?;
    let crop_item = MenuItemBuilder::with_id("crop", "Crop").build(app)?;
    let clipboard_item = MenuItemBuilder::with_id("clipboard", "Load From Clipboard").build(app)?;
    let quit_item = MenuItemBuilder::with_id("quit", "Quit QR Snap").build(app)?;
    let menu = MenuBuilder::new(app)
        .item(&scan_item)
        .item(&crop_item)
        .item(&clipboard_item)
        .separator()
        .item(&quit_item)
        .build()?;

    // Decode the PNG icon to RGBA for Tauri's Image type
    let icon_bytes = include_bytes!("../icons/32x32.png");
    let icon_img = image::load_from_memory(icon_bytes)
        .map_err(|e| format!("Failed to decode tray icon: {}", e))?;
    let rgba = icon_img.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let tray_icon = TauriImage::new_owned(rgba.into_raw(), w, h);

    let _tray = TrayIconBuilder::new()
        .icon(tray_icon)
        .tooltip("QR Snap: click to crop a QR code")
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_tray_icon_event(|tray_icon, event| {
            if let tauri::tray::TrayIconEvent::Click {
                button: tauri::tray::MouseButton::Left,
                button_state: tauri::tray::MouseButtonState::Up,
                ..
            } = event
            {
                log::info!("[TRAY] icon clicked, starting crop");
                if let Err(e) = start_crop_mode(tray_icon.app_handle()) {
                    log::error!("[TRAY] failed to start crop mode: {}", e);
                }
            }
        })
        .on_menu_event(|app, event| match event.id().as_ref() {
            "scan" => scan_screen(app),
            "crop" => {
                if let Err(e) = start_crop_mode(app) {
                    log::error!("[TRAY] failed to start crop mode: {}", e);
                }
            }
            "clipboard" => scan_clipboard(app),
            "quit" => {
                log::info!("[TRAY] quit requested");
                app.exit(0);
            }
            other => log::warn!("[TRAY] unknown menu item '{}'", other),
        })
        .build(app)?;

    Ok(())
}

/// Captures the screen, then opens the crop overlay on top of it.
///
/// If a crop window is already open it is focused instead.
pub fn start_crop_mode(app: &AppHandle) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(window) = app.get_webview_window(CROP_WINDOW_LABEL) {
        window.set_focus()?;
        return Ok(());
    }

    let start = std::time::Instant::now();

    // Step 1: Capture the full screen before the overlay covers it
    let screenshot = capture::capture_primary_monitor()
        .map_err(|e| format!("Screen capture failed: {}", e))?;
    log::info!("[CAPTURE] screen captured in {}ms", start.elapsed().as_millis());

    // Step 2: Store it for the area scan on release
    app.state::<CaptureState>().store(screenshot);

    // Step 3: Create the overlay window
    tauri::WebviewWindowBuilder::new(
        app,
        CROP_WINDOW_LABEL,
        tauri::WebviewUrl::App("index.html".into()),
    )
    .fullscreen(true)
    .transparent(true)
    .decorations(false)
    .always_on_top(true)
    .skip_taskbar(true)
    .title("QR Snap Crop")
    .build()?;

    log::info!("[TRAY] crop overlay opened in {}ms total", start.elapsed().as_millis());
    Ok(())
}

/// Decodes every QR code on the primary screen.
fn scan_screen(app: &AppHandle) {
    let app = app.clone();
    tauri::async_runtime::spawn_blocking(move || {
        let config = app.state::<AppConfig>();
        match capture::capture_primary_monitor() {
            Ok(shot) => {
                let codes = decode::find_qr_codes(&shot.image, config.decode_max_dim);
                report(&config, &codes, "screen");
            }
            Err(e) => log::error!("[TRAY] {}", e),
        }
    });
}

/// Decodes the QR codes in the image currently on the clipboard.
fn scan_clipboard(app: &AppHandle) {
    let app = app.clone();
    tauri::async_runtime::spawn_blocking(move || {
        let config = app.state::<AppConfig>();
        match clipboard::read_image() {
            Ok(image) => {
                let codes = decode::find_qr_codes(&image, config.decode_max_dim);
                report(&config, &codes, "clipboard image");
            }
            Err(e) => log::error!("[TRAY] {}", e),
        }
    });
}

fn report(config: &AppConfig, codes: &[String], source: &str) {
    if codes.is_empty() {
        log::info!("[TRAY] no QR codes found in {}", source);
    } else {
        deliver_codes(config, codes);
    }
}
