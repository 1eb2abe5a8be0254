//! QR Snap: Tauri application entry point.
//!
//! This is the app shell that wires together:
//! - Platform selection (platform.rs)
//! - Desktop: system tray (tray.rs), crop overlay (selection/), screen
//!   capture (capture/), decoding (decode.rs), clipboard (clipboard.rs)
//! - Mobile: scan screen state machine (scanner/) and its webview bridge
//! - Tauri command handlers for frontend communication

pub mod config;
pub mod decode;
pub mod platform;
pub mod scanner;
pub mod selection;

mod camera_commands;
mod dialog;

#[cfg(desktop)]
mod area_commands;
#[cfg(desktop)]
pub mod capture;
#[cfg(desktop)]
mod clipboard;
#[cfg(desktop)]
mod tray;

use config::AppConfig;

/// Entry point, called by the Tauri runtime.
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::error!("[CONFIG] {}, using defaults", e);
        AppConfig::default()
    });
    log::debug!("[CONFIG] {:?}", config);

    let builder = tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .manage(config)
        .manage(scanner::ScanBridge::new())
        .manage(selection::OverlayRegistry::new());

    #[cfg(desktop)]
    let builder = builder.manage(capture::CaptureState::new());

    #[cfg(mobile)]
    let builder = builder.plugin(tauri_plugin_barcode_scanner::init());

    builder
        .invoke_handler(tauri::generate_handler![
            platform::current_view,
            camera_commands::scan_session,
            camera_commands::scan_reset,
            camera_commands::scan_tap,
            camera_commands::scan_advance,
            #[cfg(desktop)]
            area_commands::overlay_pointer_down,
            #[cfg(desktop)]
            area_commands::overlay_pointer_move,
            #[cfg(desktop)]
            area_commands::overlay_pointer_up,
            #[cfg(desktop)]
            area_commands::scan_area,
        ])
        .on_window_event(|window, event| {
            if let tauri::WindowEvent::Destroyed = event {
                use tauri::Manager;
                window
                    .state::<selection::OverlayRegistry>()
                    .remove(window.label());

                #[cfg(desktop)]
                if window.label() == tray::CROP_WINDOW_LABEL {
                    window.state::<capture::CaptureState>().clear();
                }
            }
        })
        .setup(|app| {
            log::info!(
                "QR Snap starting up on {} ({} view)",
                platform::platform_identifier(),
                platform::Platform::current().as_str()
            );

            #[cfg(desktop)]
            desktop::setup(app)?;

            #[cfg(mobile)]
            mobile::setup(app)?;

            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("Error building QR Snap")
        .run(|_app, _event| {
            // The tray app outlives its windows; only an explicit exit quits.
            #[cfg(desktop)]
            if let tauri::RunEvent::ExitRequested { api, code, .. } = _event {
                if code.is_none() {
                    api.prevent_exit();
                }
            }
        });
}

#[cfg(desktop)]
mod desktop {
    use crate::config::AppConfig;
    use tauri::Manager;

    pub fn setup(app: &mut tauri::App) -> Result<(), Box<dyn std::error::Error>> {
        #[cfg(target_os = "macos")]
        app.set_activation_policy(tauri::ActivationPolicy::Accessory);

        crate::tray::setup_tray(app.handle())?;
        log::info!("[TRAY] system tray initialized, ready to crop");

        let shortcut = app.state::<AppConfig>().crop_shortcut.clone();
        if let Some(shortcut) = shortcut {
            register_crop_shortcut(app.handle(), &shortcut)?;
        }

        Ok(())
    }

    /// Opens the crop overlay whenever `shortcut` is pressed.
    fn register_crop_shortcut(
        app: &tauri::AppHandle,
        shortcut: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut, ShortcutState};

        let crop: Shortcut = shortcut
            .parse()
            .map_err(|e| format!("Invalid crop shortcut '{}': {}", shortcut, e))?;

        let bound = crop.clone();
        app.plugin(
            tauri_plugin_global_shortcut::Builder::new()
                .with_handler(move |app, pressed, event| {
                    if pressed == &bound && event.state() == ShortcutState::Pressed {
                        if let Err(e) = crate::tray::start_crop_mode(app) {
                            log::error!("[SHORTCUT] failed to start crop mode: {}", e);
                        }
                    }
                })
                .build(),
        )?;
        app.global_shortcut().register(crop)?;

        log::info!("[SHORTCUT] crop bound to {}", shortcut);
        Ok(())
    }
}

#[cfg(mobile)]
mod mobile {
    pub fn setup(app: &tauri::App) -> Result<(), Box<dyn std::error::Error>> {
        tauri::WebviewWindowBuilder::new(app, "main", tauri::WebviewUrl::default()).build()?;
        Ok(())
    }
}
