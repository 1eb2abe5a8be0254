//! Mobile scan screen: public API.
//!
//! `flow` is the state machine; `bridge` drives it for the webview, which
//! performs the camera steps, and shows dialogs through a [`DialogHost`].

mod bridge;
mod flow;

pub use bridge::{BridgeError, DialogHost, HostError, ScanBridge, ScanProgress};
pub use flow::{
    BarcodeFormat, CameraScanRequest, DialogKind, DialogMessage, FlowError, HostReply,
    PermissionState, ScanFlow, ScanStep, INITIAL_MESSAGE, NOT_ALLOWED_MESSAGE,
};
