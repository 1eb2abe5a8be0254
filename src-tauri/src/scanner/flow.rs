//! Scan-session state machine without I/O.
//!
//! Each call returns the next host operation to perform; the caller
//! performs it and feeds the outcome back through [`ScanFlow::advance`].
//! [`ScanBridge`](super::ScanBridge) drives it for the webview.

use serde::{Deserialize, Serialize};

/// Button label before the first scan.
pub const INITIAL_MESSAGE: &str = "scan";

/// Shown when the camera permission is anything but granted.
pub const NOT_ALLOWED_MESSAGE: &str = "not allowed to use the camera";

/// Camera permission as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum PermissionState {
    Prompt,
    Granted,
    /// Denied, restricted, or any value we don't know.
    Denied,
}

impl PermissionState {
    pub fn from_host(value: &str) -> Self {
        match value {
            "prompt" => PermissionState::Prompt,
            "granted" => PermissionState::Granted,
            _ => PermissionState::Denied,
        }
    }
}

impl From<String> for PermissionState {
    fn from(value: String) -> Self {
        Self::from_host(&value)
    }
}

/// Barcode formats understood by the camera plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BarcodeFormat {
    #[serde(rename = "QR_CODE")]
    QrCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CameraScanRequest {
    pub formats: Vec<BarcodeFormat>,
    pub windowed: bool,
}

impl CameraScanRequest {
    pub fn qr_windowed() -> Self {
        Self {
            formats: vec![BarcodeFormat::QrCode],
            windowed: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogMessage {
    pub message: String,
    pub kind: DialogKind,
}

/// The next host operation the flow is waiting on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum ScanStep {
    CheckPermission,
    RequestPermission,
    Scan(CameraScanRequest),
    ShowDialog(DialogMessage),
}

/// Outcome of a host operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum HostReply {
    Permission(PermissionState),
    Scanned(String),
    DialogClosed,
    Failed(String),
}

impl HostReply {
    fn name(&self) -> &'static str {
        match self {
            HostReply::Permission(_) => "permission",
            HostReply::Scanned(_) => "scanned",
            HostReply::DialogClosed => "dialogClosed",
            HostReply::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("A scan is already in progress")]
    Busy,

    #[error("No scan in progress")]
    Idle,

    #[error("Unexpected '{got}' reply while {waiting_for}")]
    UnexpectedReply {
        waiting_for: &'static str,
        got: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    CheckingPermission,
    RequestingPermission,
    Scanning,
    /// Dialog is up; its text becomes the label once it closes.
    Reporting(String),
}

impl Phase {
    fn describe(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::CheckingPermission => "checking permission",
            Phase::RequestingPermission => "requesting permission",
            Phase::Scanning => "scanning",
            Phase::Reporting(_) => "showing a dialog",
        }
    }
}

enum Transition {
    Next(Phase, ScanStep),
    Report(DialogKind, String),
    Finish,
}

#[derive(Debug)]
pub struct ScanFlow {
    phase: Phase,
    message: String,
}

impl Default for ScanFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanFlow {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            message: INITIAL_MESSAGE.to_string(),
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Button label: the last result or error.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Starts a scan from the idle button.
    pub fn tap(&mut self) -> Result<ScanStep, FlowError> {
        if self.is_scanning() {
            return Err(FlowError::Busy);
        }
        self.phase = Phase::CheckingPermission;
        Ok(ScanStep::CheckPermission)
    }

    /// Feeds back the outcome of the last step. `Ok(None)` means the flow
    /// is idle again.
    ///
    /// A reply that doesn't fit the current step is rejected and leaves the
    /// flow untouched.
    pub fn advance(&mut self, reply: HostReply) -> Result<Option<ScanStep>, FlowError> {
        let transition = match (&self.phase, reply) {
            (Phase::Idle, _) => return Err(FlowError::Idle),

            (Phase::CheckingPermission, HostReply::Permission(PermissionState::Prompt)) => {
                Transition::Next(Phase::RequestingPermission, ScanStep::RequestPermission)
            }
            (
                Phase::CheckingPermission | Phase::RequestingPermission,
                HostReply::Permission(PermissionState::Granted),
            ) => Transition::Next(
                Phase::Scanning,
                ScanStep::Scan(CameraScanRequest::qr_windowed()),
            ),
            (Phase::CheckingPermission | Phase::RequestingPermission, HostReply::Permission(_)) => {
                Transition::Report(DialogKind::Error, NOT_ALLOWED_MESSAGE.to_string())
            }
            (Phase::Scanning, HostReply::Scanned(content)) => {
                Transition::Report(DialogKind::Info, content)
            }
            (
                Phase::CheckingPermission | Phase::RequestingPermission | Phase::Scanning,
                HostReply::Failed(error),
            ) => Transition::Report(DialogKind::Error, error),

            // A dialog that failed to show still ends the scan.
            (Phase::Reporting(_), HostReply::DialogClosed | HostReply::Failed(_)) => {
                Transition::Finish
            }

            (phase, reply) => {
                return Err(FlowError::UnexpectedReply {
                    waiting_for: phase.describe(),
                    got: reply.name(),
                })
            }
        };

        Ok(match transition {
            Transition::Next(phase, step) => {
                self.phase = phase;
                Some(step)
            }
            Transition::Report(kind, message) => {
                self.phase = Phase::Reporting(message.clone());
                Some(ScanStep::ShowDialog(DialogMessage { message, kind }))
            }
            Transition::Finish => {
                self.finish();
                None
            }
        })
    }

    /// Forces the flow back to idle, keeping a pending result message.
    pub fn reset(&mut self) {
        if self.is_scanning() {
            log::warn!("[SCAN] scan abandoned while {}", self.phase.describe());
            self.finish();
        }
    }

    fn finish(&mut self) {
        if let Phase::Reporting(message) = std::mem::replace(&mut self.phase, Phase::Idle) {
            self.message = message;
        }
    }
}
