//! Shared scan screen driven by the webview.
//!
//! The webview owns the camera plugin: it performs permission and scan
//! steps and reports back through [`ScanBridge::advance`]. Dialog steps
//! never reach it; they are shown through a [`DialogHost`] before the
//! bridge answers.

use super::flow::{DialogMessage, FlowError, HostReply, ScanFlow, ScanStep};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct HostError(pub String);

impl From<String> for HostError {
    fn from(message: String) -> Self {
        HostError(message)
    }
}

impl From<&str> for HostError {
    fn from(message: &str) -> Self {
        HostError(message.to_string())
    }
}

/// Modal message dialogs provided by the platform.
#[async_trait]
pub trait DialogHost: Send + Sync {
    /// Resolves once the dialog is dismissed.
    async fn show_message(&self, dialog: &DialogMessage) -> Result<(), HostError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error("Scan state is poisoned")]
    Poisoned,
}

/// Screen state plus the step the webview has to perform next, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanProgress {
    pub scanning: bool,
    pub message: String,
    pub step: Option<ScanStep>,
}

/// Resets the flow to idle unless disarmed.
struct IdleOnDrop<'a> {
    flow: &'a Mutex<ScanFlow>,
    armed: bool,
}

impl<'a> IdleOnDrop<'a> {
    fn new(flow: &'a Mutex<ScanFlow>) -> Self {
        Self { flow, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            if let Ok(mut flow) = self.flow.lock() {
                flow.reset();
            }
        }
    }
}

/// The scan flow behind a lock that is never held across a dialog.
#[derive(Debug, Default)]
pub struct ScanBridge {
    flow: Mutex<ScanFlow>,
}

impl ScanBridge {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut ScanFlow) -> T) -> Result<T, BridgeError> {
        let mut flow = self.flow.lock().map_err(|_| BridgeError::Poisoned)?;
        Ok(f(&mut flow))
    }

    pub fn progress(&self) -> Result<ScanProgress, BridgeError> {
        self.progress_with(None)
    }

    fn progress_with(&self, step: Option<ScanStep>) -> Result<ScanProgress, BridgeError> {
        self.with(|flow| ScanProgress {
            scanning: flow.is_scanning(),
            message: flow.message().to_string(),
            step,
        })
    }

    /// Drops any half-finished scan, e.g. after the webview reloaded.
    pub fn reset(&self) -> Result<ScanProgress, BridgeError> {
        self.with(|flow| flow.reset())?;
        self.progress()
    }

    /// Handles a tap on the idle button. A tap while scanning is rejected
    /// and leaves the running scan alone.
    pub async fn tap<D: DialogHost + ?Sized>(
        &self,
        dialogs: &D,
    ) -> Result<ScanProgress, BridgeError> {
        let step = self.with(|flow| flow.tap())??;
        log::info!("[SCAN] tap: starting scan");
        self.drive(dialogs, Some(step)).await
    }

    /// Feeds back the outcome of the step the webview just performed.
    ///
    /// A reply the flow rejects abandons the scan, so the screen is idle
    /// again when the error reaches the webview.
    pub async fn advance<D: DialogHost + ?Sized>(
        &self,
        dialogs: &D,
        reply: HostReply,
    ) -> Result<ScanProgress, BridgeError> {
        let guard = IdleOnDrop::new(&self.flow);
        let next = self.with(|flow| flow.advance(reply))??;
        guard.disarm();
        self.drive(dialogs, next).await
    }

    /// Shows dialog steps until the flow needs the webview or goes idle.
    async fn drive<D: DialogHost + ?Sized>(
        &self,
        dialogs: &D,
        mut step: Option<ScanStep>,
    ) -> Result<ScanProgress, BridgeError> {
        let guard = IdleOnDrop::new(&self.flow);

        while let Some(ScanStep::ShowDialog(message)) = &step {
            let reply = match dialogs.show_message(message).await {
                Ok(()) => HostReply::DialogClosed,
                Err(e) => {
                    log::error!("[SCAN] dialog failed: {}", e);
                    HostReply::Failed(e.0)
                }
            };
            step = self.with(|flow| flow.advance(reply))??;
        }

        guard.disarm();
        let progress = self.progress_with(step)?;
        if !progress.scanning {
            log::info!("[SCAN] scan finished: {}", progress.message);
        }
        Ok(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::PermissionState;

    struct Dismissed;

    #[async_trait]
    impl DialogHost for Dismissed {
        async fn show_message(&self, _dialog: &DialogMessage) -> Result<(), HostError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn tap_while_scanning_is_busy() {
        let bridge = ScanBridge::new();
        bridge.tap(&Dismissed).await.unwrap();

        let err = bridge.tap(&Dismissed).await.unwrap_err();
        assert!(matches!(err, BridgeError::Flow(FlowError::Busy)));
        assert!(bridge.progress().unwrap().scanning);
    }

    #[tokio::test]
    async fn rejected_reply_ends_idle() {
        let bridge = ScanBridge::new();
        bridge.tap(&Dismissed).await.unwrap();

        let err = bridge
            .advance(&Dismissed, HostReply::Scanned("early".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Flow(FlowError::UnexpectedReply { .. })));
        assert!(!bridge.progress().unwrap().scanning);

        bridge.tap(&Dismissed).await.unwrap();
        let progress = bridge
            .advance(&Dismissed, HostReply::Permission(PermissionState::Denied))
            .await
            .unwrap();
        assert!(!progress.scanning);
    }

    #[test]
    fn reset_when_idle_keeps_label() {
        let bridge = ScanBridge::new();
        let progress = bridge.reset().unwrap();
        assert_eq!(progress.message, "scan");
        assert_eq!(progress.step, None);
    }
}
