//! # Phatic Cancellation (`common::signal`)
//!
//! File: cli/src/common/signal.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A `CancelToken` is shared between the interactive loop, the dialogue engine and
//! the store. Pressing Ctrl+C cancels it (see [`on_interrupt`]). From then on:
//! - every store read fails with `PhaticError::Cancelled`, which the engine turns
//!   into its usual fallbacks (unknown topic, placeholder reply);
//! - the interactive loop stops waiting for input and exits on its next iteration.
//!
//! The token is a `tokio::sync::watch` channel so it can be both polled
//! synchronously (`is_cancelled`) and awaited (`cancelled`).
//!
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Shared, cloneable cancellation flag.
#[derive(Clone, Debug)]
pub struct CancelToken {
    sender: Arc<watch::Sender<bool>>,
    receiver: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    /// Marks the token (and every clone of it) as cancelled.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once the token has been cancelled.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        while !*receiver.borrow_and_update() {
            // The sender lives as long as any clone of the token, so this only
            // errors if every handle is gone.
            if receiver.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Cancels `token` when SIGINT (Ctrl+C) arrives.
///
/// Must be called from within a Tokio runtime.
pub fn on_interrupt(token: CancelToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, cancelling.");
                token.cancel();
            }
            Err(e) => warn!("Could not listen for Ctrl+C: {}", e),
        }
    });
    debug!("Interrupt listener installed.");
}
