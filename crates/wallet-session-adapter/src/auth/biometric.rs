/*
[INPUT]:  Prompt text for a sensitive operation
[OUTPUT]: Biometric confirmation outcome
[POS]:    Auth layer - biometric capability abstraction
[UPDATE]: When adding outcomes or changing prompt semantics
*/

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::http::{BiometricFailure, Result, WalletError};

/// Result of asking the device for biometric confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiometricOutcome {
    Confirmed,
    NoHardware,
    NotEnrolled,
    Rejected,
}

/// Trait for the platform biometric prompt
///
/// Implement this over Face ID / Touch ID / BiometricPrompt in the host.
/// The trait is async because the prompt waits on the user.
#[async_trait]
pub trait BiometricGate: Send + Sync {
    /// Check hardware, check enrollment, then prompt
    async fn confirm(&self, prompt: &str) -> BiometricOutcome;
}

/// Ask the gate once and map anything but `Confirmed` to `BiometricDenied`
pub async fn require_confirmation(gate: &dyn BiometricGate, prompt: &str) -> Result<()> {
    match gate.confirm(prompt).await {
        BiometricOutcome::Confirmed => Ok(()),
        BiometricOutcome::NoHardware | BiometricOutcome::NotEnrolled => Err(
            WalletError::BiometricDenied(BiometricFailure::Unavailable),
        ),
        BiometricOutcome::Rejected => Err(WalletError::BiometricDenied(BiometricFailure::Rejected)),
    }
}

/// Mock biometric gate for testing
#[derive(Debug)]
pub struct MockBiometricGate {
    outcome: BiometricOutcome,
    prompts: AtomicUsize,
}

impl MockBiometricGate {
    /// Create a gate that always answers `outcome`
    pub fn new(outcome: BiometricOutcome) -> Self {
        Self {
            outcome,
            prompts: AtomicUsize::new(0),
        }
    }

    /// Number of times the gate was asked
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BiometricGate for MockBiometricGate {
    async fn confirm(&self, _prompt: &str) -> BiometricOutcome {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        self.outcome
    }
}
