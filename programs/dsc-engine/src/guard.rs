use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anchor_lang::prelude::*;

use crate::errors::DscError;

/// Operation-in-progress flag guarding every public engine entry point
///
/// Clones observe the same flag, so a collaborator handed a clone can see
/// (and is refused) while an operation runs.
#[derive(Clone, Debug, Default)]
pub struct ReentrancyGuard {
    entered: Arc<AtomicBool>,
}

/// Clears the flag when the guarded operation ends
#[derive(Debug)]
pub struct GuardToken {
    entered: Arc<AtomicBool>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag, failing with `ReentrantCall` if it is already set
    pub fn enter(&self) -> Result<GuardToken> {
        if self
            .entered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return err!(DscError::ReentrantCall);
        }

        Ok(GuardToken {
            entered: Arc::clone(&self.entered),
        })
    }

    pub fn is_entered(&self) -> bool {
        self.entered.load(Ordering::Acquire)
    }
}

impl Drop for GuardToken {
    fn drop(&mut self) {
        self.entered.store(false, Ordering::Release);
    }
}
