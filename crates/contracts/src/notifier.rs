//! Notifier trait - Dispatcher output interface
//!
//! Defines the single-attempt delivery capability the dispatcher drives.

use crate::{ContractError, DispatchTarget};

/// Message delivery trait
///
/// All notifier implementations must implement this trait. One call to
/// [`deliver`](LocalNotifier::deliver) is exactly one attempt; retrying is
/// not the notifier's business.
#[trait_variant::make(Notifier: Send)]
pub trait LocalNotifier {
    /// Notifier name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Deliver one message to the target
    ///
    /// # Errors
    /// Returns [`ContractError::Delivery`] when the attempt fails
    async fn deliver(&mut self, text: &str, target: &DispatchTarget) -> Result<(), ContractError>;
}
