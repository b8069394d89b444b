//! Upgrade shop: affordability checks and irreversible purchases.

use thiserror::Error;

use crate::constants::LOG_UPGRADE_PURCHASED;
use crate::content::ContentCatalog;
use crate::state::GameState;

/// Reasons a purchase is rejected. The snapshot is left untouched in
/// every rejection case.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PurchaseError {
    #[error("upgrade {0} is not in the catalog")]
    UnknownUpgrade(String),
    #[error("insufficient xp: cost {cost}, balance {xp}")]
    InsufficientFunds { cost: u32, xp: u32 },
    #[error("upgrade already owned")]
    AlreadyOwned,
}

/// Purchase an upgrade: deducts its cost from xp and adds it to the
/// unlocked set. Irreversible within a session; the clearance level
/// ratchet is unaffected by the deduction.
///
/// # Errors
///
/// Returns `UnknownUpgrade`, `AlreadyOwned`, or `InsufficientFunds`
/// without modifying the snapshot.
pub fn purchase(
    state: &mut GameState,
    catalog: &ContentCatalog,
    upgrade_id: &str,
) -> Result<(), PurchaseError> {
    let upgrade = catalog
        .upgrade(upgrade_id)
        .ok_or_else(|| PurchaseError::UnknownUpgrade(upgrade_id.to_string()))?;
    if state.has_upgrade(upgrade_id) {
        return Err(PurchaseError::AlreadyOwned);
    }
    if !state.spend_xp(upgrade.cost) {
        return Err(PurchaseError::InsufficientFunds {
            cost: upgrade.cost,
            xp: state.xp,
        });
    }
    state.unlocked_upgrades.insert(upgrade.id.clone());
    state.push_log_detail(LOG_UPGRADE_PURCHASED, Some(upgrade.id.clone()));
    Ok(())
}
