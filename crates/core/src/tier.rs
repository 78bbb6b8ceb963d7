//! Account tiers and the CCTV visibility rules attached to them.
//!
//! A `free` account sees a fixed random sample of active CCTVs that is chosen
//! once and persisted on the user row; a `paid` account sees every active
//! CCTV. The functions here only decide; loading and persisting happen in the
//! API layer through the repositories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Maximum number of CCTVs in a free-tier fixed assignment.
pub const FIXED_SAMPLE_SIZE: i64 = 10;

/// Maximum number of CCTVs returned by the anonymous public listing.
pub const PUBLIC_PREVIEW_LIMIT: i64 = 10;

pub const TIER_FREE: &str = "free";
pub const TIER_PAID: &str = "paid";

/// Subscription level stored in `users.account_tier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountTier {
    Free,
    Paid,
}

impl AccountTier {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountTier::Free => TIER_FREE,
            AccountTier::Paid => TIER_PAID,
        }
    }
}

impl fmt::Display for AccountTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored tier string is not recognised.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown account tier: {0}")]
pub struct UnknownTier(pub String);

impl FromStr for AccountTier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TIER_FREE => Ok(AccountTier::Free),
            TIER_PAID => Ok(AccountTier::Paid),
            other => Err(UnknownTier(other.to_string())),
        }
    }
}

/// Which CCTV rows a listing query may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisibilityScope {
    /// Every active CCTV (paid tier).
    All,
    /// Only the listed ids (free tier). An empty list yields an empty result.
    Restricted(Vec<DbId>),
}

impl VisibilityScope {
    /// The id restriction to bind into a listing query, `None` when unrestricted.
    pub fn id_filter(&self) -> Option<&[DbId]> {
        match self {
            VisibilityScope::All => None,
            VisibilityScope::Restricted(ids) => Some(ids),
        }
    }

    /// Whether a single CCTV id is visible under this scope.
    pub fn permits(&self, cctv_id: DbId) -> bool {
        match self {
            VisibilityScope::All => true,
            VisibilityScope::Restricted(ids) => ids.contains(&cctv_id),
        }
    }
}

/// Whether a fresh fixed assignment must be sampled before listing.
///
/// Only free accounts with no (or an empty) stored assignment need one.
pub fn needs_assignment(tier: AccountTier, assigned: Option<&[DbId]>) -> bool {
    tier == AccountTier::Free && assigned.map_or(true, <[DbId]>::is_empty)
}

/// Resolve the listing scope for an account once its assignment is settled.
pub fn scope_for(tier: AccountTier, assigned: Option<&[DbId]>) -> VisibilityScope {
    match tier {
        AccountTier::Paid => VisibilityScope::All,
        AccountTier::Free => VisibilityScope::Restricted(assigned.unwrap_or_default().to_vec()),
    }
}
