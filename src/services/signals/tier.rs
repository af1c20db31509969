//! Confluence score to confidence tier mapping.

use crate::types::Tier;

/// Map a confluence score to its tier. Every score has exactly one tier.
pub fn classify(score: u8) -> Tier {
    match score {
        s if s >= 5 => Tier::Strong,
        4 => Tier::Moderate,
        3 => Tier::Watchlist,
        _ => Tier::Reject,
    }
}
