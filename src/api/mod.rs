// ============================================================================
// Module : api
// ============================================================================
// Client du service de cotation distant (stockscan)
// ============================================================================

pub mod stockscan; // Client de l'endpoint chandelles

// Re-export des éléments principaux
pub use stockscan::{fetch_candles, FetchError, EXCHANGE, SYMBOL};
