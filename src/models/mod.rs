// ============================================================================
// Module : models
// ============================================================================
// Structures de données de l'application : time-frames, chandelles
// brutes et série de prix normalisée
// ============================================================================

pub mod candle;     // RawCandle, PricePoint, PriceSeries, normalisation
pub mod time_frame; // Granularités d'échantillonnage

// Re-export des structures principales pour simplifier les imports
pub use candle::{normalize, PricePoint, PriceSeries, RawCandle};
pub use time_frame::TimeFrame;
