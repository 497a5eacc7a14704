// ============================================================================
// LazyChart - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;    // Client du service de cotation
pub mod app;    // État de l'application et machine à états des requêtes
pub mod models; // Structures de données
pub mod ui;     // Interface utilisateur
