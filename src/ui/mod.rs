// ============================================================================
// Module : ui
// ============================================================================
// Interface utilisateur terminal : header, ligne d'infos, graphique
// ============================================================================

pub mod chart;  // Rendu du graphique ligne + hit-testing
pub mod events; // Pompe d'événements clavier/souris
pub mod header; // Titre, sélecteur de time-frame, ligne d'infos
pub mod layout; // Paramètres de présentation dérivés (LayoutPolicy)

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::app::App;

/// Dessine l'interface complète
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = screen_chunks(frame.size());

    header::render_header(frame, app, chunks[0]);
    header::render_info(frame, app, chunks[1]);
    chart::render_chart(frame, app, chunks[2]);
}

/// Découpe l'écran : header, ligne d'infos, panneau graphique
///
/// Partagé avec la gestion des événements souris, qui doit retrouver
/// le panneau graphique pour le hit-testing
pub fn screen_chunks(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header : titre + sélecteur
            Constraint::Length(4), // Infos : données + raccourcis
            Constraint::Min(0),    // Graphique : tout le reste
        ])
        .split(area)
        .to_vec()
}
