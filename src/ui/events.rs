// ============================================================================
// Gestion des événements
// ============================================================================
// Pompe d'événements clavier/souris et tick régulier de l'application
//
// CONCEPT : Poll avec timeout
// - poll(250ms) attend un événement terminal
// - Sans événement, un Tick est émis : il cadence les échéances de la
//   sélection débouncée
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, MouseEvent,
};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Événement souris (déplacement, clic) sur le graphique
    Mouse(MouseEvent),

    /// Tick régulier (échéances de debounce, rafraîchissement)
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler;

impl EventHandler {
    /// Crée un nouveau gestionnaire d'événements
    pub fn new() -> Self {
        Self
    }

    /// Lit le prochain événement (bloquant avec timeout)
    pub fn next(&self) -> Result<Event> {
        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                CrosstermEvent::Key(key) => {
                    // Sur certains OS on reçoit Press ET Release :
                    // on ne garde que Press pour éviter les doublons
                    if key.kind == KeyEventKind::Press {
                        Ok(Event::Key(key))
                    } else {
                        Ok(Event::Tick)
                    }
                }

                CrosstermEvent::Mouse(mouse) => Ok(Event::Mouse(mouse)),

                // Autres événements (resize, focus, etc.) : le prochain
                // rendu échantillonnera la nouvelle taille de toute façon
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers : identifier les touches
// ============================================================================

/// Vérifie si l'événement est la touche 'q' (quitter)
pub fn is_quit_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
    } else {
        false
    }
}

/// Vérifie si l'événement est 'l' ou → (time-frame suivant)
pub fn is_next_time_frame_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('l') | KeyCode::Right)
    } else {
        false
    }
}

/// Vérifie si l'événement est 'h' ou ← (time-frame précédent)
pub fn is_previous_time_frame_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('h') | KeyCode::Left)
    } else {
        false
    }
}

/// Vérifie si l'événement est 'r' (recharger le time-frame courant)
pub fn is_reload_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('r') | KeyCode::Char('R'))
    } else {
        false
    }
}

/// Extrait le chiffre d'un événement clavier (sélection directe '1'-'4')
pub fn get_digit_from_event(event: &Event) -> Option<char> {
    if let Event::Key(key) = event {
        if let KeyCode::Char(c) = key.code {
            if c.is_ascii_digit() {
                return Some(c);
            }
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================
