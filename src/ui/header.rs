// ============================================================================
// Header - Titre, sélecteur de time-frame et ligne d'infos
// ============================================================================
// Le header affiche l'instrument et la rangée de sélection des quatre
// time-frames (l'entrée active est mise en évidence) ; la ligne d'infos
// montre le nombre de points, la sélection courante et les raccourcis
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::api::{EXCHANGE, SYMBOL};
use crate::app::{App, FetchState};
use crate::models::TimeFrame;

// ============================================================================
// Header : titre + sélecteur
// ============================================================================

/// Dessine le header avec le sélecteur de time-frame
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" 📈 {} ({}) ", SYMBOL, EXCHANGE))
        .title_alignment(Alignment::Center);

    // Une entrée par time-frame, numérotée pour la sélection directe
    let mut spans: Vec<Span> = Vec::new();
    for (index, time_frame) in TimeFrame::all().iter().enumerate() {
        let label = format!(" [{}] {} ", index + 1, time_frame.label());

        let style = if *time_frame == app.time_frame {
            // Entrée active : mise en évidence
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::REVERSED)
        } else if app.fetch_state.is_loading() {
            // Sélecteur grisé pendant le chargement
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };

        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }

    let paragraph = Paragraph::new(vec![Line::from(spans)])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Ligne d'infos : compteur de points, sélection, raccourcis
// ============================================================================

/// Dessine la ligne d'infos sous le header
pub fn render_info(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    // Ligne 1 : état des données et sélection courante
    let mut data_spans: Vec<Span> = Vec::new();
    match &app.fetch_state {
        FetchState::Ready(series) if !series.is_empty() => {
            data_spans.push(Span::raw(format!(
                "{} points • Survolez le graphique pour les détails",
                series.len()
            )));

            if let Some(point) = app.selection.selected() {
                data_spans.push(Span::styled(
                    format!(
                        " • Sélection : {} - ${:.2}",
                        point.display_date, point.price
                    ),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ));
            }
        }
        FetchState::Ready(_) => {
            data_spans.push(Span::styled(
                "Aucune donnée pour cette période",
                Style::default().fg(Color::Gray),
            ));
        }
        FetchState::Failed(_) => {
            data_spans.push(Span::styled(
                "Échec du chargement",
                Style::default().fg(Color::Red),
            ));
        }
        FetchState::Idle | FetchState::Loading => {
            data_spans.push(Span::styled(
                "Chargement...",
                Style::default().fg(Color::Yellow),
            ));
        }
    }

    // Ligne 2 : raccourcis clavier
    let shortcuts = Line::from(vec![
        Span::styled(
            "[h/l]",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Période  "),
        Span::styled(
            "[1-4]",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Sélection directe  "),
        Span::styled(
            "[r]",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Recharger  "),
        Span::styled(
            "[q]",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Quitter"),
    ]);

    let paragraph = Paragraph::new(vec![Line::from(data_spans), shortcuts])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
