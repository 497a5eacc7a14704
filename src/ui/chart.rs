// ============================================================================
// Chart - Rendu du graphique ligne
// ============================================================================
// Affiche la série de prix sous forme de graphique ligne, piloté par
// les paramètres dérivés du LayoutPolicy (hauteur, marges, intervalle
// des ticks, format des prix, domaine de l'axe Y)
//
// Chaque état du fetch a son panneau dédié : chargement, erreur,
// "pas de données" (neutre, distinct d'une erreur), série tracée
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::api::SYMBOL;
use crate::app::{App, FetchState};
use crate::models::{PricePoint, PriceSeries};
use crate::ui::layout::{compute_layout, viewport_units, LayoutParams};

// ============================================================================
// Fonction principale de rendu du graphique
// ============================================================================

/// Dessine le panneau graphique selon l'état du fetch
pub fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    match &app.fetch_state {
        FetchState::Idle | FetchState::Loading => {
            render_status(frame, area, "Chargement des données...", Color::Yellow);
        }
        FetchState::Failed(message) => {
            render_status(frame, area, &format!("Erreur : {}", message), Color::Red);
        }
        FetchState::Ready(series) if series.is_empty() => {
            // "Pas de données" : message neutre, pas un panneau d'erreur
            render_status(
                frame,
                area,
                "Aucune donnée disponible pour ce time-frame",
                Color::Gray,
            );
        }
        FetchState::Ready(series) => {
            render_series(frame, app, series, area);
        }
    }
}

// ============================================================================
// Rendu de la série
// ============================================================================

/// Dessine le graphique ligne de la série
///
/// Le layout est recalculé à chaque rendu depuis la largeur courante
/// du viewport : jamais de cache entre deux redimensionnements
fn render_series(frame: &mut Frame, app: &App, series: &PriceSeries, area: Rect) {
    let layout = compute_layout(viewport_units(area.width), series.time_frame, series.len());
    let plot = chart_rect(area, &layout);

    if plot.width < 2 || plot.height < 2 {
        return; // Terminal trop petit pour tracer
    }

    // Convertit les points de prix en coordonnées (index, prix)
    let points: Vec<(f64, f64)> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, point)| (i as f64, point.price))
        .collect();

    // Domaine Y : [min − 5, max + 5]
    let (y_min, y_max) = match series.price_domain() {
        Some(domain) => domain,
        None => return,
    };

    // Point sélectionné mis en évidence par un second dataset
    let selected: Vec<(f64, f64)> = app
        .selection
        .selected()
        .and_then(|point| selected_coordinates(series, point))
        .into_iter()
        .collect();

    let mut datasets = vec![Dataset::default()
        .name(SYMBOL)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Blue))
        .data(&points)];

    if !selected.is_empty() {
        datasets.push(
            Dataset::default()
                .name("Sélection")
                .marker(symbols::Marker::Block)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                .data(&selected),
        );
    }

    // Labels X : un point sur `tick_interval` (0 = tous)
    let step = layout.tick_interval.max(1);
    let x_labels: Vec<Span> = series
        .points
        .iter()
        .step_by(step)
        .map(|point| Span::raw(point.display_date.clone()))
        .collect();

    let x_axis = Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, (points.len() - 1) as f64])
        .labels(x_labels);

    // Labels Y formatés selon la précision du palier
    let y_axis = Axis::default()
        .title("Prix ($)")
        .style(Style::default().fg(Color::Gray))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(layout.format_price(y_min)),
            Span::raw(layout.format_price((y_min + y_max) / 2.0)),
            Span::raw(layout.format_price(y_max)),
        ]);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(
                    " {} - {} ",
                    SYMBOL,
                    series.time_frame.label()
                )),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, plot);
}

/// Retourne les coordonnées (index, prix) du point sélectionné
///
/// La sélection est retrouvée par timestamp dans la série courante ;
/// None si le point n'en fait plus partie
fn selected_coordinates(series: &PriceSeries, selected: &PricePoint) -> Option<(f64, f64)> {
    series
        .points
        .iter()
        .position(|p| p.timestamp == selected.timestamp)
        .map(|i| (i as f64, selected.price))
}

// ============================================================================
// Zone de tracé et hit-testing
// ============================================================================

/// Applique les marges du layout et le plafond de hauteur à la zone
///
/// Les marges (en unités) sont converties en cellules terminal
pub fn chart_rect(area: Rect, layout: &LayoutParams) -> Rect {
    let (left, right) = layout.horizontal_margin_columns();
    let (top, bottom) = layout.vertical_margin_rows();

    let width = area.width.saturating_sub(left + right);
    let height = area
        .height
        .saturating_sub(top + bottom)
        .min(layout.height_rows());

    Rect {
        x: area.x + left,
        y: area.y + top,
        width,
        height,
    }
}

/// Retourne la zone de tracé si une série est affichée
///
/// None tant que l'état n'est pas Ready avec des points : aucune
/// interaction pointeur n'est alors possible
pub fn plot_area(app: &App, panel: Rect) -> Option<Rect> {
    let series = app.fetch_state.series()?;
    if series.is_empty() {
        return None;
    }

    let layout = compute_layout(viewport_units(panel.width), series.time_frame, series.len());
    Some(chart_rect(panel, &layout))
}

/// Mappe une colonne de la zone de tracé vers l'index du point le plus proche
pub fn point_index_at(column: u16, plot: Rect, len: usize) -> Option<usize> {
    if len == 0 || plot.width == 0 {
        return None;
    }
    if column < plot.x || column >= plot.x + plot.width {
        return None;
    }

    let relative = (column - plot.x) as f64 / plot.width.saturating_sub(1).max(1) as f64;
    let index = (relative * (len - 1) as f64).round() as usize;
    Some(index.min(len - 1))
}

/// Retourne le point sous le pointeur, ou None s'il est hors zone
pub fn point_at(series: &PriceSeries, plot: Rect, column: u16, row: u16) -> Option<PricePoint> {
    if row < plot.y || row >= plot.y.saturating_add(plot.height) {
        return None;
    }
    point_index_at(column, plot, series.len()).map(|i| series.points[i].clone())
}

// ============================================================================
// Panneaux d'état
// ============================================================================

/// Affiche un panneau de statut centré (chargement, erreur, pas de données)
fn render_status(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {} ", SYMBOL));

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(color))),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests unitaires
// ============================================================================
