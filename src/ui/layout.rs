// ============================================================================
// LayoutPolicy - Paramètres de présentation dérivés
// ============================================================================
// Dérive les paramètres d'affichage du graphique (hauteur, marges,
// densité des ticks, format des prix) depuis la largeur du viewport et
// le time-frame actif. Fonction pure et déterministe : recalculée à
// chaque rendu, jamais mise en cache entre deux redimensionnements.
//
// CONCEPT : Tiers de viewport
// - narrow (< 414 unités), medium (< 768), wide (le reste)
// - Chaque tier fixe une table de paramètres, sélectionnée par match
// - La seule règle métier non triviale (densité/format des ticks) est
//   isolée ici, hors du code de rendu
// ============================================================================

use crate::models::TimeFrame;

/// Largeur d'une cellule terminal en unités de viewport
pub const CELL_WIDTH_UNITS: u16 = 8;

/// Hauteur d'une cellule terminal en unités de viewport
pub const CELL_HEIGHT_UNITS: u16 = 16;

/// En dessous : tier narrow
const NARROW_BELOW_UNITS: u16 = 414;

/// En dessous (et ≥ narrow) : tier medium
const MEDIUM_BELOW_UNITS: u16 = 768;

/// Convertit une largeur en colonnes terminal vers des unités de viewport
pub fn viewport_units(columns: u16) -> u16 {
    columns.saturating_mul(CELL_WIDTH_UNITS)
}

// ============================================================================
// ViewportTier : les trois paliers de largeur
// ============================================================================

/// Palier discret de largeur de viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportTier {
    Narrow,
    Medium,
    Wide,
}

impl ViewportTier {
    /// Classe une largeur (en unités) dans son palier
    pub fn from_width(width: u16) -> Self {
        if width < NARROW_BELOW_UNITS {
            ViewportTier::Narrow
        } else if width < MEDIUM_BELOW_UNITS {
            ViewportTier::Medium
        } else {
            ViewportTier::Wide
        }
    }
}

// ============================================================================
// LayoutParams : le contrat déclaratif consommé par le rendu
// ============================================================================

/// Marges du graphique, en unités de viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

/// Paramètres de présentation dérivés, jamais stockés
#[derive(Debug, Clone, Copy)]
pub struct LayoutParams {
    /// Palier de largeur dont découlent les tables ci-dessous
    pub tier: ViewportTier,

    /// Hauteur du graphique, en unités
    pub height: u16,

    /// Marges autour de la zone de tracé, en unités
    pub margins: Margins,

    /// Taille de police des labels de ticks
    pub tick_font_size: u16,

    /// Angle des labels de l'axe X, en degrés
    pub label_angle: i16,

    /// Décalage du label de l'axe Y
    pub y_label_offset: i16,

    /// Nombre de décimales du format de prix
    pub price_precision: u8,

    /// Intervalle entre deux ticks de l'axe X, en points
    /// (0 = afficher tous les ticks, série courte)
    pub tick_interval: usize,
}

impl LayoutParams {
    /// Formate un prix selon la précision du palier
    ///
    /// narrow : dollars entiers arrondis ; medium : entiers sans
    /// décimales ; wide : centimes
    pub fn format_price(&self, value: f64) -> String {
        match self.tier {
            ViewportTier::Narrow => format!("${}", value.round()),
            _ => format!("${:.*}", self.price_precision as usize, value),
        }
    }

    /// Hauteur du graphique en lignes terminal
    pub fn height_rows(&self) -> u16 {
        self.height / CELL_HEIGHT_UNITS
    }

    /// Marges horizontales (gauche, droite) en colonnes terminal
    pub fn horizontal_margin_columns(&self) -> (u16, u16) {
        (
            self.margins.left / CELL_WIDTH_UNITS,
            self.margins.right / CELL_WIDTH_UNITS,
        )
    }

    /// Marges verticales (haut, bas) en lignes terminal
    pub fn vertical_margin_rows(&self) -> (u16, u16) {
        (
            self.margins.top / CELL_HEIGHT_UNITS,
            self.margins.bottom / CELL_HEIGHT_UNITS,
        )
    }
}

// ============================================================================
// Calcul du layout
// ============================================================================

/// Dérive les paramètres de présentation pour un rendu
///
/// Pure : mêmes entrées, mêmes sorties. L'appelant échantillonne la
/// largeur du viewport à chaque appel et ne doit pas mettre le
/// résultat en cache entre deux redimensionnements.
pub fn compute_layout(
    viewport_width: u16,
    time_frame: TimeFrame,
    series_len: usize,
) -> LayoutParams {
    let tier = ViewportTier::from_width(viewport_width);

    let (height, margins, tick_font_size, label_angle, y_label_offset, price_precision) =
        match tier {
            ViewportTier::Narrow => (
                320,
                Margins {
                    top: 20,
                    right: 15,
                    bottom: 50,
                    left: 35,
                },
                8,
                -70,
                -25,
                0,
            ),
            ViewportTier::Medium => (
                380,
                Margins {
                    top: 20,
                    right: 20,
                    bottom: 60,
                    left: 40,
                },
                10,
                -60,
                -30,
                0,
            ),
            ViewportTier::Wide => (
                550,
                Margins {
                    top: 20,
                    right: 40,
                    bottom: 80,
                    left: 60,
                },
                12,
                -45,
                -40,
                2,
            ),
        };

    LayoutParams {
        tier,
        height,
        margins,
        tick_font_size,
        label_angle,
        y_label_offset,
        price_precision,
        tick_interval: series_len / tick_density(tier, time_frame),
    }
}

/// Nombre de labels visés sur l'axe X, par palier et time-frame
///
/// Plus dense pour l'horaire (beaucoup de points) que pour le mensuel,
/// et plus dense sur les viewports larges où la place horizontale
/// permet davantage de labels
fn tick_density(tier: ViewportTier, time_frame: TimeFrame) -> usize {
    match time_frame {
        TimeFrame::Hourly => match tier {
            ViewportTier::Narrow => 6,
            ViewportTier::Medium => 10,
            ViewportTier::Wide => 20,
        },
        TimeFrame::Daily => match tier {
            ViewportTier::Narrow => 5,
            ViewportTier::Medium => 8,
            ViewportTier::Wide => 15,
        },
        TimeFrame::Weekly | TimeFrame::Monthly => match tier {
            ViewportTier::Narrow => 4,
            ViewportTier::Medium => 6,
            ViewportTier::Wide => 10,
        },
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(ViewportTier::from_width(0), ViewportTier::Narrow);
        assert_eq!(ViewportTier::from_width(413), ViewportTier::Narrow);
        assert_eq!(ViewportTier::from_width(414), ViewportTier::Medium);
        assert_eq!(ViewportTier::from_width(767), ViewportTier::Medium);
        assert_eq!(ViewportTier::from_width(768), ViewportTier::Wide);
        assert_eq!(ViewportTier::from_width(1200), ViewportTier::Wide);
    }

    #[test]
    fn test_tick_interval_differs_by_viewport() {
        let narrow = compute_layout(375, TimeFrame::Hourly, 100);
        let wide = compute_layout(1200, TimeFrame::Hourly, 100);

        // 100 points : 16 points par tick en narrow, 5 en wide
        assert_eq!(narrow.tick_interval, 16);
        assert_eq!(wide.tick_interval, 5);
        assert_ne!(narrow.tick_interval, wide.tick_interval);

        // Le viewport large affiche plus de labels (intervalle plus court)
        assert!(narrow.tick_interval >= wide.tick_interval);
    }

    #[test]
    fn test_tick_interval_denser_for_hourly() {
        let hourly = compute_layout(1200, TimeFrame::Hourly, 100);
        let monthly = compute_layout(1200, TimeFrame::Monthly, 100);

        // L'horaire a plus de points : ses labels sont plus rapprochés
        assert!(hourly.tick_interval <= monthly.tick_interval);
    }

    #[test]
    fn test_tick_interval_zero_for_short_series() {
        // Série plus courte que la densité : tous les ticks s'affichent
        let layout = compute_layout(1200, TimeFrame::Monthly, 7);
        assert_eq!(layout.tick_interval, 0);
    }

    #[test]
    fn test_heights_per_tier() {
        assert_eq!(compute_layout(375, TimeFrame::Daily, 10).height, 320);
        assert_eq!(compute_layout(600, TimeFrame::Daily, 10).height, 380);
        assert_eq!(compute_layout(1200, TimeFrame::Daily, 10).height, 550);
    }

    #[test]
    fn test_margins_per_tier() {
        let narrow = compute_layout(375, TimeFrame::Daily, 10).margins;
        assert_eq!(
            narrow,
            Margins {
                top: 20,
                right: 15,
                bottom: 50,
                left: 35
            }
        );

        let wide = compute_layout(1200, TimeFrame::Daily, 10).margins;
        assert_eq!(
            wide,
            Margins {
                top: 20,
                right: 40,
                bottom: 80,
                left: 60
            }
        );
    }

    #[test]
    fn test_price_precision_per_tier() {
        assert_eq!(compute_layout(375, TimeFrame::Daily, 10).price_precision, 0);
        assert_eq!(compute_layout(600, TimeFrame::Daily, 10).price_precision, 0);
        assert_eq!(compute_layout(1200, TimeFrame::Daily, 10).price_precision, 2);
    }

    #[test]
    fn test_format_price() {
        let narrow = compute_layout(375, TimeFrame::Daily, 10);
        assert_eq!(narrow.format_price(250.4), "$250");

        let medium = compute_layout(600, TimeFrame::Daily, 10);
        assert_eq!(medium.format_price(250.4), "$250");

        let wide = compute_layout(1200, TimeFrame::Daily, 10);
        assert_eq!(wide.format_price(250.4), "$250.40");
    }

    #[test]
    fn test_label_tables_per_tier() {
        let narrow = compute_layout(375, TimeFrame::Daily, 10);
        assert_eq!(narrow.tick_font_size, 8);
        assert_eq!(narrow.label_angle, -70);
        assert_eq!(narrow.y_label_offset, -25);

        let wide = compute_layout(1200, TimeFrame::Daily, 10);
        assert_eq!(wide.tick_font_size, 12);
        assert_eq!(wide.label_angle, -45);
        assert_eq!(wide.y_label_offset, -40);
    }

    #[test]
    fn test_cell_conversions() {
        // 80 colonnes = 640 unités : tier medium pour un terminal standard
        assert_eq!(viewport_units(80), 640);
        assert_eq!(ViewportTier::from_width(viewport_units(80)), ViewportTier::Medium);

        let wide = compute_layout(1200, TimeFrame::Daily, 10);
        assert_eq!(wide.height_rows(), 34);
        assert_eq!(wide.horizontal_margin_columns(), (7, 5));
        assert_eq!(wide.vertical_margin_rows(), (1, 5));
    }
}
