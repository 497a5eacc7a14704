// ============================================================================
// Enum : TimeFrame
// ============================================================================
// Granularité d'échantillonnage des chandelles demandées au service
// de cotation (horaire, journalier, hebdomadaire, mensuel)
//
// CONCEPT : TimeFrame = segment d'URL
// - Chaque variant correspond à un segment de chemin de l'API
// - L'ensemble est fixe et ordonné, défini une fois au démarrage
// ============================================================================

use serde::{Deserialize, Serialize};

/// Granularité des chandelles demandées
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFrame {
    /// Une chandelle par heure
    Hourly,
    /// Une chandelle par jour
    Daily,
    /// Une chandelle par semaine
    Weekly,
    /// Une chandelle par mois
    Monthly,
}

impl TimeFrame {
    /// Retourne le label lisible pour l'affichage
    pub fn label(&self) -> &'static str {
        match self {
            TimeFrame::Hourly => "Hourly",
            TimeFrame::Daily => "Daily",
            TimeFrame::Weekly => "Weekly",
            TimeFrame::Monthly => "Monthly",
        }
    }

    /// Convertit le time-frame en segment de chemin pour l'API
    ///
    /// CONCEPT RUST : &'static str
    /// - String littérale dans le binaire, pas d'allocation
    pub fn path_segment(&self) -> &'static str {
        match self {
            TimeFrame::Hourly => "hourly",
            TimeFrame::Daily => "daily",
            TimeFrame::Weekly => "weekly",
            TimeFrame::Monthly => "monthly",
        }
    }

    /// Retourne tous les time-frames dans l'ordre (pour la ligne de sélection)
    pub fn all() -> [TimeFrame; 4] {
        [
            TimeFrame::Hourly,
            TimeFrame::Daily,
            TimeFrame::Weekly,
            TimeFrame::Monthly,
        ]
    }

    /// Retourne le time-frame suivant (cycle)
    ///
    /// Hourly → Daily → Weekly → Monthly → Hourly
    pub fn next(&self) -> TimeFrame {
        match self {
            TimeFrame::Hourly => TimeFrame::Daily,
            TimeFrame::Daily => TimeFrame::Weekly,
            TimeFrame::Weekly => TimeFrame::Monthly,
            TimeFrame::Monthly => TimeFrame::Hourly, // Boucle
        }
    }

    /// Retourne le time-frame précédent (cycle inverse)
    pub fn previous(&self) -> TimeFrame {
        match self {
            TimeFrame::Hourly => TimeFrame::Monthly, // Boucle
            TimeFrame::Daily => TimeFrame::Hourly,
            TimeFrame::Weekly => TimeFrame::Daily,
            TimeFrame::Monthly => TimeFrame::Weekly,
        }
    }

    /// Sélection directe par chiffre ('1' à '4', ordre d'affichage)
    pub fn from_digit(c: char) -> Option<TimeFrame> {
        match c {
            '1' => Some(TimeFrame::Hourly),
            '2' => Some(TimeFrame::Daily),
            '3' => Some(TimeFrame::Weekly),
            '4' => Some(TimeFrame::Monthly),
            _ => None,
        }
    }
}

impl Default for TimeFrame {
    /// Time-frame par défaut à l'ouverture : journalier
    fn default() -> Self {
        TimeFrame::Daily
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segments() {
        assert_eq!(TimeFrame::Hourly.path_segment(), "hourly");
        assert_eq!(TimeFrame::Daily.path_segment(), "daily");
        assert_eq!(TimeFrame::Weekly.path_segment(), "weekly");
        assert_eq!(TimeFrame::Monthly.path_segment(), "monthly");
    }

    #[test]
    fn test_labels() {
        assert_eq!(TimeFrame::Hourly.label(), "Hourly");
        assert_eq!(TimeFrame::Monthly.label(), "Monthly");
    }

    #[test]
    fn test_cycle() {
        assert_eq!(TimeFrame::Hourly.next(), TimeFrame::Daily);
        assert_eq!(TimeFrame::Monthly.next(), TimeFrame::Hourly); // Boucle
        assert_eq!(TimeFrame::Hourly.previous(), TimeFrame::Monthly);
        assert_eq!(TimeFrame::Daily.previous(), TimeFrame::Hourly);
    }

    #[test]
    fn test_default_is_daily() {
        assert_eq!(TimeFrame::default(), TimeFrame::Daily);
    }

    #[test]
    fn test_from_digit() {
        assert_eq!(TimeFrame::from_digit('1'), Some(TimeFrame::Hourly));
        assert_eq!(TimeFrame::from_digit('4'), Some(TimeFrame::Monthly));
        assert_eq!(TimeFrame::from_digit('5'), None);
        assert_eq!(TimeFrame::from_digit('a'), None);
    }

    #[test]
    fn test_all_ordered() {
        let all = TimeFrame::all();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0], TimeFrame::Hourly);
        assert_eq!(all[3], TimeFrame::Monthly);
    }
}
