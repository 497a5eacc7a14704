// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état de la vue graphique : cycle de vie des requêtes de
// chandelles et sélection de point débouncée
//
// PATTERN : Application State
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// - Les transitions se font sur le thread UI uniquement : elles sont
//   atomiques vis-à-vis de la boucle d'événements
// ============================================================================

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::models::{PricePoint, PriceSeries, TimeFrame};

/// Fenêtre de debounce avant de retenir un point survolé
const SELECT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Délai avant d'effacer la sélection quand le pointeur quitte le graphique
const CLEAR_DELAY: Duration = Duration::from_millis(100);

// ============================================================================
// Enum : FetchState
// ============================================================================
// CONCEPT RUST : Enum pour state machine
// - Idle → Loading → Ready(série) | Failed(message)
// - Un seul état actif par sélection de time-frame
// - Changer de time-frame jette l'état précédent et re-entre en Loading
// ============================================================================

/// État du cycle de vie d'une requête de chandelles
#[derive(Debug, Clone)]
pub enum FetchState {
    /// Aucune requête émise (uniquement avant la première activation)
    Idle,

    /// Requête en vol pour le time-frame actif
    Loading,

    /// Série chargée ; une série vide signale "pas de données",
    /// distinct d'un échec de fetch
    Ready(PriceSeries),

    /// Échec du fetch, message lisible pour l'utilisateur
    Failed(String),
}

impl FetchState {
    /// Vérifie si une requête est en vol
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    /// Retourne la série si l'état est Ready
    pub fn series(&self) -> Option<&PriceSeries> {
        match self {
            FetchState::Ready(series) => Some(series),
            _ => None,
        }
    }
}

// ============================================================================
// SelectionController : sélection de point débouncée
// ============================================================================
// Les événements pointeur arrivent en rafale : on ne retient un point
// qu'après une courte fenêtre de silence, et quitter le graphique
// efface la sélection après un court délai.
//
// CONCEPT : Cancel-before-reschedule
// - Deux timers indépendants, un par usage (sélection / effacement),
//   possédés par l'instance (pas de flag global)
// - Re-planifier écrase (= annule) le timer précédent du même usage,
//   jamais celui de l'autre ; seule exception : quitter le graphique
//   annule aussi la sélection en attente
// - Les échéances sont appliquées par tick(), depuis la boucle
//   d'événements mono-thread
// ============================================================================

/// Mappe les événements d'interaction vers la sélection courante
#[derive(Debug, Default)]
pub struct SelectionController {
    /// Point actuellement sélectionné (None = pas de sélection)
    selected: Option<PricePoint>,

    /// Sélection planifiée et son échéance
    pending_select: Option<(Instant, PricePoint)>,

    /// Échéance de l'effacement planifié
    pending_clear: Option<Instant>,
}

impl SelectionController {
    /// Crée un contrôleur sans sélection ni changement en attente
    pub fn new() -> Self {
        Self::default()
    }

    /// Retourne le point sélectionné
    pub fn selected(&self) -> Option<&PricePoint> {
        self.selected.as_ref()
    }

    /// Planifie la sélection d'un point après la fenêtre de debounce
    ///
    /// Une nouvelle interaction dans la fenêtre annule la précédente :
    /// seule la dernière prend effet. Un effacement déjà planifié
    /// n'est pas touché.
    pub fn on_interact(&mut self, point: PricePoint) {
        self.pending_select = Some((Instant::now() + SELECT_DEBOUNCE, point));
    }

    /// Planifie l'effacement de la sélection (pointeur sorti du graphique)
    ///
    /// Annule d'abord toute sélection en attente
    pub fn on_leave(&mut self) {
        self.pending_select = None;
        self.pending_clear = Some(Instant::now() + CLEAR_DELAY);
    }

    /// Efface la sélection immédiatement (changement de time-frame)
    ///
    /// Synchrone : annule aussi tout changement planifié
    pub fn on_time_frame_change(&mut self) {
        self.selected = None;
        self.pending_select = None;
        self.pending_clear = None;
    }

    /// Applique les changements dont l'échéance est passée
    ///
    /// Appelé à chaque tick de la boucle d'événements. Si les deux
    /// échéances sont passées, elles s'appliquent dans l'ordre de
    /// leurs dates, comme l'auraient fait deux timers réels.
    pub fn tick(&mut self, now: Instant) {
        loop {
            let select_due = self
                .pending_select
                .as_ref()
                .map(|(deadline, _)| *deadline)
                .filter(|deadline| *deadline <= now);
            let clear_due = self.pending_clear.filter(|deadline| *deadline <= now);

            match (select_due, clear_due) {
                (Some(select_at), Some(clear_at)) if clear_at < select_at => self.commit_clear(),
                (Some(_), _) => self.commit_select(),
                (None, Some(_)) => self.commit_clear(),
                (None, None) => break,
            }
        }
    }

    /// Retient la sélection planifiée
    fn commit_select(&mut self) {
        if let Some((_, point)) = self.pending_select.take() {
            debug!(date = %point.display_date, price = point.price, "Point selected");
            self.selected = Some(point);
        }
    }

    /// Applique l'effacement planifié
    fn commit_clear(&mut self) {
        if self.pending_clear.take().is_some() {
            debug!("Selection cleared");
            self.selected = None;
        }
    }
}

// ============================================================================
// App : état principal et machine à états des requêtes
// ============================================================================

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Time-frame actuellement sélectionné
    pub time_frame: TimeFrame,

    /// État de la requête de chandelles pour ce time-frame
    pub fetch_state: FetchState,

    /// Sélection de point débouncée
    pub selection: SelectionController,

    /// Prochain identifiant de requête à attribuer
    next_request_id: u64,

    /// Identifiant de la requête dont le résultat est attendu
    ///
    /// CONCEPT : Supersede stale fetch
    /// - Chaque fetch émis est étiqueté d'un id croissant
    /// - Un résultat dont l'id n'est pas l'id courant est jeté :
    ///   l'état ne reflète que le time-frame demandé en dernier
    current_request: Option<u64>,
}

impl App {
    /// Crée l'état initial : Idle, time-frame par défaut
    pub fn new() -> Self {
        Self {
            running: true,
            time_frame: TimeFrame::default(),
            fetch_state: FetchState::Idle,
            selection: SelectionController::new(),
            next_request_id: 0,
            current_request: None,
        }
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Déclenche une sélection de time-frame (y compris l'activation
    /// initiale avec le time-frame par défaut)
    ///
    /// Entre immédiatement en Loading, efface la sélection de point et
    /// tout changement planifié, puis retourne l'id de requête que le
    /// résultat devra porter pour être accepté
    pub fn request_time_frame(&mut self, time_frame: TimeFrame) -> u64 {
        self.time_frame = time_frame;
        self.fetch_state = FetchState::Loading;
        self.selection.on_time_frame_change();

        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.current_request = Some(request_id);

        info!(time_frame = %time_frame.label(), request_id, "Time frame requested");
        request_id
    }

    /// Applique un résultat de fetch réussi
    ///
    /// Le résultat est jeté s'il ne porte pas l'id de la requête
    /// courante (réponse d'un time-frame remplacé entre-temps)
    pub fn apply_fetch_success(&mut self, request_id: u64, series: PriceSeries) {
        if self.current_request != Some(request_id) {
            debug!(request_id, "Discarding stale fetch success");
            return;
        }

        info!(
            time_frame = %series.time_frame.label(),
            points = series.len(),
            "Series ready"
        );
        self.current_request = None;
        self.fetch_state = FetchState::Ready(series);
    }

    /// Applique un échec de fetch
    ///
    /// Même règle de péremption que pour les succès
    pub fn apply_fetch_failure(&mut self, request_id: u64, message: String) {
        if self.current_request != Some(request_id) {
            debug!(request_id, "Discarding stale fetch failure");
            return;
        }

        info!(request_id, error = %message, "Fetch failed");
        self.current_request = None;
        self.fetch_state = FetchState::Failed(message);
    }

    /// Tick : appelé à chaque itération de la boucle d'événements
    ///
    /// Fait avancer les échéances de la sélection débouncée
    pub fn tick(&mut self) {
        self.selection.tick(Instant::now());
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper : un point de prix de test
    fn point(date: &str, price: f64) -> PricePoint {
        PricePoint {
            display_date: date.to_string(),
            price,
            timestamp: "2024-01-01T00:00:00".to_string(),
        }
    }

    /// Helper : une série de test pour un time-frame
    fn series(time_frame: TimeFrame, prices: &[f64]) -> PriceSeries {
        PriceSeries {
            time_frame,
            points: prices.iter().map(|&p| point("Jan 01 24", p)).collect(),
        }
    }

    #[test]
    fn test_initial_state() {
        let app = App::new();
        assert!(app.is_running());
        assert!(matches!(app.fetch_state, FetchState::Idle));
        assert_eq!(app.time_frame, TimeFrame::Daily);
        assert!(app.selection.selected().is_none());
    }

    #[test]
    fn test_request_enters_loading() {
        let mut app = App::new();
        app.request_time_frame(TimeFrame::Hourly);

        assert!(app.fetch_state.is_loading());
        assert_eq!(app.time_frame, TimeFrame::Hourly);
    }

    #[test]
    fn test_success_enters_ready() {
        let mut app = App::new();
        let id = app.request_time_frame(TimeFrame::Daily);

        app.apply_fetch_success(id, series(TimeFrame::Daily, &[100.0, 101.0]));

        let ready = app.fetch_state.series().expect("état Ready attendu");
        assert_eq!(ready.len(), 2);
    }

    #[test]
    fn test_empty_series_is_ready_not_failed() {
        let mut app = App::new();
        let id = app.request_time_frame(TimeFrame::Weekly);

        app.apply_fetch_success(id, series(TimeFrame::Weekly, &[]));

        // "Pas de données" reste un état Ready, pas un échec
        let ready = app.fetch_state.series().expect("état Ready attendu");
        assert!(ready.is_empty());
    }

    #[test]
    fn test_failure_enters_failed() {
        let mut app = App::new();
        let id = app.request_time_frame(TimeFrame::Daily);

        app.apply_fetch_failure(id, "HTTP 503".to_string());

        assert!(matches!(app.fetch_state, FetchState::Failed(_)));
    }

    #[test]
    fn test_stale_success_is_discarded() {
        let mut app = App::new();

        // A puis B avant que A ne se résolve
        let id_a = app.request_time_frame(TimeFrame::Hourly);
        let id_b = app.request_time_frame(TimeFrame::Weekly);

        // La réponse de A arrive en premier : jetée, on reste en Loading
        app.apply_fetch_success(id_a, series(TimeFrame::Hourly, &[1.0]));
        assert!(app.fetch_state.is_loading());

        // La réponse de B est la seule acceptée
        app.apply_fetch_success(id_b, series(TimeFrame::Weekly, &[2.0]));
        let ready = app.fetch_state.series().expect("état Ready attendu");
        assert_eq!(ready.time_frame, TimeFrame::Weekly);
        assert_eq!(ready.points[0].price, 2.0);
    }

    #[test]
    fn test_stale_success_after_final_state() {
        let mut app = App::new();

        let id_a = app.request_time_frame(TimeFrame::Hourly);
        let id_b = app.request_time_frame(TimeFrame::Weekly);

        // B se résout d'abord, puis la réponse périmée de A arrive
        app.apply_fetch_success(id_b, series(TimeFrame::Weekly, &[2.0]));
        app.apply_fetch_success(id_a, series(TimeFrame::Hourly, &[1.0]));

        // L'état reflète toujours B, jamais A
        let ready = app.fetch_state.series().expect("état Ready attendu");
        assert_eq!(ready.time_frame, TimeFrame::Weekly);
    }

    #[test]
    fn test_stale_failure_is_discarded() {
        let mut app = App::new();

        let id_a = app.request_time_frame(TimeFrame::Hourly);
        let id_b = app.request_time_frame(TimeFrame::Daily);

        app.apply_fetch_failure(id_a, "timeout".to_string());
        assert!(app.fetch_state.is_loading());

        app.apply_fetch_success(id_b, series(TimeFrame::Daily, &[3.0]));
        assert!(app.fetch_state.series().is_some());
    }

    #[test]
    fn test_same_time_frame_reselected_discards_first_response() {
        let mut app = App::new();

        // Deux requêtes pour le même time-frame : l'id départage
        let id_1 = app.request_time_frame(TimeFrame::Daily);
        let id_2 = app.request_time_frame(TimeFrame::Daily);

        app.apply_fetch_success(id_1, series(TimeFrame::Daily, &[1.0]));
        assert!(app.fetch_state.is_loading());

        app.apply_fetch_success(id_2, series(TimeFrame::Daily, &[2.0]));
        let ready = app.fetch_state.series().expect("état Ready attendu");
        assert_eq!(ready.points[0].price, 2.0);
    }

    #[test]
    fn test_request_clears_selection() {
        let mut app = App::new();

        app.selection.on_interact(point("Jan 01 24", 100.0));
        app.selection.tick(Instant::now() + Duration::from_millis(60));
        assert!(app.selection.selected().is_some());

        // Changer de time-frame efface la sélection, synchrone
        app.request_time_frame(TimeFrame::Monthly);
        assert!(app.selection.selected().is_none());
    }

    // ========================================================================
    // SelectionController
    // ========================================================================

    #[test]
    fn test_selection_commits_after_debounce() {
        let mut ctrl = SelectionController::new();
        ctrl.on_interact(point("Jan 01 24", 100.0));

        // Pas encore d'échéance : rien n'est retenu
        ctrl.tick(Instant::now());
        assert!(ctrl.selected().is_none());

        // Échéance passée : le point est retenu
        ctrl.tick(Instant::now() + Duration::from_millis(60));
        assert_eq!(ctrl.selected().unwrap().price, 100.0);
    }

    #[test]
    fn test_second_interact_wins_within_window() {
        let mut ctrl = SelectionController::new();

        ctrl.on_interact(point("Jan 01 24", 100.0));
        ctrl.on_interact(point("Jan 02 24", 200.0));

        ctrl.tick(Instant::now() + Duration::from_millis(60));
        assert_eq!(ctrl.selected().unwrap().price, 200.0);
    }

    #[test]
    fn test_leave_clears_after_delay() {
        let mut ctrl = SelectionController::new();

        ctrl.on_interact(point("Jan 01 24", 100.0));
        ctrl.tick(Instant::now() + Duration::from_millis(60));
        assert!(ctrl.selected().is_some());

        ctrl.on_leave();
        // Avant l'échéance : toujours sélectionné
        ctrl.tick(Instant::now());
        assert!(ctrl.selected().is_some());

        ctrl.tick(Instant::now() + Duration::from_millis(110));
        assert!(ctrl.selected().is_none());
    }

    #[test]
    fn test_leave_cancels_pending_interact() {
        let mut ctrl = SelectionController::new();

        // onLeave après onInteract : la sélection finale est None
        ctrl.on_interact(point("Jan 01 24", 100.0));
        ctrl.on_leave();

        ctrl.tick(Instant::now() + Duration::from_millis(200));
        assert!(ctrl.selected().is_none());
    }

    #[test]
    fn test_interact_does_not_cancel_pending_clear() {
        let mut ctrl = SelectionController::new();

        // Les deux timers sont indépendants : interagir pendant qu'un
        // effacement est planifié ne l'annule pas. La sélection prend
        // effet à son échéance, puis l'effacement à la sienne.
        ctrl.on_leave();
        ctrl.on_interact(point("Jan 01 24", 100.0));

        ctrl.tick(Instant::now() + Duration::from_millis(200));
        assert!(ctrl.selected().is_none());
    }

    #[test]
    fn test_time_frame_change_cancels_pending() {
        let mut ctrl = SelectionController::new();

        ctrl.on_interact(point("Jan 01 24", 100.0));
        ctrl.on_time_frame_change();

        // Le changement planifié a été annulé avec la sélection
        ctrl.tick(Instant::now() + Duration::from_millis(200));
        assert!(ctrl.selected().is_none());
    }
}
