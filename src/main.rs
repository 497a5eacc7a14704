// ============================================================================
// LazyChart - Visualiseur de cours TSLA dans le terminal
// ============================================================================
// Programme TUI qui charge les chandelles historiques depuis le service
// stockscan et affiche un graphique ligne interactif : changement de
// time-frame au clavier, sélection de point à la souris
//
// ARCHITECTURE :
// - Thread UI : boucle render → input → update (mono-thread, tick 250ms)
// - Worker thread : runtime tokio, exécute fetch + normalisation
// - Communication par channels mpsc (commandes / résultats)
// - L'état (App) appartient au seul thread UI : les transitions sont
//   atomiques vis-à-vis de la boucle d'événements
// ============================================================================

use std::io;
use std::sync::mpsc;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, MouseButton, MouseEvent, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::{debug, error, info};

use lazychart::api::{fetch_candles, SYMBOL};
use lazychart::app::App;
use lazychart::models::{PriceSeries, TimeFrame};
use lazychart::ui::{self, events::EventHandler, render};

// ============================================================================
// AppCommand / AppResult : communication avec le worker thread
// ============================================================================
// CONCEPT : Command pattern avec channels
// - L'event loop envoie des commandes au worker thread
// - Le worker exécute le pipeline async (fetch + normalisation)
// - Chaque commande porte l'id de requête attribué par la machine à
//   états ; le résultat le restitue tel quel pour que les réponses
//   périmées soient jetées à l'arrivée
// ============================================================================

/// Commandes envoyées au worker thread
#[derive(Debug, Clone)]
enum AppCommand {
    /// Charger les chandelles pour un time-frame
    FetchCandles {
        time_frame: TimeFrame,
        request_id: u64,
    },
}

/// Résultats renvoyés par le worker thread
#[derive(Debug)]
enum AppResult {
    /// Série normalisée, prête à tracer (éventuellement vide)
    CandlesLoaded { request_id: u64, series: PriceSeries },

    /// Échec du fetch, message lisible
    FetchFailed {
        request_id: u64,
        time_frame: TimeFrame,
        error: String,
    },
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// Les println! sont inutilisables une fois le TUI lancé : on log vers
// un fichier avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans le répertoire de données de la plateforme
/// (ex: ~/.local/share/lazychart/logs sur Linux), ./logs en repli
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/lazychart/logs/lazychart.log
/// RUST_LOG=lazychart=trace cargo run
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = dirs::data_local_dir()
        .map(|dir| dir.join("lazychart").join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("./logs"));

    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "lazychart.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazychart=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    // Logging d'abord : si l'init échoue, on continue sans logs
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
    });

    info!("LazyChart starting up");

    // Channels de communication avec le worker
    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_background_worker(command_rx, result_tx);

    // Setup du terminal en mode TUI
    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let mut app = App::new();

    // Activation initiale : sélection du time-frame par défaut
    dispatch_fetch(&mut app, TimeFrame::default(), &command_tx);

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &command_tx, &result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Background Worker Thread
// ============================================================================
// Thread séparé qui exécute le pipeline fetch + normalisation sans
// bloquer l'UI. Il ne touche jamais à l'état : il calcule et renvoie.
// ============================================================================

/// Worker thread qui exécute les fetches en arrière-plan
fn spawn_background_worker(
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
) {
    std::thread::spawn(move || {
        // Runtime tokio propre à ce thread
        let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");

        loop {
            match command_rx.recv() {
                Ok(AppCommand::FetchCandles {
                    time_frame,
                    request_id,
                }) => {
                    info!(time_frame = %time_frame.label(), request_id, "Worker fetching candles");

                    // block_on bloque le worker, jamais l'UI
                    let result = runtime.block_on(fetch_candles(SYMBOL, time_frame));

                    match result {
                        Ok(raw) => {
                            let series = PriceSeries::from_raw(time_frame, &raw);
                            info!(
                                time_frame = %time_frame.label(),
                                raw = raw.len(),
                                points = series.len(),
                                "Candles normalized"
                            );
                            let _ = result_tx.send(AppResult::CandlesLoaded { request_id, series });
                        }
                        Err(e) => {
                            error!(time_frame = %time_frame.label(), error = %e, "Fetch failed");
                            let _ = result_tx.send(AppResult::FetchFailed {
                                request_id,
                                time_frame,
                                error: e.to_string(),
                            });
                        }
                    }
                }
                Err(_) => {
                    info!("Worker thread exiting (channel closed)");
                    break;
                }
            }
        }
    });
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// Loop : résultats du worker → render → input → update
// ============================================================================

/// Exécute la boucle principale de l'application
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    command_tx: &mpsc::Sender<AppCommand>,
    result_rx: &mpsc::Receiver<AppResult>,
) -> Result<()> {
    loop {
        if !app.is_running() {
            break;
        }

        // ========================================
        // 0. RÉSULTATS : traite les réponses du worker
        // ========================================
        // try_recv ne bloque pas ; les réponses périmées sont jetées
        // par la machine à états (id de requête)
        match result_rx.try_recv() {
            Ok(AppResult::CandlesLoaded { request_id, series }) => {
                app.apply_fetch_success(request_id, series);
            }
            Ok(AppResult::FetchFailed {
                request_id,
                time_frame,
                error,
            }) => {
                error!(time_frame = %time_frame.label(), error = %error, "Applying fetch failure");
                app.apply_fetch_failure(request_id, error);
            }
            Err(mpsc::TryRecvError::Empty) => {
                // Pas de résultat, c'est normal
            }
            Err(mpsc::TryRecvError::Disconnected) => {
                error!("Worker thread disconnected!");
            }
        }

        // ========================================
        // 1. RENDER : dessine l'interface
        // ========================================
        terminal.draw(|frame| render(frame, app))?;

        // ========================================
        // 2. INPUT : traite les événements
        // ========================================
        let viewport = terminal.size()?;
        if let Ok(event) = events.next() {
            handle_event(app, event, command_tx, viewport);
        }

        // ========================================
        // 3. UPDATE : fait avancer les échéances
        // ========================================
        app.tick();
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Déclenche une sélection de time-frame et sa commande de fetch
fn dispatch_fetch(app: &mut App, time_frame: TimeFrame, command_tx: &mpsc::Sender<AppCommand>) {
    let request_id = app.request_time_frame(time_frame);
    let _ = command_tx.send(AppCommand::FetchCandles {
        time_frame,
        request_id,
    });
}

/// Traite un événement et met à jour l'état de l'application
fn handle_event(
    app: &mut App,
    event: ui::Event,
    command_tx: &mpsc::Sender<AppCommand>,
    viewport: Rect,
) {
    use lazychart::ui::events::{
        get_digit_from_event, is_next_time_frame_event, is_previous_time_frame_event,
        is_quit_event, is_reload_event, Event,
    };

    match event {
        Event::Key(_) if is_quit_event(&event) => {
            info!("User requested quit");
            app.quit();
        }

        // 'l' / → : time-frame suivant
        Event::Key(_) if is_next_time_frame_event(&event) => {
            dispatch_fetch(app, app.time_frame.next(), command_tx);
        }

        // 'h' / ← : time-frame précédent
        Event::Key(_) if is_previous_time_frame_event(&event) => {
            dispatch_fetch(app, app.time_frame.previous(), command_tx);
        }

        // 'r' : re-déclenche le time-frame courant (seul "retry" prévu)
        Event::Key(_) if is_reload_event(&event) => {
            dispatch_fetch(app, app.time_frame, command_tx);
        }

        // '1'-'4' : sélection directe
        Event::Key(_) => {
            if let Some(c) = get_digit_from_event(&event) {
                if let Some(time_frame) = TimeFrame::from_digit(c) {
                    dispatch_fetch(app, time_frame, command_tx);
                }
            }
        }

        Event::Mouse(mouse) => {
            handle_mouse(app, mouse, viewport);
        }

        Event::Tick => {
            // Tick régulier : les échéances avancent via app.tick()
        }
    }
}

/// Route un événement souris vers le contrôleur de sélection
///
/// Un déplacement ou clic sur la zone de tracé planifie la sélection
/// du point le plus proche ; en dehors, l'effacement de la sélection
fn handle_mouse(app: &mut App, mouse: MouseEvent, viewport: Rect) {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Down(MouseButton::Left) => {
            let panel = ui::screen_chunks(viewport)[2];

            let point = ui::chart::plot_area(app, panel).and_then(|plot| {
                app.fetch_state
                    .series()
                    .and_then(|series| ui::chart::point_at(series, plot, mouse.column, mouse.row))
            });

            match point {
                Some(point) => app.selection.on_interact(point),
                None => app.selection.on_leave(),
            }
        }
        _ => {}
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture // La sélection de point passe par la souris
    )?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    terminal.show_cursor()?;

    Ok(())
}
