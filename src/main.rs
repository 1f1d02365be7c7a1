use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

use workout_console::actions::Action;
use workout_console::api::WorkoutApi;
use workout_console::app::App;
use workout_console::session::SessionController;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Create event channel
    let (tx, mut rx) = mpsc::unbounded_channel::<Action>();

    // Initialize terminal
    let mut terminal = ratatui::init();

    // Spawn input handler
    let input_tx = tx.clone();
    tokio::spawn(async move {
        loop {
            if event::poll(Duration::from_millis(100)).unwrap_or(false) {
                if let Ok(evt) = event::read() {
                    if let Event::Key(key) = evt {
                        if key.kind == KeyEventKind::Press {
                            let _ = input_tx.send(Action::KeyPress(key));
                        }
                    }
                }
            }
        }
    });

    // The controller owns the session phase and the poll task; poll
    // results come back through the same channel as key presses.
    let mut controller = SessionController::new(WorkoutApi::from_env(), tx.clone());

    // Create app state
    let mut app = App::new();

    // Main event loop
    let result = loop {
        // Render
        terminal.draw(|f| app.render(f))?;

        // Process any pending actions from the app
        for pending in app.take_pending_actions() {
            match pending {
                Action::ExerciseSelected(exercise) => controller.select_exercise(exercise),
                Action::StartRequested => {
                    let sets = app.sets_input.clone();
                    let reps = app.reps_input.clone();
                    controller.start(&sets, &reps, &mut app).await;
                }
                Action::StopRequested => controller.stop(&mut app).await,
                _ => {}
            }
        }

        // Handle events from channel
        tokio::select! {
            Some(action) = rx.recv() => {
                match action {
                    Action::StatusUpdated(status) => controller.apply_status(&status, &mut app),
                    Action::PollFailed(err) => warn!("status poll failed: {err}"),
                    other => match app.handle_action(other) {
                        Ok(should_quit) => {
                            if should_quit {
                                break Ok(());
                            }
                        }
                        Err(e) => {
                            break Err(e);
                        }
                    },
                }
            }
        }
    };

    // Restore terminal
    ratatui::restore();
    result
}
