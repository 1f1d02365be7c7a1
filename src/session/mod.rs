use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::actions::Action;
use crate::api::{StartRequest, WorkoutApi, WorkoutStatus};

/// Label shown while no session is active
pub const STANDBY_LABEL: &str = "STANDBY";

/// Period between status polls while a session is running
pub const POLL_PERIOD: Duration = Duration::from_millis(1000);

/// Rendering surface the controller drives. Keeps the session logic
/// independent of the terminal.
pub trait UiSink {
    fn set_exercise_label(&mut self, label: &str);
    fn set_set_counter(&mut self, current: u32, total: u32);
    fn set_rep_counter(&mut self, current: u32, goal: u32);
    fn set_controls_enabled(&mut self, start: bool, stop: bool);
    fn alert(&mut self, message: &str);
}

/// Lifecycle of the tracked session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Standby,
    Running,
}

/// Owns the selected exercise, the session phase, and the poll task.
/// All mutation goes through `start`, `stop`, `apply_status`,
/// `poll_once` and `reset_to_standby`.
pub struct SessionController {
    api: WorkoutApi,
    events: UnboundedSender<Action>,
    phase: SessionPhase,
    selected_exercise: Option<String>,
    poll_task: Option<JoinHandle<()>>,
    poll_period: Duration,
}

impl SessionController {
    pub fn new(api: WorkoutApi, events: UnboundedSender<Action>) -> Self {
        Self {
            api,
            events,
            phase: SessionPhase::Standby,
            selected_exercise: None,
            poll_task: None,
            poll_period: POLL_PERIOD,
        }
    }

    /// Override the poll period (tests run on a tighter clock)
    pub fn with_poll_period(mut self, period: Duration) -> Self {
        self.poll_period = period;
        self
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Whether a poll loop is currently scheduled
    pub fn is_polling(&self) -> bool {
        self.poll_task.is_some()
    }

    pub fn selected_exercise(&self) -> Option<&str> {
        self.selected_exercise.as_deref()
    }

    /// Record the user's choice. Survives stop and reset; only the next
    /// selection overwrites it.
    pub fn select_exercise(&mut self, exercise: impl Into<String>) {
        self.selected_exercise = Some(exercise.into());
    }

    /// Validate the inputs, ask the backend to start a session, and on
    /// success enter the running phase and begin polling. Every failure
    /// path alerts and leaves the phase untouched.
    pub async fn start(&mut self, sets_field: &str, reps_field: &str, ui: &mut dyn UiSink) {
        if self.phase == SessionPhase::Running {
            return;
        }

        let Some(exercise) = self.selected_exercise.clone() else {
            ui.alert("Select an exercise first!");
            return;
        };
        let Some((sets, reps)) = parse_goal(sets_field, reps_field) else {
            ui.alert("Sets and reps must be whole numbers of at least 1.");
            return;
        };

        let request = StartRequest {
            exercise_type: exercise.clone(),
            sets,
            reps,
        };
        match self.api.start_exercise(&request).await {
            Ok(ack) if ack.success => {
                self.phase = SessionPhase::Running;
                ui.set_controls_enabled(false, true);
                ui.set_exercise_label(&display_label(&exercise));
                ui.set_set_counter(1, sets);
                ui.set_rep_counter(0, reps);
                self.spawn_poller();
            }
            Ok(ack) => {
                let message = ack.error.unwrap_or_else(|| "unknown error".to_string());
                error!("exercise start failed: {message}");
                ui.alert(&format!("Failed to start exercise: {message}"));
            }
            Err(err) => {
                error!("start request error: {err}");
                ui.alert(&format!("Error: {err}"));
            }
        }
    }

    /// Request a stop. A failed stop leaves the UI running on purpose:
    /// the poller will still reset it once the server reports the session
    /// ended.
    pub async fn stop(&mut self, ui: &mut dyn UiSink) {
        match self.api.stop_exercise().await {
            Ok(ack) if ack.success => self.reset_to_standby(ui),
            Ok(ack) => warn!("stop not acknowledged: {:?}", ack.error),
            Err(err) => error!("stop request error: {err}"),
        }
    }

    /// Fold one status report into the UI. A report of an ended session
    /// while we still think we are running is the completion signal.
    pub fn apply_status(&mut self, status: &WorkoutStatus, ui: &mut dyn UiSink) {
        if !status.exercise_running && self.phase == SessionPhase::Running {
            self.reset_to_standby(ui);
            return;
        }

        ui.set_set_counter(status.current_set, status.total_sets);
        ui.set_rep_counter(status.current_reps, status.rep_goal);
    }

    /// Run one status request immediately, outside the timer. Poll
    /// failures are logged and never alerted.
    pub async fn poll_once(&mut self, ui: &mut dyn UiSink) {
        match self.api.get_status().await {
            Ok(status) => self.apply_status(&status, ui),
            Err(err) => debug!("status check failed: {err}"),
        }
    }

    /// Idempotent return to the idle UI
    pub fn reset_to_standby(&mut self, ui: &mut dyn UiSink) {
        self.phase = SessionPhase::Standby;
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }

        ui.set_controls_enabled(true, false);
        ui.set_exercise_label(STANDBY_LABEL);
        ui.set_set_counter(0, 0);
        ui.set_rep_counter(0, 0);
    }

    fn spawn_poller(&mut self) {
        let api = self.api.clone();
        let events = self.events.clone();
        let period = self.poll_period;
        self.poll_task = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                let action = match api.get_status().await {
                    Ok(status) => Action::StatusUpdated(status),
                    Err(err) => {
                        // Poll failures stay quiet to avoid alert spam
                        debug!("status check failed: {err}");
                        Action::PollFailed(err.to_string())
                    }
                };
                if events.send(action).is_err() {
                    break;
                }
            }
        }));
    }
}

fn parse_goal(sets: &str, reps: &str) -> Option<(u32, u32)> {
    let sets = sets.trim().parse::<u32>().ok()?;
    let reps = reps.trim().parse::<u32>().ok()?;
    if sets < 1 || reps < 1 {
        return None;
    }
    Some((sets, reps))
}

/// Turn an exercise identifier like "jumping_jacks.exe" into the display
/// form "JUMPING JACKS".
pub fn display_label(exercise: &str) -> String {
    let label = exercise.replace('_', " ").to_uppercase();
    match label.strip_suffix(".EXE") {
        Some(stripped) => stripped.to_string(),
        None => label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[derive(Default)]
    struct FakeSink {
        ops: Vec<String>,
        alerts: Vec<String>,
    }

    impl UiSink for FakeSink {
        fn set_exercise_label(&mut self, label: &str) {
            self.ops.push(format!("label={label}"));
        }

        fn set_set_counter(&mut self, current: u32, total: u32) {
            self.ops.push(format!("set={current} / {total}"));
        }

        fn set_rep_counter(&mut self, current: u32, goal: u32) {
            self.ops.push(format!("rep={current} / {goal}"));
        }

        fn set_controls_enabled(&mut self, start: bool, stop: bool) {
            self.ops.push(format!("controls={start},{stop}"));
        }

        fn alert(&mut self, message: &str) {
            self.alerts.push(message.to_string());
        }
    }

    fn controller() -> SessionController {
        let (tx, _rx) = unbounded_channel();
        // The receiver is dropped; these tests never reach the poller.
        SessionController::new(WorkoutApi::new("http://127.0.0.1:9"), tx)
    }

    #[test]
    fn test_parse_goal_rejects_bad_input() {
        assert_eq!(parse_goal("3", "10"), Some((3, 10)));
        assert_eq!(parse_goal(" 3 ", " 10 "), Some((3, 10)));
        assert_eq!(parse_goal("0", "10"), None);
        assert_eq!(parse_goal("3", "0"), None);
        assert_eq!(parse_goal("-1", "10"), None);
        assert_eq!(parse_goal("three", "10"), None);
        assert_eq!(parse_goal("3.5", "10"), None);
        assert_eq!(parse_goal("", ""), None);
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("squats.exe"), "SQUATS");
        assert_eq!(display_label("jumping_jacks.exe"), "JUMPING JACKS");
        assert_eq!(display_label("squats"), "SQUATS");
    }

    #[tokio::test]
    async fn test_start_without_selection_alerts_and_sends_nothing() {
        let mut controller = controller();
        let mut sink = FakeSink::default();

        controller.start("3", "10", &mut sink).await;

        assert_eq!(controller.phase(), SessionPhase::Standby);
        assert!(!controller.is_polling());
        assert_eq!(sink.alerts, vec!["Select an exercise first!"]);
        assert!(sink.ops.is_empty());
    }

    #[tokio::test]
    async fn test_start_with_invalid_goal_alerts_and_sends_nothing() {
        let mut controller = controller();
        controller.select_exercise("squats.exe");
        let mut sink = FakeSink::default();

        for (sets, reps) in [("0", "10"), ("3", "x"), ("", "10")] {
            controller.start(sets, reps, &mut sink).await;
        }

        assert_eq!(controller.phase(), SessionPhase::Standby);
        assert!(!controller.is_polling());
        assert_eq!(sink.alerts.len(), 3);
        assert!(sink.ops.is_empty());
    }

    #[test]
    fn test_selection_survives_reset() {
        let mut controller = controller();
        let mut sink = FakeSink::default();

        controller.select_exercise("plank.exe");
        controller.reset_to_standby(&mut sink);

        assert_eq!(controller.selected_exercise(), Some("plank.exe"));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut controller = controller();
        let mut sink = FakeSink::default();

        controller.reset_to_standby(&mut sink);
        let first = sink.ops.clone();
        sink.ops.clear();
        controller.reset_to_standby(&mut sink);

        assert_eq!(sink.ops, first);
        assert_eq!(controller.phase(), SessionPhase::Standby);
        assert!(!controller.is_polling());
    }

    #[test]
    fn test_status_while_running_updates_counters() {
        let mut controller = controller();
        controller.phase = SessionPhase::Running;
        let mut sink = FakeSink::default();

        let status = WorkoutStatus {
            exercise_running: true,
            current_set: 2,
            total_sets: 3,
            current_reps: 5,
            rep_goal: 10,
        };
        controller.apply_status(&status, &mut sink);

        assert_eq!(controller.phase(), SessionPhase::Running);
        assert_eq!(sink.ops, vec!["set=2 / 3", "rep=5 / 10"]);
    }

    #[test]
    fn test_status_ended_resets_ui() {
        let mut controller = controller();
        controller.phase = SessionPhase::Running;
        let mut sink = FakeSink::default();

        let status = WorkoutStatus {
            exercise_running: false,
            current_set: 0,
            total_sets: 0,
            current_reps: 0,
            rep_goal: 0,
        };
        controller.apply_status(&status, &mut sink);

        assert_eq!(controller.phase(), SessionPhase::Standby);
        assert_eq!(
            sink.ops,
            vec!["controls=true,false", "label=STANDBY", "set=0 / 0", "rep=0 / 0"]
        );
    }
}
