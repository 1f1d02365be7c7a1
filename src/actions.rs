use crossterm::event::KeyEvent;

use crate::api::WorkoutStatus;

/// Actions that can be dispatched through the application
#[derive(Debug, Clone)]
pub enum Action {
    /// A key was pressed
    KeyPress(KeyEvent),
    /// The user picked an exercise from the list
    ExerciseSelected(String),
    /// The user asked to start a session
    StartRequested,
    /// The user asked to stop the session
    StopRequested,
    /// A status poll came back
    StatusUpdated(WorkoutStatus),
    /// A status poll failed
    PollFailed(String),
    /// Request to quit the application
    Quit,
}
