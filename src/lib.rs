pub mod actions;
pub mod api;
pub mod app;
pub mod session;

pub use api::WorkoutApi;
pub use session::SessionController;
