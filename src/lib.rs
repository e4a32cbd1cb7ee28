pub mod app;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod panels;
pub mod state;
pub mod timer;
pub mod ui;

pub use app::router;
pub use state::{AppState, Session};
pub use timer::{CountdownTimer, Phase};
