pub mod app;
pub mod errors;
pub mod form;
pub mod gesture;
pub mod grid;
pub mod handlers;
pub mod models;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use state::AppState;
pub use storage::resolve_submissions_path;
