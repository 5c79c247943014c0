use crate::models::Session;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub submissions_path: PathBuf,
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(submissions_path: PathBuf) -> Self {
        Self {
            submissions_path,
            session: Arc::new(Mutex::new(Session::new())),
        }
    }
}
