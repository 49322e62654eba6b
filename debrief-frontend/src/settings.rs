use std::path::PathBuf;

use debrief_history::fetch::DEFAULT_CHUNK_SIZE;

use crate::form::PostcallForm;

#[derive(Debug)]
pub struct Settings {
    pub action_id: Option<String>,
    pub action_url: Option<String>,
    pub api_token: Option<String>,
    pub api_url: Option<String>,
    pub chunk_size: usize,
    pub form: PostcallForm,
    pub record_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            action_id: None,
            action_url: None,
            api_token: None,
            api_url: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            form: PostcallForm::default(),
            record_path: None,
        }
    }
}
