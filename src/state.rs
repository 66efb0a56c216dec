use std::sync::Arc;

use crate::captions::CaptionsApi;

pub struct AppState {
    pub captions: Arc<dyn CaptionsApi>,
}
