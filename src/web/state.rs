use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;

use crate::fetch::ElementSource;
use crate::tracker::{LatestFrame, TrackingController};

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<TrackingController<ElementSource>>,
    pub clock: watch::Receiver<DateTime<Utc>>,
    pub latest: LatestFrame,
}
