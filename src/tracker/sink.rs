use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::GeographicPosition;

/// Output of one tick.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Frame {
    pub time: DateTime<Utc>,
    pub positions: Vec<GeographicPosition>,
}

/// Consumer of per-tick positions.
pub trait RenderSink: Send {
    fn render(&mut self, frame: &Frame);
}

/// Writes every frame to the log.
#[derive(Debug, Default)]
pub struct LogSink;

impl RenderSink for LogSink {
    fn render(&mut self, frame: &Frame) {
        log::info!("{} ({} objects)", frame.time, frame.positions.len());
        for p in &frame.positions {
            log::info!(
                "  {} ({}): lat {:8.3} lon {:9.3} alt {:.4}",
                p.name,
                p.id,
                p.latitude_deg,
                p.longitude_deg,
                p.altitude_fraction
            );
        }
    }
}

/// Keeps the most recent frame for readers outside the tick loop.
#[derive(Debug, Clone, Default)]
pub struct LatestFrame(Arc<RwLock<Option<Frame>>>);

impl LatestFrame {
    pub fn get(&self) -> Option<Frame> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RenderSink for LatestFrame {
    fn render(&mut self, frame: &Frame) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = Some(frame.clone());
    }
}

impl<F: FnMut(&Frame) + Send> RenderSink for F {
    fn render(&mut self, frame: &Frame) {
        self(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_frame_is_shared_between_clones() {
        let reader = LatestFrame::default();
        let mut writer = reader.clone();
        assert!(reader.get().is_none());

        let time = Utc::now();
        writer.render(&Frame {
            time,
            positions: Vec::new(),
        });

        assert_eq!(reader.get().map(|f| f.time), Some(time));
    }
}
