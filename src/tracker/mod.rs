mod clock;
mod controller;
mod error;
mod pipeline;
mod registry;
mod sink;
mod ticker;
mod types;

pub use clock::{SimulatedClock, MAX_STEP};
pub use controller::{lock, shared_registry, SharedRegistry, TrackingController};
pub use error::TrackerError;
pub use pipeline::PositionPipeline;
pub use registry::TrackedObjectRegistry;
pub use sink::{Frame, LatestFrame, LogSink, RenderSink};
pub use ticker::{Ticker, TickerHandle};
pub use types::{TrackedObject, TrackedSummary};
