use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::tracking::{AddRequest, ClockResponse, RemoveResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::tracking::add_tracked,
        super::api::tracking::remove_tracked,
        super::api::tracking::list_tracked,
        super::api::tracking::clock,
        super::api::tracking::positions,
    ),
    components(
        schemas(
            AddRequest,
            RemoveResponse,
            ClockResponse,
            ErrorResponse,
            crate::tracker::TrackedSummary,
            crate::tracker::Frame,
            crate::predict::GeographicPosition,
        )
    ),
    info(
        title = "satwatch API",
        description = "Live satellite tracking: manage tracked satellites and read their positions",
        version = "0.1.0"
    ),
    tags(
        (name = "tracking", description = "Tracked satellites, simulated clock and positions")
    )
)]
pub struct ApiDoc;
