mod delivery;
mod lifecycle;
mod place;
mod position;

pub use delivery::{
    Coordinate, DeliveryRequest, DeliveryResult, LocationsSummary, FALLBACK_LATITUDE,
    FALLBACK_LONGITUDE,
};
pub use lifecycle::{HostLifecycle, SchedulerState};
pub use place::PlaceRecord;
pub use position::{AccuracyTier, AcquireOptions, PositionSample};
