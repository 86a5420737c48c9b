pub use allocate::{allocate, GreenTimes, Intersection, IntersectionItem, SignalPlan, GREEN_TIME_SMOOTHING};
pub use car::CarPath;
pub use config::{ConfigError, Options};
pub use decode::{decode, decode_file, LookupError, ParseError};
pub use demand::{compute_street_weights, street_weights, street_weights_normalized, DemandOptions, StreetWeights, Weighting};
pub use encode::{decode_plan, encode, PlanParseError};
pub use pipeline::{process_file, TaskError, TaskLog, TaskSummary};
pub use scan::ScanError;
pub use simulation::Simulation;
use slotmap::{new_key_type, SlotMap};
pub use street::Street;

mod allocate;
pub mod batch;
mod car;
mod config;
mod decode;
mod demand;
mod encode;
mod pipeline;
mod scan;
mod simulation;
mod street;

new_key_type! {
    /// Unique ID of a [Street].
    pub struct StreetId;
}

type StreetSet = SlotMap<StreetId, Street>;
