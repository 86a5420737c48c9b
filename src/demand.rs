//! Aggregation of car routes into per-street demand.

use crate::car::CarPath;
use crate::simulation::Simulation;
use crate::StreetId;
use serde::{Deserialize, Serialize};
use slotmap::SecondaryMap;

/// The demand on each street. Streets no car drives along are absent.
pub type StreetWeights = SecondaryMap<StreetId, f64>;

/// How the traversals of a street are turned into a weight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// The number of times a car drives along the street.
    #[default]
    Count,
    /// The traversal count divided by the street's traversal time.
    PerTraversalTime,
}

/// Options controlling how street weights are computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemandOptions {
    /// The weighting applied to traversal counts.
    pub weighting: Weighting,
    /// The percentage of cars, those with the least slack, to leave out
    /// before counting.
    pub drop_percent: u8,
}

/// Computes the weight of every street that carries traffic.
pub fn compute_street_weights(sim: &Simulation, options: &DemandOptions) -> StreetWeights {
    let mut weights = if options.drop_percent > 0 {
        count_traversals(sim.iter_feasible_car_paths(options.drop_percent))
    } else {
        count_traversals(sim.iter_car_paths())
    };
    if options.weighting == Weighting::PerTraversalTime {
        normalize(sim, &mut weights);
    }
    weights
}

/// Counts how many times each street is driven along. A car visiting the
/// same street twice counts twice.
pub fn street_weights(sim: &Simulation) -> StreetWeights {
    count_traversals(sim.iter_car_paths())
}

/// Like [street_weights], but divides each count by the street's traversal time.
pub fn street_weights_normalized(sim: &Simulation) -> StreetWeights {
    let mut weights = street_weights(sim);
    normalize(sim, &mut weights);
    weights
}

fn count_traversals<'a>(paths: impl Iterator<Item = &'a CarPath>) -> StreetWeights {
    let mut weights = StreetWeights::new();
    for street in paths.flat_map(|path| path.streets()) {
        // Every ID in a path was resolved against the network it came from.
        if let Some(weight) = weights.entry(*street) {
            *weight.or_insert(0.0) += 1.0;
        }
    }
    weights
}

fn normalize(sim: &Simulation, weights: &mut StreetWeights) {
    for (id, weight) in weights.iter_mut() {
        *weight /= sim.get_street(id).traversal_time() as f64;
    }
}
