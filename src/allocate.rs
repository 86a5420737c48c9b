//! Allocation of green time to the streets feeding each intersection.

use crate::demand::StreetWeights;
use crate::simulation::Simulation;
use serde::Serialize;
use std::collections::BTreeMap;

/// The multiple of an intersection's lowest weight that earns one second of
/// green time.
pub const GREEN_TIME_SMOOTHING: f64 = 3.0;

/// Green times in s, by intersection ID and street name.
pub type GreenTimes = BTreeMap<u32, BTreeMap<String, u32>>;

/// A signal timing plan: the intersections that receive traffic, each with
/// the green time of its busy incoming streets.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SignalPlan {
    intersections: BTreeMap<u32, Intersection>,
}

/// The incoming streets of one intersection that carry traffic.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Intersection {
    streets: BTreeMap<String, IntersectionItem>,
}

/// The demand on, and green time given to, one incoming street.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct IntersectionItem {
    /// The street's demand.
    pub weight: f64,
    /// The green time in s.
    pub green_time: u32,
}

/// Builds a signal plan from the street weights.
///
/// Only streets with a positive weight are given a light; intersections none
/// of them feed into are left out. No street gets more than `max_green_time`
/// seconds of green.
///
/// `weights` must have been computed from `sim`: a street ID from another
/// simulation panics.
pub fn allocate(sim: &Simulation, weights: &StreetWeights, max_green_time: u32) -> SignalPlan {
    let mut plan = SignalPlan::default();
    for (id, weight) in weights {
        if *weight <= 0.0 {
            continue;
        }
        let street = sim.get_street(id);
        plan.intersections
            .entry(street.end())
            .or_default()
            .insert(street.name(), *weight);
    }
    for intersection in plan.intersections.values_mut() {
        intersection.calculate_green_times(max_green_time);
    }
    log::debug!(
        "Allocated green time at {} of {} intersections",
        plan.len(),
        sim.intersection_count()
    );
    plan
}

impl SignalPlan {
    /// Gets the number of intersections in the plan.
    pub fn len(&self) -> usize {
        self.intersections.len()
    }

    /// Returns true if no intersection has a light.
    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }

    /// Gets the intersection with the given ID, if any of its streets is in the plan.
    pub fn get(&self, id: u32) -> Option<&Intersection> {
        self.intersections.get(&id)
    }

    /// Iterates over the intersections in ascending ID order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Intersection)> {
        self.intersections.iter().map(|(id, i)| (*id, i))
    }

    /// The sum of the green times of every street in the plan, in s.
    pub fn total_green_time(&self) -> u64 {
        self.iter()
            .flat_map(|(_, i)| i.iter())
            .map(|(_, item)| item.green_time as u64)
            .sum()
    }

    /// Strips the weights, keeping only the green time of each street.
    pub fn green_times(&self) -> GreenTimes {
        self.iter()
            .map(|(id, i)| {
                let streets = i.iter().map(|(name, item)| (name.to_owned(), item.green_time));
                (id, streets.collect())
            })
            .collect()
    }
}

impl Intersection {
    fn insert(&mut self, name: &str, weight: f64) {
        self.streets.insert(
            name.to_owned(),
            IntersectionItem {
                weight,
                green_time: 0,
            },
        );
    }

    /// Gets the number of incoming streets with a light.
    pub fn len(&self) -> usize {
        self.streets.len()
    }

    /// Returns true if no incoming street has a light.
    pub fn is_empty(&self) -> bool {
        self.streets.is_empty()
    }

    /// Gets the allocation of the named street.
    pub fn get(&self, name: &str) -> Option<&IntersectionItem> {
        self.streets.get(name)
    }

    /// Iterates over the streets in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IntersectionItem)> {
        self.streets.iter().map(|(name, item)| (name.as_str(), item))
    }

    /// Gives each street one second of green for every multiple of
    /// [GREEN_TIME_SMOOTHING] times the lowest weight, within `1..=max_green_time`.
    fn calculate_green_times(&mut self, max_green_time: u32) {
        let max = max_green_time.max(1);
        let lowest = self
            .streets
            .values()
            .map(|item| item.weight)
            .fold(f64::INFINITY, f64::min);
        let threshold = lowest * GREEN_TIME_SMOOTHING;

        for item in self.streets.values_mut() {
            item.green_time = if threshold > 0.0 && threshold.is_finite() {
                (item.weight / threshold).floor().clamp(1.0, max as f64) as u32
            } else {
                1
            };
        }
    }
}
