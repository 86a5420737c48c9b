use crate::car::CarPath;
use crate::street::Street;
use crate::{StreetId, StreetSet};
use itertools::Itertools;
use std::collections::HashMap;

/// A road network together with the routes recorded for every car.
#[derive(Clone, Debug, Default)]
pub struct Simulation {
    /// The total simulated time in s.
    duration: u32,
    /// The declared number of intersections.
    intersection_count: u32,
    /// The streets in the network.
    streets: StreetSet,
    /// Street IDs indexed by name.
    names: HashMap<String, StreetId>,
    /// The car routes, in input order.
    car_paths: Vec<CarPath>,
    /// Points awarded for each car arriving before the end of the simulation.
    bonus: u32,
}

impl Simulation {
    /// Creates a new simulation with an empty network.
    pub fn new(duration: u32, intersection_count: u32, bonus: u32) -> Self {
        Self {
            duration,
            intersection_count,
            bonus,
            ..Default::default()
        }
    }

    /// Adds a street to the network.
    ///
    /// Returns `None` if a street with the same name already exists.
    pub fn add_street(&mut self, begin: u32, end: u32, name: &str, traversal_time: u32) -> Option<StreetId> {
        if self.names.contains_key(name) {
            return None;
        }
        let id = self
            .streets
            .insert_with_key(|id| Street::new(id, begin, end, name.to_owned(), traversal_time));
        self.names.insert(name.to_owned(), id);
        Some(id)
    }

    /// Adds a car route to the simulation.
    pub fn add_car_path(&mut self, path: CarPath) {
        self.car_paths.push(path);
    }

    /// Gets the total simulated time in s.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Gets the declared number of intersections.
    pub fn intersection_count(&self) -> u32 {
        self.intersection_count
    }

    /// Gets the bonus awarded per car that finishes its route in time.
    pub fn bonus(&self) -> u32 {
        self.bonus
    }

    /// Looks up a street by name.
    pub fn street_id(&self, name: &str) -> Option<StreetId> {
        self.names.get(name).copied()
    }

    /// Gets a reference to the street with the given ID.
    pub fn get_street(&self, id: StreetId) -> &Street {
        &self.streets[id]
    }

    /// Returns an iterator over all the streets in the network.
    pub fn iter_streets(&self) -> impl Iterator<Item = &Street> {
        self.streets.values()
    }

    /// Returns the number of streets in the network.
    pub fn street_count(&self) -> usize {
        self.streets.len()
    }

    /// Returns an iterator over the car routes.
    pub fn iter_car_paths(&self) -> impl Iterator<Item = &CarPath> {
        self.car_paths.iter()
    }

    /// Returns the number of cars.
    pub fn car_count(&self) -> usize {
        self.car_paths.len()
    }

    /// Computes the time a car needs to complete its route, ignoring the
    /// starting street.
    pub fn deadline(&self, path: &CarPath) -> u64 {
        path.deadline(&self.streets)
    }

    /// Computes the time a car has to spare, waiting at lights, if it is to
    /// finish before the end of the simulation. Negative if it cannot finish.
    pub fn slack(&self, path: &CarPath) -> i64 {
        self.duration as i64 - self.deadline(path) as i64
    }

    /// Iterates over the car routes that remain once `percent` percent of the
    /// cars, those with the least slack, are left out.
    pub fn iter_feasible_car_paths(&self, percent: u8) -> impl Iterator<Item = &CarPath> {
        self.car_paths
            .iter()
            .zip(self.feasible_mask(percent))
            .filter_map(|(path, keep)| keep.then_some(path))
    }

    /// Removes `percent` percent of the cars, starting with the ones with the
    /// least slack. Returns the number of cars removed.
    ///
    /// The relative order of the remaining cars is preserved.
    pub fn retain_feasible_cars(&mut self, percent: u8) -> usize {
        let before = self.car_paths.len();
        let mut keep = self.feasible_mask(percent).into_iter();
        self.car_paths.retain(|_| keep.next().unwrap_or(true));
        let removed = before - self.car_paths.len();
        log::debug!("Removed {} of {} cars", removed, before);
        removed
    }

    /// Flags which cars survive the removal of the `percent` percent with the
    /// least slack. Ties are broken by input order.
    fn feasible_mask(&self, percent: u8) -> Vec<bool> {
        let count = self.car_paths.len();
        let remove = percent.min(100) as usize * count / 100;
        let mut keep = vec![true; count];
        for idx in (0..count)
            .sorted_by_key(|idx| (self.slack(&self.car_paths[*idx]), *idx))
            .take(remove)
        {
            keep[idx] = false;
        }
        keep
    }
}
