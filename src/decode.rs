//! Parsing of the simulation text format.
//!
//! ```text
//! duration intersections streets cars bonus
//! begin end name time          (one line per street)
//! length name name ...         (one line per car)
//! ```

use crate::car::CarPath;
use crate::scan::{ScanError, Scanner};
use crate::simulation::Simulation;
use smallvec::SmallVec;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// A car route references a street that is not in the network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("car {car} drives along unknown street {name:?}")]
pub struct LookupError {
    /// The index of the car.
    pub car: usize,
    /// The name of the missing street.
    pub name: String,
}

/// Errors that can occur while decoding a simulation.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("could not read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse header: {0}")]
    Header(#[source] ScanError),

    #[error("could not parse street {index}: {source}")]
    Street {
        index: usize,
        #[source]
        source: ScanError,
    },

    #[error("duplicate street {name:?} at index {index}")]
    DuplicateStreet { index: usize, name: String },

    #[error("could not parse car {index}: {source}")]
    Car {
        index: usize,
        #[source]
        source: ScanError,
    },

    #[error("could not parse street {position} of car {car}: {source}")]
    CarStreet {
        car: usize,
        position: usize,
        #[source]
        source: ScanError,
    },

    #[error(transparent)]
    UnknownStreet(#[from] LookupError),
}

/// Opens and decodes a simulation file.
pub fn decode_file(path: impl AsRef<Path>) -> Result<Simulation, ParseError> {
    decode(File::open(path)?)
}

/// Decodes a simulation, reading the input in full first.
///
/// Every street referenced by a car must be declared in the network.
/// Anything after the last car is ignored.
pub fn decode(mut reader: impl Read) -> Result<Simulation, ParseError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let mut scanner = Scanner::new(&text);

    let (mut sim, streets, cars) = decode_header(&mut scanner).map_err(ParseError::Header)?;

    for index in 0..streets {
        let (begin, end, name, time) = decode_street(&mut scanner)
            .map_err(|source| ParseError::Street { index, source })?;
        if sim.add_street(begin, end, name, time).is_none() {
            return Err(ParseError::DuplicateStreet {
                index,
                name: name.to_owned(),
            });
        }
    }

    for car in 0..cars {
        let len = scanner
            .int::<usize>("route length")
            .map_err(|source| ParseError::Car { index: car, source })?;
        let mut streets = SmallVec::<[_; 8]>::new();
        for position in 0..len {
            let name = scanner
                .token("street name")
                .map_err(|source| ParseError::CarStreet { car, position, source })?;
            let id = sim.street_id(name).ok_or_else(|| LookupError {
                car,
                name: name.to_owned(),
            })?;
            streets.push(id);
        }
        sim.add_car_path(CarPath::new(streets));
    }

    log::debug!(
        "Decoded {} streets and {} cars over {} s",
        sim.street_count(),
        sim.car_count(),
        sim.duration()
    );
    Ok(sim)
}

fn decode_header(scanner: &mut Scanner) -> Result<(Simulation, usize, usize), ScanError> {
    let duration = scanner.positive("duration")?;
    let intersections = scanner.int("intersection count")?;
    let streets = scanner.int("street count")?;
    let cars = scanner.int("car count")?;
    let bonus = scanner.int("bonus")?;
    Ok((Simulation::new(duration, intersections, bonus), streets, cars))
}

fn decode_street<'a>(scanner: &mut Scanner<'a>) -> Result<(u32, u32, &'a str, u32), ScanError> {
    let begin = scanner.int("begin intersection")?;
    let end = scanner.int("end intersection")?;
    let name = scanner.token("street name")?;
    let time = scanner.positive("traversal time")?;
    Ok((begin, end, name, time))
}
