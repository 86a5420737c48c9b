//! The signal plan text format.
//!
//! ```text
//! intersections
//! id                (per intersection)
//! streets
//! name green_time   (per street)
//! ```

use crate::allocate::{GreenTimes, SignalPlan};
use crate::scan::{ScanError, Scanner};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use thiserror::Error;

/// Errors that can occur while reading back a signal plan.
#[derive(Error, Debug)]
pub enum PlanParseError {
    #[error("could not read plan: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse intersection count: {0}")]
    Header(#[source] ScanError),

    #[error("could not parse intersection {index}: {source}")]
    Intersection {
        index: usize,
        #[source]
        source: ScanError,
    },

    #[error("intersection {id} appears twice")]
    DuplicateIntersection { id: u32 },

    #[error("street {name:?} appears twice at intersection {id}")]
    DuplicateStreet { id: u32, name: String },
}

/// Writes the plan, intersections in ascending ID order and streets in name order.
pub fn encode(plan: &SignalPlan, mut sink: impl Write) -> std::io::Result<()> {
    writeln!(sink, "{}", plan.len())?;
    for (id, intersection) in plan.iter() {
        writeln!(sink, "{}\n{}", id, intersection.len())?;
        for (name, item) in intersection.iter() {
            writeln!(sink, "{} {}", name, item.green_time)?;
        }
    }
    sink.flush()
}

/// Reads a plan written by [encode].
pub fn decode_plan(mut reader: impl Read) -> Result<GreenTimes, PlanParseError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let mut scanner = Scanner::new(&text);

    let count = scanner
        .int::<usize>("intersection count")
        .map_err(PlanParseError::Header)?;
    let mut plan = GreenTimes::new();
    for index in 0..count {
        let (id, streets) = decode_intersection(&mut scanner)
            .map_err(|source| PlanParseError::Intersection { index, source })?;
        let mut names = BTreeMap::new();
        for (name, green_time) in streets {
            if names.insert(name.to_owned(), green_time).is_some() {
                return Err(PlanParseError::DuplicateStreet {
                    id,
                    name: name.to_owned(),
                });
            }
        }
        if plan.insert(id, names).is_some() {
            return Err(PlanParseError::DuplicateIntersection { id });
        }
    }
    Ok(plan)
}

fn decode_intersection<'a>(scanner: &mut Scanner<'a>) -> Result<(u32, Vec<(&'a str, u32)>), ScanError> {
    let id = scanner.int("intersection id")?;
    let count = scanner.int::<usize>("street count")?;
    let streets = (0..count)
        .map(|_| -> Result<(&'a str, u32), ScanError> {
            Ok((scanner.token("street name")?, scanner.int("green time")?))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((id, streets))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{allocate, decode, street_weights};

    const SIMULATION: &str = "6 4 5 2 1000\n\
        2 0 rue-de-londres 1\n\
        0 1 rue-d-amsterdam 1\n\
        3 1 rue-d-athenes 1\n\
        2 3 rue-de-rome 2\n\
        1 2 rue-de-moscou 3\n\
        4 rue-de-londres rue-d-amsterdam rue-de-moscou rue-de-rome\n\
        3 rue-d-athenes rue-de-moscou rue-de-londres\n";

    fn plan() -> SignalPlan {
        let sim = decode(SIMULATION.as_bytes()).unwrap();
        allocate(&sim, &street_weights(&sim), sim.duration())
    }

    #[test]
    fn stable_output() {
        let mut out = Vec::new();
        encode(&plan(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "4\n\
             0\n1\nrue-de-londres 1\n\
             1\n2\nrue-d-amsterdam 1\nrue-d-athenes 1\n\
             2\n1\nrue-de-moscou 1\n\
             3\n1\nrue-de-rome 1\n"
        );
    }

    #[test]
    fn reads_back_written_plan() {
        let plan = plan();
        let mut out = Vec::new();
        encode(&plan, &mut out).unwrap();
        assert_eq!(decode_plan(out.as_slice()).unwrap(), plan.green_times());
    }

    #[test]
    fn empty_plan() {
        let mut out = Vec::new();
        encode(&SignalPlan::default(), &mut out).unwrap();
        assert_eq!(out, b"0\n");
        assert!(decode_plan(out.as_slice()).unwrap().is_empty());
    }

    #[test]
    fn truncated_plan() {
        let err = decode_plan("2\n1\n1\na 3\n0\n2\nb 1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, PlanParseError::Intersection { index: 1, .. }));
    }

    #[test]
    fn repeated_intersection() {
        let err = decode_plan("2\n1\n1\na 3\n1\n1\nb 1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, PlanParseError::DuplicateIntersection { id: 1 }));
    }
}
