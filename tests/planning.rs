//! Tests that plan whole simulations, from text in to text out.

use rand::{rngs::StdRng, Rng, SeedableRng};
use signal_plan::{
    allocate, compute_street_weights, decode, decode_plan, encode, street_weights, DemandOptions,
    ParseError, ScanError, SignalPlan, Simulation,
};

const PARIS: &str = "6 2 3 3 0\n\
    0 1 rue-de-londres 1\n\
    1 2 rue-d-amsterdam 1\n\
    2 0 rue-d-athenes 1\n\
    3 rue-de-londres rue-d-amsterdam rue-d-athenes\n\
    2 rue-d-amsterdam rue-d-athenes\n";

/// The example with its car count matching the two routes given.
fn paris() -> String {
    PARIS.replace("6 2 3 3 0", "6 2 3 2 0")
}

fn plan(text: &str, max_green_time: u32) -> (Simulation, SignalPlan) {
    let sim = decode(text.as_bytes()).unwrap();
    let weights = compute_street_weights(&sim, &DemandOptions::default());
    let plan = allocate(&sim, &weights, max_green_time);
    (sim, plan)
}

/// Builds a random but well formed simulation.
fn random_simulation(rng: &mut StdRng) -> String {
    let intersections = rng.gen_range(2..8);
    let streets = rng.gen_range(1..20);
    let cars = rng.gen_range(0..30);
    let mut text = format!("{} {} {} {} 100\n", rng.gen_range(1..50), intersections, streets, cars);
    for i in 0..streets {
        text += &format!(
            "{} {} s{} {}\n",
            rng.gen_range(0..intersections),
            rng.gen_range(0..intersections),
            i,
            rng.gen_range(1..10)
        );
    }
    for _ in 0..cars {
        let len = rng.gen_range(1..12);
        text += &len.to_string();
        for _ in 0..len {
            text += &format!(" s{}", rng.gen_range(0..streets));
        }
        text += "\n";
    }
    text
}

/// Every street in the example gets its own intersection and one second of green.
#[test]
fn three_singleton_intersections() {
    let (sim, plan) = plan(&paris(), 6);

    let weights = street_weights(&sim);
    let weight = |name: &str| weights[sim.street_id(name).unwrap()];
    assert_eq!(weight("rue-de-londres"), 1.0);
    assert_eq!(weight("rue-d-amsterdam"), 2.0);
    assert_eq!(weight("rue-d-athenes"), 2.0);

    assert_eq!(plan.len(), 3);
    for (id, name) in [(1, "rue-de-londres"), (2, "rue-d-amsterdam"), (0, "rue-d-athenes")] {
        let intersection = plan.get(id).unwrap();
        assert_eq!(intersection.len(), 1);
        assert_eq!(intersection.get(name).unwrap().green_time, 1);
    }
}

/// The header promises three cars but the input only has two routes.
#[test]
fn missing_route_is_reported() {
    let err = decode(PARIS.as_bytes()).unwrap_err();
    assert!(matches!(err, ParseError::Car { index: 2, .. }));
}

/// An incomplete header names the header as the failing section.
#[test]
fn short_header_fails() {
    let err = decode("6 2 3 x 0\n0 1 a 1\n".as_bytes()).unwrap_err();
    assert!(matches!(err, ParseError::Header(ScanError::InvalidInteger { .. })));
    assert!(err.to_string().starts_with("could not parse header"));

    let err = decode("6 2 3\n".as_bytes()).unwrap_err();
    assert!(matches!(err, ParseError::Header(ScanError::UnexpectedEof { .. })));
}

/// Two streets into one intersection whose weights are exactly three apart.
#[test]
fn smoothing_boundary() {
    let mut text = String::from("60 2 2 40 0\n0 1 low 1\n0 1 high 1\n");
    for i in 0..40 {
        text += if i < 10 { "1 low\n" } else { "1 high\n" };
    }
    let (_, plan) = plan(&text, 50);
    let intersection = plan.get(1).unwrap();
    assert_eq!(intersection.get("low").unwrap().weight, 10.0);
    assert_eq!(intersection.get("high").unwrap().weight, 30.0);
    assert_eq!(intersection.get("low").unwrap().green_time, 1);
    assert_eq!(intersection.get("high").unwrap().green_time, 1);
    assert!(plan.get(0).is_none());
}

/// Writing a plan and reading it back gives the same green times.
#[test]
fn plan_round_trip() {
    let mut rng = StdRng::seed_from_u64(2021);
    for _ in 0..50 {
        let text = random_simulation(&mut rng);
        let (sim, plan) = plan(&text, 4);
        let mut out = Vec::new();
        encode(&plan, &mut out).unwrap();
        assert_eq!(decode_plan(out.as_slice()).unwrap(), plan.green_times());
        assert!(plan.len() <= sim.street_count());
    }
}

/// Green times are within bounds, only busy streets are scheduled, and busier
/// streets never get less green than quieter ones at the same intersection.
#[test]
fn plan_invariants() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..100 {
        let text = random_simulation(&mut rng);
        let max_green_time = rng.gen_range(1..10);
        let (sim, plan) = plan(&text, max_green_time);
        let weights = street_weights(&sim);

        for (id, intersection) in plan.iter() {
            assert!(!intersection.is_empty());
            for (name, item) in intersection.iter() {
                let street = sim.get_street(sim.street_id(name).unwrap());
                assert_eq!(street.end(), id);
                assert!(item.weight > 0.0);
                assert_eq!(weights.get(street.id()), Some(&item.weight));
                assert!((1..=max_green_time).contains(&item.green_time));
                for (_, other) in intersection.iter() {
                    if item.weight > other.weight {
                        assert!(item.green_time >= other.green_time);
                    }
                }
            }
        }

        let scheduled = plan.iter().map(|(_, i)| i.len()).sum::<usize>();
        assert_eq!(scheduled, weights.len());
    }
}

/// Planning the same input twice gives the same plan and the same bytes.
#[test]
fn planning_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(99);
    let text = random_simulation(&mut rng);
    let (_, first) = plan(&text, 5);
    let (_, second) = plan(&text, 5);
    assert_eq!(first, second);

    let (mut a, mut b) = (Vec::new(), Vec::new());
    encode(&first, &mut a).unwrap();
    encode(&second, &mut b).unwrap();
    assert_eq!(a, b);
}
