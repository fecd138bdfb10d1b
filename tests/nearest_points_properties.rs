// Nearest-point queries across every pair of shape kinds
use pcb_clearance::geometry::{
    nearest_points, Shape, ShapeArc, ShapeCircle, ShapeCompound, ShapeLineChain, ShapePolySet, ShapeRect,
    ShapeSegment, Vector2D, Vector2I,
};

fn v(x: i32, y: i32) -> Vector2I {
    Vector2I::new(x, y)
}

/// One of each kind, spread out so every pair has a positive gap
fn zoo() -> Vec<Shape> {
    let square = ShapeLineChain::closed_polygon(vec![v(-9_000_000, 6_000_000), v(-6_000_000, 6_000_000), v(-6_000_000, 9_000_000), v(-9_000_000, 9_000_000)]);
    let mut poly = ShapePolySet::default();
    poly.add_outline(square);

    vec![
        ShapeRect::new(v(0, 0), v(2_000_000, 1_000_000)).into(),
        ShapeCircle::new(v(5_000_000, 500_000), 700_000).into(),
        ShapeSegment::new(v(-3_000_000, -2_000_000), v(-1_000_000, -4_000_000), 250_000).into(),
        ShapeArc::new(v(8_000_000, -3_000_000), v(9_000_000, -2_000_000), v(10_000_000, -3_000_000), 150_000).into(),
        ShapeLineChain::new(vec![v(0, 5_000_000), v(1_500_000, 6_500_000), v(3_000_000, 5_000_000)], false, 100_000).into(),
        poly.into(),
        ShapeCompound::new(vec![
            ShapeCircle::new(v(-5_000_000, -7_000_000), 300_000).into(),
            ShapeSegment::new(v(-4_000_000, -7_000_000), v(-2_000_000, -8_000_000), 120_000).into(),
        ])
        .into(),
    ]
}

#[test]
fn test_distance_is_symmetric_for_every_kind_pair() {
    let shapes = zoo();
    let mut pairs = 0;

    for a in &shapes {
        for b in &shapes {
            let ab = nearest_points(a, b).expect("non-empty shapes");
            let ba = nearest_points(b, a).expect("non-empty shapes");
            assert!(
                (ab.distance - ba.distance).abs() < 1e-3,
                "{:?}/{:?}: {} vs {}",
                a.kind(),
                b.kind(),
                ab.distance,
                ba.distance
            );
            pairs += 1;
        }
    }

    assert_eq!(pairs, 49);
}

#[test]
fn test_swapping_arguments_swaps_reported_points() {
    // Zoo members face each other through a single closest pair, so the
    // points themselves must come back swapped, not just the distance
    let shapes = zoo();
    for (i, a) in shapes.iter().enumerate() {
        for b in &shapes[i + 1..] {
            let ab = nearest_points(a, b).expect("non-empty shapes");
            let ba = nearest_points(b, a).expect("non-empty shapes");
            assert!(
                ab.a.distance(ba.b) < 0.5 && ab.b.distance(ba.a) < 0.5,
                "{:?}/{:?}: {:?}-{:?} vs swapped {:?}-{:?}",
                a.kind(),
                b.kind(),
                ab.a,
                ab.b,
                ba.b,
                ba.a
            );
        }
    }
}

#[test]
fn test_reported_points_are_distance_apart() {
    let shapes = zoo();
    for (i, a) in shapes.iter().enumerate() {
        for b in &shapes[i + 1..] {
            let pair = nearest_points(a, b).expect("non-empty shapes");
            assert!(pair.distance > 0.0, "{:?}/{:?} should not touch", a.kind(), b.kind());
            assert!(
                (pair.a.distance(pair.b) - pair.distance).abs() < 1.0,
                "{:?}/{:?}: points {:?} {:?} vs distance {}",
                a.kind(),
                b.kind(),
                pair.a,
                pair.b,
                pair.distance
            );
        }
    }
}

fn arc_samples(arc: &ShapeArc, n: usize) -> Vec<Vector2D> {
    let center = arc.center();
    let r = arc.radius();
    (0..=n)
        .map(|i| {
            let a = (arc.start_angle() + arc.central_angle() * i as f64 / n as f64).to_radians();
            center + Vector2D::new(a.cos(), a.sin()) * r
        })
        .collect()
}

/// Dense enough that the sampled minimum of a 1-Lipschitz distance stays
/// within half a step of the true one for the test arcs
const SAMPLES: usize = 4_000;
const STEP_SLACK: f64 = 1_000.0;

fn assert_close_to_brute(computed: f64, brute: f64, what: &str) {
    assert!(computed <= brute + 1.0, "{}: computed {} above sampled {}", what, computed, brute);
    assert!(computed >= brute - STEP_SLACK, "{}: computed {} far below sampled {}", what, computed, brute);
}

fn test_arcs() -> Vec<ShapeArc> {
    vec![
        ShapeArc::new(v(1_000_000, 0), v(0, 1_000_000), v(-1_000_000, 0), 40_000),
        ShapeArc::new(v(1_000_000, 0), v(0, -1_000_000), v(-1_000_000, 0), 0),
        ShapeArc::from_center_angle(v(300_000, -200_000), v(1_300_000, -200_000), -250.0, 20_000).expect("arc"),
    ]
}

#[test]
fn test_arc_circle_matches_sampling() {
    for arc in test_arcs() {
        for (center, radius) in [(v(0, 2_500_000), 300_000), (v(3_000_000, -500_000), 1_000_000), (v(0, -100_000), 50_000)] {
            let circle = ShapeCircle::new(center, radius);
            let computed = nearest_points(&Shape::Arc(arc.clone()), &Shape::Circle(circle))
                .expect("pair")
                .distance;

            let brute = arc_samples(&arc, SAMPLES)
                .iter()
                .map(|p| (p.distance(center.to_f64()) - radius as f64 - arc.width() as f64 / 2.0).max(0.0))
                .fold(f64::INFINITY, f64::min);

            assert_close_to_brute(computed, brute, "arc/circle");
        }
    }
}

#[test]
fn test_arc_segment_matches_sampling() {
    let segments = [
        ShapeSegment::new(v(-2_000_000, 1_800_000), v(2_000_000, 1_500_000), 100_000),
        ShapeSegment::new(v(0, 0), v(200_000, 300_000), 0),
        ShapeSegment::new(v(1_500_000, -2_000_000), v(1_600_000, 2_000_000), 60_000),
    ];

    for arc in test_arcs() {
        for seg in &segments {
            let computed = nearest_points(&Shape::Arc(arc.clone()), &Shape::Segment(*seg))
                .expect("pair")
                .distance;

            let half = (arc.width() + seg.width) as f64 / 2.0;
            let brute = arc_samples(&arc, SAMPLES)
                .iter()
                .map(|p| (seg.seg.distance_d(*p) - half).max(0.0))
                .fold(f64::INFINITY, f64::min);

            assert_close_to_brute(computed, brute, "arc/segment");
        }
    }
}

#[test]
fn test_arc_arc_matches_sampling() {
    let others = [
        ShapeArc::new(v(2_500_000, 0), v(3_000_000, 500_000), v(3_500_000, 0), 30_000),
        ShapeArc::new(v(-500_000, 2_000_000), v(0, 1_600_000), v(500_000, 2_000_000), 0),
    ];

    for arc in test_arcs() {
        for other in &others {
            let computed = nearest_points(&Shape::Arc(arc.clone()), &Shape::Arc(other.clone()))
                .expect("pair")
                .distance;

            let half = (arc.width() + other.width()) as f64 / 2.0;
            let mine = arc_samples(&arc, SAMPLES / 2);
            let theirs = arc_samples(other, SAMPLES / 2);
            let brute = mine
                .iter()
                .flat_map(|p| theirs.iter().map(move |q| p.distance(*q)))
                .fold(f64::INFINITY, f64::min);
            let brute = (brute - half).max(0.0);

            // Coarser grid on both sides
            assert!(computed <= brute + 1.0, "arc/arc: computed {} above sampled {}", computed, brute);
            assert!(computed >= brute - 4.0 * STEP_SLACK, "arc/arc: computed {} far below {}", computed, brute);
        }
    }
}

#[test]
fn test_overlapping_strokes_report_zero_and_one_point() {
    let a = Shape::Segment(ShapeSegment::new(v(0, 0), v(1_000_000, 0), 200_000));
    let b = Shape::Segment(ShapeSegment::new(v(500_000, 150_000), v(500_000, 900_000), 200_000));

    let pair = nearest_points(&a, &b).expect("pair");
    assert_eq!(pair.distance, 0.0);
    assert_eq!(pair.a, pair.b);

    // Contact sits between the centerlines, split by the half widths
    let c = pair.a;
    assert!((c.x - 500_000.0).abs() < 1e-6);
    assert!((c.y - 75_000.0).abs() < 1e-6, "got {:?}", c);
}

#[test]
fn test_arc_touching_circle_is_zero() {
    let arc = ShapeArc::new(v(1_000_000, 0), v(0, 1_000_000), v(-1_000_000, 0), 100_000);
    let circle = ShapeCircle::new(v(0, 1_200_000), 200_000);
    let pair = nearest_points(&Shape::Arc(arc), &Shape::Circle(circle)).expect("pair");
    assert_eq!(pair.distance, 0.0);
}

#[test]
fn test_empty_shapes_have_no_pair() {
    let empty = Shape::Compound(ShapeCompound::default());
    let seg = Shape::Segment(ShapeSegment::new(v(0, 0), v(10, 0), 0));
    assert!(nearest_points(&empty, &seg).is_none());
    assert!(nearest_points(&seg, &empty).is_none());
}
