// Property checks for Box2I over a deterministic spread of boxes
use pcb_clearance::geometry::{Box2I, Vector2I};

/// Small LCG so the sample set is stable across runs
struct Lcg(u64);

impl Lcg {
    fn next_i32(&mut self, range: i32) -> i32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) as i64 % (2 * range as i64 + 1) - range as i64) as i32
    }

    fn next_box(&mut self) -> Box2I {
        let origin = Vector2I::new(self.next_i32(1_000_000), self.next_i32(1_000_000));
        let size = Vector2I::new(self.next_i32(500_000), self.next_i32(500_000));
        Box2I::new(origin, size)
    }
}

fn sample(n: usize) -> Vec<Box2I> {
    let mut rng = Lcg(0x5eed);
    let mut boxes: Vec<Box2I> = (0..n).map(|_| rng.next_box()).collect();

    // Edge cases: zero size, negative size
    boxes.push(Box2I::new(Vector2I::new(0, 0), Vector2I::new(0, 0)));
    boxes.push(Box2I::new(Vector2I::new(10, 10), Vector2I::new(-10, -10)));
    boxes
}

/// Boxes hugging the coordinate limits
fn extreme() -> Vec<Box2I> {
    vec![
        Box2I::new(Vector2I::new(i32::MAX - 10, i32::MIN + 10), Vector2I::new(-100, 100)),
        Box2I::new(Vector2I::new(i32::MIN, i32::MIN), Vector2I::new(i32::MAX, i32::MAX)),
    ]
}

#[test]
fn test_normalize_idempotent_and_non_negative() {
    for b in sample(200).into_iter().chain(extreme()) {
        let once = b.normalized();
        let twice = once.normalized();
        assert_eq!(once, twice, "normalize not idempotent for {:?}", b);
        assert!(once.width() >= 0 && once.height() >= 0, "negative size after normalize: {:?}", once);
    }
}

#[test]
fn test_contains_self() {
    for b in sample(200).into_iter().chain(extreme()) {
        assert!(b.contains_box(&b), "box does not contain itself: {:?}", b);
        assert!(b.contains_point(b.origin()));
        assert!(b.contains_point(b.end()));
    }
}

#[test]
fn test_intersect_inside_both_and_merge_covers_both() {
    let boxes = sample(60);
    let mut checked = 0;

    for a in &boxes {
        for b in &boxes {
            let mut merged = *a;
            merged.merge(b);
            assert!(merged.contains_box(&a.normalized()), "merge lost {:?}", a);
            assert!(merged.contains_box(&b.normalized()), "merge lost {:?}", b);

            if a.intersects(b) {
                let i = a.intersect(b);
                if i.width() > 0 && i.height() > 0 {
                    assert!(a.contains_box(&i), "{:?} ∩ {:?} = {:?} escapes a", a, b, i);
                    assert!(b.contains_box(&i), "{:?} ∩ {:?} = {:?} escapes b", a, b, i);
                    checked += 1;
                }
            }
        }
    }

    println!("checked {} overlapping pairs", checked);
    assert!(checked > 0, "sample produced no overlapping pairs");
}

#[test]
fn test_intersects_is_symmetric() {
    let boxes = sample(60);
    for a in &boxes {
        for b in &boxes {
            assert_eq!(a.intersects(b), b.intersects(a));
        }
    }
}

#[test]
fn test_uninitialized_is_merge_identity() {
    for b in sample(20) {
        let mut empty = Box2I::uninitialized();
        empty.merge(&b);
        assert_eq!(empty, b);

        let mut same = b;
        same.merge(&Box2I::uninitialized());
        assert_eq!(same, b);
    }
}

#[test]
fn test_inflate_then_contains_original() {
    for b in sample(100) {
        let n = b.normalized();
        if widen_safe(&n, 1000) {
            let grown = n.get_inflated(1000, 1000);
            assert!(grown.contains_box(&n));
        }
    }
}

fn widen_safe(b: &Box2I, d: i32) -> bool {
    (b.left() as i64 - d as i64) > i32::MIN as i64 && (b.right() as i64 + d as i64) < i32::MAX as i64
        && (b.top() as i64 - d as i64) > i32::MIN as i64
        && (b.bottom() as i64 + d as i64) < i32::MAX as i64
}
