use bridge_dtm::{
    geometry::{Bounds, Point, Polyline},
    skirt::{merge_groups, BridgeGroup},
};

/// Small deterministic generator so the layout is reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn scattered_groups(n: usize) -> Vec<BridgeGroup> {
    let mut rng = Lcg(42);
    (0..n)
        .map(|i| {
            let x = rng.next() * 200.0;
            let y = rng.next() * 200.0;
            let a = Point::new(x, y);
            let b = Point::new(x + rng.next() * 20.0, y + rng.next() * 20.0);
            // Tag each polyline with a unique third vertex to track it.
            let tag = Point::new(x, y + i as f64 * 1e-9);
            BridgeGroup::new(Bounds::new(a, b), vec![Polyline::new(vec![a, b, tag])])
        })
        .collect()
}

#[test]
fn no_overlapping_skirts_remain() {
    let merged = merge_groups(scattered_groups(60));
    for i in 0..merged.len() {
        for j in (i + 1)..merged.len() {
            assert!(
                !merged[i].skirt.intersects(&merged[j].skirt),
                "groups {} and {} still overlap",
                i,
                j
            );
        }
    }
}

#[test]
fn polylines_neither_lost_nor_duplicated() {
    let input = scattered_groups(60);
    let mut expected: Vec<Polyline> = input.iter().flat_map(|g| g.polylines.clone()).collect();
    let merged = merge_groups(input);
    let mut actual: Vec<Polyline> = merged.iter().flat_map(|g| g.polylines.clone()).collect();
    let key = |p: &Polyline| (p.vertices[0].x, p.vertices[0].y, p.vertices[2].y);
    expected.sort_by(|a, b| key(a).partial_cmp(&key(b)).unwrap());
    actual.sort_by(|a, b| key(a).partial_cmp(&key(b)).unwrap());
    assert_eq!(actual, expected);
}

#[test]
fn skirt_covers_member_polylines() {
    let merged = merge_groups(scattered_groups(60));
    for group in &merged {
        for pl in &group.polylines {
            for v in &pl.vertices {
                assert!(group.skirt.contains(*v));
            }
        }
    }
}
