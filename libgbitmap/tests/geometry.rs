use libgbitmap::{
    geometry::{scaled_divide, scaled_multiply},
    Orientation, Ratio, Rect, RectMapper,
};
use proptest::prelude::*;

fn rect() -> impl Strategy<Value = Rect> {
    (-100i32..100, -100i32..100, -20i32..60, -20i32..60)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

proptest! {
    #[test]
    fn intersection_is_symmetric(a in rect(), b in rect()) {
        prop_assert_eq!(a.intersect(&b), b.intersect(&a));
        prop_assert!(a.contains_rect(&a.intersect(&b)));
    }

    #[test]
    fn hull_with_empty_is_identity(a in rect()) {
        prop_assert_eq!(a.recthull(&Rect::empty()), a);
        prop_assert_eq!(Rect::empty().recthull(&a), a);
    }

    #[test]
    fn ratios_are_reduced(p in -1000i32..1000, q in (-1000i32..1000).prop_filter("non-zero", |q| *q != 0)) {
        let r = Ratio::new(p, q);
        prop_assert!(r.denominator() > 0);
        let (mut a, mut b) = (r.numerator().abs(), r.denominator());
        while b != 0 {
            (a, b) = (b, a % b);
        }
        prop_assert_eq!(a.max(1), 1);
        prop_assert_eq!(r, Ratio::new(p * 3, q * 3));
    }

    #[test]
    fn four_turns_restore_any_mapper(x in -50i32..50, y in -50i32..50, w in 1i32..80, h in 1i32..80, code in 0u8..8) {
        let mut m = RectMapper::new(Rect::new(x, y, w, h), Rect::new(0, 0, 100, 50)).unwrap();
        m.rotate(i32::from(code));
        let before = m.clone();
        m.rotate(4);
        prop_assert_eq!(&m, &before);
        for _ in 0..4 {
            m.rotate(1);
        }
        prop_assert_eq!(&m, &before);
        prop_assert_eq!(m.input(), Rect::new(x, y, w, h));
    }
}

#[test]
fn disjoint_rectangles_do_not_intersect() {
    let a = Rect::new(0, 0, 10, 10);
    let b = Rect::new(10, 0, 5, 5);
    assert!(a.intersect(&b).is_empty());
    assert_eq!(a.intersect(&b).area(), 0);
    assert_eq!(a.recthull(&b), Rect::from_bounds(0, 0, 15, 10));
}

#[test]
fn scaled_arithmetic_rounds_half_away_from_zero() {
    let half = Ratio::new(1, 2);
    assert_eq!(scaled_multiply(3, half), 2);
    assert_eq!(scaled_multiply(-3, half), -2);
    assert_eq!(5 * Ratio::new(2, 3), 3);
    assert_eq!(scaled_divide(3, Ratio::new(2, 1)), 2);
    assert_eq!(-3 / Ratio::new(-2, 1), 2);
    assert_eq!(Ratio::new(6, -4).to_string(), "-3/2");
}

#[test]
fn orientation_codes() {
    assert_eq!(Orientation::IDENTITY.rotated(1).code(), 4 | 1);
    assert_eq!(Orientation::IDENTITY.rotated(2).code(), 3);
    assert_eq!(Orientation::all().count(), 8);
}

#[test]
fn thumbnail_scenario() {
    let m = RectMapper::new(Rect::new(0, 0, 10, 10), Rect::new(0, 0, 5, 5)).unwrap();
    assert_eq!(m.map(10, 10), (5, 5));
    assert_eq!(m.unmap(5, 5), (10, 10));
    assert_eq!(m.map_rect(&Rect::new(2, 2, 4, 4)), Rect::new(1, 1, 2, 2));
}
