use approx::assert_relative_eq;
use num_complex::Complex64;
use rand::{rngs::StdRng, Rng, SeedableRng};
use seqview::{
    add, all, any, apply, apply2, at_most, cat, eq, ge, lt, none, not, or, reduce, sum, vector,
    BoundedSlice, DenseView, Sequence, Slice, StridedBoundedSlice, StridedSlice, StridedView,
    Vector, View, Whole,
};
use std::cell::Cell;

fn iota(n: usize) -> Vector<usize> {
    (0..n).collect()
}

// ============================================================================
// Slicing algebra
// ============================================================================

#[test]
fn test_contiguous_slice_composition() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..500 {
        let len = rng.gen_range(1..64);
        let v = iota(len);
        let a = rng.gen_range(0..len);
        let n = rng.gen_range(1..=len - a);
        let b = rng.gen_range(0..n);
        let m = rng.gen_range(0..=n - b);

        let composed = v.slice(Slice::new(a, n)).slice(Slice::new(b, m));
        let direct = v.slice(Slice::new(a + b, m));
        assert_eq!(composed, direct, "len {len}: ({a}, {n}) then ({b}, {m})");
        assert_eq!(composed.as_slice(), &v.as_slice()[a + b..a + b + m]);
    }
}

#[test]
fn test_strided_slice_composition() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let len = rng.gen_range(1..80);
        let v = iota(len);
        let s = rng.gen_range(1..5);
        let t = rng.gen_range(1..4);
        if len < s * t {
            continue;
        }
        // Every selection keeps start + stride * count within its view.
        let a = rng.gen_range(0..=len - s);
        let n = rng.gen_range(1..=(len - a) / s);
        if n < t {
            continue;
        }
        let b = rng.gen_range(0..=n - t);
        let m = rng.gen_range(1..=(n - b) / t);

        let outer = v.slice(StridedSlice::new(a, n, s));
        let composed = outer.slice(StridedSlice::new(b, m, t));
        let direct = v.slice(StridedSlice::new(a + b * s, m, s * t));
        assert_eq!(composed.stride(), s * t);
        assert_eq!(composed, direct);

        let expected: Vec<usize> = (0..m).map(|k| a + (b + k * t) * s).collect();
        assert_eq!(composed.to_vec(), expected);
    }
}

#[test]
fn test_mixed_kind_composition() {
    let v = iota(30);
    // Strided, then contiguous, then strided again.
    let s = v
        .slice(StridedSlice::new(2, 9, 3))
        .slice(Slice::new(1, 6))
        .slice(StridedSlice::new(0, 3, 2));
    assert_eq!(s.stride(), 6);
    assert_eq!(s.to_vec(), vec![5, 11, 17]);

    // A dense slice of a dense slice is still dense.
    let d: DenseView<'_, usize> = v.slice(10..20).slice(BoundedSlice::new(5, Whole));
    assert_eq!(d.as_slice(), &[15, 16, 17, 18, 19]);
}

#[test]
fn test_strided_bounded_count() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..300 {
        let len = rng.gen_range(1..100);
        let v = iota(len);
        let start = rng.gen_range(0..len);
        let stride = rng.gen_range(1..8);
        let expected = (len - start).div_ceil(stride);

        let open = v.slice(StridedBoundedSlice::new(start, Whole, stride));
        assert_eq!(open.len(), expected);
        assert_eq!(open.to_vec(), (start..len).step_by(stride).collect::<Vec<_>>());

        let bound = rng.gen_range(0..2 * expected + 1);
        let bounded = v.slice(StridedBoundedSlice::new(start, at_most(bound), stride));
        assert_eq!(bounded.len(), expected.min(bound));
    }
}

#[test]
fn test_bounded_slice_count() {
    let v = iota(10);
    assert_eq!(v.slice(BoundedSlice::new(4, Whole)).len(), 6);
    assert_eq!(v.slice(BoundedSlice::new(4, at_most(2))).len(), 2);
    assert_eq!(v.slice(BoundedSlice::new(4, at_most(20))).len(), 6);
    assert_eq!(v.slice(4..).len(), 6);
}

#[test]
fn test_view_trait_generic() {
    fn last<'a, V: View<'a>>(v: V) -> Option<&'a V::Elem> {
        let n = v.len();
        (n > 0).then(|| v.at(n - 1))
    }
    let v = iota(9);
    assert_eq!(last(v.view()), Some(&8));
    assert_eq!(last(v.slice(StridedSlice::new(0, 3, 3))), Some(&6));
    assert_eq!(last(v.slice(0..0)), None);
    assert_eq!(v.view().narrow(StridedSlice::new(1, 2, 4)).to_vec(), vec![1, 5]);
}

// ============================================================================
// Lazy evaluation
// ============================================================================

#[test]
fn test_laziness_counts_calls() {
    let calls = Cell::new(0usize);
    let x: Vector<f64> = (0..1000).map(f64::from).collect();
    let y = Vector::filled(1.0, 1000);

    let expr = apply2(&x, &y, |a: f64, b: f64| {
        calls.set(calls.get() + 1);
        a + b
    });
    assert_eq!(calls.get(), 0);

    let z = Vector::from_sequence(expr).unwrap();
    assert_eq!(calls.get(), 1000);
    assert_eq!(z.len(), 1000);
    assert_relative_eq!(z[999], 1000.0);
}

#[test]
fn test_nested_expression_single_pass() {
    let inner_calls = Cell::new(0usize);
    let x = vector![1, 2, 3, 4];
    let squared = apply(&x, |a: i32| {
        inner_calls.set(inner_calls.get() + 1);
        a * a
    });
    let shifted = squared + 1;
    let e = 2 * shifted - &x;
    assert_eq!(inner_calls.get(), 0);
    assert_eq!(Vector::from_sequence(e).unwrap(), vector![3, 8, 17, 30]);
    assert_eq!(inner_calls.get(), 4);
}

#[test]
fn test_assign_expression_into_strided_slice() {
    let a = vector![1.0, 2.0, 3.0];
    let b = vector![0.5, 0.5, 0.5];
    let mut out = Vector::<f64>::with_len(7);
    out.slice_mut(StridedSlice::new(1, 3, 2))
        .assign((&a - &b) * 2.0)
        .unwrap();
    assert_eq!(out, [0.0, 1.0, 0.0, 3.0, 0.0, 5.0, 0.0]);
}

#[test]
fn test_expression_over_strided_views() {
    let v: Vector<i64> = (0..13).collect();
    let evens = v.slice(StridedSlice::new(0, 6, 2));
    let odds = v.slice(StridedSlice::new(1, 6, 2));
    let diff = Vector::from_sequence(odds - evens).unwrap();
    assert_eq!(diff, [1; 6]);
    assert_eq!(sum(evens * odds).unwrap(), 2 * 3 + 4 * 5 + 6 * 7 + 8 * 9 + 10 * 11);
}

#[test]
fn test_expression_length_mismatch() {
    let a = vector![1, 2, 3];
    let b = vector![1, 2];
    let err = Vector::from_sequence(&a + &b).unwrap_err();
    assert_eq!(err.to_string(), "sizes mismatch: expected 3, found 2");
}

#[test]
fn test_scalar_only_expression() {
    let one = Vector::from_sequence(add(2, 3)).unwrap();
    assert_eq!(one, [5]);
}

#[test]
fn test_complex_elements() {
    let z = vector![Complex64::new(1.0, 1.0), Complex64::new(2.0, -1.0)];
    let w = vector![Complex64::new(0.0, 1.0), Complex64::new(1.0, 0.0)];
    let p = Vector::from_sequence(&z * &w).unwrap();
    assert_relative_eq!(p[0].re, -1.0);
    assert_relative_eq!(p[0].im, 1.0);
    assert_relative_eq!(p[1].re, 2.0);
    assert_relative_eq!(p[1].im, -1.0);

    let total = sum(-&z).unwrap();
    assert_relative_eq!(total.re, -3.0);
    assert_relative_eq!(total.im, 0.0);
}

// ============================================================================
// Reductions
// ============================================================================

#[test]
fn test_reductions_over_comparisons() {
    let a = vector![1, 2, 2];
    assert!(!all(eq(&a, 2)).unwrap());
    assert!(any(eq(&a, 2)).unwrap());
    assert!(none(eq(&a, 0)).unwrap());
    assert!(all(ge(&a, 1)).unwrap());
    assert!(all(or(lt(&a, 2), eq(&a, 2))).unwrap());
    assert!(none(not(ge(&a, 1))).unwrap());
}

#[test]
fn test_reduce_over_strided_view() {
    let data: Vec<f64> = (1..=9).map(f64::from).collect();
    let diag = StridedView::new(&data, 3, 4);
    let product = reduce(diag, |x| x, |a, b| a * b, 1.0).unwrap();
    assert_relative_eq!(product, 1.0 * 5.0 * 9.0);
}

// ============================================================================
// Concatenation
// ============================================================================

#[test]
fn test_cat_example() {
    let v = cat![vector![1, 2], 3, vector![4, 5, 6]].unwrap();
    assert_eq!(v.len(), 6);
    assert_eq!(v, vector![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_cat_views_and_expressions() {
    let v = iota(6);
    let joined = cat![
        v.slice(StridedSlice::new(0, 3, 2)),
        v.slice(4..) * 10usize,
        100usize
    ]
    .unwrap();
    assert_eq!(joined, [0, 2, 4, 40, 50, 100]);
    assert_eq!(Sequence::len(&v.view()), 6);
}
