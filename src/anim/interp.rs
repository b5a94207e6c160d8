/// The frames strictly between `from` and `to`, each with its fraction of
/// the way from `from` to `to`. Empty unless `from + 1 < to`.
pub fn frames_between(from: usize, to: usize) -> impl Iterator<Item = (usize, f64)> {
    let span = to.saturating_sub(from) as f64;
    (from + 1..to).map(move |n| (n, (n - from) as f64 / span))
}

#[test]
fn test_frames_between() {
    let v: Vec<(usize, f64)> = frames_between(1, 5).collect();
    assert_eq!(v, vec![(2, 0.25), (3, 0.5), (4, 0.75)]);
    assert_eq!(frames_between(2, 3).count(), 0);
    assert_eq!(frames_between(7, 3).count(), 0);
}
