//! Canned bar histories for tests in this and downstream crates.

use common::Bar;

/// Rising series ending in a failed breakdown with a strong close, so
/// [`crate::detect`] returns BUY for any `len >= MIN_BARS`. Oldest first.
pub fn buy_setup(len: usize) -> Vec<Bar> {
    assert!(len >= 4);
    let mut bars: Vec<Bar> = (0..len - 3)
        .map(|i| {
            let close = 1.0 + 0.001 * i as f64;
            Bar::new(close - 0.0002, close + 0.0005, close - 0.0005, close)
        })
        .collect();

    let b = 1.0 + 0.001 * (len - 3) as f64;
    // prior range three bars back: low b - 0.001, high b + 0.001
    bars.push(Bar::new(b - 0.0005, b + 0.001, b - 0.001, b));
    bars.push(Bar::new(b, b - 0.001, b - 0.003, b - 0.002));
    // dips to b - 0.003, closes back inside at b + 0.0005, stays under prior high
    bars.push(Bar::new(b - 0.002, b + 0.0008, b - 0.003, b + 0.0005));
    bars
}

/// Provider order: newest bar first.
pub fn newest_first(mut chronological: Vec<Bar>) -> Vec<Bar> {
    chronological.reverse();
    chronological
}
