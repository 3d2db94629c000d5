//! Shape rasterization primitives for particle rendering.
//!
//! Converts geometric shapes into integer pixel coordinates. Results are not
//! clipped; callers drop the coordinates that fall outside their surface.

/// Rasterize a filled disk.
///
/// Returns every integer point `(x, y)` with `(x - cx)² + (y - cy)² <= radius²`,
/// one horizontal span per row from top to bottom. A radius of zero yields
/// the centre pixel alone.
///
/// # Examples
///
/// ```
/// use skyburst::shapes::rasterize_disk;
///
/// let pixels = rasterize_disk(5, 5, 1);
/// assert_eq!(pixels.len(), 5);
/// assert!(pixels.contains(&(5, 5)));
/// assert!(!pixels.contains(&(6, 6)));
/// ```
pub fn rasterize_disk(cx: i32, cy: i32, radius: u32) -> Vec<(i32, i32)> {
    // Work in i64 so that radius² cannot overflow
    let r = radius as i64;
    let r_sq = r * r;
    let (cx, cy) = (cx as i64, cy as i64);

    let mut pixels = Vec::new();
    for dy in -r..=r {
        let half = isqrt(r_sq - dy * dy);
        for dx in -half..=half {
            pixels.push(((cx + dx) as i32, (cy + dy) as i32));
        }
    }
    pixels
}

/// Largest `k` with `k * k <= n`.
fn isqrt(n: i64) -> i64 {
    if n <= 0 {
        return 0;
    }
    let mut k = (n as f64).sqrt() as i64;
    while k * k > n {
        k -= 1;
    }
    while (k + 1) * (k + 1) <= n {
        k += 1;
    }
    k
}
