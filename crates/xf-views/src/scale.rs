//! Linear scales between value space and pixels

/// Linear mapping from a value domain to a pixel range.
///
/// Forward mapping rounds to whole pixels (d3's `rangeRound`); the inverse
/// does not round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
    pub round: bool,
}

impl LinearScale {
    /// Scale with rounded output, as used for the x axes
    pub fn rounded(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range, round: true }
    }

    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range, round: false }
    }

    fn span(&self) -> f64 {
        self.domain.1 - self.domain.0
    }

    /// Value to pixel
    pub fn map(&self, value: f64) -> f64 {
        let span = self.span();
        let t = if span == 0.0 { 0.0 } else { (value - self.domain.0) / span };
        let px = self.range.0 + t * (self.range.1 - self.range.0);
        if self.round { px.round() } else { px }
    }

    /// Pixel to value
    pub fn invert(&self, px: f64) -> f64 {
        let extent = self.range.1 - self.range.0;
        let t = if extent == 0.0 { 0.0 } else { (px - self.range.0) / extent };
        self.domain.0 + t * self.span()
    }

    /// Clamp a pixel position into the range
    pub fn clamp_px(&self, px: f64) -> f64 {
        let (a, b) = self.range;
        px.clamp(a.min(b), a.max(b))
    }

    /// Roughly `count` evenly spaced round values inside the domain
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = (self.domain.0.min(self.domain.1), self.domain.0.max(self.domain.1));
        let step = tick_step(lo, hi, count);
        if step <= 0.0 || !step.is_finite() {
            return Vec::new();
        }
        let start = (lo / step).ceil() as i64;
        let stop = (hi / step).floor() as i64;
        (start..=stop).map(|i| i as f64 * step).collect()
    }
}

/// Step of 1, 2 or 5 times a power of ten giving about `count` ticks
pub fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    let span = hi - lo;
    if span <= 0.0 || count == 0 {
        return 0.0;
    }
    let raw = span / count as f64;
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * power
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_and_invert() {
        let x = LinearScale::rounded((0.0, 24.0), (0.0, 240.0));
        assert_eq!(x.map(12.0), 120.0);
        assert_eq!(x.map(0.04), 0.0);
        assert_eq!(x.invert(120.0), 12.0);
        assert_eq!(x.invert(x.map(6.0)), 6.0);
    }

    #[test]
    fn test_inverted_range_for_y() {
        let y = LinearScale::new((0.0, 10.0), (100.0, 0.0));
        assert_eq!(y.map(0.0), 100.0);
        assert_eq!(y.map(10.0), 0.0);
        assert_eq!(y.map(5.0), 50.0);
        assert_eq!(y.clamp_px(120.0), 100.0);
    }

    #[test]
    fn test_degenerate_domain() {
        let x = LinearScale::rounded((5.0, 5.0), (0.0, 100.0));
        assert_eq!(x.map(5.0), 0.0);
        assert_eq!(x.invert(50.0), 5.0);
    }

    #[test]
    fn test_ticks() {
        let x = LinearScale::rounded((30.0, 200.0), (0.0, 400.0));
        assert_eq!(x.ticks(10), vec![40.0, 60.0, 80.0, 100.0, 120.0, 140.0, 160.0, 180.0, 200.0]);
        let hours = LinearScale::rounded((0.0, 24.0), (0.0, 240.0));
        assert_eq!(hours.ticks(10).first(), Some(&0.0));
        assert_eq!(hours.ticks(10).last(), Some(&24.0));
    }
}
