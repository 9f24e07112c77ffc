use std::fmt;

/// Maximum number of series a single chart file can carry.
pub const MAX_SERIES: usize = 8;

// ---------------------------------------------------------------------------
// Point / Series
// ---------------------------------------------------------------------------

/// One sample of a series. Both coordinates are finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// Points in the order they appeared in the source file.
pub type Series = Vec<Point>;

// ---------------------------------------------------------------------------
// VisibilityMask – which series slots are drawn
// ---------------------------------------------------------------------------

/// Per-series visibility flags.
///
/// The mask may declare fewer than [`MAX_SERIES`] entries; any slot past the
/// declared length reads as hidden and cannot be toggled on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityMask {
    flags: Vec<bool>,
}

impl VisibilityMask {
    /// Build a mask from flags, keeping at most [`MAX_SERIES`] of them.
    pub fn from_flags<I>(flags: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        VisibilityMask {
            flags: flags.into_iter().take(MAX_SERIES).collect(),
        }
    }

    /// A mask with every slot declared and visible.
    pub fn all_visible() -> Self {
        Self::from_flags(std::iter::repeat(true))
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    /// Flip a declared slot. Returns `false` when `index` is not declared.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.flags.get_mut(index) {
            Some(flag) => {
                *flag = !*flag;
                true
            }
            None => false,
        }
    }

    /// Number of declared slots (≤ [`MAX_SERIES`]).
    pub fn declared_len(&self) -> usize {
        self.flags.len()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.flags
    }

    /// The mask padded with hidden slots up to [`MAX_SERIES`].
    pub fn padded(&self) -> [bool; MAX_SERIES] {
        let mut out = [false; MAX_SERIES];
        out[..self.flags.len()].copy_from_slice(&self.flags);
        out
    }
}

impl fmt::Display for VisibilityMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for flag in &self.flags {
            f.write_str(if *flag { "1" } else { "0" })?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ChartDataset – the parsed content of one file
// ---------------------------------------------------------------------------

/// All series of one chart file plus the visibility it declared.
///
/// Immutable once built; the presentation layer copies the mask out and owns
/// its own mutable copy.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataset {
    header: String,
    series: Vec<Series>,
    visibility: VisibilityMask,
}

impl ChartDataset {
    /// Build a dataset. Missing series slots are filled with empty series,
    /// extra ones are discarded.
    pub fn new(header: impl Into<String>, series: Vec<Series>, visibility: VisibilityMask) -> Self {
        let mut series = series;
        series.truncate(MAX_SERIES);
        series.resize_with(MAX_SERIES, Vec::new);
        ChartDataset {
            header: header.into(),
            series,
            visibility,
        }
    }

    /// Raw header line (line 0 of the file).
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Short name for legends: the last non-empty `#` field of the header.
    pub fn title(&self) -> &str {
        self.header
            .split('#')
            .map(str::trim)
            .rfind(|field| !field.is_empty())
            .unwrap_or("untitled")
    }

    /// Always [`MAX_SERIES`] entries; some may be empty.
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn series_at(&self, index: usize) -> Option<&Series> {
        self.series.get(index)
    }

    /// Whether slot `index` holds at least one point.
    pub fn has_data(&self, index: usize) -> bool {
        self.series_at(index).is_some_and(|s| !s.is_empty())
    }

    /// Visibility declared by the file.
    pub fn visibility(&self) -> &VisibilityMask {
        &self.visibility
    }

    /// Number of non-empty series.
    pub fn populated_series(&self) -> usize {
        self.series.iter().filter(|s| !s.is_empty()).count()
    }

    /// Total number of points over all series.
    pub fn total_points(&self) -> usize {
        self.series.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_reads_hidden_past_declared_length() {
        let mask = VisibilityMask::from_flags([true, false, true]);
        assert!(mask.is_visible(0));
        assert!(!mask.is_visible(1));
        assert!(mask.is_visible(2));
        assert!(!mask.is_visible(3));
        assert!(!mask.is_visible(7));
        assert_eq!(
            mask.padded(),
            [true, false, true, false, false, false, false, false]
        );
    }

    #[test]
    fn mask_toggle_only_flips_declared_slots() {
        let mut mask = VisibilityMask::from_flags([true, false]);
        assert!(mask.toggle(1));
        assert!(mask.is_visible(1));
        assert!(!mask.toggle(5));
        assert!(!mask.is_visible(5));
        assert_eq!(mask.to_string(), "11");
    }

    #[test]
    fn mask_keeps_at_most_eight_flags() {
        let mask = VisibilityMask::from_flags(vec![true; 12]);
        assert_eq!(mask.declared_len(), MAX_SERIES);
        assert_eq!(VisibilityMask::all_visible().declared_len(), MAX_SERIES);
    }

    #[test]
    fn dataset_always_has_eight_slots() {
        let ds = ChartDataset::new(
            "#standard#run.txt",
            vec![vec![Point::new(1.0, 2.0)]],
            VisibilityMask::default(),
        );
        assert_eq!(ds.series().len(), MAX_SERIES);
        assert!(ds.has_data(0));
        assert!(!ds.has_data(1));
        assert!(!ds.has_data(42));
        assert_eq!(ds.populated_series(), 1);
        assert_eq!(ds.total_points(), 1);
    }

    #[test]
    fn title_uses_last_header_field() {
        let ds = ChartDataset::new("#standard#run_01.txt", Vec::new(), VisibilityMask::default());
        assert_eq!(ds.title(), "run_01.txt");
        let plain = ChartDataset::new("  bench A ", Vec::new(), VisibilityMask::default());
        assert_eq!(plain.title(), "bench A");
        let blank = ChartDataset::new("##", Vec::new(), VisibilityMask::default());
        assert_eq!(blank.title(), "untitled");
    }
}
