use std::path::Path;

use thiserror::Error;

use super::model::{ChartDataset, MAX_SERIES, Point, Series, VisibilityMask};

/// Why a chart file produced no dataset.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Missing, unreadable or not valid UTF-8.
    #[error("reading chart file: {0}")]
    Io(#[from] std::io::Error),
    #[error("expected at least 2 lines, found {lines}")]
    TooShort { lines: usize },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse a chart file, absorbing every failure into `None`.
///
/// Callers treat `None` as "nothing to display for this file"; the reason is
/// logged here.
pub fn parse(path: &Path) -> Option<ChartDataset> {
    match load_chart_file(path) {
        Ok(dataset) => Some(dataset),
        Err(e) => {
            log::warn!("No chart data from {}: {e}", path.display());
            None
        }
    }
}

/// Read and parse a chart file.
pub fn load_chart_file(path: &Path) -> Result<ChartDataset, ParseError> {
    // The handle is closed before parsing starts, on success and on error.
    let text = std::fs::read_to_string(path)?;
    parse_chart_text(&text)
}

/// Parse the textual chart format.
///
/// ```text
/// line 0   header (kept verbatim)
/// line 1   <marker>#<name>#<int>#<int>...   visibility, 1 = visible
/// line 2.. leading '#' lines are skipped
/// then     x1;y1|x2;y2|...|x8;y8
/// ```
pub fn parse_chart_text(text: &str) -> Result<ChartDataset, ParseError> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < 2 {
        return Err(ParseError::TooShort { lines: lines.len() });
    }

    let visibility = parse_visibility(lines[1]);

    let mut series: Vec<Series> = vec![Vec::new(); MAX_SERIES];
    let data_lines = lines[2..].iter().skip_while(|line| line.starts_with('#'));
    for line in data_lines {
        // Malformed segments are dropped before indexing, so later segments
        // shift down into the freed series slot.
        for (slot, point) in series.iter_mut().zip(parse_data_line(line)) {
            slot.push(point);
        }
    }

    Ok(ChartDataset::new(lines[0], series, visibility))
}

// ---------------------------------------------------------------------------
// Line helpers
// ---------------------------------------------------------------------------

fn parse_visibility(line: &str) -> VisibilityMask {
    VisibilityMask::from_flags(
        line.split('#')
            .skip(2)
            .filter_map(|field| field.trim().parse::<i32>().ok())
            .map(|value| value == 1),
    )
}

/// Valid points of one data line, in order, malformed segments removed.
fn parse_data_line(line: &str) -> impl Iterator<Item = Point> + '_ {
    line.split('|').filter_map(parse_segment)
}

fn parse_segment(segment: &str) -> Option<Point> {
    let mut fields = segment.split(';');
    let (x, y) = match (fields.next(), fields.next(), fields.next()) {
        (Some(x), Some(y), None) => (x, y),
        _ => return None,
    };
    let x = parse_coordinate(x)?;
    let y = parse_coordinate(y)?;
    Some(Point::new(x, y))
}

fn parse_coordinate(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_worked_example() {
        let ds = parse_chart_text("hdr\n#f#1#0#1\n1;2|3;4\n5;6|7;8").unwrap();
        assert_eq!(ds.visibility().as_slice(), &[true, false, true]);
        assert_eq!(ds.series()[0], pts(&[(1.0, 2.0), (5.0, 6.0)]));
        assert_eq!(ds.series()[1], pts(&[(3.0, 4.0), (7.0, 8.0)]));
        for s in &ds.series()[2..] {
            assert!(s.is_empty());
        }
        assert_eq!(ds.header(), "hdr");
    }

    #[test]
    fn test_full_visibility_line() {
        let ds = parse_chart_text("#standard#a.txt\n#visibility#1#0#1#1#0#0#1#0\n").unwrap();
        assert_eq!(
            ds.visibility().as_slice(),
            &[true, false, true, true, false, false, true, false]
        );
    }

    #[test]
    fn test_visibility_drops_non_integers_and_caps_at_eight() {
        let ds = parse_chart_text("h\n#v#1#x#0#2#1#1#1#1#1#1#1\n").unwrap();
        // "x" is dropped, so "0" lands in slot 1; "2" is hidden.
        assert_eq!(
            ds.visibility().as_slice(),
            &[true, false, false, true, true, true, true, true]
        );
    }

    #[test]
    fn test_malformed_segment_repacks_following_segments() {
        let ds = parse_chart_text("h\n#v#1#1#1\nabc;1.0|3;4|5;6;7|8;9|10\n").unwrap();
        assert_eq!(ds.series()[0], pts(&[(3.0, 4.0)]));
        assert_eq!(ds.series()[1], pts(&[(8.0, 9.0)]));
        assert!(ds.series()[2].is_empty());
    }

    #[test]
    fn test_non_finite_values_are_dropped() {
        let ds = parse_chart_text("h\n#v#1\nNaN;1|inf;2|1;2\n").unwrap();
        assert_eq!(ds.series()[0], pts(&[(1.0, 2.0)]));
        assert_eq!(ds.populated_series(), 1);
    }

    #[test]
    fn test_leading_comment_lines_are_skipped_as_prefix() {
        let text = "h\n#v#1#1\n#comment\n#another\n1;1|2;2\n#not skipped\n3;3\n";
        let ds = parse_chart_text(text).unwrap();
        assert_eq!(ds.series()[0], pts(&[(1.0, 1.0), (3.0, 3.0)]));
        assert_eq!(ds.series()[1], pts(&[(2.0, 2.0)]));
    }

    #[test]
    fn test_extra_segments_are_ignored() {
        let line = (0..10).map(|i| format!("{i};{i}")).collect::<Vec<_>>().join("|");
        let ds = parse_chart_text(&format!("h\n#v#1\n{line}\n")).unwrap();
        assert_eq!(ds.series().len(), MAX_SERIES);
        assert_eq!(ds.series()[7], pts(&[(7.0, 7.0)]));
        assert_eq!(ds.total_points(), MAX_SERIES);
    }

    #[test]
    fn test_crlf_and_whitespace() {
        let ds = parse_chart_text("h\r\n#v#1 #0\r\n 1.5 ; -2e3 |4;5\r\n").unwrap();
        assert_eq!(ds.visibility().as_slice(), &[true, false]);
        assert_eq!(ds.series()[0], pts(&[(1.5, -2000.0)]));
        assert_eq!(ds.series()[1], pts(&[(4.0, 5.0)]));
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(
            parse_chart_text(""),
            Err(ParseError::TooShort { lines: 0 })
        ));
        assert!(matches!(
            parse_chart_text("only header\n"),
            Err(ParseError::TooShort { lines: 1 })
        ));
    }

    #[test]
    fn test_parse_file() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("chart.txt");
        std::fs::write(&path, "#standard#chart.txt\n#visibility#1#1\n0;1|0;2\n1;3|1;4\n").unwrap();

        let ds = parse(&path).unwrap();
        assert_eq!(ds.title(), "chart.txt");
        assert_eq!(ds.series()[0], pts(&[(0.0, 1.0), (1.0, 3.0)]));
        assert_eq!(ds.series()[1], pts(&[(0.0, 2.0), (1.0, 4.0)]));
    }

    #[test]
    fn test_short_or_missing_file_is_absent() {
        let tempdir = tempfile::tempdir().unwrap();
        let short = tempdir.path().join("short.txt");
        std::fs::write(&short, "header only").unwrap();
        assert!(parse(&short).is_none());

        let missing = tempdir.path().join("missing.txt");
        assert!(matches!(load_chart_file(&missing), Err(ParseError::Io(_))));
        assert!(parse(&missing).is_none());
    }

    #[test]
    fn test_invalid_utf8_is_io_error() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("binary.txt");
        std::fs::write(&path, [0x68, 0x0a, 0xff, 0xfe, 0x0a]).unwrap();
        assert!(matches!(load_chart_file(&path), Err(ParseError::Io(_))));
    }
}
