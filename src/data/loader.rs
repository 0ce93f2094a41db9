use std::path::Path;

use super::model::{Metric, MetricSchema, TIME_STEP};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read `path` and return the timestep series together with `metric`'s series.
///
/// Every column in `M::USECOLS` is parsed for every row, whichever metric is
/// asked for, so a short or malformed file fails the same way for all of them.
pub fn extract<M: MetricSchema>(path: &Path, metric: M) -> Result<(Vec<f64>, Vec<f64>)> {
    let mut columns = read_columns(path, M::USECOLS)?;
    log::debug!(
        "{}: {} rows, extracting {metric}",
        path.display(),
        columns[TIME_STEP].len()
    );
    let series = metric.series(&columns);
    let time_step = columns.swap_remove(TIME_STEP);
    Ok((time_step, series))
}

/// [`extract`] for a CAESAR timeseries file with the metric given by name.
///
/// The name is resolved before the file is opened.
pub fn extract_named(path: &Path, metric_name: &str) -> Result<(Vec<f64>, Vec<f64>)> {
    let metric: Metric = metric_name.parse()?;
    extract(path, metric)
}

/// Load whitespace-delimited numeric columns, column-major.
///
/// `result[i]` holds file column `usecols[i]`. Blank lines and anything after
/// a `#` are ignored.
pub fn read_columns(path: &Path, usecols: &[usize]) -> Result<Vec<Vec<f64>>> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_columns(path, &text, usecols)
}

// ---------------------------------------------------------------------------
// Whitespace-delimited parser
// ---------------------------------------------------------------------------

fn parse_columns(path: &Path, text: &str, usecols: &[usize]) -> Result<Vec<Vec<f64>>> {
    let required = usecols.iter().max().map_or(0, |&c| c + 1);
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); usecols.len()];

    for (line_idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.split('#').next().unwrap_or("");
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        let line_no = line_idx + 1;

        if tokens.len() < required {
            return Err(Error::ShortRow {
                path: path.to_path_buf(),
                line: line_no,
                found: tokens.len(),
                required,
            });
        }

        for (out, &col) in columns.iter_mut().zip(usecols) {
            let tok = tokens[col];
            let value = tok.parse::<f64>().map_err(|source| Error::Parse {
                path: path.to_path_buf(),
                line: line_no,
                column: col,
                token: tok.to_string(),
                source,
            })?;
            out.push(value);
        }
    }

    Ok(columns)
}

// ---------------------------------------------------------------------------
// Measured data (CSV)
// ---------------------------------------------------------------------------

/// Load externally recorded data, e.g. gauging-station discharge.
///
/// The file is comma-delimited with no header: `timestep, value` per row.
/// Lines starting with `#` are skipped.
pub fn load_measured(path: &Path) -> Result<(Vec<f64>, Vec<f64>)> {
    let to_err = |source: csv::Error| Error::MeasuredData {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(to_err)?;

    let mut x = Vec::new();
    let mut y = Vec::new();
    for record in reader.deserialize::<(f64, f64)>() {
        let (t, v) = record.map_err(to_err)?;
        x.push(t);
        y.push(v);
    }
    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::InundationMetric;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// One CAESAR row with 14 columns. Column 3 holds `skipped`.
    fn caesar_row(t: f64, q1: f64, q2: f64, skipped: &str, sed: f64) -> String {
        let grains: Vec<String> = (1..=9).map(|d| format!("{}", d as f64 / 100.0)).collect();
        format!("{t} {q1} {q2} {skipped} {sed} {}\n", grains.join(" "))
    }

    fn write_file(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn test_sed_tot_reads_column_four() {
        let content = caesar_row(0.0, 10.0, 10.0, "999", 2.0) + &caesar_row(1.0, 8.0, 9.0, "-5", 1.0);
        let f = write_file(&content);

        let (t, sed) = extract(f.path(), Metric::SedTot).unwrap();
        assert_eq!(t, vec![0.0, 1.0]);
        assert_eq!(sed, vec![2.0, 1.0]);

        let (_, cum) = extract(f.path(), Metric::CumulativeSedTot).unwrap();
        assert_eq!(cum, vec![2.0, 3.0]);

        let (_, q) = extract(f.path(), Metric::QTopmodel).unwrap();
        assert_eq!(q, vec![10.0, 9.0]);

        let (_, d9) = extract(f.path(), Metric::D9).unwrap();
        assert_eq!(d9, vec![0.09, 0.09]);
    }

    #[test]
    fn test_column_three_is_never_parsed() {
        let content = caesar_row(0.0, 1.0, 1.0, "not-a-number", 0.5);
        let f = write_file(&content);
        let (_, q) = extract(f.path(), Metric::QLisflood).unwrap();
        assert_eq!(q, vec![1.0]);
    }

    #[test]
    fn test_blank_lines_and_comments_are_skipped() {
        let content = format!(
            "# timestep q_lisflood ...\n\n{}   \n{}",
            caesar_row(0.0, 1.0, 1.0, "0", 0.5).trim_end(),
            caesar_row(1.0, 2.0, 1.0, "0", 0.5)
        );
        let f = write_file(&content);
        let (t, q) = extract(f.path(), Metric::QLisflood).unwrap();
        assert_eq!(t, vec![0.0, 1.0]);
        assert_eq!(q, vec![1.0, 2.0]);
    }

    #[test]
    fn test_short_row_fails_with_line_number() {
        let content = caesar_row(0.0, 1.0, 1.0, "0", 0.5) + "1 2 3 4 5\n";
        let f = write_file(&content);
        let err = extract(f.path(), Metric::QLisflood).unwrap_err();
        match err {
            Error::ShortRow {
                line,
                found,
                required,
                ..
            } => {
                assert_eq!(line, 2);
                assert_eq!(found, 5);
                assert_eq!(required, 14);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_token_fails() {
        let content = caesar_row(0.0, 1.0, 1.0, "0", 0.5).replacen("1 1", "1 abc", 1);
        let f = write_file(&content);
        let err = extract(f.path(), Metric::QLisflood).unwrap_err();
        assert!(matches!(err, Error::Parse { column: 2, ref token, .. } if token == "abc"));
    }

    #[test]
    fn test_unknown_name_fails_before_reading() {
        let err = extract_named(Path::new("/does/not/exist.dat"), "q_losflood").unwrap_err();
        assert!(matches!(err, Error::UnknownMetric(_)));

        let err = extract_named(Path::new("/does/not/exist.dat"), "q_lisflood").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_inundation_schema() {
        let f = write_file("0 100 0.1 0.2 0.3\n1 150 0.2 0.4 0.6\n");
        let (t, depth) = extract(f.path(), InundationMetric::ChannelDepth).unwrap();
        assert_eq!(t, vec![0.0, 1.0]);
        assert_eq!(depth, vec![0.3, 0.6]);
    }

    #[test]
    fn test_empty_file_gives_empty_series() {
        let f = write_file("");
        let (t, q) = extract(f.path(), Metric::QLisflood).unwrap();
        assert!(t.is_empty());
        assert!(q.is_empty());
    }

    #[test]
    fn test_load_measured_csv() {
        let f = write_file("0, 1.5\n1,2.5\n2 , 4.0\n");
        let (x, y) = load_measured(f.path()).unwrap();
        assert_eq!(x, vec![0.0, 1.0, 2.0]);
        assert_eq!(y, vec![1.5, 2.5, 4.0]);
    }

    #[test]
    fn test_load_measured_skips_comment_lines() {
        let f = write_file("# gauge: Ryedale, 15 min\n0,1.5\n# gap\n1,2.5\n");
        let (x, y) = load_measured(f.path()).unwrap();
        assert_eq!(x, vec![0.0, 1.0]);
        assert_eq!(y, vec![1.5, 2.5]);
    }

    #[test]
    fn test_load_measured_rejects_text() {
        let f = write_file("0,1.5\nfoo,2\n");
        assert!(matches!(
            load_measured(f.path()).unwrap_err(),
            Error::MeasuredData { .. }
        ));
    }
}
