use std::path::{Path, PathBuf};

use crate::chart::{EnsembleChart, InsetBounds};
use crate::color::Colormap;
use crate::config::EnsembleConfig;
use crate::data::label::LabelStrategy;
use crate::data::loader::{extract, load_measured};
use crate::data::model::MetricSchema;
use crate::data::time::{convert, TimeUnit};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// File discovery
// ---------------------------------------------------------------------------

/// Regular files directly inside `dir` whose names match `pattern`, sorted.
///
/// Names starting with `.` only match patterns that also start with `.`.
/// The pattern covers file names only; one with a path separator is rejected.
pub fn discover(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    check_pattern(pattern)?;
    let io_err = |source| Error::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut matches = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            log::warn!("skipping non UTF-8 file name {:?}", entry.file_name());
            continue;
        };
        if name.starts_with('.') && !pattern.starts_with('.') {
            continue;
        }
        if wildcard_match(pattern, &name) {
            matches.push(path);
        }
    }
    matches.sort();
    Ok(matches)
}

/// Reject patterns that could never match a bare file name.
pub fn check_pattern(pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        return Err(Error::InvalidConfig("pattern is empty".to_string()));
    }
    if pattern.contains(['/', '\\']) {
        return Err(Error::InvalidConfig(format!(
            "pattern '{pattern}' contains a path separator; put the directory in data_dir"
        )));
    }
    Ok(())
}

/// Shell-style wildcard match of a whole name: `*`, `?`, `[abc]`, `[a-z]`,
/// `[!abc]`. An unterminated `[` matches itself.
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    let pat: Vec<char> = pattern.chars().collect();
    let txt: Vec<char> = name.chars().collect();

    let (mut p, mut t) = (0, 0);
    // Last `*` seen and the text position it is currently absorbing up to.
    let mut backtrack: Option<(usize, usize)> = None;

    while t < txt.len() {
        let step = match pat.get(p) {
            Some('*') => {
                backtrack = Some((p, t));
                p += 1;
                continue;
            }
            Some('?') => Some(1),
            Some('[') => match match_class(&pat[p..], txt[t]) {
                Some((true, len)) => Some(len),
                Some((false, _)) => None,
                None if txt[t] == '[' => Some(1),
                None => None,
            },
            Some(&c) if c == txt[t] => Some(1),
            _ => None,
        };

        match step {
            Some(len) => {
                p += len;
                t += 1;
            }
            None => match backtrack {
                Some((star, absorbed)) => {
                    p = star + 1;
                    t = absorbed + 1;
                    backtrack = Some((star, absorbed + 1));
                }
                None => return false,
            },
        }
    }

    pat[p..].iter().all(|&c| c == '*')
}

/// Match `c` against the bracket expression at the start of `pat`.
/// Returns `(matched, pattern_len)`, or `None` if the bracket is unterminated.
fn match_class(pat: &[char], c: char) -> Option<(bool, usize)> {
    let mut i = 1;
    let negate = matches!(pat.get(i), Some('!') | Some('^'));
    if negate {
        i += 1;
    }
    let start = i;
    let mut matched = false;

    while i < pat.len() {
        if pat[i] == ']' && i > start {
            return Some((matched != negate, i + 1));
        }
        if i + 2 < pat.len() && pat[i + 1] == '-' && pat[i + 2] != ']' {
            if pat[i] <= c && c <= pat[i + 2] {
                matched = true;
            }
            i += 3;
        } else {
            if pat[i] == c {
                matched = true;
            }
            i += 1;
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Ensemble orchestration
// ---------------------------------------------------------------------------

/// Where an ensemble's files live and how each one becomes a chart series.
#[derive(Debug, Clone)]
pub struct Ensemble {
    pub data_dir: PathBuf,
    pub pattern: String,
    pub time_delta: f64,
    pub time_unit: TimeUnit,
    pub colormap: Colormap,
    pub label_strategy: LabelStrategy,
    pub inset: Option<InsetBounds>,
}

impl Ensemble {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        pattern: impl Into<String>,
        label_strategy: LabelStrategy,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            pattern: pattern.into(),
            time_delta: 60.0,
            time_unit: TimeUnit::default(),
            colormap: Colormap::default(),
            label_strategy,
            inset: None,
        }
    }

    pub fn from_config(cfg: &EnsembleConfig) -> Self {
        Self {
            data_dir: cfg.data_dir.clone(),
            pattern: cfg.pattern.clone(),
            time_delta: cfg.time_delta,
            time_unit: cfg.time_unit,
            colormap: cfg.colormap,
            label_strategy: cfg.label_strategy,
            inset: cfg.draw_inset.then_some(cfg.inset),
        }
    }

    pub fn time(mut self, time_delta: f64, time_unit: TimeUnit) -> Self {
        self.time_delta = time_delta;
        self.time_unit = time_unit;
        self
    }

    pub fn colormap(mut self, colormap: Colormap) -> Self {
        self.colormap = colormap;
        self
    }

    pub fn inset(mut self, bounds: InsetBounds) -> Self {
        self.inset = Some(bounds);
        self
    }

    /// Empty chart whose colour cycle has one entry per file.
    pub fn empty_chart(&self, n_files: usize) -> EnsembleChart {
        let chart = EnsembleChart::new(
            self.colormap.cycle(n_files),
            self.time_delta,
            self.time_unit,
        );
        match self.inset {
            Some(bounds) => chart.with_inset(bounds),
            None => chart,
        }
    }

    /// Extract `metric` from one file and append it to `chart`.
    pub fn plot_file<M: MetricSchema>(
        &self,
        chart: EnsembleChart,
        path: &Path,
        metric: M,
    ) -> Result<EnsembleChart> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let label = self.label_strategy.label(file_name)?;
        let (time_step, values) = extract(path, metric)?;
        let x = convert(&time_step, self.time_delta, self.time_unit);
        log::info!("{file_name}: {} points as '{label}'", x.len());
        Ok(chart.with_series(label, x, values))
    }

    /// Plot every matching file, in sorted order, onto one chart.
    pub fn run<M: MetricSchema>(&self, metric: M) -> Result<EnsembleChart> {
        let files = discover(&self.data_dir, &self.pattern)?;
        if files.is_empty() {
            log::warn!(
                "no files match '{}' in {}",
                self.pattern,
                self.data_dir.display()
            );
        }

        let mut chart = self.empty_chart(files.len());
        for path in &files {
            chart = self.plot_file(chart, path, metric)?;
        }
        log::info!("plotted {} series of {metric}", chart.len());
        Ok(chart.with_axis_labels(metric))
    }
}

/// Plot `metric` from every file matching `pattern` in `directory`.
pub fn run<M: MetricSchema>(
    directory: &Path,
    pattern: &str,
    metric: M,
    time_delta: f64,
    time_unit: TimeUnit,
    label_strategy: LabelStrategy,
) -> Result<EnsembleChart> {
    Ensemble::new(directory, pattern, label_strategy)
        .time(time_delta, time_unit)
        .run(metric)
}

/// Run a whole session described by `cfg`: ensemble, measured data and
/// line-label anchors.
pub fn run_config(cfg: &EnsembleConfig) -> Result<EnsembleChart> {
    cfg.validate()?;
    let mut chart = Ensemble::from_config(cfg).run(cfg.metric)?;

    if cfg.line_labels {
        chart = chart.with_line_labels(&cfg.line_label_x);
    }
    if let Some(path) = cfg.measured_data_path() {
        let (raw_time, values) = load_measured(&path)?;
        log::info!("{}: {} measured points", path.display(), values.len());
        chart = chart.with_measured(&raw_time, values);
    }
    Ok(chart)
}
