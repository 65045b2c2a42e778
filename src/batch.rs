//! Conversion of many chart files at once.
//!
//! Each chart is converted independently: an error on one file is recorded in the
//! [`BatchReport`] and logged, and never stops the others. With the `parallel` feature the files
//! are converted on the [`rayon`] thread pool.
//!
//! A batch runs in two passes. All charts are converted in memory first, then the output names
//! are claimed in input order and the claimed beatmaps are written. So two charts with the same
//! output name never race for one file: the later input fails with
//! [`ChartError::DuplicateOutput`].
//!
//! An output file only appears when its conversion has fully succeeded. The text is written into
//! a temporary file in the output directory, then renamed into place.

use std::{
    collections::{HashMap, HashSet},
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::{
    convert::{ConvertConfig, ConvertError, ConvertOutput, convert_chart},
    malody::{ChartMode, McParseError, parse_mc},
};

/// Extension of Malody chart files.
pub const CHART_EXTENSION: &str = "mc";

/// Errors on converting a chart file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChartError {
    /// Failed to read the chart or to write the beatmap.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        /// The file which failed.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// Failed to parse the chart.
    #[error("parse error: {0}")]
    Parse(#[from] McParseError),
    /// Failed to convert the chart.
    #[error("conversion error: {0}")]
    Convert(#[from] ConvertError),
    /// An earlier input of the batch already produces the same output file.
    #[error("output {file_name} is already produced by {}", .first.display())]
    DuplicateOutput {
        /// The output file name.
        file_name: String,
        /// The input which claimed the name first.
        first: PathBuf,
    },
}

/// Result of [`convert_batch`]. Every list is in the order of the inputs.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Paths of the written beatmaps.
    pub converted: Vec<PathBuf>,
    /// Inputs which are not key mode charts, with their modes.
    pub skipped: Vec<(PathBuf, ChartMode)>,
    /// Inputs which failed with their errors.
    pub failed: Vec<(PathBuf, ChartError)>,
}

impl BatchReport {
    /// Number of the processed inputs.
    #[must_use]
    pub fn total(&self) -> usize {
        self.converted.len() + self.skipped.len() + self.failed.len()
    }

    /// Whether no input failed. Skipped inputs are not failures.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Whether the whole run should be reported as failed.
    ///
    /// It is when there was no input, or when nothing was converted and some input failed.
    #[must_use]
    pub fn exit_failure(&self) -> bool {
        self.total() == 0 || (self.converted.is_empty() && !self.is_success())
    }
}

fn has_chart_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(CHART_EXTENSION))
}

/// Collects chart files from the paths given by a user.
///
/// A file is taken if it has the `.mc` extension. A directory is scanned for `.mc` files, not
/// recursively, in the order of their paths. Other paths are logged and skipped. A file reached
/// more than once is taken only the first time.
#[must_use]
pub fn collect_inputs<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            match fs::read_dir(path) {
                Ok(entries) => {
                    let mut charts: Vec<_> = entries
                        .filter_map(Result::ok)
                        .map(|entry| entry.path())
                        .filter(|entry| entry.is_file() && has_chart_extension(entry))
                        .collect();
                    charts.sort();
                    if charts.is_empty() {
                        log::warn!("no .{CHART_EXTENSION} file in {}", path.display());
                    }
                    found.extend(charts);
                }
                Err(err) => log::warn!("cannot read directory {}: {err}", path.display()),
            }
        } else if path.is_file() {
            if has_chart_extension(path) {
                found.push(path.to_path_buf());
            } else {
                log::warn!("{} is not a .{CHART_EXTENSION} file, skipping", path.display());
            }
        } else {
            log::warn!("{} does not exist, skipping", path.display());
        }
    }

    let mut seen = HashSet::new();
    found.retain(|path| {
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.clone());
        let first = seen.insert(key);
        if !first {
            log::debug!("{} is given more than once", path.display());
        }
        first
    });
    found
}

/// Writes `contents` into `dir/file_name` so that the file appears only when fully written.
///
/// # Errors
///
/// Returns the I/O error of creating, writing or renaming the temporary file. The temporary file
/// is removed on failure.
pub fn write_atomically(dir: &Path, file_name: &str, contents: &str) -> io::Result<PathBuf> {
    let dest = dir.join(file_name);
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(&dest)?;
    Ok(dest)
}

fn read_and_convert(path: &Path, config: &ConvertConfig) -> Result<ConvertOutput, ChartError> {
    let source = fs::read_to_string(path).map_err(|source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let chart = parse_mc(&source)?;
    Ok(convert_chart(chart, config)?)
}

fn write_output(out_dir: &Path, output: &ConvertOutput) -> Result<PathBuf, ChartError> {
    let text = output.beatmap.render();
    write_atomically(out_dir, &output.file_name, &text).map_err(|source| ChartError::Io {
        path: out_dir.join(&output.file_name),
        source,
    })
}

/// Reads, converts and writes one chart file into `out_dir`.
///
/// # Errors
///
/// Returns [`ChartError`] if any step fails. No file is written then.
pub fn convert_file(
    path: &Path,
    out_dir: &Path,
    config: &ConvertConfig,
) -> Result<PathBuf, ChartError> {
    let output = read_and_convert(path, config)?;
    write_output(out_dir, &output)
}

fn map_charts<T, U, F>(items: Vec<T>, f: F) -> Vec<U>
where
    T: Send,
    U: Send,
    F: Fn(T) -> U + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items.into_par_iter().map(f).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        items.into_iter().map(f).collect()
    }
}

/// Claims the output names in input order. A name is compared ignoring ASCII case, as some file
/// systems do.
fn claim_output_names<'a>(
    inputs: &'a [PathBuf],
    outputs: Vec<Result<ConvertOutput, ChartError>>,
) -> Vec<(&'a PathBuf, Result<ConvertOutput, ChartError>)> {
    let mut claimed: HashMap<String, &Path> = HashMap::new();
    inputs
        .iter()
        .zip(outputs)
        .map(|(path, result)| {
            let result = result.and_then(|output| {
                let key = output.file_name.to_ascii_lowercase();
                if let Some(first) = claimed.get(&key) {
                    return Err(ChartError::DuplicateOutput {
                        file_name: output.file_name,
                        first: first.to_path_buf(),
                    });
                }
                claimed.insert(key, path);
                Ok(output)
            });
            (path, result)
        })
        .collect()
}

/// Converts every chart file in `inputs` into `out_dir`.
///
/// Failures are collected into the report; they do not stop the other files. Charts of other
/// modes than key are reported as skipped.
#[must_use]
pub fn convert_batch(inputs: &[PathBuf], out_dir: &Path, config: &ConvertConfig) -> BatchReport {
    let outputs = map_charts(inputs.iter().collect(), |path: &PathBuf| {
        read_and_convert(path, config)
    });
    let claimed = claim_output_names(inputs, outputs);
    let results = map_charts(claimed, |(path, result)| {
        (path, result.and_then(|output| write_output(out_dir, &output)))
    });

    let mut report = BatchReport::default();
    for (path, result) in results {
        match result {
            Ok(dest) => {
                log::info!("converted {} into {}", path.display(), dest.display());
                report.converted.push(dest);
            }
            Err(ChartError::Convert(ConvertError::UnsupportedMode(mode))) => {
                log::info!("skipping {}: unsupported chart mode: {mode}", path.display());
                report.skipped.push((path.clone(), mode));
            }
            Err(err) => {
                log::warn!("skipping {}: {err}", path.display());
                report.failed.push((path.clone(), err));
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_extension_is_case_insensitive() {
        assert!(has_chart_extension(Path::new("a/b/chart.mc")));
        assert!(has_chart_extension(Path::new("chart.MC")));
        assert!(!has_chart_extension(Path::new("chart.mcz")));
        assert!(!has_chart_extension(Path::new("mc")));
    }

    #[test]
    fn writes_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let dest = write_atomically(dir.path(), "out.osu", "hello\n").unwrap();
        assert_eq!(dest, dir.path().join("out.osu"));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "hello\n");
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, ["out.osu"]);
    }

    #[test]
    fn exit_failure_rules() {
        let converted = || PathBuf::from("out/a.osu");
        let failed = || {
            (
                PathBuf::from("b.mc"),
                ChartError::Convert(ConvertError::MissingSoundAnchor),
            )
        };
        let skipped = || (PathBuf::from("c.mc"), ChartMode::Catch);

        assert!(BatchReport::default().exit_failure());
        let all_failed = BatchReport {
            failed: vec![failed()],
            ..BatchReport::default()
        };
        assert!(all_failed.exit_failure());
        let mixed = BatchReport {
            converted: vec![converted()],
            skipped: vec![skipped()],
            failed: vec![failed()],
        };
        assert!(!mixed.exit_failure());
        assert!(!mixed.is_success());
        let all_skipped = BatchReport {
            skipped: vec![skipped(), skipped()],
            ..BatchReport::default()
        };
        assert!(!all_skipped.exit_failure());
        assert!(all_skipped.is_success());
        assert_eq!(all_skipped.total(), 2);
        let skipped_and_failed = BatchReport {
            skipped: vec![skipped()],
            failed: vec![failed()],
            ..BatchReport::default()
        };
        assert!(skipped_and_failed.exit_failure());
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(write_atomically(&missing, "out.osu", "x").is_err());
    }
}
