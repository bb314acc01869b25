use std::fs;
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use colored::Colorize;
use datadiff_engine::{DiffConfig, DiffError, Differ, LineKind};
use datadiff_types::Value;
use tracing::debug;

use crate::cli::{Cli, ColorChoice, InputFormat};

/// Whether the two documents matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Same,
    Different,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Same => ExitCode::SUCCESS,
            Self::Different => ExitCode::from(1),
        }
    }
}

pub fn run(cli: &Cli) -> anyhow::Result<Outcome> {
    let config = resolve_config(cli)?;
    debug!(?config, "engine configuration");
    let old = load_value(&cli.old, cli.format)?;
    let new = load_value(&cli.new, cli.format)?;

    let (report, outcome) = compare(&Differ::new(config), &old, &new)?;
    if !report.is_empty() {
        let color = match cli.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::stdout().is_terminal(),
        };
        if color {
            colored::control::set_override(true);
            println!("{}", colorize(&report));
        } else {
            println!("{}", plain(&report));
        }
    }
    Ok(outcome)
}

/// Rendered report lines, tagged for styling.
pub type Report = Vec<(LineKind, String)>;

/// Diff two documents and produce the report to print.
///
/// Values the engine cannot diff structurally are reported as
/// `<old> != <new>`; only unhashable elements and the depth limit are errors.
pub fn compare(differ: &Differ, old: &Value, new: &Value) -> anyhow::Result<(Report, Outcome)> {
    if old == new {
        return Ok((Report::new(), Outcome::Same));
    }
    let report = match differ.diff(old, new) {
        Ok(d) if d.has_changes() => d.render_tagged(0),
        Ok(_) | Err(DiffError::TypeMismatch { .. } | DiffError::NotImplementedForType(_)) => {
            vec![(LineKind::Context, format!("{old} != {new}"))]
        }
        Err(err) => return Err(err).context("failed to diff documents"),
    };
    Ok((report, Outcome::Different))
}

fn resolve_config(cli: &Cli) -> anyhow::Result<DiffConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str::<DiffConfig>(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => DiffConfig::default(),
    };
    if let Some(context) = cli.context {
        config.context = context;
    }
    if let Some(algorithm) = cli.algorithm {
        config.algorithm = algorithm.into();
    }
    if let Some(max_depth) = cli.max_depth {
        config.max_depth = max_depth;
    }
    Ok(config)
}

fn load_value(path: &Path, format: InputFormat) -> anyhow::Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let format = match format {
        InputFormat::Auto => match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => InputFormat::Toml,
            _ => InputFormat::Json,
        },
        explicit => explicit,
    };
    let value = match format {
        InputFormat::Toml => {
            let table: toml::Table = text
                .parse()
                .with_context(|| format!("invalid TOML in {}", path.display()))?;
            Value::from(toml::Value::Table(table))
        }
        _ => {
            let json: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("invalid JSON in {}", path.display()))?;
            Value::from(json)
        }
    };
    Ok(value)
}

fn plain(report: &Report) -> String {
    report
        .iter()
        .map(|(_, line)| line.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

fn colorize(report: &Report) -> String {
    report
        .iter()
        .map(|(kind, line)| match kind {
            LineKind::Header => line.bold().to_string(),
            LineKind::Hunk => line.cyan().to_string(),
            LineKind::Delete => line.red().to_string(),
            LineKind::Insert => line.green().to_string(),
            LineKind::Context => line.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use datadiff_engine::Alignment;
    use std::path::PathBuf;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("datadiff").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn json_documents_are_diffed() {
        let dir = tempfile::tempdir().unwrap();
        let old = load_value(&write(&dir, "a.json", r#"{"items": [3, 4]}"#), InputFormat::Auto).unwrap();
        let new = load_value(&write(&dir, "b.json", r#"{"items": [5, 6]}"#), InputFormat::Auto).unwrap();
        let (report, outcome) = compare(&Differ::default(), &old, &new).unwrap();
        assert_eq!(outcome, Outcome::Different);
        assert_eq!(
            plain(&report),
            "--- a\n+++ b\n{\n-\"items\": [3, 4],\n+\"items\": [5, 6],\n}"
        );
    }

    #[test]
    fn equal_documents_have_no_report() {
        let dir = tempfile::tempdir().unwrap();
        let a = load_value(&write(&dir, "a.json", r#"{"x": 1, "y": 2}"#), InputFormat::Auto).unwrap();
        let b = load_value(&write(&dir, "b.json", r#"{"y": 2, "x": 1}"#), InputFormat::Auto).unwrap();
        let (report, outcome) = compare(&Differ::default(), &a, &b).unwrap();
        assert_eq!(outcome, Outcome::Same);
        assert!(report.is_empty());
    }

    #[test]
    fn toml_by_extension_and_by_flag() {
        let dir = tempfile::tempdir().unwrap();
        let by_ext = load_value(&write(&dir, "a.toml", "name = \"x\"\n"), InputFormat::Auto).unwrap();
        let by_flag = load_value(&write(&dir, "a.conf", "name = \"x\"\n"), InputFormat::Toml).unwrap();
        assert_eq!(by_ext, by_flag);
        assert_eq!(by_ext.get(&Value::from("name")), Some(&Value::from("x")));
    }

    #[test]
    fn toml_nan_equals_itself() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "a.toml", "x = nan\ny = [1.0, nan]\n");
        let a = load_value(&path, InputFormat::Auto).unwrap();
        let b = load_value(&path, InputFormat::Auto).unwrap();
        let (report, outcome) = compare(&Differ::default(), &a, &b).unwrap();
        assert_eq!(outcome, Outcome::Same);
        assert!(report.is_empty());
    }

    #[test]
    fn scalar_documents_fall_back_to_literals() {
        let (report, outcome) =
            compare(&Differ::default(), &Value::Int(1), &Value::from("one")).unwrap();
        assert_eq!(outcome, Outcome::Different);
        assert_eq!(plain(&report), "1 != \"one\"");
    }

    #[test]
    fn depth_limit_is_an_error() {
        let nested = Value::list([Value::list([Value::list([1])])]);
        let other = Value::list([Value::list([Value::list([2])])]);
        let differ = Differ::new(DiffConfig::default().with_max_depth(1));
        let err = compare(&differ, &nested, &other).unwrap_err();
        assert!(err.to_string().contains("failed to diff"));
    }

    #[test]
    fn invalid_json_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "broken.json", "{not json");
        let err = load_value(&path, InputFormat::Auto).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_value(Path::new("/nonexistent/a.json"), InputFormat::Json).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = write(&dir, "diff.toml", "context = 7\nalgorithm = \"myers\"\n");
        let config = config.to_str().unwrap();

        let cli = parse(&["--config", config, "a", "b"]);
        let resolved = resolve_config(&cli).unwrap();
        assert_eq!(resolved.context, 7);
        assert_eq!(resolved.algorithm, Alignment::Myers);
        assert_eq!(resolved.max_depth, 128);

        let cli = parse(&["--config", config, "-U", "1", "--algorithm", "lcs", "a", "b"]);
        let resolved = resolve_config(&cli).unwrap();
        assert_eq!(resolved.context, 1);
        assert_eq!(resolved.algorithm, Alignment::Lcs);
    }

    #[test]
    fn run_reports_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(&dir, "a.json", "[1, 2, 3]");
        let b = write(&dir, "b.json", "[1, 2, 4]");
        let (a, b) = (a.to_str().unwrap(), b.to_str().unwrap());
        assert_eq!(run(&parse(&["--color", "never", a, b])).unwrap(), Outcome::Different);
        assert_eq!(run(&parse(&["--color", "never", a, a])).unwrap(), Outcome::Same);
    }

    #[test]
    fn plain_report_matches_display() {
        let (a, b) = (Value::list([Value::list([1, 2])]), Value::list([Value::list([1, 3])]));
        let (report, _) = compare(&Differ::default(), &a, &b).unwrap();
        assert_eq!(plain(&report), Differ::default().diff(&a, &b).unwrap().to_string());
    }

    #[test]
    fn nested_edits_are_tagged_by_structure() {
        let (a, b) = (Value::list([Value::list([-3, 2])]), Value::list([Value::list([-3, 3])]));
        let (report, _) = compare(&Differ::default(), &a, &b).unwrap();
        assert!(report.contains(&(LineKind::Delete, " -2,".to_owned())));
        assert!(report.contains(&(LineKind::Insert, " +3,".to_owned())));
        assert!(report.contains(&(LineKind::Context, "  -3,".to_owned())));
        let edits = report
            .iter()
            .filter(|(kind, _)| matches!(kind, LineKind::Delete | LineKind::Insert))
            .count();
        assert_eq!(edits, 2);
    }

    #[test]
    fn colorize_styles_by_line_kind() {
        colored::control::set_override(true);
        // Nested edits are colored; an unchanged negative number and a
        // text line that happens to start with `+` are not.
        let report: Report = vec![
            (LineKind::Header, "--- a".to_owned()),
            (LineKind::Hunk, "@@ -0 +0 @@".to_owned()),
            (LineKind::Delete, " -9,".to_owned()),
            (LineKind::Insert, " +10,".to_owned()),
            (LineKind::Context, " -3,".to_owned()),
            (LineKind::Context, " +plus".to_owned()),
        ];
        let lines: Vec<String> = colorize(&report).split('\n').map(str::to_owned).collect();
        assert_eq!(lines[2], " -9,".red().to_string());
        assert_eq!(lines[3], " +10,".green().to_string());
        assert_eq!(lines[4], " -3,");
        assert_eq!(lines[5], " +plus");
        assert_ne!(lines[2], " -9,");
    }
}
