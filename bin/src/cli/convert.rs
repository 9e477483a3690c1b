use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use tablesurvey::{
    CellEdit, SplitPoints, config::Config, edit, export, sink::IoType, split, survey, trim,
};

use super::inputarg::InputArgs;

/// Extracts the table from a PDF, trims, edits and splits it, then writes each part as a CSV file
/// along with a combined SurveyJS survey.
#[derive(Args, Debug)]
pub struct Command {
    #[command(flatten)]
    input: InputArgs,

    /// Path to the directory or ZIP file to write the CSV and JSON files into.
    ///
    /// Whether this is a directory or ZIP file is controlled by --output-type.
    output: PathBuf,

    /// Controls how data is written to the output.
    ///
    /// By default, it guesses, based on any existing directory at the path or the path suffix
    /// ending in ".zip".
    #[arg(long)]
    output_type: Option<IoType>,

    /// Index of the first row to keep. Defaults to the first row.
    #[arg(long)]
    start: Option<usize>,

    /// Index of the last row to keep, inclusive. Defaults to the last row.
    #[arg(long)]
    end: Option<usize>,

    /// Replaces a cell after trimming. ROW counts from 0 within the trimmed rows and COLUMN is a
    /// column name. May be given more than once.
    #[arg(long = "set", value_name = "ROW,COLUMN=VALUE")]
    edits: Vec<CellEdit>,

    /// Options controlling how the trimmed table is split.
    #[command(flatten)]
    split: SplitArgs,
}

/// CLI arguments choosing where to split a table.
#[derive(Args, Clone, Debug, Default)]
#[group(multiple = false)]
pub struct SplitArgs {
    /// Number of evenly sized parts to split the table into, at most one per row.
    #[arg(long)]
    parts: Option<usize>,

    /// Row indices at which each part after the first begins. Must be non-decreasing and less
    /// than the number of rows.
    #[arg(long, value_delimiter(','))]
    split_points: Vec<usize>,
}

impl SplitArgs {
    /// Builds split points for a table of `table_len` rows. Without either option the table is
    /// kept in one part. Every part must start at a row of the table, so there are at most as many
    /// parts as rows.
    fn build(&self, table_len: usize) -> Result<SplitPoints> {
        let points = if !self.split_points.is_empty() {
            if let Some(point) = self.split_points.iter().find(|&&point| point >= table_len) {
                bail!("split point {point} is not a row index of the {table_len} row table");
            }
            SplitPoints::from_interior(table_len, &self.split_points)?
        } else {
            let parts = self.parts.unwrap_or(1);
            let max_parts = table_len.max(1);
            if parts > max_parts {
                bail!(
                    "cannot split {table_len} rows into {parts} parts; at most {max_parts} are \
                     allowed"
                );
            }
            SplitPoints::even(table_len, parts)?
        };
        Ok(points)
    }
}

/// Runs the subcommand.
pub fn run(cmd: &Command, cfg: &Config) -> Result<()> {
    let table = cmd.input.extract_table(cfg)?;

    let trimmed = trim::trim(
        &table,
        cmd.start.unwrap_or(0),
        cmd.end.unwrap_or(usize::MAX),
    );
    let edited = edit::apply_edits(&trimmed, &cmd.edits).context("editing cells")?;
    let points = cmd
        .split
        .build(edited.len())
        .context("choosing split points")?;
    log::info!("Splitting {} rows at {:?}.", edited.len(), points.points());
    let parts = split::split(&edited, &points)?;
    let survey = survey::project(&parts, &cfg.survey);

    let output_type = IoType::resolve_auto(cmd.output_type, &cmd.output);
    let mut sink = output_type
        .new_sink(&cmd.output)
        .with_context(|| format!("opening output path {:?} as {}", cmd.output, output_type))?;
    let written = export::export_all(&parts, &survey, sink.as_mut())?;
    sink.close()
        .with_context(|| format!("closing output {:?}", cmd.output))?;

    for path in &written {
        println!("Wrote {}", cmd.output.join(path).display());
    }
    println!(
        "Import {} into the survey builder at {}",
        export::COMBINED_JSON_FILENAME,
        cfg.survey_builder_url.0
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{fs::File, io::Read, path::Path};

    use anyhow::Result;
    use clap::Parser;
    use googletest::prelude::*;
    use tablesurvey::{
        SplitError, SurveyOptions, Table, TableError,
        config::ExtractionConfig,
        extraction::mock_table,
    };
    use tempfile::{TempDir, tempdir};
    use zip::ZipArchive;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        cmd: Command,
    }

    fn parse(args: &[&str]) -> Result<Command> {
        let cli = TestCli::try_parse_from(std::iter::once("convert").chain(args.iter().copied()))?;
        Ok(cli.cmd)
    }

    fn fast_config() -> Config {
        Config {
            extraction: ExtractionConfig { delay_ms: 0 },
            ..Config::default()
        }
    }

    fn write_pdf(dir: &TempDir) -> Result<String> {
        let path = dir.path().join("input.pdf");
        std::fs::write(&path, b"%PDF-1.4\n")?;
        Ok(path.to_string_lossy().into_owned())
    }

    fn path_arg(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    /// The parts that converting the mock table with `--start 1 --end 3 --parts 2` produces.
    fn expected_parts() -> Result<Vec<Table>> {
        let trimmed = trim::trim(&mock_table()?, 1, 3);
        Ok(split::split(&trimmed, &SplitPoints::even(3, 2)?)?)
    }

    #[gtest]
    fn test_convert_to_directory() -> Result<()> {
        let dir = tempdir()?;
        let pdf = write_pdf(&dir)?;
        let out = dir.path().join("out");
        let cmd = parse(&[
            &pdf,
            &path_arg(&out),
            "--start",
            "1",
            "--end",
            "3",
            "--parts",
            "2",
        ])?;

        run(&cmd, &fast_config())?;

        expect_eq!(
            std::fs::read_to_string(out.join("split_table_1.csv"))?,
            "Item,Quantity,Price\nMouse,10,25\n"
        );
        expect_eq!(
            std::fs::read_to_string(out.join("split_table_2.csv"))?,
            "Item,Quantity,Price\nKeyboard,5,45\nMonitor,3,300\n"
        );
        expect_eq!(
            std::fs::read_to_string(out.join(export::COMBINED_JSON_FILENAME))?,
            export::survey_to_json(&survey::project(
                &expected_parts()?,
                &SurveyOptions::default()
            ))?
        );
        Ok(())
    }

    #[gtest]
    fn test_convert_to_zip() -> Result<()> {
        let dir = tempdir()?;
        let pdf = write_pdf(&dir)?;
        let out = dir.path().join("out.zip");
        let cmd = parse(&[&pdf, &path_arg(&out), "--split-points", "2,4"])?;

        run(&cmd, &fast_config())?;

        let mut archive = ZipArchive::new(File::open(&out)?)?;
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        expect_eq!(
            names,
            vec![
                "combined_tables.json".to_string(),
                "split_table_1.csv".into(),
                "split_table_2.csv".into(),
                "split_table_3.csv".into(),
            ]
        );

        let mut last = String::new();
        archive
            .by_name("split_table_3.csv")?
            .read_to_string(&mut last)?;
        expect_eq!(last, "Item,Quantity,Price\nPrinter,1,150\n");
        Ok(())
    }

    #[gtest]
    fn test_convert_applies_edits_before_splitting() -> Result<()> {
        let dir = tempdir()?;
        let pdf = write_pdf(&dir)?;
        let out = dir.path().join("out");
        let cmd = parse(&[
            &pdf,
            &path_arg(&out),
            "--start",
            "1",
            "--end",
            "3",
            "--parts",
            "2",
            "--set",
            "0,Price=30",
            "--set",
            "2,Item=Display",
        ])?;

        run(&cmd, &fast_config())?;

        expect_eq!(
            std::fs::read_to_string(out.join("split_table_1.csv"))?,
            "Item,Quantity,Price\nMouse,10,30\n"
        );
        expect_eq!(
            std::fs::read_to_string(out.join("split_table_2.csv"))?,
            "Item,Quantity,Price\nKeyboard,5,45\nDisplay,3,300\n"
        );
        Ok(())
    }

    #[gtest]
    fn test_convert_rejects_edit_outside_trimmed_rows() -> Result<()> {
        let dir = tempdir()?;
        let pdf = write_pdf(&dir)?;
        let out = dir.path().join("out");
        let cmd = parse(&[
            &pdf,
            &path_arg(&out),
            "--start",
            "1",
            "--end",
            "3",
            "--set",
            "3,Price=30",
        ])?;

        let err = run(&cmd, &fast_config()).expect_err("row 3 is not in the trimmed rows");
        expect_eq!(
            err.downcast_ref::<TableError>(),
            Some(&TableError::RowOutOfRange { row: 3, len: 3 })
        );
        expect_false!(out.exists());
        Ok(())
    }

    #[gtest]
    fn test_convert_rejects_non_pdf() -> Result<()> {
        let dir = tempdir()?;
        let input = dir.path().join("input.txt");
        std::fs::write(&input, "not a pdf")?;
        let out = dir.path().join("out");
        let cmd = parse(&[&path_arg(&input), &path_arg(&out)])?;

        expect_true!(run(&cmd, &fast_config()).is_err());
        expect_false!(out.exists());
        Ok(())
    }

    #[gtest]
    fn test_parse_rejects_parts_with_split_points() {
        expect_true!(parse(&["in.pdf", "out", "--parts", "2", "--split-points", "1"]).is_err());
    }

    #[gtest]
    fn test_parse_rejects_malformed_edit() {
        expect_true!(parse(&["in.pdf", "out", "--set", "Price=30"]).is_err());
    }

    #[gtest]
    fn test_split_args_default_is_one_part() -> Result<()> {
        let points = SplitArgs::default().build(5)?;

        expect_eq!(points.points(), &[0_usize, 5]);
        Ok(())
    }

    #[gtest]
    fn test_split_args_parts() -> Result<()> {
        let args = SplitArgs {
            parts: Some(2),
            split_points: Vec::new(),
        };

        expect_eq!(args.build(3)?.points(), &[0_usize, 1, 3]);
        Ok(())
    }

    #[gtest]
    fn test_split_args_explicit_points() -> Result<()> {
        let args = SplitArgs {
            parts: None,
            split_points: vec![2, 4],
        };

        expect_eq!(args.build(5)?.points(), &[0_usize, 2, 4, 5]);
        Ok(())
    }

    #[gtest]
    fn test_split_args_zero_parts() {
        let args = SplitArgs {
            parts: Some(0),
            split_points: Vec::new(),
        };

        let err = args.build(5).expect_err("zero parts");
        expect_eq!(err.downcast_ref::<SplitError>(), Some(&SplitError::ZeroParts));
    }

    #[gtest]
    fn test_split_args_too_many_parts() {
        let args = SplitArgs {
            parts: Some(6),
            split_points: Vec::new(),
        };

        let err = args.build(5).expect_err("more parts than rows");
        expect_true!(err.to_string().contains("at most 5"));
        expect_true!(
            SplitArgs {
                parts: Some(5),
                split_points: Vec::new(),
            }
            .build(5)
            .is_ok()
        );
    }

    #[gtest]
    fn test_split_args_empty_table_one_part() -> Result<()> {
        expect_eq!(SplitArgs::default().build(0)?.points(), &[0_usize, 0]);
        Ok(())
    }

    #[gtest]
    fn test_split_args_point_must_be_row_index() {
        let args = SplitArgs {
            parts: None,
            split_points: vec![2, 5],
        };

        let err = args.build(5).expect_err("5 is past the last row");
        expect_true!(err.to_string().contains("split point 5"));
    }

    #[gtest]
    fn test_split_args_decreasing_points() {
        let args = SplitArgs {
            parts: None,
            split_points: vec![3, 1],
        };

        let err = args.build(5).expect_err("decreasing");
        expect_eq!(
            err.downcast_ref::<SplitError>(),
            Some(&SplitError::BeforePrevious {
                index: 2,
                value: 1,
                previous: 3,
            })
        );
    }
}
