use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Args;
use tablesurvey::{Survey, config::Config, export, survey};

/// Projects previously exported CSV tables into a combined SurveyJS survey, printed as JSON.
#[derive(Args, Debug)]
pub struct Command {
    /// CSV files to include, in order. Each becomes one survey element.
    #[arg(required = true)]
    input_csvs: Vec<PathBuf>,
}

/// Runs the subcommand.
pub fn run(cmd: &Command, cfg: &Config) -> Result<()> {
    let survey = project_files(&cmd.input_csvs, cfg)?;
    println!("{}", export::survey_to_json(&survey)?);
    Ok(())
}

fn project_files(paths: &[PathBuf], cfg: &Config) -> Result<Survey> {
    let tables = paths
        .iter()
        .map(|path| read_table(path))
        .collect::<Result<Vec<_>>>()?;
    Ok(survey::project(&tables, &cfg.survey))
}

fn read_table(path: &Path) -> Result<tablesurvey::Table> {
    let file = File::open(path).with_context(|| format!("opening {path:?}"))?;
    export::read_csv(file).with_context(|| format!("reading table from {path:?}"))
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use googletest::prelude::*;
    use tablesurvey::{SplitPoints, extraction::mock_table, sink::IoType, split, trim};
    use tempfile::tempdir;

    use super::*;

    #[gtest]
    fn test_project_exported_tables_reproduces_survey() -> Result<()> {
        let dir = tempdir()?;
        let cfg = Config::default();
        let trimmed = trim::trim(&mock_table()?, 1, 3);
        let parts = split::split(&trimmed, &SplitPoints::even(3, 2)?)?;
        let expected = survey::project(&parts, &cfg.survey);

        let mut sink = IoType::Dir.new_sink(dir.path())?;
        let written = export::export_all(&parts, &expected, sink.as_mut())?;
        sink.close()?;

        let csv_paths: Vec<PathBuf> = written
            .iter()
            .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
            .map(|path| dir.path().join(path))
            .collect();
        expect_eq!(csv_paths.len(), 2);

        expect_eq!(project_files(&csv_paths, &cfg)?, expected);
        let cmd = Command {
            input_csvs: csv_paths,
        };
        expect_true!(run(&cmd, &cfg).is_ok());
        Ok(())
    }

    #[gtest]
    fn test_project_missing_file() -> Result<()> {
        let dir = tempdir()?;
        let cmd = Command {
            input_csvs: vec![dir.path().join("missing.csv")],
        };

        expect_true!(run(&cmd, &Config::default()).is_err());
        Ok(())
    }
}
