use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Args;
use tablesurvey::{
    Table, Upload,
    config::Config,
    extraction::{
        MockExtractor,
        session::{ExtractionServer, ExtractionSession},
    },
};

/// CLI arguments selecting the PDF to extract a table from.
#[derive(Args, Clone, Debug)]
pub struct InputArgs {
    /// Path to the input PDF.
    input_pdf: PathBuf,

    /// MIME type of the input. By default it is guessed from the file extension, and only
    /// "application/pdf" is accepted.
    #[arg(long)]
    mime: Option<String>,
}

impl InputArgs {
    /// Checks the input and extracts its first table on a worker thread.
    pub fn extract_table(&self, cfg: &Config) -> Result<Table> {
        let upload = Upload::from_path(&self.input_pdf, self.mime.as_deref())
            .with_context(|| format!("loading input {:?}", self.input_pdf))?;

        let extractor = MockExtractor::new(cfg.extraction.delay());
        let (client, handle) = ExtractionServer::spawn(Box::new(extractor))?;
        let mut session = ExtractionSession::new(client);

        session.submit(upload)?;
        let table = session
            .wait_latest()
            .with_context(|| format!("extracting a table from {:?}", self.input_pdf))?
            .clone();

        // The worker exits once its only client, held by the session, is gone.
        drop(session);
        handle
            .join()
            .map_err(|_| anyhow!("extraction worker panicked"))?;

        log::info!(
            "Extracted {} rows of {} columns.",
            table.len(),
            table.columns().len()
        );
        Ok(table)
    }
}
