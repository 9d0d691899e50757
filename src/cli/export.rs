//! CLI commands for data export
//!
//! Provides commands for exporting data in various formats.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::export::{csv, json, yaml};
use crate::storage::Storage;

use super::today;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export transactions to CSV
    Csv {
        /// Output file path, defaults to pocket_export_<date>.csv
        output: Option<PathBuf>,
    },

    /// Export the whole ledger to JSON
    Json {
        /// Output file path
        output: PathBuf,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Export the whole ledger to YAML
    Yaml {
        /// Output file path
        output: PathBuf,
    },
}

/// Handle export commands
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExportCommands,
) -> LedgerResult<()> {
    match cmd {
        ExportCommands::Csv { output } => {
            let output = output.unwrap_or_else(|| PathBuf::from(csv::default_file_name(today())));
            let mut writer = create(&output)?;
            csv::export_transactions_csv(storage, &mut writer, &settings.date_format)?;
            finish(writer)?;

            println!(
                "Exported {} transaction(s) to: {}",
                storage.transactions.count()?,
                output.display()
            );
        }
        ExportCommands::Json { output, pretty } => {
            let mut writer = create(&output)?;
            json::export_full_json(storage, &mut writer, pretty)?;
            finish(writer)?;
            println!("Full ledger exported to: {}", output.display());
        }
        ExportCommands::Yaml { output } => {
            let mut writer = create(&output)?;
            yaml::export_full_yaml(storage, &mut writer)?;
            finish(writer)?;
            println!("Full ledger exported to: {}", output.display());
        }
    }

    Ok(())
}

fn create(output: &Path) -> LedgerResult<BufWriter<File>> {
    let file = File::create(output).map_err(|e| {
        LedgerError::Export(format!(
            "Failed to create file {}: {}",
            output.display(),
            e
        ))
    })?;
    Ok(BufWriter::new(file))
}

fn finish(mut writer: BufWriter<File>) -> LedgerResult<()> {
    writer
        .flush()
        .map_err(|e| LedgerError::Export(format!("Failed to write export: {}", e)))
}
