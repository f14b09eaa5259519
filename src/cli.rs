use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::models::Dataset;
use crate::table::ExportFormat;

#[derive(Parser)]
#[command(name = "pharmabill")]
#[command(about = "Pharmacy billing: invoices, distributors, inventory and sales in the terminal")]
#[command(version)]
pub struct Cli {
    /// Data directory (overrides PHARMABILL_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the terminal UI (default)
    Tui,

    /// Print one page of a table
    List {
        /// Table to show (invoices, distributors, inventory, sales)
        dataset: String,

        /// Case-insensitive search over the table's columns
        #[arg(short, long)]
        search: Option<String>,

        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Rows per page (defaults to PHARMABILL_PAGE_SIZE)
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Export the (filtered) rows of a table
    Export {
        /// Table to export (invoices, distributors, inventory, sales)
        dataset: String,

        /// Case-insensitive search over the table's columns
        #[arg(short, long)]
        search: Option<String>,

        /// Output format (csv, json)
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output file (defaults to <dataset>.<ext> in the export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the dashboard report
    Report {
        /// Output file (defaults to Dashboard_Report_<date>.txt in the export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the demo data to the store
    Seed {
        /// Overwrite data that already exists
        #[arg(long)]
        force: bool,
    },
}

impl Commands {
    pub fn parse_dataset(dataset: &str) -> Result<Dataset, anyhow::Error> {
        match dataset.to_lowercase().as_str() {
            "invoices" | "invoice" | "billing" => Ok(Dataset::Invoices),
            "distributors" | "distributor" => Ok(Dataset::Distributors),
            "inventory" | "stock" => Ok(Dataset::Inventory),
            "sales" | "sale" => Ok(Dataset::Sales),
            other => Err(anyhow::anyhow!(
                "Unknown dataset: {}. Supported datasets: invoices, distributors, inventory, sales",
                other
            )),
        }
    }

    pub fn parse_export_format(format: &str) -> Result<ExportFormat, anyhow::Error> {
        format.parse().map_err(|e| {
            anyhow::anyhow!("{}. Supported formats: csv, json", e)
        })
    }
}
