use std::hash::Hash;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use unicode_width::UnicodeWidthStr;

use pharmabill::cli::{Cli, Commands};
use pharmabill::config::Config;
use pharmabill::dashboard::{report_file_name, write_report, StatCards};
use pharmabill::models::{Dataset, Distributor};
use pharmabill::seed;
use pharmabill::store::{JsonStore, DISTRIBUTORS_KEY, INVOICES_KEY, SALES_KEY};
use pharmabill::table::{ExportFormat, Record, TableView};
use pharmabill::tables::{distributor_table, inventory_table, invoice_table, sales_table};
use pharmabill::tui::{self, ui::pad};

const MAX_COLUMN_WIDTH: usize = 30;

fn init_logging(config: &Config, to_stderr: bool) {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "pharmabill=info");
    }

    let file_appender = tracing_appender::rolling::never(&config.log_dir, "pharmabill.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_filter(EnvFilter::from_default_env());

    // The TUI owns the terminal, so it only logs to the file
    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(EnvFilter::from_default_env())
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env()?.with_data_dir(cli.data_dir.clone());
    config.validate()?;

    let command = cli.command.unwrap_or(Commands::Tui);
    init_logging(&config, !matches!(command, Commands::Tui));

    let store = JsonStore::open(&config.data_dir)
        .with_context(|| format!("Cannot open data directory {}", config.data_dir.display()))?;

    match command {
        Commands::Tui => {
            info!("Launching TUI interface");
            if let Err(e) = tui::run_tui(config).await {
                error!("TUI failed: {:#}", e);
                return Err(e);
            }
        }

        Commands::List {
            dataset,
            search,
            page,
            page_size,
        } => {
            let dataset = Commands::parse_dataset(&dataset)?;
            if page == 0 {
                return Err(anyhow::anyhow!("Pages are numbered from 1"));
            }
            let page_size = page_size.unwrap_or(config.page_size.get());
            match dataset {
                Dataset::Invoices => {
                    let rows = store.load_or_seed(INVOICES_KEY, seed::invoices)?;
                    print_page(invoice_table(rows, config.page_size)?, search, page, page_size)?
                }
                Dataset::Distributors => {
                    let rows: Vec<Distributor> = store.load_or_seed(DISTRIBUTORS_KEY, Vec::new)?;
                    print_page(distributor_table(rows, config.page_size)?, search, page, page_size)?
                }
                Dataset::Inventory => print_page(
                    inventory_table(seed::inventory(), config.page_size, config.low_stock_threshold)?,
                    search,
                    page,
                    page_size,
                )?,
                Dataset::Sales => {
                    let rows = store.load_or_seed(SALES_KEY, seed::sales)?;
                    print_page(sales_table(rows, config.page_size)?, search, page, page_size)?
                }
            }
        }

        Commands::Export {
            dataset,
            search,
            format,
            output,
        } => {
            let dataset = Commands::parse_dataset(&dataset)?;
            let format = Commands::parse_export_format(&format)?;
            let path = output.unwrap_or_else(|| {
                config
                    .export_dir
                    .join(format!("{}.{}", dataset.as_str(), format.file_extension()))
            });
            let count = match dataset {
                Dataset::Invoices => {
                    let rows = store.load_or_seed(INVOICES_KEY, seed::invoices)?;
                    export(invoice_table(rows, config.page_size)?, search, format, &path)?
                }
                Dataset::Distributors => {
                    let rows: Vec<Distributor> = store.load_or_seed(DISTRIBUTORS_KEY, Vec::new)?;
                    export(distributor_table(rows, config.page_size)?, search, format, &path)?
                }
                Dataset::Inventory => export(
                    inventory_table(seed::inventory(), config.page_size, config.low_stock_threshold)?,
                    search,
                    format,
                    &path,
                )?,
                Dataset::Sales => {
                    let rows = store.load_or_seed(SALES_KEY, seed::sales)?;
                    export(sales_table(rows, config.page_size)?, search, format, &path)?
                }
            };
            info!("Exported {} {} rows to {}", count, dataset.as_str(), path.display());
            println!("Exported {} rows to {}", count, path.display());
        }

        Commands::Report { output } => {
            let invoices = store.load_or_seed(INVOICES_KEY, seed::invoices)?;
            let sales = store.load_or_seed(SALES_KEY, seed::sales)?;
            let cards = StatCards::compute(&invoices, &sales, &seed::inventory(), config.low_stock_threshold);
            let path = output.unwrap_or_else(|| {
                config
                    .export_dir
                    .join(report_file_name(Local::now().naive_local()))
            });
            write_report(&cards, &config.store_name, &path)?;
            println!("Report written to {}", path.display());
        }

        Commands::Seed { force } => {
            seed_key(&store, INVOICES_KEY, seed::invoices(), force)?;
            seed_key(&store, SALES_KEY, seed::sales(), force)?;
            seed_key::<Distributor>(&store, DISTRIBUTORS_KEY, Vec::new(), force)?;
            println!("Demo data ready in {}", store.dir().display());
        }
    }

    Ok(())
}

fn seed_key<T: serde::Serialize + serde::de::DeserializeOwned>(
    store: &JsonStore,
    key: &str,
    rows: Vec<T>,
    force: bool,
) -> Result<()> {
    if !force && store.load::<T>(key)?.is_some() {
        info!("{} already has data, skipping (use --force to overwrite)", key);
        return Ok(());
    }
    store.save(key, &rows)?;
    info!("Seeded {} with {} rows", key, rows.len());
    Ok(())
}

/// Print one page of `view` as aligned text columns
fn print_page<R, Id>(mut view: TableView<R, Id>, search: Option<String>, page: usize, page_size: usize) -> Result<()>
where
    R: Record,
    Id: Eq + Hash + Clone,
{
    view.set_page_size(page_size)?;
    if let Some(term) = search {
        view.set_search(&term);
    }
    view.set_page(page - 1);

    let headers: Vec<String> = view.columns().iter().map(|c| c.label.clone()).collect();
    let rows: Vec<Vec<String>> = view
        .page_rows()
        .iter()
        .map(|row| row.cells.iter().map(|c| c.text()).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .map(|r| r[i].width())
                .chain(std::iter::once(h.width()))
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect();

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(c, *w))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(&headers));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    if rows.is_empty() {
        println!("No data found");
    }
    for row in &rows {
        println!("{}", line(row));
    }
    println!();
    println!(
        "Page {} of {} ({} matching rows)",
        page,
        view.page_count(),
        view.filtered_len()
    );
    Ok(())
}

fn export<R, Id>(mut view: TableView<R, Id>, search: Option<String>, format: ExportFormat, path: &Path) -> Result<usize>
where
    R: Record,
    Id: Eq + Hash + Clone,
{
    if let Some(term) = search {
        view.set_search(&term);
    }
    let table = view.export();
    table
        .write_to_path(path, format)
        .with_context(|| format!("Cannot export to {}", path.display()))?;
    Ok(table.len())
}
