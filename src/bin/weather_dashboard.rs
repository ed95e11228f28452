// Terminal dashboard: submit one query to the backend, then print the chart
// summary and a page of the table, optionally exporting the table as CSV.

use clap::Parser;
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use weather_archive_service::client::HttpBackendClient;
use weather_archive_service::export::write_csv;
use weather_archive_service::models::{CellValue, ChartSeries, FieldValue, FormInput};
use weather_archive_service::orchestrator::{DashboardState, Orchestrator};
use weather_archive_service::pagination::{paginate, PaginationParams, TablePage};

#[derive(Parser, Debug)]
#[command(name = "weather-dashboard")]
#[command(about = "Fetch, store and display historical daily temperatures", long_about = None)]
struct Args {
    /// Latitude in decimal degrees (-90 to 90)
    #[arg(long, allow_hyphen_values = true)]
    latitude: String,

    /// Longitude in decimal degrees (-180 to 180)
    #[arg(long, allow_hyphen_values = true)]
    longitude: String,

    /// First day, YYYY-MM-DD
    #[arg(long)]
    start_date: String,

    /// Last day, YYYY-MM-DD
    #[arg(long)]
    end_date: String,

    /// Base URL of the backend's weather routes
    #[arg(long, env = "BACKEND_URL", default_value = "http://localhost:8080/weather")]
    backend_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Table page to print (1-based)
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Rows per table page
    #[arg(long, default_value_t = 10)]
    page_size: usize,

    /// Write the full table as CSV to this path
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn format_cell(cell: CellValue) -> String {
    match cell.value() {
        Some(v) => format!("{v:.1}"),
        None => cell.to_string(),
    }
}

fn print_chart_summary(chart: &ChartSeries) {
    let (first, last) = match (chart.labels.first(), chart.labels.last()) {
        (Some(first), Some(last)) => (first.as_str(), last.as_str()),
        _ => {
            println!("No dates in response");
            return;
        }
    };
    println!("{} days, {} to {}", chart.labels.len(), first, last);

    for series in &chart.series {
        let present: Vec<f64> = series.values.iter().flatten().copied().collect();
        if present.is_empty() {
            println!("  {:<18} no data", series.name);
            continue;
        }
        let min = present.iter().copied().fold(f64::INFINITY, f64::min);
        let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        println!(
            "  {:<18} min {:>6.1}  max {:>6.1}  ({} points)",
            series.name,
            min,
            max,
            present.len()
        );
    }
}

fn print_table_page(page: &TablePage) {
    println!(
        "{:>4}  {:<10}  {:>7}  {:>7}  {:>7}  {:>7}  {:>7}  {:>7}",
        "#", "Date", "Max", "Min", "Mean", "AppMax", "AppMin", "AppMean"
    );
    for row in &page.rows {
        let cells = row.cells().map(format_cell);
        println!(
            "{:>4}  {:<10}  {:>7}  {:>7}  {:>7}  {:>7}  {:>7}  {:>7}",
            row.id, row.date, cells[0], cells[1], cells[2], cells[3], cells[4], cells[5]
        );
    }
    println!(
        "Page {} of {} ({} rows)",
        page.page, page.total_pages, page.total_rows
    );
}

fn render(state: &DashboardState, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "Weather at ({}, {}) stored as {}",
        state.query.latitude(),
        state.query.longitude(),
        state.storage_key
    );

    match &state.chart {
        Some(chart) => print_chart_summary(chart),
        None => println!("No data available"),
    }

    let page = paginate(&state.table, &PaginationParams::new(args.page, args.page_size));
    print_table_page(&page);

    if let Some(path) = &args.csv {
        let file = File::create(path)?;
        write_csv(&state.table, file)?;
        println!("Exported {} rows to {}", state.table.len(), path.display());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,weather_archive_service=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    info!("Submitting query to {}", args.backend_url);

    let backend =
        HttpBackendClient::new(args.backend_url.clone(), Duration::from_secs(args.timeout_secs))?;
    let orchestrator = Orchestrator::new(backend);

    let form = FormInput {
        latitude: FieldValue::Text(args.latitude.clone()),
        longitude: FieldValue::Text(args.longitude.clone()),
        start_date: Some(args.start_date.clone()),
        end_date: Some(args.end_date.clone()),
    };

    let result = orchestrator.submit(&form).await;
    match result.into_result() {
        Ok(state) => render(&state, &args),
        Err(message) => Err(message.into()),
    }
}
