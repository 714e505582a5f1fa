use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use core_types::Period;
use ranking::{RankParams, SortBy, SortOrder, Tab};
use reporting::{IncomeReport, ReportingEngine};
use store::{OrderFilters, Repository, connect, run_migrations};
use tracing_subscriber::EnvFilter;

/// The main entry point for the Atelier order-tracking application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from a .env file when one exists.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command-line arguments and execute the appropriate command.
    let cli = Cli::parse();
    match cli.command {
        Commands::Serve(args) => handle_serve(args).await,
        Commands::List(args) => handle_list(args).await,
        Commands::Report(args) => handle_report(args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Order tracking and income reporting for a tailoring shop.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server.
    Serve(ServeArgs),
    /// Print the ranked order list.
    List(ListArgs),
    /// Print an income report for a day, month or year.
    Report(ReportArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Override the configured bind address.
    #[arg(long)]
    host: Option<String>,

    /// Override the configured port.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Parser)]
struct ListArgs {
    /// Which slice of the order book to show: all, ongoing or completed.
    #[arg(long, default_value = "ongoing")]
    tab: String,

    /// Filter by processing status (not_started, in_progress, completed).
    #[arg(long)]
    status: Option<String>,

    /// Filter by customer name or phone substring.
    #[arg(long)]
    search: Option<String>,

    /// Sort field: priority, pickupDate, queueNumber or price.
    #[arg(long, default_value = "priority")]
    sort_by: String,

    /// Sort direction: asc or desc.
    #[arg(long, default_value = "desc")]
    sort_order: String,
}

#[derive(Parser)]
struct ReportArgs {
    /// The report period: daily, monthly or yearly.
    #[arg(long)]
    period: String,

    /// The anchor date (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut settings = configuration::load_settings()?;
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }

    let addr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    web_server::run_server(addr, settings).await
}

/// Fetches the order book and prints the ranked working view as a table.
async fn handle_list(args: ListArgs) -> anyhow::Result<()> {
    let params = RankParams {
        tab: parse_tab(&args.tab)?,
        status_filter: match args.status.as_deref() {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(raw.parse()?),
        },
        search_text: args.search,
        sort_by: parse_sort_by(&args.sort_by)?,
        sort_order: parse_sort_order(&args.sort_order)?,
        ..RankParams::default()
    };

    let repo = open_repository().await?;
    let orders = repo.list_orders(&OrderFilters::default()).await?;
    let now = Utc::now();
    let ranked = ranking::rank(&orders, &params, now);

    let mut table = Table::new();
    table.set_header(vec![
        "Queue", "Customer", "Phone", "Service", "Pickup", "Status", "Paid", "Price", "Score",
    ]);
    for order in &ranked {
        table.add_row(vec![
            order.queue_number.to_string(),
            order.customer_name.clone(),
            order.customer_phone.clone(),
            order.service_type.to_string(),
            order.pickup_date.format("%Y-%m-%d").to_string(),
            order.processing_status.to_string(),
            if order.payment_status { "yes" } else { "no" }.to_string(),
            order.price.to_string(),
            ranking::priority_score(order, now).to_string(),
        ]);
    }
    println!("{table}");
    println!("{} order(s)", ranked.len());

    Ok(())
}

async fn handle_report(args: ReportArgs) -> anyhow::Result<()> {
    let period: Period = args.period.parse()?;
    let anchor = args.date.unwrap_or_else(|| Utc::now().date_naive());

    let repo = open_repository().await?;
    let (window_start, window_end) = ReportingEngine::report_window(period, anchor);
    let orders = repo
        .list_paid_orders_in_window(window_start, window_end)
        .await?;
    let report = ReportingEngine::new().build_report(&orders, period, anchor);

    let mut table = Table::new();
    match &report {
        IncomeReport::Daily(daily) => {
            table.set_header(vec!["Queue", "Customer", "Service", "Price"]);
            for order in &daily.orders {
                table.add_row(vec![
                    order.queue_number.to_string(),
                    order.customer_name.clone(),
                    order.service_type.to_string(),
                    order.price.to_string(),
                ]);
            }
            println!("Income for {}", daily.date);
            println!("{table}");
            println!("Total: {} ({} order(s))", daily.total_income, daily.orders.len());
        }
        IncomeReport::Monthly(monthly) => {
            table.set_header(vec!["Date", "Orders", "Income"]);
            for bucket in &monthly.daily_breakdown {
                table.add_row(vec![
                    bucket.date.to_string(),
                    bucket.count.to_string(),
                    bucket.income.to_string(),
                ]);
            }
            println!("Income for {}-{:02}", monthly.year, monthly.month);
            println!("{table}");
            println!(
                "Total: {} ({} order(s))",
                monthly.total_income, monthly.total_orders
            );
        }
        IncomeReport::Yearly(yearly) => {
            table.set_header(vec!["Month", "Orders", "Income"]);
            for bucket in &yearly.monthly_breakdown {
                table.add_row(vec![
                    bucket.month.to_string(),
                    bucket.count.to_string(),
                    bucket.income.to_string(),
                ]);
            }
            println!("Income for {}", yearly.year);
            println!("{table}");
            println!(
                "Total: {} ({} order(s))",
                yearly.total_income, yearly.total_orders
            );
        }
    }

    Ok(())
}

/// Connects to the store and ensures the schema is current.
async fn open_repository() -> anyhow::Result<Repository> {
    let db_pool = connect().await?;
    run_migrations(&db_pool).await?;
    Ok(Repository::new(db_pool))
}

fn parse_tab(raw: &str) -> anyhow::Result<Tab> {
    match raw {
        "all" => Ok(Tab::All),
        "ongoing" => Ok(Tab::Ongoing),
        "completed" => Ok(Tab::Completed),
        _ => anyhow::bail!("unknown tab '{raw}': expected all, ongoing or completed"),
    }
}

fn parse_sort_by(raw: &str) -> anyhow::Result<SortBy> {
    match raw {
        "priority" => Ok(SortBy::Priority),
        "pickupDate" => Ok(SortBy::PickupDate),
        "queueNumber" => Ok(SortBy::QueueNumber),
        "price" => Ok(SortBy::Price),
        _ => anyhow::bail!(
            "unknown sort field '{raw}': expected priority, pickupDate, queueNumber or price"
        ),
    }
}

fn parse_sort_order(raw: &str) -> anyhow::Result<SortOrder> {
    match raw {
        "asc" => Ok(SortOrder::Asc),
        "desc" => Ok(SortOrder::Desc),
        _ => anyhow::bail!("unknown sort order '{raw}': expected asc or desc"),
    }
}
