// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging and load the config (settings + API credentials)
// 3. Dispatch to the handler for the chosen workshop segment
// 4. Print the resulting table (or JSON) and write any requested files
// 5. Exit with proper code (0 = success, 1 = request gave no table, 2 = error)
//
// Results go to stdout, logs go to stderr, so `--json > out.json` stays clean.
// =============================================================================

mod cli;

use anyhow::{anyhow, Result};
use clap::Parser;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, OutputArgs};
use scrape_workshop::api::{self, guardian, oxford, reddit, twitter, yelp};
use scrape_workshop::config::Config;
use scrape_workshop::extract::{fetch_html, resolve_href, select_attr, select_text};
use scrape_workshop::fetch::{Fetcher, HttpFetcher, Request};
use scrape_workshop::sites::{self, Catalog, QUOTES_PAGE_TEMPLATE, TAG_DELIMITER};
use scrape_workshop::store;
use scrape_workshop::sweep::{FailurePolicy, Skipped};
use scrape_workshop::table::{JsonPath, Table};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain: "Failed to ...: HTTP 404 for ..."
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

// Returns:
//   Ok(0) = table produced (possibly empty)
//   Ok(1) = the API answered with a non-success status, no table
//   Err   = anything else (printed by main, exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    let http = HttpFetcher::new(config.http.timeout(), &config.http.user_agent)?;

    match cli.command {
        Commands::Select { url, selector, attr, absolute, output } => {
            handle_select(&http, &url, &selector, attr.as_deref(), absolute, &output).await
        }
        Commands::Books { pages, skip_failures, text_dir, output } => {
            let policy = if skip_failures { FailurePolicy::Skip } else { FailurePolicy::Abort };
            println!("📚 Sweeping {} catalogue page(s)", pages);

            let outcome =
                sites::scrape_books(&http, &Catalog::default(), pages, config.http.politeness(), policy).await?;
            report_skipped(&outcome.skipped);

            if let Some(dir) = text_dir {
                let items = outcome.items.iter().map(|b| (b.title.as_str(), b.description.as_str()));
                let written = store::write_text_files(&dir, items)?;
                println!("📝 Wrote {} description file(s) to {}", written.len(), dir.display());
            }

            emit(Table::from_records(&outcome.items), &output)
        }
        Commands::Quotes { pages, authors, output } => {
            println!("💬 Sweeping {} quote page(s)", pages);
            let politeness = config.http.politeness();
            let quotes = sites::scrape_quotes(&http, QUOTES_PAGE_TEMPLATE, pages, politeness).await?;

            let table = if authors {
                let bios = sites::scrape_authors(&http, &quotes, politeness).await?;
                report_skipped(&bios.skipped);
                sites::join_authors(&quotes, &bios.items)?
            } else {
                Table::from_records(&quotes)
            };

            emit(table, &output)
        }
        Commands::Reddit { subreddit, sort, limit, time, output } => {
            let query = reddit::ListingQuery { subreddit, sort, limit, time };
            emit_opt(reddit::fetch_posts(&http, &query).await?.map(|p| Table::from_records(&p)), &output)
        }
        Commands::Guardian { query, pages, page_size, section, from_date, order_by, output } => {
            let key = config.credentials.guardian()?;
            let query = guardian::SearchQuery { query, page_size, section, from_date, order_by };
            let articles = guardian::search(&http, key, &query, pages, config.http.politeness()).await?;
            emit_opt(articles.map(|a| Table::from_records(&a)), &output)
        }
        Commands::Define { word, lang, first, output } => {
            let credentials = config.credentials.oxford()?;
            let Some(entry) = oxford::lookup_entry(&http, &credentials, &lang, &word).await? else {
                return Ok(no_table());
            };

            if first {
                match oxford::first_definition(&entry) {
                    Some(definition) => println!("{}: {}", word, definition),
                    None => println!("⚠️  No definition found for '{}'", word),
                }
                return Ok(0);
            }

            emit(Table::from_records(&oxford::definitions(&entry)), &output)
        }
        Commands::Yelp { term, location, limit, output } => {
            let key = config.credentials.yelp()?;
            let businesses = yelp::search_businesses(&http, key, &term, &location, limit).await?;
            emit_opt(businesses.map(|b| Table::from_records(&b)), &output)
        }
        Commands::YelpReviews { business, scrape, pages, output } => {
            if scrape {
                let reviews = yelp::scrape_reviews(&http, &business, pages, config.http.politeness()).await?;
                emit(Table::from_records(&reviews), &output)
            } else {
                let key = config.credentials.yelp()?;
                let reviews = yelp::business_reviews(&http, key, &business).await?;
                emit_opt(reviews.map(|r| Table::from_records(&r)), &output)
            }
        }
        Commands::Tweets { query, max_results, output } => {
            let token = config.credentials.twitter()?;
            let tweets = twitter::search_recent(&http, token, &query, max_results).await?;
            emit_opt(tweets.map(|t| Table::from_records(&t)), &output)
        }
        Commands::Stream { seconds, limit, output } => {
            let token = config.credentials.twitter()?;
            let streaming = HttpFetcher::for_streaming(&config.http.user_agent)?;
            println!("📡 Listening to the live stream for {}s (Ctrl-C to stop)", seconds);

            let tweets = twitter::stream_tweets(&streaming, token, Duration::from_secs(seconds), limit).await?;
            emit(Table::from_records(&tweets), &output)
        }
        Commands::Json { url, path, params, headers, output } => {
            let request = build_request(&url, &params, &headers)?;
            let table = api::get_table(&http, &request, &JsonPath::from(path.as_str())).await?;
            emit_opt(table, &output)
        }
        Commands::Show { snapshot_file, output } => emit(store::load_snapshot(&snapshot_file)?, &output),
    }
}

// Handles the 'select' subcommand
//
// Prints one row per match. With --attr the attribute value is printed
// instead of the text; with --absolute those values are resolved as links.
async fn handle_select(
    fetcher: &dyn Fetcher,
    url: &str,
    selector: &str,
    attr: Option<&str>,
    absolute: bool,
    output: &OutputArgs,
) -> Result<i32> {
    let html = fetch_html(fetcher, url).await?;

    let values = match attr {
        Some(attr) => {
            let values = select_attr(&html, selector, attr)?;
            if absolute {
                values.iter().filter_map(|v| resolve_href(url, v)).collect()
            } else {
                values
            }
        }
        None => select_text(&html, selector)?,
    };

    if values.is_empty() {
        // The classic trap: a typo in the selector looks like an empty page.
        println!("⚠️  '{}' matched nothing on {}. Check the selector against the page source.", selector, url);
    }

    let mut table = Table::new(vec![attr.unwrap_or("text").to_string()]);
    for value in values {
        table.push_row(vec![value])?;
    }
    emit(table, output)
}

// Builds a GET from the `json` subcommand's KEY=VALUE params and NAME:VALUE headers
fn build_request(url: &str, params: &[String], headers: &[String]) -> Result<Request> {
    let mut request = Request::get(url);

    for param in params {
        let (key, value) = param
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{}'", param))?;
        request = request.query(key, value);
    }
    for header in headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| anyhow!("Expected NAME:VALUE, got '{}'", header))?;
        request = request.header(name.trim(), value.trim());
    }

    Ok(request)
}

fn no_table() -> i32 {
    println!("⚠️  The request did not succeed (see the status above); no table produced");
    1
}

fn emit_opt(table: Option<Table>, output: &OutputArgs) -> Result<i32> {
    match table {
        Some(table) => emit(table, output),
        None => Ok(no_table()),
    }
}

fn report_skipped(skipped: &[Skipped]) {
    if skipped.is_empty() {
        return;
    }
    println!("⏭️  Skipped {} link(s):", skipped.len());
    for s in skipped {
        println!("   {} ({})", s.url, s.reason);
    }
}

// Applies --where, writes --csv/--snapshot, then prints counts, JSON or a table
fn emit(table: Table, output: &OutputArgs) -> Result<i32> {
    let table = match &output.filter {
        Some(clause) => {
            let (column, needle) = clause
                .split_once('=')
                .ok_or_else(|| anyhow!("Expected --where COLUMN=TEXT, got '{}'", clause))?;
            table.filter(column, |cell| cell.contains(needle))?
        }
        None => table,
    };

    if let Some(path) = &output.csv {
        store::write_csv(&table, path)?;
        println!("💾 Wrote {} row(s) to {}", table.len(), path.display());
    }
    if let Some(path) = &output.snapshot {
        store::save_snapshot(&table, path)?;
        println!("💾 Saved snapshot to {}", path.display());
    }

    if let Some(column) = &output.count {
        // "tags" is stored delimited, so counting it without --split is rarely what you want.
        if column == "tags" && output.split.is_none() {
            warn!("counting 'tags' without --split \"{}\" counts whole tag lists", TAG_DELIMITER);
        }
        let counts = table.value_counts(column, output.split.as_deref())?;
        print_counts(column, &counts, output.json)?;
        return Ok(0);
    }

    if output.json {
        println!("{}", serde_json::to_string_pretty(&json_records(&table))?);
    } else if table.is_empty() {
        println!("✅ No rows found");
    } else {
        print_table(&table);
    }

    Ok(0)
}

// One JSON object per row, keyed by column name
fn json_records(table: &Table) -> Vec<serde_json::Map<String, serde_json::Value>> {
    table
        .rows
        .iter()
        .map(|row| {
            table
                .columns
                .iter()
                .zip(row)
                .map(|(column, cell)| (column.clone(), serde_json::Value::String(cell.clone())))
                .collect()
        })
        .collect()
}

fn print_counts(column: &str, counts: &[(String, usize)], json: bool) -> Result<()> {
    if json {
        let map: serde_json::Map<String, serde_json::Value> =
            counts.iter().map(|(v, n)| (v.clone(), serde_json::Value::from(*n))).collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    println!("{:<50} {:>8}", column.to_uppercase(), "COUNT");
    println!("{}", "=".repeat(59));
    for (value, n) in counts {
        println!("{:<50} {:>8}", truncate(value, 50), n);
    }
    Ok(())
}

// Widest cell per column, capped so long descriptions don't wrap the terminal
const MAX_COLUMN_WIDTH: usize = 40;

// Prints results as a human-readable table in the terminal
fn print_table(table: &Table) {
    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            table
                .rows
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect();

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", truncate(cell, *w), width = *w))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(table.columns.iter().map(|c| c.to_uppercase()).collect()));
    println!("{}", "=".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in &table.rows {
        println!("{}", line(row.clone()));
    }

    println!();
    println!("📊 {} row(s)", table.len());
}

// Shortens to `max` characters, ending in "..." when something was cut
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(3);
    format!("{}...", s.chars().take(keep).collect::<String>())
}
