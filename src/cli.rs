// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// One subcommand per workshop segment. Every subcommand that produces a table
// shares the same output flags (OutputArgs), flattened in with
// #[command(flatten)].
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use scrape_workshop::api::reddit::Sort;

#[derive(Parser, Debug)]
#[command(
    name = "scrape-workshop",
    version,
    about = "Scrape pages with CSS selectors and turn REST APIs into tables",
    long_about = "scrape-workshop is the companion tool for a web-scraping workshop. \
                  Each subcommand runs one segment: selecting from HTML pages, sweeping \
                  paginated catalogues, or calling a REST API and flattening the JSON."
)]
pub struct Cli {
    /// Show debug logs (every request, empty selectors). RUST_LOG overrides this.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file with HTTP settings and API credentials
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// What to do with the resulting table.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Print JSON records instead of a table
    #[arg(long)]
    pub json: bool,

    /// Also write the table as CSV to this file
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Also save the table as a JSON snapshot, to reload with `show`
    #[arg(long, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Keep only rows where COLUMN contains TEXT (format: COLUMN=TEXT)
    #[arg(long = "where", value_name = "COLUMN=TEXT")]
    pub filter: Option<String>,

    /// Print how often each value of COLUMN occurs instead of the rows
    #[arg(long, value_name = "COLUMN")]
    pub count: Option<String>,

    /// With --count: split cells on this delimiter first (e.g. ", " for tags)
    #[arg(long, value_name = "DELIM", requires = "count")]
    pub split: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one page and print what a CSS selector matches
    ///
    /// Example: scrape-workshop select http://books.toscrape.com "article.product_pod h3 a" --attr title
    Select {
        url: String,

        /// CSS selector, e.g. "div.quote span.text"
        selector: String,

        /// Print this attribute instead of the element text
        #[arg(long)]
        attr: Option<String>,

        /// Resolve attribute values as links against the page URL
        #[arg(long, requires = "attr")]
        absolute: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Sweep a book catalogue and read every book page
    ///
    /// Example: scrape-workshop books --pages 2 --text-dir descriptions
    Books {
        /// How many listing pages to sweep
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// Skip book pages that fail instead of stopping
        #[arg(long)]
        skip_failures: bool,

        /// Write each description to <DIR>/<title>.txt
        #[arg(long, value_name = "DIR")]
        text_dir: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Sweep quote pages, optionally joining author bios
    ///
    /// Example: scrape-workshop quotes --pages 3 --authors --count tags --split ", "
    Quotes {
        /// How many pages to sweep
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// Follow each author link and join the bio columns
        #[arg(long)]
        authors: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List posts from a subreddit (no credentials needed)
    Reddit {
        /// Subreddit name, e.g. "rust" or "r/rust"
        subreddit: String,

        #[arg(long, value_enum, default_value_t = Sort::Hot)]
        sort: Sort,

        #[arg(long, default_value_t = 25)]
        limit: u32,

        /// Time window for --sort top: hour, day, week, month, year, all
        #[arg(long)]
        time: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Search The Guardian (needs GUARDIAN_API_KEY)
    Guardian {
        query: String,

        /// How many result pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: u32,

        #[arg(long, default_value_t = 10)]
        page_size: u32,

        #[arg(long)]
        section: Option<String>,

        /// Only articles published on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from_date: Option<String>,

        /// newest, oldest or relevance
        #[arg(long)]
        order_by: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Look a word up in the Oxford dictionary (needs OED_APP_ID and OED_APP_KEY)
    Define {
        word: String,

        #[arg(long, default_value = "en-gb")]
        lang: String,

        /// Only print the first definition
        #[arg(long)]
        first: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Search businesses on Yelp (needs YELP_API_KEY)
    Yelp {
        /// What to look for, e.g. "tacos"
        term: String,

        #[arg(long)]
        location: String,

        #[arg(long, default_value_t = 10)]
        limit: u32,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Reviews of one business, from the API or scraped from its page
    YelpReviews {
        /// Business id (API) or business page URL (with --scrape)
        business: String,

        /// Scrape the public page instead of calling the API
        #[arg(long)]
        scrape: bool,

        /// With --scrape: how many review pages to read
        #[arg(long, default_value_t = 1)]
        pages: u32,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Search recent tweets (needs TWITTER_BEARER_TOKEN)
    Tweets {
        query: String,

        /// 10 to 100
        #[arg(long, default_value_t = 10)]
        max_results: u32,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Listen to the live tweet stream for a while (needs TWITTER_BEARER_TOKEN)
    Stream {
        /// How long to listen
        #[arg(long, default_value_t = 30)]
        seconds: u64,

        /// Stop early after this many tweets
        #[arg(long)]
        limit: Option<usize>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// GET any JSON endpoint and flatten the records at a path
    ///
    /// Example: scrape-workshop json https://www.reddit.com/r/rust.json --path data.children
    Json {
        url: String,

        /// Dotted path to the record list, e.g. "response.results"
        #[arg(long, default_value = "")]
        path: String,

        /// Query parameter, repeatable (format: KEY=VALUE)
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Request header, repeatable (format: NAME:VALUE)
        #[arg(long = "header", value_name = "NAME:VALUE")]
        headers: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print a table saved earlier with --snapshot
    Show {
        snapshot_file: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does #[command(flatten)] do?
//    - It pastes the fields of another Args struct into this subcommand
//    - Every subcommand gets --json, --csv, --snapshot ... without repeating them
//
// 2. Why `global = true` on --verbose?
//    - Global flags can be written before or after the subcommand:
//      `scrape-workshop -v books` and `scrape-workshop books -v` both work
//
// 3. What is value_enum?
//    - It lets clap parse a Rust enum from text (`--sort top` -> Sort::Top)
//    - Invalid values get a helpful error listing the choices
// -----------------------------------------------------------------------------
