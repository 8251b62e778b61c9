use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;

use vod_diary::config::StoreConfig;
use vod_diary::constants::{DATE_UNAVAILABLE, DEFAULT_LIST_LIMIT, DEFAULT_SEARCH_LIMIT};
use vod_diary::keys::compute_lookup_key;
use vod_diary::logging;
use vod_diary::store::{ListFilter, MetadataResolver};
use vod_diary::types::{Platform, VideoRecord};

#[derive(Parser)]
#[command(name = "vod-diary")]
#[command(about = "Catalog and search client for archived stream VODs")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the lookup key for a video URL
    Key {
        /// Video URL, hashed byte-exactly as given
        url: String,
    },
    /// Resolve and display one video's metadata
    Show {
        /// Video URL, or a precomputed lookup key with --key
        target: String,
        /// Treat TARGET as a 64-char lookup key instead of a URL
        #[arg(long)]
        key: bool,
    },
    /// List recent VODs, newest first
    Recent {
        /// Restrict to one platform: twitch, kick, or unknown
        #[arg(long)]
        platform: Option<String>,
        /// Inclusive start of the published-date range (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Inclusive end of the published-date range (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: u32,
    },
    /// Search titles, URLs, and tags
    Search {
        term: String,
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: u32,
    },
}

fn parse_platform_filter(value: Option<&str>) -> Result<Option<Platform>, String> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let platform = Platform::parse(raw);
            if platform == Platform::Unknown && !raw.eq_ignore_ascii_case("unknown") {
                return Err(format!(
                    "unrecognized platform '{}' (expected twitch, kick, or unknown)",
                    raw
                ));
            }
            Ok(Some(platform))
        }
    }
}

fn print_record(record: &VideoRecord) {
    let published = record
        .published_at
        .map(|ts| ts.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| DATE_UNAVAILABLE.to_string());

    println!("📼 {}", record.title);
    println!("   Platform:  {}", record.platform);
    println!("   Published: {}", published);
    let tags = record.display_tags();
    if !tags.is_empty() {
        println!("   Tags:      {}", tags.join(", "));
    }
    println!("   URL:       {}", record.source_url);
    println!("   Key:       {}", record.lookup_key);
    println!("   Thumbnail: {}", record.thumbnail_ref());
    println!("   {}", record.summary);
}

fn print_records(records: &[VideoRecord]) {
    if records.is_empty() {
        println!("No matching VODs.");
        return;
    }
    for record in records {
        print_record(record);
        println!();
    }
    println!("📊 {} record(s)", records.len());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Key { url } => {
            println!("{}", compute_lookup_key(&url)?);
        }
        Commands::Show { target, key } => {
            let resolver = MetadataResolver::new(StoreConfig::load()?);
            let record = if key {
                resolver.resolve_by_key(&target).await?
            } else {
                resolver.resolve_url(&target).await?
            };
            match record {
                Some(record) => print_record(&record),
                None => println!("🕳️  No metadata for this video yet."),
            }
        }
        Commands::Recent {
            platform,
            from,
            to,
            limit,
        } => {
            let platform = match parse_platform_filter(platform.as_deref()) {
                Ok(filter) => filter,
                Err(message) => {
                    eprintln!("⚠️  {}", message);
                    std::process::exit(2);
                }
            };
            let filter = ListFilter {
                limit,
                platform,
                from,
                to,
            };
            info!(limit = filter.limit, "fetching diary listing");
            let resolver = MetadataResolver::new(StoreConfig::load()?);
            let records = resolver.list_recent(&filter).await?;
            print_records(&records);
        }
        Commands::Search { term, limit } => {
            let resolver = MetadataResolver::new(StoreConfig::load()?);
            let records = resolver.search(&term, limit).await?;
            print_records(&records);
        }
    }

    Ok(())
}
