use vod_diary::config::StoreConfig;
use vod_diary::keys::compute_lookup_key;
use vod_diary::store::MetadataResolver;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let url = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: check-record <video-url>"))?;

    let key = compute_lookup_key(&url)?;
    println!("Lookup key: {}", key);

    let resolver = MetadataResolver::new(StoreConfig::load()?);
    println!("Fetching from {}...", resolver.config().rest_endpoint());

    match resolver.resolve_by_key(&key).await? {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        None => println!("Record not found"),
    }

    Ok(())
}
