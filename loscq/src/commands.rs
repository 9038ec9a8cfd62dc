//! CLI command implementations.

use losc::{Client, Config, RunTimeline, Segment, UrlQuery};
use serde::Serialize;

/// Load config, applying a `--host` override.
pub fn load_config(host: Option<&str>) -> losc::Result<Config> {
    let mut config = Config::load()?;
    if let Some(host) = host {
        config.host = host.to_string();
    }
    log::debug!("using archive host {}", config.host);
    Ok(config)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> losc::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| losc::Error::Config(format!("Failed to serialize output: {}", e)))?;
    println!("{}", json);
    Ok(())
}

fn print_urls(urls: &[String], format: &str) -> losc::Result<()> {
    match format {
        "json" => print_json(urls),
        _ => {
            for url in urls {
                println!("{}", url);
            }
            Ok(())
        }
    }
}

/// Span row for table/JSON output.
#[derive(Serialize)]
struct SpanRow<'a> {
    url: &'a str,
    start: u64,
    end: u64,
}

fn print_segments(segments: &[Segment], format: &str) -> losc::Result<()> {
    match format {
        "json" => print_json(segments),
        _ => {
            println!("{:>12}  {:>12}  {:>10}", "START", "END", "DURATION");
            for seg in segments {
                println!("{:>12}  {:>12}  {:>10}", seg.start, seg.end, seg.duration());
            }
            Ok(())
        }
    }
}

/// Find files for a detector that fully cover `[start, end)`.
pub fn urls(
    config: &Config,
    detector: &str,
    start: u64,
    end: u64,
    query: &UrlQuery,
    format: &str,
) -> losc::Result<()> {
    let span = Segment::new(start, end)?;
    let client = Client::from_config(config)?;
    let urls = losc::get_urls(&client, detector, &span, query)?;
    print_urls(&urls, format)
}

/// List files published for an event.
pub fn event_urls(
    config: &Config,
    event: &str,
    detector: Option<&str>,
    span: Option<(u64, u64)>,
    query: &UrlQuery,
    format: &str,
) -> losc::Result<()> {
    let span = span.map(Segment::try_from).transpose()?;
    let client = Client::from_config(config)?;
    let urls = losc::get_event_urls(&client, event, detector, span.as_ref(), query)?;
    if urls.is_empty() && format != "json" {
        eprintln!("No files match.");
        return Ok(());
    }
    print_urls(&urls, format)
}

/// List events and runs with data in `[start, end)`.
pub fn datasets(config: &Config, start: u64, end: u64, format: &str) -> losc::Result<()> {
    let span = Segment::new(start, end)?;
    let client = Client::from_config(config)?;
    log::debug!("listing datasets on {} for {}", client.host(), span);
    let metadata = client.fetch_dataset_json(span.start, span.end)?;

    match format {
        "json" => print_json(&metadata),
        _ => {
            println!("{:<8}  {:<20}  {}", "KIND", "NAME", "DETECTORS");
            for (name, info) in &metadata.events {
                println!("{:<8}  {:<20}  {}", "event", name, info.detectors.join(","));
            }
            for (name, info) in &metadata.runs {
                println!("{:<8}  {:<20}  {}", "run", name, info.detectors.join(","));
            }
            Ok(())
        }
    }
}

/// Show where `flag` was active within `[start, end)`.
pub fn segments(
    config: &Config,
    flag: &str,
    start: u64,
    end: u64,
    run: Option<&str>,
    format: &str,
) -> losc::Result<()> {
    let client = Client::from_config(config)?;
    let segments = match run {
        Some(run) => losc::get_segments(&RunTimeline::new(&client, run), flag, start, end)?,
        None => losc::get_segments(&client, flag, start, end)?,
    };
    print_segments(&segments, format)
}

/// Print each file's declared GPS span.
pub fn span(urls: &[String], format: &str) -> losc::Result<()> {
    let mut rows = Vec::with_capacity(urls.len());
    for url in urls {
        let seg = losc::url_segment(url)?;
        rows.push(SpanRow {
            url,
            start: seg.start,
            end: seg.end,
        });
    }

    match format {
        "json" => print_json(&rows),
        _ => {
            for row in &rows {
                println!("{}  {}  {}", row.start, row.end, row.url);
            }
            Ok(())
        }
    }
}

/// Report whether `urls` fully cover `[start, end)`.
pub fn coverage(start: u64, end: u64, urls: &[String]) -> losc::Result<bool> {
    let span = Segment::new(start, end)?;
    let covered = losc::full_coverage(urls, &span)?;
    if covered {
        println!("covered: {} files span {}", urls.len(), span);
    } else {
        println!("not covered: {} files do not span {}", urls.len(), span);
    }
    Ok(covered)
}

/// Print the resolved configuration as TOML.
pub fn show_config(config: &Config) -> losc::Result<()> {
    if let Some(path) = losc::config::resolve_config_path() {
        println!("# {}", path.display());
    }
    print!("{}", config.to_toml()?);
    Ok(())
}
