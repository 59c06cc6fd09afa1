//! Search command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tracing::warn;

use carematch::candidates::{Expert, GeoPoint, Scored, Trial};
use carematch::config::Config;
use carematch::discussions::{DiscussionRepository, JsonDiscussionStore};
use carematch::providers::{
    CandidateProvider, HttpProvider, JsonFileProvider, StaticProvider, TimeoutProvider,
};
use carematch::{QueryContext, SearchEngine, SearchResponse};

#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// Free-text query
    pub query: String,

    /// Profile condition merged into the query
    #[arg(short, long)]
    pub condition: Option<String>,

    /// Profile location, e.g. "Boston, USA"
    #[arg(short, long)]
    pub location: Option<String>,

    /// Profile latitude (requires --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Profile longitude (requires --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Read experts from a JSON array file instead of the configured endpoint
    #[arg(long)]
    pub experts: Option<PathBuf>,

    /// Read trials from a JSON array file instead of the configured endpoint
    #[arg(long)]
    pub trials: Option<PathBuf>,

    /// Print the response as JSON
    #[arg(long)]
    pub json: bool,
}

/// Pick a provider: explicit file, then configured URL, then nothing.
fn build_provider<T>(
    label: &str,
    file: Option<PathBuf>,
    url: Option<&str>,
    timeout: Duration,
) -> Result<Box<dyn CandidateProvider<T>>>
where
    T: serde::de::DeserializeOwned + Clone + Send + Sync + 'static,
{
    let inner: Box<dyn CandidateProvider<T>> = if let Some(path) = file {
        Box::new(JsonFileProvider::new(label, path))
    } else if let Some(url) = url {
        Box::new(
            HttpProvider::<T>::new(label, url)
                .with_context(|| format!("Invalid {} provider URL", label))?,
        )
    } else {
        warn!(provider = label, "No source configured, searching an empty list");
        Box::new(StaticProvider::<T>::new(label, Vec::new()))
    };

    Ok(Box::new(TimeoutProvider::new(inner, timeout)))
}

pub(crate) async fn cmd_search(config: Config, args: SearchArgs) -> Result<()> {
    let timeout = Duration::from_secs(config.providers.timeout_secs);
    let experts = build_provider::<Expert>(
        "experts",
        args.experts,
        config.providers.experts_url.as_deref(),
        timeout,
    )?;
    let trials = build_provider::<Trial>(
        "trials",
        args.trials,
        config.providers.trials_url.as_deref(),
        timeout,
    )?;

    let store = JsonDiscussionStore::with_path(config.discussions_path())
        .with_context(|| "Failed to open discussion store")?;
    let discussions = store.list()?;

    let mut ctx = QueryContext::new(args.query);
    ctx.condition = args.condition;
    ctx.location = args.location;
    ctx.coordinates = GeoPoint::from_parts(args.lat, args.lon);

    let engine = SearchEngine::from_config(experts, trials, &config);
    let response = engine.search(&ctx, &discussions).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print!("{}", format_response_text(&response));
    }

    Ok(())
}

fn format_line<T>(item: &Scored<T>, title: &str, detail: &str) -> String {
    let mut line = format!("  [{:>3}] {}", item.match_score, title);
    if !detail.is_empty() {
        line.push_str(&format!(" ({})", detail));
    }
    if !item.location_label.is_empty() {
        line.push_str(&format!(" - {}", item.location_label));
    }
    line.push('\n');
    line
}

/// Human-readable rendering of a response.
pub(crate) fn format_response_text(response: &SearchResponse) -> String {
    let mut out = format!("Query: {} (#{})\n", response.query, response.sequence);

    out.push_str(&format!("\nExperts ({})\n", response.experts.len()));
    for e in &response.experts {
        out.push_str(&format_line(e, &e.candidate.name, &e.candidate.institution));
    }
    if let Some(ref err) = response.errors.experts {
        out.push_str(&format!("  ! {}\n", err));
    }

    out.push_str(&format!("\nTrials ({})\n", response.trials.len()));
    for t in &response.trials {
        out.push_str(&format_line(t, &t.candidate.title, &t.candidate.sponsor));
    }
    if let Some(ref err) = response.errors.trials {
        out.push_str(&format!("  ! {}\n", err));
    }

    out.push_str(&format!("\nDiscussions ({})\n", response.discussions.len()));
    for d in &response.discussions {
        out.push_str(&format_line(d, &d.candidate.title, ""));
    }

    out
}
