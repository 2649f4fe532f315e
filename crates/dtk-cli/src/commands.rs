//! Subcommand implementations.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use dtk_core::{Fetcher, NotificationSink, SearchConfig, SearchController, SearchPhase};
use dtk_panels::books::GoogleBooksFetcher;
use dtk_panels::coding::SimulatedProblemFetcher;
use dtk_panels::memes::{MemeComposer, SimulatedMemeFetcher};
use dtk_panels::movies::OmdbFetcher;
use dtk_panels::music::SimulatedMusicFetcher;
use dtk_panels::{HttpClient, PanelItem, PanelKind, Simulation};
use dtk_cli::render::{items_table, meme_lines, panels_table, status_line};
use dtk_cli::session::run_session;
use dtk_cli::settings::Settings;
use tokio::io::BufReader;

use crate::cli::{ConfigAction, LookupArgs, MemeArgs, SearchArgs, SearchOverrides};

pub fn run_panels() -> Result<()> {
    println!("{}", panels_table());
    Ok(())
}

pub fn run_config(action: ConfigAction, path: &Path, settings: &Settings) -> Result<()> {
    match action {
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Show => print!("{}", settings.to_toml()?),
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            settings.save_to(path)?;
            tracing::info!(path = %path.display(), "settings written");
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

/// Settings search config with command line overrides applied.
fn search_config(settings: &Settings, overrides: &SearchOverrides) -> SearchConfig {
    let mut config = settings.search.clone();
    if let Some(debounce_ms) = overrides.debounce_ms {
        config = config.with_debounce_ms(debounce_ms);
    }
    if let Some(timeout_ms) = overrides.timeout_ms {
        config = config.with_request_timeout_ms((timeout_ms > 0).then_some(timeout_ms));
    }
    if overrides.cancel_in_flight {
        config = config.with_cancel_in_flight(true);
    }
    config
}

fn seed(settings: &Settings, overrides: &SearchOverrides) -> Option<u64> {
    overrides.seed.or(settings.simulation.seed)
}

fn books_fetcher(settings: &Settings) -> Result<GoogleBooksFetcher> {
    let client = HttpClient::new().context("failed to set up the HTTP client")?;
    Ok(GoogleBooksFetcher::new(client)
        .with_base_url(&settings.books.base_url)
        .with_max_results(settings.books.max_results))
}

fn movies_fetcher(settings: &Settings, seed: Option<u64>) -> Result<OmdbFetcher> {
    let client = HttpClient::new().context("failed to set up the HTTP client")?;
    Ok(OmdbFetcher::new(client)
        .with_base_url(&settings.movies.base_url)
        .with_api_key(&settings.movies.api_key)
        .with_seed(seed))
}

fn music_fetcher(settings: &Settings, seed: Option<u64>) -> SimulatedMusicFetcher {
    SimulatedMusicFetcher::new(Simulation::new(settings.simulation.music_latency(), seed))
}

fn coding_fetcher(settings: &Settings, seed: Option<u64>) -> SimulatedProblemFetcher {
    SimulatedProblemFetcher::new(Simulation::new(settings.simulation.coding_latency(), seed))
}

fn memes_fetcher(settings: &Settings, seed: Option<u64>) -> SimulatedMemeFetcher {
    SimulatedMemeFetcher::new(Simulation::new(settings.simulation.memes_latency(), seed))
}

fn controller<F: Fetcher>(
    kind: PanelKind,
    fetcher: F,
    sink: Arc<dyn NotificationSink>,
    config: &SearchConfig,
) -> SearchController<F> {
    SearchController::new(
        kind.noun(),
        Arc::new(fetcher),
        sink,
        &kind.search_config(config),
    )
}

pub async fn run_search(
    args: &SearchArgs,
    settings: &Settings,
    sink: Arc<dyn NotificationSink>,
) -> Result<()> {
    let kind = args.panel;
    let config = search_config(settings, &args.overrides);
    let seed = seed(settings, &args.overrides);

    eprintln!(
        "{} {} - {} (:refresh, :clear, :quit)",
        kind.icon(),
        kind.title(),
        kind.description()
    );

    match kind {
        PanelKind::Books => {
            search_panel(controller(kind, books_fetcher(settings)?, sink, &config), kind).await
        }
        PanelKind::Movies => {
            let fetcher = movies_fetcher(settings, seed)?;
            search_panel(controller(kind, fetcher, sink, &config), kind).await
        }
        PanelKind::Music => {
            let fetcher = music_fetcher(settings, seed);
            search_panel(controller(kind, fetcher, sink, &config), kind).await
        }
        PanelKind::Memes => {
            let fetcher = memes_fetcher(settings, seed);
            search_panel(controller(kind, fetcher, sink, &config), kind).await
        }
        PanelKind::Coding => {
            let fetcher = coding_fetcher(settings, seed);
            search_panel(controller(kind, fetcher, sink, &config), kind).await
        }
    }
}

async fn search_panel<F>(controller: SearchController<F>, kind: PanelKind) -> Result<()>
where
    F: Fetcher,
    F::Item: PanelItem + Clone,
{
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout().lock();
    let stats = run_session(controller, kind.trigger(), stdin, &mut stdout)
        .await
        .context("search session failed")?;
    stdout.flush()?;

    tracing::info!(
        panel = %kind,
        inputs = stats.inputs,
        dispatched = stats.dispatched,
        applied = stats.applied,
        stale = stats.stale_discarded,
        "session finished"
    );
    Ok(())
}

/// Returns the process exit code: 1 when the search failed.
pub async fn run_lookup(
    args: &LookupArgs,
    settings: &Settings,
    sink: Arc<dyn NotificationSink>,
) -> Result<i32> {
    let kind = args.panel;
    let config = search_config(settings, &args.overrides);
    let seed = seed(settings, &args.overrides);
    let query = args.query.join(" ");

    match kind {
        PanelKind::Books => {
            lookup_panel(controller(kind, books_fetcher(settings)?, sink, &config), &query).await
        }
        PanelKind::Movies => {
            let fetcher = movies_fetcher(settings, seed)?;
            lookup_panel(controller(kind, fetcher, sink, &config), &query).await
        }
        PanelKind::Music => {
            let fetcher = music_fetcher(settings, seed);
            lookup_panel(controller(kind, fetcher, sink, &config), &query).await
        }
        PanelKind::Memes => {
            let fetcher = memes_fetcher(settings, seed);
            lookup_panel(controller(kind, fetcher, sink, &config), &query).await
        }
        PanelKind::Coding => {
            let fetcher = coding_fetcher(settings, seed);
            lookup_panel(controller(kind, fetcher, sink, &config), &query).await
        }
    }
}

async fn lookup_panel<F>(mut controller: SearchController<F>, query: &str) -> Result<i32>
where
    F: Fetcher,
    F::Item: PanelItem + Clone,
{
    if controller.submit(query).is_none() {
        bail!("nothing to search for");
    }
    controller.settle().await;

    let state = controller.state().clone();
    println!("{}", status_line(controller.noun(), &state));
    if state.phase() == SearchPhase::Success {
        println!("{}", items_table(state.items()));
    }
    Ok(if state.phase() == SearchPhase::Error { 1 } else { 0 })
}

/// Returns the process exit code: 1 when the meme could not be composed.
pub fn run_meme(args: &MemeArgs, settings: &Settings, sink: &dyn NotificationSink) -> Result<i32> {
    let seed = args.seed.or(settings.simulation.seed);
    let catalog = memes_fetcher(settings, seed);

    let Some(template) = args
        .template
        .checked_sub(1)
        .and_then(|index| catalog.templates().get(index))
    else {
        bail!(
            "template {} does not exist (choose 1 to {})",
            args.template,
            catalog.templates().len()
        );
    };

    let mut composer = MemeComposer::new();
    composer.select(template.clone());
    for (index, caption) in args.captions.iter().enumerate() {
        composer.set_caption(index, caption.as_str())?;
    }

    match composer.compose(sink) {
        Ok(meme) => {
            for line in meme_lines(&template.name, meme) {
                println!("{line}");
            }
            Ok(0)
        }
        Err(error) => {
            tracing::debug!(%error, "meme not composed");
            Ok(1)
        }
    }
}
