//! Simulated panels driven through a real search controller.

use std::sync::Arc;
use std::time::Duration;

use dtk_core::{
    Fetcher, NotificationLevel, Query, RecordingSink, SearchConfig, SearchController, SearchPhase,
};
use dtk_panels::coding::{self, SimulatedProblemFetcher};
use dtk_panels::memes::{self, MemeComposer, SimulatedMemeFetcher};
use dtk_panels::music::{self, SimulatedMusicFetcher};
use dtk_panels::{PanelItem, PanelKind, Simulation};
use tokio::time::Instant;

fn controller<F: Fetcher>(
    kind: PanelKind,
    fetcher: F,
) -> (SearchController<F>, RecordingSink) {
    let sink = RecordingSink::new();
    let config = kind.search_config(&SearchConfig::default());
    let controller =
        SearchController::new(kind.noun(), Arc::new(fetcher), Arc::new(sink.clone()), &config);
    (controller, sink)
}

#[tokio::test(start_paused = true)]
async fn test_music_search_after_debounce_and_latency() {
    let start = Instant::now();
    let fetcher = SimulatedMusicFetcher::new(Simulation::new(music::DEFAULT_LATENCY, Some(1)));
    let (mut controller, sink) = controller(PanelKind::Music, fetcher);

    controller.on_input("l");
    controller.on_input("lo");
    controller.on_input("lofi");
    controller.settle().await;

    assert_eq!(start.elapsed(), Duration::from_millis(1_500));
    let state = controller.state().clone();
    assert_eq!(state.phase(), SearchPhase::Success);
    assert_eq!(state.items().len(), music::TRACKS_PER_SEARCH);
    assert_eq!(state.items()[0].name, "lofi Song 1");
    assert_eq!(
        sink.notifications()[0].message,
        "Found 10 tracks for \"lofi\""
    );
}

#[tokio::test(start_paused = true)]
async fn test_coding_panel_filters_problem_set() {
    let start = Instant::now();
    let fetcher = SimulatedProblemFetcher::new(Simulation::new(coding::DEFAULT_LATENCY, Some(9)));
    let expected = fetcher
        .problems()
        .iter()
        .filter(|problem| problem.name.to_lowercase().contains("great"))
        .count();
    let (mut controller, sink) = controller(PanelKind::Coding, fetcher);

    controller.submit("Great");
    controller.settle().await;

    assert_eq!(start.elapsed(), Duration::from_millis(1_500));
    let state = controller.state().clone();
    assert_eq!(state.items().len(), expected);
    assert!(state.items().iter().all(|problem| problem.name.contains("Great")));

    let notification = &sink.notifications()[0];
    if expected == 0 {
        assert_eq!(state.phase(), SearchPhase::Empty);
        assert_eq!(notification.level, NotificationLevel::Info);
    } else {
        assert_eq!(state.phase(), SearchPhase::Success);
        assert_eq!(
            notification.message,
            format!("Found {expected} problems for \"Great\"")
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_coding_fetcher_applies_selected_tags() {
    let fetcher = SimulatedProblemFetcher::new(Simulation::new(Duration::ZERO, Some(4)))
        .with_tags(vec!["graphs".to_string()]);

    let problems = fetcher.search(&Query::parse("problem").unwrap()).await.unwrap();

    assert!(
        problems
            .iter()
            .all(|problem| problem.tags.iter().any(|tag| tag == "graphs"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_meme_templates_then_compose() {
    let fetcher = SimulatedMemeFetcher::new(Simulation::new(memes::DEFAULT_LATENCY, Some(2)));
    let (mut controller, sink) = controller(PanelKind::Memes, fetcher);

    controller.submit("template 1");
    controller.settle().await;

    // "Meme Template 1", "10", "11" and "12".
    let templates = controller.state().items().to_vec();
    assert_eq!(templates.len(), 4);
    assert_eq!(sink.take()[0].message, "Found 4 templates for \"template 1\"");
    assert_eq!(templates[0].row()[0], "Meme Template 1");

    let mut composer = MemeComposer::new();
    let template = templates[0].clone();
    let boxes = template.box_count;
    composer.select(template);
    for index in 0..boxes {
        composer.set_caption(index, format!("caption {index}")).unwrap();
    }
    let meme = composer.compose(&sink).unwrap();
    assert_eq!(meme.hash.len(), 64);
    assert_eq!(sink.take()[0].level, NotificationLevel::Success);
}

#[tokio::test(start_paused = true)]
async fn test_meme_search_lists_whole_catalog_in_order() {
    let fetcher = SimulatedMemeFetcher::new(Simulation::new(memes::DEFAULT_LATENCY, Some(2)));
    let (mut controller, _sink) = controller(PanelKind::Memes, fetcher);

    controller.submit("meme");
    controller.settle().await;

    let names: Vec<String> = controller
        .state()
        .items()
        .iter()
        .map(|template| template.name.clone())
        .collect();
    let expected: Vec<String> = (1..=memes::TEMPLATE_COUNT)
        .map(|number| format!("Meme Template {number}"))
        .collect();
    assert_eq!(names, expected);
}

#[tokio::test(start_paused = true)]
async fn test_meme_search_without_match_is_empty() {
    let fetcher = SimulatedMemeFetcher::new(Simulation::new(memes::DEFAULT_LATENCY, Some(2)));
    let (mut controller, sink) = controller(PanelKind::Memes, fetcher);

    controller.submit("distracted boyfriend");
    controller.settle().await;

    assert_eq!(controller.state().phase(), SearchPhase::Empty);
    assert_eq!(
        sink.notifications()[0].message,
        "No templates found for \"distracted boyfriend\""
    );
}
