//! Coding panel: a simulated problem set filtered by name and tags.

use std::fmt;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use dtk_core::{FetchError, Fetcher, Query};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;
use uuid::Uuid;

use crate::item::PanelItem;
use crate::simulated::{Simulation, random_uuid};

/// Latency of the simulated problem set.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1_500);

/// Problems in the simulated set.
pub const PROBLEM_COUNT: usize = 20;

/// Every tag a problem can carry.
pub const TAGS: [&str; 10] = [
    "implementation",
    "math",
    "greedy",
    "dp",
    "data structures",
    "strings",
    "sortings",
    "binary search",
    "graphs",
    "trees",
];

const ARTICLES: [&str; 3] = ["The", "A", "Some"];
const ADJECTIVES: [&str; 5] = ["Great", "Small", "Interesting", "Complex", "Simple"];
const NOUNS: [&str; 5] = ["Challenge", "Task", "Problem", "Puzzle", "Question"];

/// Oldest problem date, in days before today.
const MAX_AGE_DAYS: i64 = 115;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub id: Uuid,
    pub name: String,
    pub tags: Vec<String>,
    pub difficulty: Difficulty,
    pub solved_count: u32,
    pub contest: Option<String>,
    pub date: NaiveDate,
}

impl PanelItem for Problem {
    fn headers() -> &'static [&'static str] {
        &["Problem", "Difficulty", "Tags", "Solved", "Contest", "Date"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.difficulty.to_string(),
            self.tags.join(", "),
            self.solved_count.to_string(),
            self.contest.clone().unwrap_or_else(|| "-".to_string()),
            self.date.format("%Y-%m-%d").to_string(),
        ]
    }
}

fn pick<'a>(rng: &mut impl Rng, options: &[&'a str]) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

fn generate_problem(index: usize, today: NaiveDate, rng: &mut impl Rng) -> Problem {
    let max_tags = rng.random_range(1..=3);
    let mut tags: Vec<String> = TAGS
        .iter()
        .filter(|_| rng.random_bool(0.3))
        .take(max_tags)
        .map(|tag| (*tag).to_string())
        .collect();
    if tags.is_empty() {
        tags.push(pick(rng, &TAGS).to_string());
    }

    let name = format!(
        "Problem {}: {} {} {}",
        index + 1,
        pick(rng, &ARTICLES),
        pick(rng, &ADJECTIVES),
        pick(rng, &NOUNS)
    );
    let contest = rng
        .random_bool(0.7)
        .then(|| format!("Contest {}", rng.random_range(1..=100)));
    let age = chrono::Duration::days(rng.random_range(0..=MAX_AGE_DAYS));

    Problem {
        id: random_uuid(rng),
        name,
        tags,
        difficulty: *Difficulty::ALL.choose(rng).unwrap_or(&Difficulty::Medium),
        solved_count: rng.random_range(0..10_000),
        contest,
        date: today - age,
    }
}

/// A fresh simulated problem set dated relative to `today`.
pub fn generate_problems(today: NaiveDate, rng: &mut impl Rng) -> Vec<Problem> {
    (0..PROBLEM_COUNT)
        .map(|index| generate_problem(index, today, &mut *rng))
        .collect()
}

/// Name and tag filter over the problem set.
///
/// A problem matches when its name contains the text (ignoring case) and it
/// carries at least one of the selected tags. No selected tags matches every
/// problem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemFilter {
    text: String,
    tags: Vec<String>,
}

impl ProblemFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.trim().to_lowercase();
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Select `tag`, or deselect it when already selected.
    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(position) = self.tags.iter().position(|selected| selected == tag) {
            self.tags.remove(position);
        } else {
            self.tags.push(tag.to_string());
        }
    }

    pub fn selected_tags(&self) -> &[String] {
        &self.tags
    }

    #[must_use]
    pub fn matches(&self, problem: &Problem) -> bool {
        let matches_text = self.text.is_empty() || problem.name.to_lowercase().contains(&self.text);
        let matches_tags = self.tags.is_empty() || self.tags.iter().any(|tag| problem.tags.contains(tag));
        matches_text && matches_tags
    }

    pub fn apply<'a>(&self, problems: &'a [Problem]) -> Vec<&'a Problem> {
        problems.iter().filter(|problem| self.matches(problem)).collect()
    }
}

/// Tags offered for filtering.
#[must_use]
pub fn available_tags() -> &'static [&'static str] {
    &TAGS
}

/// Fetcher for the coding panel.
///
/// The problem set is generated once; each search filters it by the query and
/// the tags chosen at construction.
#[derive(Debug)]
pub struct SimulatedProblemFetcher {
    simulation: Simulation,
    problems: Vec<Problem>,
    tags: Vec<String>,
}

impl SimulatedProblemFetcher {
    pub fn new(simulation: Simulation) -> Self {
        let today = Utc::now().date_naive();
        let problems = simulation.with_rng(|rng| generate_problems(today, rng));
        Self {
            simulation,
            problems,
            tags: Vec::new(),
        }
    }

    /// Only return problems carrying one of `tags`.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// The whole problem set.
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }
}

impl Default for SimulatedProblemFetcher {
    fn default() -> Self {
        Self::new(Simulation::new(DEFAULT_LATENCY, None))
    }
}

impl Fetcher for SimulatedProblemFetcher {
    type Item = Problem;

    async fn search(&self, query: &Query) -> Result<Vec<Problem>, FetchError> {
        self.simulation.delay().await;
        let filter = ProblemFilter::new()
            .with_text(query.as_str())
            .with_tags(self.tags.iter().cloned());
        Ok(filter.apply(&self.problems).into_iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn problems() -> Vec<Problem> {
        generate_problems(today(), &mut StdRng::seed_from_u64(11))
    }

    fn problem(name: &str, tags: &[&str]) -> Problem {
        Problem {
            id: Uuid::nil(),
            name: name.to_string(),
            tags: tags.iter().map(|tag| (*tag).to_string()).collect(),
            difficulty: Difficulty::Easy,
            solved_count: 0,
            contest: None,
            date: today(),
        }
    }

    #[test]
    fn test_generated_problem_set_shape() {
        let problems = problems();
        assert_eq!(problems.len(), PROBLEM_COUNT);

        for (index, problem) in problems.iter().enumerate() {
            assert!(problem.name.starts_with(&format!("Problem {}: ", index + 1)));
            assert!((1..=3).contains(&problem.tags.len()));
            assert!(problem.tags.iter().all(|tag| TAGS.contains(&tag.as_str())));
            assert!(problem.solved_count < 10_000);
            assert!(problem.date <= today());
            assert!(problem.date >= today() - chrono::Duration::days(MAX_AGE_DAYS));
        }
    }

    #[test]
    fn test_text_filter_ignores_case() {
        let filter = ProblemFilter::new().with_text("  GREAT ");
        assert!(filter.matches(&problem("Problem 1: The Great Task", &["dp"])));
        assert!(!filter.matches(&problem("Problem 2: A Small Task", &["dp"])));
    }

    #[test]
    fn test_tag_filter_matches_any_selected_tag() {
        let mut filter = ProblemFilter::new();
        let graph_problem = problem("Problem 3: Some Complex Puzzle", &["graphs", "trees"]);
        assert!(filter.matches(&graph_problem));

        filter.toggle_tag("math");
        assert!(!filter.matches(&graph_problem));

        filter.toggle_tag("trees");
        assert!(filter.matches(&graph_problem));
        assert_eq!(filter.selected_tags(), ["math", "trees"]);

        filter.toggle_tag("math");
        filter.toggle_tag("trees");
        assert!(filter.selected_tags().is_empty());
    }

    #[test]
    fn test_apply_keeps_order() {
        let problems = problems();
        let everything = ProblemFilter::new().with_text("problem").apply(&problems);
        assert_eq!(everything.len(), PROBLEM_COUNT);
        assert_eq!(everything[0].id, problems[0].id);
    }

    #[test]
    fn test_available_tags() {
        assert_eq!(available_tags().len(), 10);
        assert!(available_tags().contains(&"binary search"));
    }
}
