//! Memes panel: a simulated template catalog and the meme composer.

use std::time::Duration;

use dtk_core::{FetchError, Fetcher, NotificationSink, Query};
use rand::Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::item::PanelItem;
use crate::simulated::{Simulation, random_uuid};

/// Latency of the simulated template catalog.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1_000);

/// Templates in the simulated catalog.
pub const TEMPLATE_COUNT: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemeTemplate {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    /// Number of caption boxes.
    pub box_count: usize,
}

impl PanelItem for MemeTemplate {
    fn headers() -> &'static [&'static str] {
        &["Template", "Captions", "Id"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.box_count.to_string(),
            self.id.to_string(),
        ]
    }
}

/// The simulated template catalog.
pub fn generate_templates(rng: &mut impl Rng) -> Vec<MemeTemplate> {
    (1..=TEMPLATE_COUNT)
        .map(|number| MemeTemplate {
            id: random_uuid(&mut *rng),
            name: format!("Meme Template {number}"),
            url: format!("/placeholder.svg?height=300&width=300&text=Meme+{number}"),
            box_count: rng.random_range(1..=2),
        })
        .collect()
}

/// Fetcher for the memes panel: templates whose name contains the query.
#[derive(Debug)]
pub struct SimulatedMemeFetcher {
    simulation: Simulation,
    templates: Vec<MemeTemplate>,
}

impl SimulatedMemeFetcher {
    pub fn new(simulation: Simulation) -> Self {
        let templates = simulation.with_rng(generate_templates);
        Self {
            simulation,
            templates,
        }
    }

    /// The whole catalog.
    pub fn templates(&self) -> &[MemeTemplate] {
        &self.templates
    }
}

impl Default for SimulatedMemeFetcher {
    fn default() -> Self {
        Self::new(Simulation::new(DEFAULT_LATENCY, None))
    }
}

impl Fetcher for SimulatedMemeFetcher {
    type Item = MemeTemplate;

    async fn search(&self, query: &Query) -> Result<Vec<MemeTemplate>, FetchError> {
        self.simulation.delay().await;
        let needle = query.as_str().to_lowercase();
        Ok(self
            .templates
            .iter()
            .filter(|template| template.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

/// Errors raised while composing a meme.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemeError {
    /// No template has been selected.
    #[error("no meme template selected")]
    NoTemplate,

    /// Caption index beyond the template's boxes.
    #[error("caption {index} out of range (template has {box_count} boxes)")]
    CaptionOutOfRange { index: usize, box_count: usize },

    /// Some caption boxes are blank.
    #[error("captions {missing:?} are empty")]
    MissingCaptions { missing: Vec<usize> },
}

impl MemeError {
    /// Returns a user-friendly message for this error.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NoTemplate => "Please choose a meme template first",
            Self::CaptionOutOfRange { .. } => "That caption box does not exist",
            Self::MissingCaptions { .. } => "Please fill in all caption fields",
        }
    }
}

/// A composed meme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meme {
    pub template_id: Uuid,
    pub image_url: String,
    pub captions: Vec<String>,
    /// Hex SHA-256 of the template id followed by the captions.
    pub hash: String,
}

/// Content hash of a meme: SHA-256 over the template id and the
/// concatenated captions, hex encoded.
#[must_use]
pub fn meme_hash(template_id: &Uuid, captions: &[String]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(template_id.to_string().as_bytes());
    for caption in captions {
        hasher.update(caption.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Template selection and caption editing.
#[derive(Debug, Default)]
pub struct MemeComposer {
    template: Option<MemeTemplate>,
    captions: Vec<String>,
    generated: Option<Meme>,
}

impl MemeComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `template`, resetting captions to one blank per box.
    pub fn select(&mut self, template: MemeTemplate) {
        self.captions = vec![String::new(); template.box_count];
        self.template = Some(template);
        self.generated = None;
    }

    pub fn template(&self) -> Option<&MemeTemplate> {
        self.template.as_ref()
    }

    pub fn captions(&self) -> &[String] {
        &self.captions
    }

    /// Most recently composed meme for the selected template.
    pub fn generated(&self) -> Option<&Meme> {
        self.generated.as_ref()
    }

    pub fn set_caption(&mut self, index: usize, text: impl Into<String>) -> Result<(), MemeError> {
        let box_count = self.captions.len();
        let slot = self
            .captions
            .get_mut(index)
            .ok_or(MemeError::CaptionOutOfRange { index, box_count })?;
        *slot = text.into();
        Ok(())
    }

    /// Compose the meme from the selected template and captions.
    ///
    /// Blank captions are reported on `sink` as a warning and nothing is
    /// composed.
    pub fn compose(&mut self, sink: &dyn NotificationSink) -> Result<&Meme, MemeError> {
        let template = self.template.as_ref().ok_or(MemeError::NoTemplate)?;

        let missing: Vec<usize> = self
            .captions
            .iter()
            .enumerate()
            .filter(|(_, caption)| caption.trim().is_empty())
            .map(|(index, _)| index)
            .collect();
        if !missing.is_empty() {
            let error = MemeError::MissingCaptions { missing };
            sink.warning(error.user_message());
            return Err(error);
        }

        let meme = Meme {
            template_id: template.id,
            image_url: template.url.clone(),
            captions: self.captions.clone(),
            hash: meme_hash(&template.id, &self.captions),
        };
        tracing::debug!(template = %template.name, hash = %meme.hash, "meme composed");
        sink.success("Meme generated successfully!");

        Ok(self.generated.insert(meme))
    }
}
