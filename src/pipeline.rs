use crate::error::{Error, Result};
use crate::image::{ImageGenerator, ImageService};
use crate::parser;
use crate::prompt;
use crate::text::TextService;
use crate::types::{RunProgress, StoryboardRun};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tracing::info;

/// End-to-end storyboard pipeline.
///
/// Runs the full flow for one user idea: story generation, scene-script
/// generation, character/scene parsing with placeholder substitution, then
/// sequential image generation. Each step is awaited to completion before
/// the next begins; there is no overlap between the two text calls or
/// between scenes.
///
/// A text-call failure aborts the run with the error. Image failures never
/// do — they degrade to `url: None` entries in the result.
pub struct StoryboardPipeline<T, S> {
    text: T,
    images: ImageGenerator<S>,
    cancellation: Option<Arc<AtomicBool>>,
}

impl<T, S> std::fmt::Debug for StoryboardPipeline<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryboardPipeline")
            .field("has_cancellation", &self.cancellation.is_some())
            .finish()
    }
}

impl<T, S> StoryboardPipeline<T, S>
where
    T: TextService,
    S: ImageService,
{
    /// Create a pipeline over the given text service and image generator.
    pub fn new(text: T, images: ImageGenerator<S>) -> Self {
        Self {
            text,
            images,
            cancellation: None,
        }
    }

    /// Set a cancellation flag checked between pipeline steps and between
    /// scenes. Retry and backoff timing is unchanged while the flag stays
    /// unset.
    pub fn with_cancellation(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.images = self.images.with_cancellation(cancel.clone());
        self.cancellation = Some(cancel);
        self
    }

    fn check_cancelled(&self) -> Result<()> {
        if let Some(ref cancel) = self.cancellation {
            if cancel.load(Ordering::Relaxed) {
                return Err(Error::Cancelled);
            }
        }
        Ok(())
    }

    /// Run the pipeline for one user idea.
    pub async fn run(&self, idea: &str) -> Result<StoryboardRun> {
        self.run_with_progress(idea, |_| {}).await
    }

    /// Run the pipeline, invoking the callback as each phase starts.
    pub async fn run_with_progress<F>(&self, idea: &str, mut on_progress: F) -> Result<StoryboardRun>
    where
        F: FnMut(RunProgress),
    {
        self.check_cancelled()?;
        on_progress(RunProgress::Story);
        info!("generating story");
        let story = self
            .text
            .generate(&prompt::render(prompt::STORY_PROMPT, idea))
            .await?;

        self.check_cancelled()?;
        on_progress(RunProgress::SceneScript);
        info!("generating scene script");
        let script = self
            .text
            .generate(&prompt::render(prompt::SCENE_SCRIPT_PROMPT, &story))
            .await?;

        let (characters, scenes) = parser::compile_scenes(&script);
        info!(
            "parsed {} character(s) and {} scene(s)",
            characters.len(),
            scenes.len()
        );

        let images = self
            .images
            .generate_batch_with_progress(&scenes, |scene, total| {
                on_progress(RunProgress::Image { scene, total })
            })
            .await?;

        Ok(StoryboardRun {
            story,
            characters,
            scenes,
            images,
        })
    }
}
