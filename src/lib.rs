//! # storyboard-pipeline
//!
//! Story board generation pipeline: a short user idea becomes a story, the
//! story is decomposed into a character dictionary plus labeled scenes, and
//! one image is generated per scene with bounded retry and rate-limit
//! pacing.
//!
//! ## Features
//!
//! - **Two-step text generation** — story first, then a scene script whose
//!   grammar the parsers recognize
//! - **Defensive script parsing** — `name = "description"` declarations and
//!   `Scene <n>:` labels; malformed model output yields zero matches, never
//!   an error
//! - **Placeholder substitution** — `{name}` tokens resolve to character
//!   descriptions in a single non-recursive pass
//! - **Sequential image orchestration** — 3 attempts per scene, separate
//!   backoffs for rate-limit statuses and transport failures, fixed pacing
//!   between scenes
//! - **Partial results** — a scene that exhausts its retries is recorded
//!   with `url: None`; the batch always runs to completion
//! - **Cancellation** — interrupt a run between steps/scenes via
//!   `Arc<AtomicBool>`
//!
//! ## Quick Start
//!
//! ```no_run
//! use storyboard_pipeline::{
//!     ImageClient, ImageConfig, ImageGenerator, StoryboardPipeline, TextClient, TextConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let text = TextClient::new(TextConfig::with_api_key("gemini-key"));
//!     let images = ImageGenerator::new(ImageClient::new(ImageConfig::with_api_key("flux-key")));
//!
//!     let pipeline = StoryboardPipeline::new(text, images);
//!     let run = pipeline.run("a boy walking home in the rain").await?;
//!
//!     for image in &run.images {
//!         match &image.url {
//!             Some(url) => println!("{} -> {}", image.scene.text, url),
//!             None => println!("{} -> (no image)", image.scene.text),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod image;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod text;
pub mod types;

pub use error::{Error, Result};
pub use image::{
    ImageClient, ImageConfig, ImageGenerator, ImageService, RetryPolicy, DEFAULT_STYLE_PREFIX,
};
pub use parser::{compile_scenes, parse_characters, split_scenes, substitute_characters};
pub use pipeline::StoryboardPipeline;
pub use text::{TextClient, TextConfig, TextService, NO_RESULT_FALLBACK};
pub use types::{CharacterMap, RunProgress, Scene, SceneImage, StoryboardRun};
