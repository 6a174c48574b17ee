//! Generate a full storyboard from a one-line idea.
//!
//! Requires a Gemini-style text API key and a Together-style images API key:
//!
//! ```sh
//! GEMINI_API_KEY=... TOGETHER_API_KEY=... \
//!     cargo run --example generate_storyboard -- "a boy walking home in the rain"
//! ```

use anyhow::Context;
use storyboard_pipeline::{
    ImageClient, ImageConfig, ImageGenerator, RunProgress, StoryboardPipeline, TextClient,
    TextConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let idea = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "a boy walking home in the rain".to_string());

    let text_key = std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY is not set")?;
    let image_key = std::env::var("TOGETHER_API_KEY").context("TOGETHER_API_KEY is not set")?;

    let text = TextClient::new(TextConfig::with_api_key(text_key));
    let images = ImageGenerator::new(ImageClient::new(ImageConfig::with_api_key(image_key)));
    let pipeline = StoryboardPipeline::new(text, images);

    let run = pipeline
        .run_with_progress(&idea, |progress| match progress {
            RunProgress::Story => println!("Generating story..."),
            RunProgress::SceneScript => println!("Splitting into scenes..."),
            RunProgress::Image { scene, total } => {
                println!("Generating image {}/{}...", scene, total)
            }
        })
        .await?;

    println!("\n{}\n", run.story);
    for (name, description) in &run.characters {
        println!("{} = \"{}\"", name, description);
    }
    println!();
    for image in &run.images {
        match &image.url {
            Some(url) => println!("{}\n  -> {}", image.scene.text, url),
            None => println!(
                "{}\n  -> no image after {} attempt(s)",
                image.scene.text, image.attempts
            ),
        }
    }

    Ok(())
}
