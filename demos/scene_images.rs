//! Drive the image orchestrator over a hand-written scene script, skipping
//! the text-generation steps.
//!
//! ```sh
//! TOGETHER_API_KEY=... cargo run --example scene_images
//! ```

use anyhow::Context;
use storyboard_pipeline::{compile_scenes, ImageClient, ImageConfig, ImageGenerator};

const SCRIPT: &str = r#"mira = "a small girl with a red umbrella"
Scene 1: {mira} waits at a bus stop in heavy rain
Scene 2: the bus arrives, headlights glowing through the downpour
Scene 3: {mira} watches the city lights from a fogged window"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let image_key = std::env::var("TOGETHER_API_KEY").context("TOGETHER_API_KEY is not set")?;

    let (characters, scenes) = compile_scenes(SCRIPT);
    println!("{} character(s), {} scene(s)", characters.len(), scenes.len());

    let generator = ImageGenerator::new(ImageClient::new(ImageConfig::with_api_key(image_key)));
    let results = generator
        .generate_batch_with_progress(&scenes, |scene, total| {
            println!("Generating image {}/{}...", scene, total)
        })
        .await?;

    for image in &results {
        match &image.url {
            Some(url) => println!("{}\n  -> {}", image.scene.prompt, url),
            None => println!("{}\n  -> no image", image.scene.prompt),
        }
    }

    Ok(())
}
