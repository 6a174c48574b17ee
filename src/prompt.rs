//! Prompt templates for the two text-generation calls.
//!
//! Templates use `{input}` placeholders rendered by [`render`]. The scene
//! script prompt pins down the exact output grammar the parser recognizes:
//! `name = "description"` declarations followed by `Scene 1:`, `Scene 2:`,
//! … blocks referencing characters as `{name}`.

/// Expands a user idea into a short story.
pub const STORY_PROMPT: &str =
    "{input} Write a short simple story with 10-12 lines only.";

/// Turns a story into character declarations plus labeled scene blocks.
pub const SCENE_SCRIPT_PROMPT: &str = r#"Split this story into clear scenes like Scene 1, Scene 2, Scene 3 with descriptive 2-3 lines each.

Before the scenes, declare every recurring character on its own line as:
name = "short physical description"

Inside scene text, refer to declared characters as {name} placeholders.
Return only the declarations and the scenes, nothing else.

Story:
{input}"#;

/// Build a prompt string by replacing `{input}` in the template.
pub fn render(template: &str, input: &str) -> String {
    template.replace("{input}", input)
}
