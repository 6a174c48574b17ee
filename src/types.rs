use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Character identifier → description, parsed from the scene script.
///
/// A `BTreeMap` so that placeholder substitution and serialized output are
/// deterministic for a given script.
pub type CharacterMap = BTreeMap<String, String>;

/// One scene of the storyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// 1-based position, assigned by the splitter in output order.
    pub index: usize,
    /// Relabeled scene text as emitted by the splitter (`"Scene {n}: ..."`).
    pub text: String,
    /// Finalized text after character placeholder substitution.
    pub prompt: String,
}

/// Outcome of image generation for a single scene.
///
/// `url` is `None` when the retry budget was exhausted without an image;
/// failed scenes stay in the batch output so results remain index-aligned
/// with their scenes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneImage {
    pub scene: Scene,
    pub url: Option<String>,
    /// Number of service calls made for this scene (1..=max_attempts).
    pub attempts: u32,
}

/// Aggregate result of one pipeline invocation.
///
/// Nothing here is retained between runs — the pipeline keeps no caches and
/// no cross-run state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryboardRun {
    /// The generated story text.
    pub story: String,
    /// Characters declared in the scene script.
    pub characters: CharacterMap,
    /// Scenes in splitter order.
    pub scenes: Vec<Scene>,
    /// One entry per scene, index-aligned with `scenes`.
    pub images: Vec<SceneImage>,
}

/// Progress notification delivered to `run_with_progress` callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunProgress {
    /// The story generation call is starting.
    Story,
    /// The scene-script generation call is starting.
    SceneScript,
    /// Image generation for `scene` (1-based) of `total` is starting.
    Image { scene: usize, total: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_serialization_roundtrip() {
        let scene = Scene {
            index: 1,
            text: "Scene 1: {hero} walks home".to_string(),
            prompt: "Scene 1: a tall boy walks home".to_string(),
        };
        let json = serde_json::to_string(&scene).unwrap();
        let back: Scene = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scene);
    }

    #[test]
    fn test_scene_image_failed_serializes_null_url() {
        let img = SceneImage {
            scene: Scene {
                index: 2,
                text: "Scene 2: it rains".to_string(),
                prompt: "Scene 2: it rains".to_string(),
            },
            url: None,
            attempts: 3,
        };
        let json = serde_json::to_string(&img).unwrap();
        assert!(json.contains("\"url\":null"));
        assert!(json.contains("\"attempts\":3"));
    }

    #[test]
    fn test_character_map_is_ordered() {
        let mut characters = CharacterMap::new();
        characters.insert("zoe".to_string(), "a pilot".to_string());
        characters.insert("ana".to_string(), "a diver".to_string());
        let keys: Vec<_> = characters.keys().cloned().collect();
        assert_eq!(keys, vec!["ana", "zoe"]);
    }
}
