#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Graphics configuration mapper translating user settings into renderer parameters.

use los_gemini_core::{Color, GraphicsSettings};
use los_gemini_system_actors::traffic_count;
use serde::{Deserialize, Serialize};

/// Parameters of the bloom post-process stage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BloomStage {
    /// Luminance above which pixels start to glow.
    pub luminance_threshold: f32,
    /// Strength of the glow.
    pub intensity: f32,
    /// Spread of the glow kernel.
    pub radius: f32,
    /// Whether the blur runs over a mipmap chain.
    pub mipmap_blur: bool,
}

impl Default for BloomStage {
    fn default() -> Self {
        Self {
            luminance_threshold: 0.4,
            intensity: 2.0,
            radius: 0.5,
            mipmap_blur: true,
        }
    }
}

/// Parameters of the chromatic aberration stage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChromaticAberrationStage {
    /// Channel offset in screen space.
    pub offset: [f32; 2],
}

impl Default for ChromaticAberrationStage {
    fn default() -> Self {
        Self {
            offset: [0.002, 0.002],
        }
    }
}

/// Parameters of the vignette stage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VignetteStage {
    /// Edge darkness, taken verbatim from the vignette slider.
    pub darkness: f64,
    /// Distance from the frame edge where darkening starts.
    pub offset: f32,
    /// Whether the alternative "eskil" falloff is used.
    pub eskil: bool,
}

/// Mirror-like ground with blurred real-time reflections.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReflectorMaterial {
    /// Horizontal and vertical reflection blur.
    pub blur: [f32; 2],
    /// Reflection render target resolution in pixels.
    pub resolution: u32,
    /// How much blur mixes into the reflection.
    pub mix_blur: f32,
    /// Strength of the reflection.
    pub mix_strength: f32,
    /// Surface roughness.
    pub roughness: f32,
    /// Depth-based reflection attenuation.
    pub depth_scale: f32,
    /// Base color.
    pub color: Color,
    /// Metalness.
    pub metalness: f32,
    /// Mirror factor.
    pub mirror: f32,
}

impl Default for ReflectorMaterial {
    fn default() -> Self {
        Self {
            blur: [400.0, 150.0],
            resolution: 1024,
            mix_blur: 1.0,
            mix_strength: 45.0,
            roughness: 1.0,
            depth_scale: 1.5,
            color: GROUND_COLOR,
            metalness: 0.7,
            mirror: 0.95,
        }
    }
}

/// Flat ground shaded without reflections.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatteMaterial {
    /// Base color.
    pub color: Color,
    /// Surface roughness.
    pub roughness: f32,
}

impl Default for MatteMaterial {
    fn default() -> Self {
        Self {
            color: GROUND_COLOR,
            roughness: 0.9,
        }
    }
}

/// Ground strategy; each variant is a distinct renderable.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum GroundMaterial {
    /// Expensive reflective ground.
    Reflective(ReflectorMaterial),
    /// Cheap matte ground.
    Matte(MatteMaterial),
}

/// One stage of the post-process chain.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PostEffect {
    /// Glow around bright pixels.
    Bloom(BloomStage),
    /// Color fringing towards the frame edges.
    ChromaticAberration(ChromaticAberrationStage),
    /// Darkened frame edges.
    Vignette(VignetteStage),
}

/// Everything the renderer needs to know about the active graphics settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderParams {
    /// Bloom stage, present only when bloom is enabled.
    pub bloom: Option<BloomStage>,
    /// Always-on chromatic aberration stage.
    pub chromatic_aberration: ChromaticAberrationStage,
    /// Vignette stage.
    pub vignette: VignetteStage,
    /// Ground material strategy.
    pub ground: GroundMaterial,
    /// Number of traffic actors the world should hold.
    pub traffic_count: usize,
}

impl RenderParams {
    /// Post-process stages in the order they are applied.
    #[must_use]
    pub fn effect_stages(&self) -> Vec<PostEffect> {
        let mut stages = Vec::with_capacity(3);
        if let Some(bloom) = self.bloom {
            stages.push(PostEffect::Bloom(bloom));
        }
        stages.push(PostEffect::ChromaticAberration(self.chromatic_aberration));
        stages.push(PostEffect::Vignette(self.vignette));
        stages
    }
}

const GROUND_COLOR: Color = Color::from_hex(0x050505);
const VIGNETTE_OFFSET: f32 = 0.1;

/// Maps graphics settings onto renderer parameters.
///
/// Values are passed through as-is; range enforcement belongs to the caller.
#[must_use]
pub fn to_render_params(settings: &GraphicsSettings) -> RenderParams {
    let ground = if settings.reflections {
        GroundMaterial::Reflective(ReflectorMaterial::default())
    } else {
        GroundMaterial::Matte(MatteMaterial::default())
    };

    RenderParams {
        bloom: settings.bloom.then(BloomStage::default),
        chromatic_aberration: ChromaticAberrationStage::default(),
        vignette: VignetteStage {
            darkness: settings.vignette,
            offset: VIGNETTE_OFFSET,
            eskil: false,
        },
        ground,
        traffic_count: traffic_count(settings.traffic_density),
    }
}

/// Reports whether moving from `previous` to `next` requires re-spawning traffic.
#[must_use]
pub fn requires_traffic_respawn(previous: &GraphicsSettings, next: &GraphicsSettings) -> bool {
    previous.traffic_density != next.traffic_density
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> GraphicsSettings {
        GraphicsSettings::default()
    }

    #[test]
    fn bloom_toggle_gates_the_stage() {
        let enabled = to_render_params(&settings());
        assert_eq!(enabled.bloom, Some(BloomStage::default()));

        let disabled = to_render_params(&GraphicsSettings {
            bloom: false,
            ..settings()
        });
        assert_eq!(disabled.bloom, None);
        assert!(disabled
            .effect_stages()
            .iter()
            .all(|stage| !matches!(stage, PostEffect::Bloom(_))));
    }

    #[test]
    fn reflections_select_ground_strategy() {
        assert!(matches!(
            to_render_params(&settings()).ground,
            GroundMaterial::Reflective(_)
        ));
        let matte = to_render_params(&GraphicsSettings {
            reflections: false,
            ..settings()
        });
        assert_eq!(matte.ground, GroundMaterial::Matte(MatteMaterial::default()));
    }

    #[test]
    fn vignette_maps_linearly() {
        for darkness in [0.0, 0.3, 1.0, 2.0] {
            let params = to_render_params(&GraphicsSettings {
                vignette: darkness,
                ..settings()
            });
            assert_eq!(params.vignette.darkness, darkness);
        }
    }

    #[test]
    fn traffic_count_tracks_density() {
        assert_eq!(to_render_params(&settings()).traffic_count, 64);
        let empty = to_render_params(&GraphicsSettings {
            traffic_density: 0.0,
            ..settings()
        });
        assert_eq!(empty.traffic_count, 0);
    }

    #[test]
    fn effect_stages_are_ordered() {
        let stages = to_render_params(&settings()).effect_stages();
        assert_eq!(stages.len(), 3);
        assert!(matches!(stages[0], PostEffect::Bloom(_)));
        assert!(matches!(stages[1], PostEffect::ChromaticAberration(_)));
        assert!(matches!(stages[2], PostEffect::Vignette(_)));
    }

    #[test]
    fn only_density_changes_require_respawn() {
        let base = settings();
        assert!(!requires_traffic_respawn(
            &base,
            &GraphicsSettings {
                bloom: false,
                reflections: false,
                vignette: 0.2,
                ..base
            }
        ));
        assert!(requires_traffic_respawn(
            &base,
            &GraphicsSettings {
                traffic_density: 0.5,
                ..base
            }
        ));
    }
}
