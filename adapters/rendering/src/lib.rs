#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Los Gemini adapters.
//!
//! Everything here is plain data. The simulation fills a [`Scene`] and a
//! backend implementing [`RenderingBackend`] turns it into drawable geometry,
//! lights and post-processing without ever reaching back into the world.

pub mod visuals;

use anyhow::Result as AnyResult;
use glam::Vec3;
use los_gemini_core::{CityLayout, Landmark, TrafficActor};
use los_gemini_system_graphics::{GroundMaterial, PostEffect, RenderParams};
use serde::{Deserialize, Serialize};
use std::{f32::consts::FRAC_PI_2, time::Duration};
use thiserror::Error;

use self::visuals::{BuildingVisual, CarVisual, LandmarkVisual, PalmTreeVisual, PlayerVisual};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Creates an opaque color from a packed `0xRRGGBB` value.
    #[must_use]
    pub fn from_hex(hex: u32) -> Self {
        Self::from_rgb_u8(
            ((hex >> 16) & 0xff) as u8,
            ((hex >> 8) & 0xff) as u8,
            (hex & 0xff) as u8,
        )
    }

    /// Returns the same color with the provided alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

impl From<los_gemini_core::Color> for Color {
    fn from(color: los_gemini_core::Color) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

/// Physically based surface description.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// Albedo; alpha below one marks the surface as transparent.
    pub color: Color,
    /// Self-illumination color and intensity.
    pub emissive: Option<(Color, f32)>,
    /// Metalness in `0.0..=1.0`.
    pub metalness: f32,
    /// Roughness in `0.0..=1.0`.
    pub roughness: f32,
}

impl Surface {
    /// Plain dielectric surface with default roughness.
    #[must_use]
    pub const fn flat(color: Color) -> Self {
        Self {
            color,
            emissive: None,
            metalness: 0.0,
            roughness: 1.0,
        }
    }

    /// Glowing surface.
    #[must_use]
    pub const fn glowing(color: Color, emissive: Color, intensity: f32) -> Self {
        Self {
            emissive: Some((emissive, intensity)),
            ..Self::flat(color)
        }
    }

    /// Returns the surface with the provided metalness and roughness.
    #[must_use]
    pub const fn finish(self, metalness: f32, roughness: f32) -> Self {
        Self {
            metalness,
            roughness,
            ..self
        }
    }
}

/// Geometric primitive placed relative to its owner's origin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    /// Axis-aligned box before rotation.
    Box {
        /// Center of the box.
        center: Vec3,
        /// Full extents along each axis.
        size: Vec3,
        /// Rotation in radians about the fixed X, Y and Z axes, applied in that order.
        rotation: Vec3,
        /// Surface shading.
        surface: Surface,
    },
    /// Torus lying in the XY plane before rotation.
    Torus {
        /// Center of the ring.
        center: Vec3,
        /// Distance from the center to the middle of the tube.
        radius: f32,
        /// Radius of the tube.
        tube: f32,
        /// Rotation in radians about the fixed X, Y and Z axes, applied in that order.
        rotation: Vec3,
        /// Surface shading.
        surface: Surface,
    },
    /// Upper hemisphere.
    Dome {
        /// Center of the base circle.
        center: Vec3,
        /// Sphere radius.
        radius: f32,
        /// Surface shading.
        surface: Surface,
    },
    /// Horizontal rectangle facing up.
    Plane {
        /// Center of the rectangle.
        center: Vec3,
        /// Extent along X and Z.
        size: [f32; 2],
        /// Surface shading.
        surface: Surface,
    },
    /// Billboard text.
    Text {
        /// Anchor of the text block.
        center: Vec3,
        /// String to draw.
        content: String,
        /// Glyph height in world units.
        font_size: f32,
        /// Glyph color.
        color: Color,
    },
}

impl Primitive {
    /// Convenience constructor for an unrotated box.
    #[must_use]
    pub fn cuboid(center: Vec3, size: Vec3, surface: Surface) -> Self {
        Self::Box {
            center,
            size,
            rotation: Vec3::ZERO,
            surface,
        }
    }
}

/// Omnidirectional light.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    /// Position relative to the owner's origin.
    pub position: Vec3,
    /// Light color.
    pub color: Color,
    /// Light intensity.
    pub intensity: f32,
    /// Cut-off distance; `None` means unbounded.
    pub distance: Option<f32>,
}

impl PointLight {
    /// Creates a new point light.
    #[must_use]
    pub const fn new(position: Vec3, color: Color, intensity: f32, distance: Option<f32>) -> Self {
        Self {
            position,
            color,
            intensity,
            distance,
        }
    }
}

/// Orbit camera the player uses to look around the city.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    /// Initial eye position.
    pub position: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Point the camera orbits.
    pub target: Vec3,
    /// Closest allowed orbit distance.
    pub min_distance: f32,
    /// Furthest allowed orbit distance.
    pub max_distance: f32,
    /// Inertia applied to orbit movement.
    pub damping: f32,
    /// Highest polar angle, keeping the camera above the ground.
    pub max_polar_angle: f32,
}

impl CameraRig {
    /// Creates an orbit rig, validating the distance range.
    pub fn new(
        position: Vec3,
        target: Vec3,
        min_distance: f32,
        max_distance: f32,
    ) -> Result<Self, RenderingError> {
        if !(min_distance > 0.0 && min_distance <= max_distance) {
            return Err(RenderingError::InvalidOrbitRange {
                min_distance,
                max_distance,
            });
        }

        Ok(Self {
            position,
            target,
            min_distance,
            max_distance,
            ..Self::default()
        })
    }

    /// Clamps an eye position onto the allowed orbit shell around the target.
    #[must_use]
    pub fn clamp_eye(&self, eye: Vec3) -> Vec3 {
        let offset = eye - self.target;
        let distance = offset.length();
        if distance == 0.0 {
            return self.target + Vec3::new(0.0, 0.0, self.min_distance);
        }
        let clamped = distance.clamp(self.min_distance, self.max_distance);
        self.target + offset * (clamped / distance)
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: Vec3::new(40.0, 30.0, 80.0),
            fov_degrees: 40.0,
            target: Vec3::new(0.0, 10.0, 0.0),
            min_distance: 15.0,
            max_distance: 250.0,
            damping: 0.03,
            max_polar_angle: FRAC_PI_2 - 0.05,
        }
    }
}

/// Sky, fog and global lighting.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Atmosphere {
    /// Fog color.
    pub fog_color: Color,
    /// Distance where fog starts.
    pub fog_near: f32,
    /// Distance where fog is opaque.
    pub fog_far: f32,
    /// Direction of the low sunset sun.
    pub sun_position: Vec3,
    /// Sky haze.
    pub turbidity: f32,
    /// Rayleigh scattering coefficient.
    pub rayleigh: f32,
    /// Number of background stars.
    pub star_count: u32,
    /// Ambient light intensity.
    pub ambient_intensity: f32,
    /// Key light position.
    pub key_light_position: Vec3,
    /// Key light color.
    pub key_light_color: Color,
    /// Key light intensity.
    pub key_light_intensity: f32,
    /// Shadow map resolution.
    pub shadow_map_size: u32,
}

impl Default for Atmosphere {
    fn default() -> Self {
        Self {
            fog_color: Color::from_hex(0x050308),
            fog_near: 40.0,
            fog_far: 300.0,
            sun_position: Vec3::new(100.0, 3.0, 100.0),
            turbidity: 12.0,
            rayleigh: 4.0,
            star_count: 10_000,
            ambient_intensity: 0.4,
            key_light_position: Vec3::new(100.0, 50.0, 100.0),
            key_light_color: Color::from_hex(0xff7722),
            key_light_intensity: 3.0,
            shadow_map_size: 2048,
        }
    }
}

/// Ground plane under the city.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ground {
    /// Side length of the square plane.
    pub extent: f32,
    /// Number of grid-line divisions drawn just above the plane.
    pub grid_divisions: u32,
    /// Center-line and regular grid-line colors.
    pub grid_colors: (Color, Color),
    /// Material strategy chosen by the graphics settings.
    pub material: GroundMaterial,
}

/// Scene description combining the static city, dynamic actors and effects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Procedural buildings.
    pub buildings: Vec<BuildingVisual>,
    /// Procedural palm trees.
    pub palm_trees: Vec<PalmTreeVisual>,
    /// Hand-placed landmarks.
    pub landmarks: Vec<LandmarkVisual>,
    /// Traffic vehicles.
    pub cars: Vec<CarVisual>,
    /// Figure standing at the spawn point.
    pub player: PlayerVisual,
    /// Ground plane.
    pub ground: Ground,
    /// Post-process stages in application order.
    pub effects: Vec<PostEffect>,
    /// Orbit camera.
    pub camera: CameraRig,
    /// Sky, fog and global lights.
    pub atmosphere: Atmosphere,
}

const GROUND_EXTENT: f32 = 1_500.0;
const GROUND_GRID_DIVISIONS: u32 = 150;

impl Scene {
    /// Assembles a scene from world snapshots and the active render parameters.
    #[must_use]
    pub fn assemble(
        layout: &CityLayout,
        landmarks: &[Landmark],
        traffic: &[TrafficActor],
        params: &RenderParams,
    ) -> Self {
        let mut scene = Self {
            buildings: layout.buildings.iter().map(BuildingVisual::from).collect(),
            palm_trees: layout
                .palm_trees
                .iter()
                .map(|tree| PalmTreeVisual::at(visuals::to_vec3(tree.position)))
                .collect(),
            landmarks: Vec::new(),
            cars: Vec::new(),
            player: PlayerVisual::default(),
            ground: Ground {
                extent: GROUND_EXTENT,
                grid_divisions: GROUND_GRID_DIVISIONS,
                grid_colors: (Color::from_hex(0x1a1010), Color::from_hex(0x050303)),
                material: params.ground,
            },
            effects: params.effect_stages(),
            camera: CameraRig::default(),
            atmosphere: Atmosphere::default(),
        };
        scene.refresh_dynamic(landmarks, traffic);
        scene
    }

    /// Rebuilds the per-tick parts of the scene: landmark animation and traffic.
    pub fn refresh_dynamic(&mut self, landmarks: &[Landmark], traffic: &[TrafficActor]) {
        self.landmarks = landmarks.iter().map(LandmarkVisual::from).collect();
        self.cars = traffic.iter().map(CarVisual::from).collect();
    }

    /// Applies new render parameters without touching geometry.
    pub fn apply_params(&mut self, params: &RenderParams) {
        self.ground.material = params.ground;
        self.effects = params.effect_stages();
    }

    /// Total number of point lights a backend has to upload.
    #[must_use]
    pub fn light_count(&self) -> usize {
        let landmark_lights: usize = self
            .landmarks
            .iter()
            .map(|landmark| landmark.lights.len())
            .sum();
        self.buildings.len() + self.cars.len() + landmark_lights + 1
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// `P` was pressed this frame.
    pub phone: bool,
    /// `R` was pressed this frame.
    pub radio: bool,
    /// `Escape` was pressed this frame.
    pub escape: bool,
}

/// Rendering backend capable of presenting Los Gemini scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq)]
pub enum RenderingError {
    /// The orbit distance range is empty or non-positive.
    #[error("orbit range {min_distance}..{max_distance} is invalid")]
    InvalidOrbitRange {
        /// Requested minimum distance.
        min_distance: f32,
        /// Requested maximum distance.
        max_distance: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_colors_convert_to_unit_channels() {
        let color = Color::from(los_gemini_core::Color::from_rgb(255, 0, 51));
        assert_eq!(color, Color::new(1.0, 0.0, 0.2, 1.0));
    }

    #[test]
    fn camera_rig_rejects_inverted_range() {
        let error = CameraRig::new(Vec3::ONE, Vec3::ZERO, 50.0, 10.0).unwrap_err();
        assert_eq!(
            error,
            RenderingError::InvalidOrbitRange {
                min_distance: 50.0,
                max_distance: 10.0,
            }
        );
    }

    #[test]
    fn camera_clamps_eye_to_orbit_shell() {
        let rig = CameraRig::default();
        let near = rig.clamp_eye(rig.target + Vec3::new(0.0, 0.0, 1.0));
        assert!((near.distance(rig.target) - 15.0).abs() < 1e-4);

        let far = rig.clamp_eye(rig.target + Vec3::new(1_000.0, 0.0, 0.0));
        assert!((far.distance(rig.target) - 250.0).abs() < 1e-3);

        let inside = rig.target + Vec3::new(30.0, 20.0, 0.0);
        assert_eq!(rig.clamp_eye(inside), inside);
    }
}
