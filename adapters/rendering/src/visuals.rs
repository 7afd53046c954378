//! Geometry for every entity the city draws.
//!
//! Visuals hold a world-space `origin` and parts expressed relative to it, so
//! backends can batch identical meshes and only upload transforms.

use glam::{Quat, Vec3};
use los_gemini_core::{
    BuildingPlacement, Landmark, LandmarkKind, Lane, TrafficActor, WorldPosition,
};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::{Color, PointLight, Primitive, Surface};

const BUILDING_FOOTPRINT: f32 = 8.0;
const BUILDING_LIGHT_LIFT: f32 = 2.0;

const TRUNK_COLOR: u32 = 0x4a3728;
const FROND_COLOR: u32 = 0x1b3d16;
const TRUNK_HEIGHT: f32 = 8.0;
const FROND_COUNT: usize = 6;
const FROND_REACH: f32 = 1.8;

/// Ferris wheel rim radius.
pub const WHEEL_RADIUS: f32 = 22.0;
/// Number of cabins hanging from the Ferris wheel rim.
pub const WHEEL_CABINS: usize = 16;

const PLAZA_PALMS: usize = 12;
const BOARDWALK_LAMPS: usize = 30;
const SIGN_LAMPS: usize = 10;

/// Converts a world position into a render vector.
#[must_use]
pub fn to_vec3(position: WorldPosition) -> Vec3 {
    Vec3::new(position.x, position.y, position.z)
}

fn translated(primitive: Primitive, by: Vec3) -> Primitive {
    match primitive {
        Primitive::Box {
            center,
            size,
            rotation,
            surface,
        } => Primitive::Box {
            center: center + by,
            size,
            rotation,
            surface,
        },
        Primitive::Torus {
            center,
            radius,
            tube,
            rotation,
            surface,
        } => Primitive::Torus {
            center: center + by,
            radius,
            tube,
            rotation,
            surface,
        },
        Primitive::Dome {
            center,
            radius,
            surface,
        } => Primitive::Dome {
            center: center + by,
            radius,
            surface,
        },
        Primitive::Plane {
            center,
            size,
            surface,
        } => Primitive::Plane {
            center: center + by,
            size,
            surface,
        },
        Primitive::Text {
            center,
            content,
            font_size,
            color,
        } => Primitive::Text {
            center: center + by,
            content,
            font_size,
            color,
        },
    }
}

/// Glossy tower with a rooftop glow in the facade color.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingVisual {
    /// Center of the building volume.
    pub origin: Vec3,
    /// Facade volume.
    pub body: Primitive,
    /// Rooftop light.
    pub light: PointLight,
}

impl From<&BuildingPlacement> for BuildingVisual {
    fn from(building: &BuildingPlacement) -> Self {
        let color = Color::from(building.color);
        Self {
            origin: to_vec3(building.position),
            body: Primitive::cuboid(
                Vec3::ZERO,
                Vec3::new(BUILDING_FOOTPRINT, building.height, BUILDING_FOOTPRINT),
                Surface::flat(color).finish(0.9, 0.05),
            ),
            light: PointLight::new(
                Vec3::new(0.0, building.height / 2.0 + BUILDING_LIGHT_LIFT, 0.0),
                color,
                25.0,
                Some(20.0),
            ),
        }
    }
}

/// Trunk with a crown of fronds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PalmTreeVisual {
    /// Base of the trunk.
    pub origin: Vec3,
    /// Trunk followed by fronds.
    pub parts: Vec<Primitive>,
}

impl PalmTreeVisual {
    /// Builds a palm tree standing at `origin`.
    #[must_use]
    pub fn at(origin: Vec3) -> Self {
        Self {
            origin,
            parts: palm_parts(),
        }
    }
}

fn palm_parts() -> Vec<Primitive> {
    let trunk = Primitive::cuboid(
        Vec3::new(0.0, TRUNK_HEIGHT / 2.0, 0.0),
        Vec3::new(0.4, TRUNK_HEIGHT, 0.4),
        Surface::flat(Color::from_hex(TRUNK_COLOR)),
    );
    let fronds = (0..FROND_COUNT).map(|i| {
        let angle = i as f32 / FROND_COUNT as f32 * TAU;
        Primitive::Box {
            center: Vec3::new(angle.cos() * FROND_REACH, TRUNK_HEIGHT, angle.sin() * FROND_REACH),
            size: Vec3::new(4.5, 0.05, 1.2),
            rotation: Vec3::new(0.3, angle, 0.0),
            surface: Surface::flat(Color::from_hex(FROND_COLOR)),
        }
    });
    std::iter::once(trunk).chain(fronds).collect()
}

/// Assembled landmark with its lights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandmarkVisual {
    /// Kind of landmark drawn.
    pub kind: LandmarkKind,
    /// Anchor position.
    pub origin: Vec3,
    /// Euler rotation applied to the whole assembly.
    pub rotation: Vec3,
    /// Solid parts relative to `origin`.
    pub parts: Vec<Primitive>,
    /// Lights relative to `origin`.
    pub lights: Vec<PointLight>,
}

impl From<&Landmark> for LandmarkVisual {
    fn from(landmark: &Landmark) -> Self {
        let spec = landmark.spec;
        let (parts, lights) = match spec.kind {
            LandmarkKind::Spire => spire(),
            LandmarkKind::Sign => sign(),
            LandmarkKind::FerrisWheel => ferris_wheel(landmark.spin),
            LandmarkKind::Observatory => observatory(),
            LandmarkKind::Cathedral => cathedral(),
            LandmarkKind::Plaza => plaza(),
            LandmarkKind::Boardwalk => boardwalk(),
        };
        Self {
            kind: spec.kind,
            origin: to_vec3(spec.position),
            rotation: spec
                .rotation
                .map_or(Vec3::ZERO, |r| Vec3::new(r.x, r.y, r.z)),
            parts,
            lights,
        }
    }
}

type Assembly = (Vec<Primitive>, Vec<PointLight>);

fn spire() -> Assembly {
    let cyan = Color::from_hex(0x00ffff);
    let shell = Primitive::cuboid(
        Vec3::ZERO,
        Vec3::new(10.0, 100.0, 10.0),
        Surface::flat(cyan.with_alpha(0.25)).finish(1.0, 0.0),
    );
    let white = Color::from_hex(0xffffff);
    let core = Primitive::cuboid(
        Vec3::ZERO,
        Vec3::new(2.0, 110.0, 2.0),
        Surface::glowing(white, white, 10.0),
    );
    let beacon = PointLight::new(Vec3::new(0.0, 60.0, 0.0), cyan, 120.0, Some(150.0));
    (vec![shell, core], vec![beacon])
}

fn sign() -> Assembly {
    let white = Color::from_hex(0xffffff);
    let text = Primitive::Text {
        center: Vec3::ZERO,
        content: "GEMINI".to_owned(),
        font_size: 15.0,
        color: white,
    };
    let backing = Primitive::cuboid(
        Vec3::new(0.0, 0.0, -3.0),
        Vec3::new(70.0, 20.0, 3.0),
        Surface::flat(Color::from_hex(0x050505)),
    );
    let lamps = (0..SIGN_LAMPS)
        .map(|i| PointLight::new(Vec3::new(i as f32 * 6.0 - 30.0, 0.0, 1.0), white, 2.0, Some(10.0)))
        .collect();
    (vec![text, backing], lamps)
}

/// Cabin centers relative to the wheel hub after turning the wheel by `spin`.
///
/// At rest the cabins sit on the rim in the YZ plane; the wheel assembly
/// turns about the Z axis.
#[must_use]
pub fn cabin_positions(spin: f32) -> Vec<Vec3> {
    let turn = Quat::from_rotation_z(spin);
    (0..WHEEL_CABINS)
        .map(|i| {
            let angle = i as f32 / WHEEL_CABINS as f32 * TAU;
            turn * Vec3::new(0.0, angle.cos() * WHEEL_RADIUS, angle.sin() * WHEEL_RADIUS)
        })
        .collect()
}

fn ferris_wheel(spin: f32) -> Assembly {
    let magenta = Color::from_hex(0xff00ff);
    let cyan = Color::from_hex(0x00ffff);
    let rim = Primitive::Torus {
        center: Vec3::ZERO,
        radius: WHEEL_RADIUS,
        tube: 1.0,
        rotation: Vec3::new(0.0, TAU / 4.0, spin),
        surface: Surface::glowing(Color::from_hex(0xffffff), magenta, 15.0),
    };
    let support = Primitive::cuboid(
        Vec3::new(0.0, -25.0, 0.0),
        Vec3::new(2.0, 50.0, 2.0),
        Surface::flat(Color::from_hex(0x111111)),
    );
    let cabins = cabin_positions(spin).into_iter().map(|center| {
        Primitive::cuboid(
            center,
            Vec3::splat(2.5),
            Surface::glowing(Color::from_hex(0xffffff), cyan, 3.0),
        )
    });
    let parts = [rim, support].into_iter().chain(cabins).collect();
    (parts, Vec::new())
}

fn observatory() -> Assembly {
    let dome = Primitive::Dome {
        center: Vec3::ZERO,
        radius: 20.0,
        surface: Surface::flat(Color::from_hex(0x222222)).finish(1.0, 0.05),
    };
    let plinth = Primitive::cuboid(
        Vec3::new(0.0, -4.0, 0.0),
        Vec3::new(50.0, 8.0, 30.0),
        Surface::flat(Color::from_hex(0x1a1a1a)),
    );
    let glow = PointLight::new(
        Vec3::new(0.0, 20.0, 0.0),
        Color::from_hex(0x00ffcc),
        200.0,
        None,
    );
    (vec![dome, plinth], vec![glow])
}

fn cathedral() -> Assembly {
    let amber = Color::from_hex(0xffaa00);
    let nave = Primitive::cuboid(
        Vec3::ZERO,
        Vec3::new(20.0, 40.0, 20.0),
        Surface::flat(Color::from_hex(0x0a0a0a)),
    );
    let tower = Primitive::cuboid(
        Vec3::new(0.0, 20.0, 0.0),
        Vec3::new(6.0, 80.0, 6.0),
        Surface::glowing(Color::from_hex(0x111111), amber, 0.4),
    );
    let bell = PointLight::new(
        Vec3::new(0.0, 70.0, 0.0),
        Color::from_hex(0xffa500),
        100.0,
        None,
    );
    (vec![nave, tower], vec![bell])
}

fn plaza() -> Assembly {
    let green = Color::from_hex(0x00ff00);
    let floor = Primitive::Plane {
        center: Vec3::new(0.0, 0.2, 0.0),
        size: [50.0, 50.0],
        surface: Surface::glowing(Color::from_hex(0x050505), green, 0.05),
    };
    let mut parts = vec![floor];
    for i in 0..PLAZA_PALMS {
        let angle = i as f32 * 0.6;
        let base = Vec3::new(angle.sin() * 20.0, 0.0, angle.cos() * 20.0);
        parts.extend(palm_parts().into_iter().map(|part| translated(part, base)));
    }
    (parts, Vec::new())
}

fn boardwalk() -> Assembly {
    let deck = Primitive::cuboid(
        Vec3::new(0.0, 0.75, 0.0),
        Vec3::new(15.0, 1.5, 150.0),
        Surface::flat(Color::from_hex(0x221105)),
    );
    let lamps = (0..BOARDWALK_LAMPS)
        .map(|i| {
            PointLight::new(
                Vec3::new(0.0, 5.0, i as f32 * 5.0 - 75.0),
                Color::from_hex(0xff4400),
                20.0,
                Some(15.0),
            )
        })
        .collect();
    (vec![deck], lamps)
}

/// Traffic vehicle with a single headlight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarVisual {
    /// Center of the car body.
    pub origin: Vec3,
    /// Car body.
    pub body: Primitive,
    /// Glowing lamp panels on the leading face.
    pub lamps: Vec<Primitive>,
    /// Head or tail light, depending on lane direction.
    pub light: PointLight,
}

impl From<&TrafficActor> for CarVisual {
    fn from(actor: &TrafficActor) -> Self {
        let sign = actor.lane.sign();
        let white = Color::from_hex(0xffffff);
        let light_color = match actor.lane {
            Lane::Forward => white,
            Lane::Reverse => Color::from_hex(0xff0000),
        };
        Self {
            origin: to_vec3(actor.position),
            body: Primitive::cuboid(
                Vec3::ZERO,
                Vec3::new(2.5, 1.2, 5.0),
                Surface::flat(Color::from(actor.color)).finish(1.0, 0.1),
            ),
            lamps: [-0.8, 0.8]
                .into_iter()
                .map(|x| {
                    Primitive::cuboid(
                        Vec3::new(x, 0.2, 2.51 * sign),
                        Vec3::new(0.5, 0.3, 0.01),
                        Surface::glowing(white, white, 5.0),
                    )
                })
                .collect(),
            light: PointLight::new(Vec3::new(0.0, 0.5, 3.0 * sign), light_color, 15.0, Some(8.0)),
        }
    }
}

/// Stand-in for the player character at the spawn point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerVisual {
    /// Center of the figure.
    pub origin: Vec3,
    /// Figure volume.
    pub body: Primitive,
    /// Cyan glow in front of the figure.
    pub light: PointLight,
}

impl Default for PlayerVisual {
    fn default() -> Self {
        Self {
            origin: Vec3::new(0.0, 1.8, 0.0),
            body: Primitive::cuboid(
                Vec3::ZERO,
                Vec3::new(0.8, 2.0, 0.5),
                Surface::flat(Color::from_hex(0x000000)).finish(1.0, 0.0),
            ),
            light: PointLight::new(
                Vec3::new(0.0, 0.8, 0.8),
                Color::from_hex(0x00ffff),
                15.0,
                Some(10.0),
            ),
        }
    }
}
