//! The spiked sphere shared by both jump scenes: a rotating group holding a
//! flat-shaded sphere and a field of cones, plus the small player sphere.
use bevy::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::core::components::{EulerSpin, Player, RotatingGroup, SpikeRadius};
use crate::core::config::{hex_color, SpikedSphereConfig};
use crate::motion::proximity::{scatter_spikes, ObstacleField, ProximityParams, SpikeLayout};

/// Rest / impact tint of the player sphere.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlayerPalette {
    pub rest: Color,
    pub impact: Color,
}

pub fn scene_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Icosphere with per-face normals. Falls back to a UV sphere if the subdivision
/// count is out of range.
pub fn flat_icosphere(radius: f32, subdivisions: u32) -> Mesh {
    let mut mesh = match Sphere::new(radius).mesh().ico(subdivisions) {
        Ok(m) => m,
        Err(e) => {
            warn!("icosphere({subdivisions}) unavailable: {e}; using uv sphere");
            Sphere::new(radius).mesh().uv(32, 18)
        }
    };
    mesh.duplicate_vertices();
    mesh.compute_flat_normals();
    mesh
}

/// Where a spike's unit cone sits relative to its anchor on the sphere surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConePivot {
    /// Cone centred on the anchor; half of it is buried in the sphere.
    Centre,
    /// Base on the anchor; the whole cone sticks out.
    Base,
}

impl ConePivot {
    /// Unit cone pointing +Y, scaled per spike.
    pub fn unit_cone(self) -> Mesh {
        let cone = Mesh::from(Cone::new(1.0, 1.0));
        match self {
            ConePivot::Centre => cone,
            ConePivot::Base => cone.translated_by(Vec3::Y * 0.5),
        }
    }
}

/// Per-frame group rotation rates (s, s/2, s/3).
pub fn group_spin_rate(speed: f32) -> Vec3 {
    Vec3::new(speed, speed / 2.0, speed / 3.0)
}

pub struct SpikedWorld {
    pub group: Entity,
    pub player: Entity,
    pub spikes: Vec<SpikeLayout>,
}

pub struct PlayerSpec {
    pub rest_height: f32,
    pub spin_rate: Vec3,
    pub palette: PlayerPalette,
}

/// Spawn group, spikes and player. `cone_material` picks a material per spike.
#[allow(clippy::too_many_arguments)]
pub fn spawn_spiked_world(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    cfg: &SpikedSphereConfig,
    params: ProximityParams,
    player: PlayerSpec,
    pivot: ConePivot,
    rng: &mut impl Rng,
    mut cone_material: impl FnMut(&mut dyn rand::RngCore, usize) -> Handle<StandardMaterial>,
) -> SpikedWorld {
    let spikes = scatter_spikes(rng, cfg.count, cfg.sphere_radius, cfg.cone_radius, cfg.cone_height);
    let field = ObstacleField::new(spikes.iter().map(SpikeLayout::obstacle).collect(), params);

    let sphere_mesh = meshes.add(flat_icosphere(cfg.sphere_radius, 3));
    let sphere_material = materials.add(StandardMaterial {
        base_color: hex_color(cfg.sphere_color),
        perceptual_roughness: 0.8,
        ..default()
    });
    let cone_mesh = meshes.add(pivot.unit_cone());

    let group = commands
        .spawn((
            RotatingGroup,
            Transform::default(),
            Visibility::default(),
            EulerSpin::new(group_spin_rate(cfg.rotation_speed)),
            field,
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(sphere_mesh),
                MeshMaterial3d(sphere_material),
                Transform::default(),
            ));
            for (i, s) in spikes.iter().enumerate() {
                let material = cone_material(&mut *rng as &mut dyn rand::RngCore, i);
                parent.spawn((
                    Mesh3d(cone_mesh.clone()),
                    MeshMaterial3d(material),
                    Transform {
                        translation: s.position,
                        rotation: s.rotation(),
                        scale: Vec3::new(s.radius, s.height, s.radius),
                    },
                    SpikeRadius(s.radius),
                ));
            }
        })
        .id();

    let player_mesh = meshes.add(flat_icosphere(cfg.player_radius, 1));
    let player_material = materials.add(StandardMaterial {
        base_color: player.palette.rest,
        ..default()
    });
    let player_entity = commands
        .spawn((
            Player,
            Mesh3d(player_mesh),
            MeshMaterial3d(player_material),
            Transform::from_xyz(0.0, player.rest_height, 0.0),
            EulerSpin::new(player.spin_rate),
            player.palette,
        ))
        .id();

    info!(
        target: "scene",
        "spiked sphere: {} spikes, radius {}",
        spikes.len(),
        cfg.sphere_radius
    );
    SpikedWorld {
        group,
        player: player_entity,
        spikes,
    }
}

/// Copy the palette tint chosen by `impacted` onto the player's own material.
pub fn tint_player(
    materials: &mut Assets<StandardMaterial>,
    handle: &MeshMaterial3d<StandardMaterial>,
    palette: &PlayerPalette,
    impacted: bool,
) {
    if let Some(mat) = materials.get_mut(&handle.0) {
        let want = if impacted { palette.impact } else { palette.rest };
        if mat.base_color != want {
            mat.base_color = want;
        }
    }
}

pub fn spawn_lights(commands: &mut Commands) {
    super::common::set_ambient(commands, Color::WHITE, 400.0);
    super::common::spawn_directional(commands, Color::WHITE, 6_000.0, Vec3::new(5.0, 10.0, 5.0), true);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_rng_is_reproducible() {
        let (mut a, mut b) = (scene_rng(Some(9)), scene_rng(Some(9)));
        for _ in 0..4 {
            assert_eq!(a.gen::<u32>(), b.gen::<u32>());
        }
    }

    #[test]
    fn group_spin_thirds() {
        let r = group_spin_rate(0.003);
        assert_eq!(r.x, 0.003);
        assert!((r.y - 0.0015).abs() < 1e-9);
        assert!((r.z - 0.001).abs() < 1e-9);
    }

    #[test]
    fn world_spawns_group_spikes_and_player() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<Assets<Mesh>>();
        app.init_resource::<Assets<StandardMaterial>>();
        let cfg = SpikedSphereConfig {
            count: 25,
            seed: Some(1),
            ..Default::default()
        };
        app.add_systems(
            Startup,
            move |mut commands: Commands,
                  mut meshes: ResMut<Assets<Mesh>>,
                  mut materials: ResMut<Assets<StandardMaterial>>| {
                let shared = materials.add(StandardMaterial::default());
                let mut rng = scene_rng(cfg.seed);
                spawn_spiked_world(
                    &mut commands,
                    &mut meshes,
                    &mut materials,
                    &cfg,
                    ProximityParams::new(0.15, 0.5),
                    PlayerSpec {
                        rest_height: 3.12,
                        spin_rate: Vec3::ZERO,
                        palette: PlayerPalette {
                            rest: Color::WHITE,
                            impact: Color::BLACK,
                        },
                    },
                    ConePivot::Base,
                    &mut rng,
                    |_, _| shared.clone(),
                );
            },
        );
        app.update();

        let world = app.world_mut();
        let fields: Vec<usize> = world.query::<&ObstacleField>().iter(world).map(|f| f.len()).collect();
        assert_eq!(fields, vec![25]);
        assert_eq!(world.query::<&SpikeRadius>().iter(world).count(), 25);
        let players: Vec<f32> = world
            .query_filtered::<&Transform, With<Player>>()
            .iter(world)
            .map(|t| t.translation.y)
            .collect();
        assert_eq!(players, vec![3.12]);
    }

    fn y_extent(mesh: &Mesh) -> (f32, f32) {
        let positions = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|a| a.as_float3())
            .unwrap();
        positions
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p[1]), hi.max(p[1])))
    }

    #[test]
    fn cone_pivot_moves_the_base() {
        let (lo, hi) = y_extent(&ConePivot::Centre.unit_cone());
        assert!((lo + 0.5).abs() < 1e-5 && (hi - 0.5).abs() < 1e-5, "{lo}..{hi}");
        let (lo, hi) = y_extent(&ConePivot::Base.unit_cone());
        assert!(lo.abs() < 1e-5 && (hi - 1.0).abs() < 1e-5, "{lo}..{hi}");
    }

    #[test]
    fn tint_switches_between_palette_colors() {
        let mut materials = Assets::<StandardMaterial>::default();
        let handle = MeshMaterial3d(materials.add(StandardMaterial::default()));
        let palette = PlayerPalette {
            rest: Color::WHITE,
            impact: Color::srgb(1.0, 0.0, 0.0),
        };
        tint_player(&mut materials, &handle, &palette, true);
        assert_eq!(materials.get(&handle.0).unwrap().base_color, palette.impact);
        tint_player(&mut materials, &handle, &palette, false);
        assert_eq!(materials.get(&handle.0).unwrap().base_color, palette.rest);
    }
}
