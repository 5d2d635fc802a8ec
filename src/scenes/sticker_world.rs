//! Floating sticker cards: each PNG becomes a double-sided, alpha-tested plane
//! scattered in a cube and spinning about its vertical axis.
use bevy::prelude::*;
use rand::Rng;

use crate::core::components::EulerSpin;
use crate::core::config::{hex_color, ArtworkConfig, StickerConfig};
use crate::core::system::system_order::PresentationSet;
use crate::interaction::orbit::OrbitCamera;
use crate::loading::{AssetRole, PendingLoads, SceneMutation, SceneMutationQueue};

use super::common::{set_ambient, spawn_camera, spawn_directional};
use super::spiked::scene_rng;

#[derive(Component, Debug, Clone, Copy)]
pub struct Sticker {
    pub index: usize,
}

/// Card size for an image: unit height, width follows the aspect ratio.
pub fn sticker_size(width: u32, height: u32) -> Vec2 {
    if width == 0 || height == 0 {
        return Vec2::ONE;
    }
    Vec2::new(width as f32 / height as f32, 1.0)
}

/// Uniform position in a cube of edge `spread` centred on the origin.
pub fn scatter_position(rng: &mut impl Rng, spread: f32) -> Vec3 {
    let h = spread * 0.5;
    if h <= 0.0 {
        return Vec3::ZERO;
    }
    Vec3::new(rng.gen_range(-h..h), rng.gen_range(-h..h), rng.gen_range(-h..h))
}

/// Per-frame yaw rate in `[-spin/2, spin/2]`.
pub fn spin_rate(rng: &mut impl Rng, spin: f32) -> f32 {
    let h = spin * 0.5;
    if h <= 0.0 {
        return 0.0;
    }
    rng.gen_range(-h..h)
}

pub struct StickerWorldPlugin;

impl Plugin for StickerWorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup)
            .add_systems(Update, place_loaded_stickers.in_set(PresentationSet));
    }
}

fn setup(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut pending: ResMut<PendingLoads>,
    cfg: Res<ArtworkConfig>,
) {
    let s = &cfg.stickers;
    commands.insert_resource(ClearColor(hex_color(s.background)));
    let eye = Vec3::new(0.0, 0.0, 10.0);
    let camera = spawn_camera(&mut commands, eye, Vec3::ZERO, 60.0, Some(&s.fog));
    commands
        .entity(camera)
        .insert(OrbitCamera::looking_from(eye, Vec3::ZERO).with_damping(0.05));
    set_ambient(&mut commands, Color::srgb_u8(0x40, 0x40, 0x40), 200.0);
    spawn_directional(&mut commands, Color::WHITE, 4_000.0, Vec3::new(5.0, 10.0, 7.0), false);

    for (i, path) in s.paths.iter().enumerate() {
        pending.request::<Image>(&asset_server, AssetRole::Sticker(i), path.clone());
    }
    info!(target: "scene", "sticker world: requested {} images", s.paths.len());
}

fn sticker_material(texture: Handle<Image>, cutoff: f32) -> StandardMaterial {
    StandardMaterial {
        base_color_texture: Some(texture),
        unlit: true,
        double_sided: true,
        cull_mode: None,
        alpha_mode: AlphaMode::Mask(cutoff),
        ..default()
    }
}

/// Spawn a card for every sticker image that finished loading. A failed image
/// only loses its own card.
#[allow(clippy::too_many_arguments)]
fn place_loaded_stickers(
    mut commands: Commands,
    mut queue: ResMut<SceneMutationQueue>,
    images: Res<Assets<Image>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<ArtworkConfig>,
    mut waiting: Local<Vec<(usize, Handle<Image>)>>,
    mut rng: Local<Option<rand::rngs::StdRng>>,
) {
    for m in queue.drain() {
        let SceneMutation::Ready { role: AssetRole::Sticker(index), handle } = m else {
            continue;
        };
        match handle.try_typed::<Image>() {
            Ok(h) => waiting.push((index, h)),
            Err(e) => warn!(target: "assets", "sticker {index}: handle mismatch: {e}"),
        }
    }
    if waiting.is_empty() {
        return;
    }
    let rng = rng.get_or_insert_with(|| scene_rng(None));
    let s: &StickerConfig = &cfg.stickers;
    waiting.retain(|(index, handle)| {
        let Some(image) = images.get(handle) else {
            return true;
        };
        let size = sticker_size(image.width(), image.height());
        let spin = EulerSpin::new(Vec3::new(0.0, spin_rate(rng, s.spin), 0.0));
        commands.spawn((
            Sticker { index: *index },
            Mesh3d(meshes.add(Rectangle::new(size.x, size.y))),
            MeshMaterial3d(materials.add(sticker_material(handle.clone(), s.alpha_cutoff))),
            Transform::from_translation(scatter_position(rng, s.spread)),
            spin,
        ));
        debug!(target: "scene", "sticker {index} placed ({:.2}x{:.2})", size.x, size.y);
        false
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_keeps_image_aspect() {
        assert_eq!(sticker_size(200, 100), Vec2::new(2.0, 1.0));
        assert_eq!(sticker_size(100, 400), Vec2::new(0.25, 1.0));
        assert_eq!(sticker_size(0, 10), Vec2::ONE);
    }

    #[test]
    fn scatter_stays_in_cube() {
        let mut rng = scene_rng(Some(9));
        for _ in 0..1000 {
            let p = scatter_position(&mut rng, 6.0);
            assert!(p.abs().max_element() <= 3.0);
            assert!(spin_rate(&mut rng, 0.005).abs() <= 0.0025);
        }
    }

    #[test]
    fn material_is_alpha_tested_and_double_sided() {
        let m = sticker_material(Handle::default(), 0.5);
        assert!(m.unlit && m.double_sided && m.cull_mode.is_none());
        assert_eq!(m.alpha_mode, AlphaMode::Mask(0.5));
    }
}
