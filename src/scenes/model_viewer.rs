//! glTF binary viewer. The static variant shows the model's default scene; the
//! animated variant also plays every clip on repeat.
use bevy::gltf::Gltf;
use bevy::prelude::*;

use crate::core::config::{hex_color, ArtworkConfig, ModelViewerConfig};
use crate::core::system::system_order::PresentationSet;
use crate::interaction::orbit::OrbitCamera;
use crate::loading::{AssetRole, PendingLoads, SceneMutation, SceneMutationQueue, StatusBoard};

use super::common::{set_ambient, spawn_camera, spawn_directional, vec3};

/// Settings of the variant this run was started with.
#[derive(Resource, Debug, Clone)]
pub struct ViewerSettings(pub ModelViewerConfig);

#[derive(Resource, Debug, Default, Clone)]
pub struct ModelAnimations {
    pub graph: Handle<AnimationGraph>,
    pub nodes: Vec<AnimationNodeIndex>,
}

#[derive(Component)]
pub struct ModelRoot;

/// The file's default scene, else its first scene.
pub fn choose_scene(default_scene: Option<&Handle<Scene>>, scenes: &[Handle<Scene>]) -> Option<Handle<Scene>> {
    default_scene.or_else(|| scenes.first()).cloned()
}

pub struct ModelViewerPlugin {
    pub animated: bool,
}

impl Plugin for ModelViewerPlugin {
    fn build(&self, app: &mut App) {
        let animated = self.animated;
        let settings = app
            .world()
            .get_resource::<ArtworkConfig>()
            .map(|c| if animated { c.animation.clone() } else { c.model.clone() })
            .unwrap_or_default();
        app.insert_resource(ViewerSettings(settings))
            .add_systems(Startup, setup)
            .add_systems(
                Update,
                (spawn_loaded_model, start_animations)
                    .chain()
                    .in_set(PresentationSet),
            );
    }
}

fn setup(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut pending: ResMut<PendingLoads>,
    settings: Res<ViewerSettings>,
) {
    let m = &settings.0;
    commands.insert_resource(ClearColor(hex_color(m.background)));
    let eye = vec3(m.camera_position);
    let target = vec3(m.camera_target);
    let camera = spawn_camera(&mut commands, eye, target, 60.0, m.fog.as_ref());
    commands.entity(camera).insert(
        OrbitCamera::looking_from(eye, target)
            .with_damping(0.05)
            .upper_hemisphere(m.limit_pitch),
    );
    if m.shadows {
        set_ambient(&mut commands, Color::WHITE, 700.0);
        spawn_directional(&mut commands, Color::WHITE, 10_000.0, Vec3::new(5.0, 10.0, 5.0), true);
    } else {
        set_ambient(&mut commands, Color::WHITE, 600.0);
        spawn_directional(&mut commands, Color::WHITE, 4_000.0, Vec3::new(5.0, 10.0, 5.0), false);
    }
    pending.request::<Gltf>(&asset_server, AssetRole::Model, m.path.clone());
}

fn spawn_loaded_model(
    mut commands: Commands,
    mut queue: ResMut<SceneMutationQueue>,
    gltfs: Res<Assets<Gltf>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    settings: Res<ViewerSettings>,
    mut board: ResMut<StatusBoard>,
) {
    for m in queue.drain() {
        let SceneMutation::Ready { role: AssetRole::Model, handle } = m else {
            continue;
        };
        let Some(gltf) = handle.try_typed::<Gltf>().ok().and_then(|h| gltfs.get(&h)) else {
            warn!(target: "assets", "model handle resolved but asset missing");
            continue;
        };
        let Some(scene) = choose_scene(gltf.default_scene.as_ref(), &gltf.scenes) else {
            error!(target: "assets", "{} contains no scenes", settings.0.path);
            board.push(format!("Model load failed: {} has no scenes", settings.0.path));
            continue;
        };
        commands.spawn((ModelRoot, SceneRoot(scene), Transform::default()));
        info!(
            target: "assets",
            "model {} spawned ({} clips)",
            settings.0.path,
            gltf.animations.len()
        );

        if settings.0.animate && !gltf.animations.is_empty() {
            let (graph, nodes) = AnimationGraph::from_clips(gltf.animations.iter().cloned());
            commands.insert_resource(ModelAnimations {
                graph: graphs.add(graph),
                nodes,
            });
        }
    }
}

/// Attach the clip graph to players as the scene instantiates them and loop
/// every clip at once.
pub fn start_animations(
    mut commands: Commands,
    animations: Option<Res<ModelAnimations>>,
    mut players: Query<(Entity, &mut AnimationPlayer), Added<AnimationPlayer>>,
) {
    let Some(animations) = animations else {
        return;
    };
    for (entity, mut player) in &mut players {
        commands
            .entity(entity)
            .insert(AnimationGraphHandle(animations.graph.clone()));
        for &node in &animations.nodes {
            player.play(node).repeat();
        }
        debug!(target: "scene", "playing {} clips on {entity}", animations.nodes.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_handle(n: u128) -> Handle<Scene> {
        Handle::weak_from_u128(n)
    }

    #[test]
    fn default_scene_wins() {
        let a = scene_handle(1);
        let b = scene_handle(2);
        assert_eq!(choose_scene(Some(&b), &[a.clone(), b.clone()]), Some(b));
        assert_eq!(choose_scene(None, &[a.clone()]), Some(a));
        assert_eq!(choose_scene(None, &[]), None);
    }

    #[test]
    fn players_get_graph_and_loop() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<Assets<AnimationGraph>>();
        app.init_resource::<Assets<AnimationClip>>();
        let clip = app
            .world_mut()
            .resource_mut::<Assets<AnimationClip>>()
            .add(AnimationClip::default());
        let (graph, nodes) = AnimationGraph::from_clip(clip);
        let graph = app.world_mut().resource_mut::<Assets<AnimationGraph>>().add(graph);
        app.insert_resource(ModelAnimations { graph, nodes: vec![nodes] });
        app.add_systems(Update, start_animations);
        let e = app.world_mut().spawn(AnimationPlayer::default()).id();
        app.update();
        assert!(app.world().get::<AnimationGraphHandle>(e).is_some());
        let player = app.world().get::<AnimationPlayer>(e).unwrap();
        assert!(player.is_playing_animation(nodes));
        assert_eq!(player.playing_animations().count(), 1);
    }
}
