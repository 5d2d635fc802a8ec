//! The artwork scenes. Exactly one runs per process; [`SceneKind`] names them
//! and installs the matching plugin.
pub mod ball_cluster;
pub mod brightness_sphere;
pub mod common;
pub mod double_helix;
pub mod model_viewer;
pub mod spiked;
pub mod sticker_world;
pub mod undulating_sphere;
pub mod virus_jump;
pub mod virus_jump_v2;

use bevy::prelude::*;

/// The scene this process runs.
#[derive(Resource, Debug, Clone, Copy)]
pub struct ActiveScene(pub SceneKind);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    VirusJump,
    VirusJumpV2,
    UndulatingSphere,
    BrightnessSphere,
    BallCluster,
    StickerWorld,
    ModelViewer,
    ModelAnimation,
    DoubleHelix,
}

impl SceneKind {
    pub const ALL: [SceneKind; 9] = [
        SceneKind::VirusJump,
        SceneKind::VirusJumpV2,
        SceneKind::UndulatingSphere,
        SceneKind::BrightnessSphere,
        SceneKind::BallCluster,
        SceneKind::StickerWorld,
        SceneKind::ModelViewer,
        SceneKind::ModelAnimation,
        SceneKind::DoubleHelix,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SceneKind::VirusJump => "virus_jump",
            SceneKind::VirusJumpV2 => "virus_jump_v2",
            SceneKind::UndulatingSphere => "undulating_sphere",
            SceneKind::BrightnessSphere => "brightness_sphere",
            SceneKind::BallCluster => "ball_cluster",
            SceneKind::StickerWorld => "sticker_world",
            SceneKind::ModelViewer => "model_viewer",
            SceneKind::ModelAnimation => "model_animation",
            SceneKind::DoubleHelix => "double_helix",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SceneKind::VirusJump => "Fixed-arc jump over a rotating spiked sphere",
            SceneKind::VirusJumpV2 => "Balloon jump with hit reaction over the spiked sphere",
            SceneKind::UndulatingSphere => "Rippling gradient sphere in a square viewport",
            SceneKind::BrightnessSphere => "Sphere sized by camera / frame brightness",
            SceneKind::BallCluster => "Physics cluster pulled to the centre; explode on click",
            SceneKind::StickerWorld => "Floating, spinning sticker cards",
            SceneKind::ModelViewer => "Static glTF model viewer",
            SceneKind::ModelAnimation => "glTF model with every clip looping",
            SceneKind::DoubleHelix => "Rotating double helix with drifting particles",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().replace('-', "_").to_ascii_lowercase();
        Self::ALL.into_iter().find(|k| k.name() == wanted)
    }

    /// Install this scene's plugin. Expects `ArtworkConfig` to be present.
    pub fn add_to(self, app: &mut App) {
        match self {
            SceneKind::VirusJump => app.add_plugins(virus_jump::VirusJumpPlugin),
            SceneKind::VirusJumpV2 => app.add_plugins(virus_jump_v2::BalloonJumpPlugin),
            SceneKind::UndulatingSphere => app.add_plugins(undulating_sphere::UndulatingSpherePlugin),
            SceneKind::BrightnessSphere => app.add_plugins(brightness_sphere::BrightnessSpherePlugin),
            SceneKind::BallCluster => app.add_plugins(ball_cluster::BallClusterPlugin),
            SceneKind::StickerWorld => app.add_plugins(sticker_world::StickerWorldPlugin),
            SceneKind::ModelViewer => app.add_plugins(model_viewer::ModelViewerPlugin { animated: false }),
            SceneKind::ModelAnimation => app.add_plugins(model_viewer::ModelViewerPlugin { animated: true }),
            SceneKind::DoubleHelix => app.add_plugins(double_helix::DoubleHelixPlugin),
        };
    }
}

impl std::fmt::Display for SceneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
