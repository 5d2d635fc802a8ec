pub mod config;

pub use config::{
    hex_color, ArtworkConfig, EMBEDDED_ARTWORK_RON, BalloonJumpConfig, BrightnessConfig, ClassicJumpConfig,
    ClusterConfig, FogConfig, HelixConfig, HexColor, JumpConfig,
    ModelViewerConfig, SpawnRange, SpikedSphereConfig, StickerConfig, UndulatingConfig,
    WindowConfig,
};
