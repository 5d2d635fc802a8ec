use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

/// Base config compiled into the binary; used on wasm where there is no filesystem.
pub const EMBEDDED_ARTWORK_RON: &str = include_str!("../../../assets/config/artwork.ron");

/// Packed `0xRRGGBB` color as written in the RON files.
pub type HexColor = u32;

pub fn hex_color(hex: HexColor) -> Color {
    Color::srgb_u8(
        ((hex >> 16) & 0xff) as u8,
        ((hex >> 8) & 0xff) as u8,
        (hex & 0xff) as u8,
    )
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Artwork Scenes".into(),
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SpawnRange<T> {
    pub min: T,
    pub max: T,
}
impl<T: Default> Default for SpawnRange<T> {
    fn default() -> Self {
        Self {
            min: T::default(),
            max: T::default(),
        }
    }
}
impl SpawnRange<f32> {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
    /// Uniform sample in `[min, max)`; collapses to `min` for empty ranges.
    pub fn sample(&self, rng: &mut impl rand::Rng) -> f32 {
        if self.min < self.max {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FogConfig {
    pub color: HexColor,
    pub start: f32,
    pub end: f32,
}
impl Default for FogConfig {
    fn default() -> Self {
        Self {
            color: 0x666666,
            start: 0.01,
            end: 30.0,
        }
    }
}
impl FogConfig {
    fn new(color: HexColor, start: f32, end: f32) -> Self {
        Self { color, start, end }
    }
}

/// Shared layout of the spiked sphere used by both jump scenes.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SpikedSphereConfig {
    pub count: usize,
    pub sphere_radius: f32,
    pub cone_radius: SpawnRange<f32>,
    pub cone_height: SpawnRange<f32>,
    /// Base per-frame rotation; applied as (s, s/2, s/3).
    pub rotation_speed: f32,
    /// Fixed RNG seed; `None` draws from the thread RNG.
    pub seed: Option<u64>,
    pub sphere_color: HexColor,
    pub background: HexColor,
    pub player_radius: f32,
    pub camera_target: [f32; 3],
}
impl Default for SpikedSphereConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            sphere_radius: 3.05,
            cone_radius: SpawnRange::new(0.05, 0.15),
            cone_height: SpawnRange::new(0.1, 0.35),
            rotation_speed: 0.003,
            seed: None,
            sphere_color: 0x00a86b,
            background: 0x4682b4,
            player_radius: 0.06,
            camera_target: [0.0, 3.0, -0.7],
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct JumpConfig {
    pub height: f32,
    pub speed: f32,
}
impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            height: 0.3,
            speed: 0.015,
        }
    }
}

/// Original jump scene: fixed-arc jump, world-space detection, timed flash.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ClassicJumpConfig {
    pub rest_height: f32,
    pub jump: JumpConfig,
    pub hit_distance: f32,
    pub flash_secs: f32,
    pub flash_color: HexColor,
    pub cone_color: HexColor,
    pub camera_position: [f32; 3],
    pub fog: FogConfig,
    pub title: String,
    pub title_font: String,
    pub title_color: HexColor,
}
impl Default for ClassicJumpConfig {
    fn default() -> Self {
        Self {
            rest_height: 3.06,
            jump: JumpConfig::default(),
            hit_distance: 0.10,
            flash_secs: 0.1,
            flash_color: 0x1163aa,
            cone_color: 0xff6347,
            camera_position: [0.0, 3.6, 1.0],
            fog: FogConfig::new(0x666666, 0.01, 3.4),
            title: "Virus Jump".into(),
            title_font: "fonts/title.ttf".into(),
            title_color: 0xf36387,
        }
    }
}

/// Balloon jump scene: accumulating impulses, local-frame detection, eased pulse.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BalloonJumpConfig {
    pub rest_height: f32,
    pub gravity: f32,
    pub impulse: f32,
    pub damping: f32,
    pub max_velocity: f32,
    pub threshold: f32,
    pub radius_factor: f32,
    pub cooldown_frames: u32,
    pub hit_scale: f32,
    pub easing: f32,
    pub impact_color: HexColor,
    /// Cone hue range in degrees.
    pub hue: SpawnRange<f32>,
    pub camera_position: [f32; 3],
    pub fog: FogConfig,
}
impl Default for BalloonJumpConfig {
    fn default() -> Self {
        Self {
            rest_height: 3.12,
            gravity: -0.002,
            impulse: 0.08,
            damping: 0.96,
            max_velocity: 0.2,
            threshold: 0.15,
            radius_factor: 0.5,
            cooldown_frames: 10,
            hit_scale: 0.5,
            easing: 0.1,
            impact_color: 0xff0000,
            hue: SpawnRange::new(0.0, 40.0),
            camera_position: [0.0, 3.8, 1.2],
            fog: FogConfig::new(0x666666, 0.01, 30.0),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct UndulatingConfig {
    pub segments: u32,
    pub amplitude: f32,
    pub frequency: f32,
    pub spin: f32,
    pub color_bottom: [f32; 3],
    pub color_top: [f32; 3],
    pub square_viewport: bool,
    pub background: HexColor,
}
impl Default for UndulatingConfig {
    fn default() -> Self {
        Self {
            segments: 128,
            amplitude: 0.05,
            frequency: 8.0,
            spin: 0.005,
            color_bottom: [0.0, 0.05, 0.8],
            color_top: [0.5, 0.0, 0.5],
            square_viewport: true,
            background: 0x000000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BrightnessConfig {
    /// Device index of a live camera (`camera` feature). Takes precedence over files.
    pub camera: Option<u32>,
    /// Video file decoded in a loop (`video` feature).
    pub video: Option<String>,
    /// Still image or directory of frames; all three unset uses generated frames.
    pub frames: Option<String>,
    /// Period (seconds) of the generated gray oscillation.
    pub synthetic_period: f32,
    pub sample_width: u32,
    pub sample_height: u32,
    pub max_scale: f32,
    /// 1.0 snaps to the target every frame.
    pub smoothing: f32,
    pub rotation_speed: f32,
    pub friends: usize,
    pub friend_size: f32,
    pub friend_color: HexColor,
    pub friend_distance: SpawnRange<f32>,
    pub friend_spin: f32,
    pub fog: FogConfig,
    pub background: HexColor,
}
impl Default for BrightnessConfig {
    fn default() -> Self {
        Self {
            camera: None,
            video: None,
            frames: None,
            synthetic_period: 4.0,
            sample_width: 320,
            sample_height: 240,
            max_scale: 5.0,
            smoothing: 0.15,
            rotation_speed: 0.01,
            friends: 30,
            friend_size: 0.2,
            friend_color: 0x6482ad,
            friend_distance: SpawnRange::new(4.0, 6.0),
            friend_spin: 0.01,
            fog: FogConfig::new(0xe8e8e8, 1.0, 20.0),
            background: 0xe8e8e8,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ClusterConfig {
    pub count: usize,
    pub ball_radius: f32,
    pub box_half_extent: f32,
    pub spread: f32,
    pub attraction: f32,
    pub explode_speed: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub mass: f32,
    pub timestep: f32,
    pub camera_distance: f32,
    pub background: HexColor,
}
impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            count: 400,
            ball_radius: 0.25,
            box_half_extent: 0.2,
            spread: 1.5,
            attraction: 2.5,
            explode_speed: 30.0,
            linear_damping: 0.15,
            angular_damping: 0.2,
            mass: 1.0,
            timestep: 1.0 / 60.0,
            camera_distance: 12.0,
            background: 0x111111,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StickerConfig {
    pub paths: Vec<String>,
    pub spread: f32,
    pub spin: f32,
    pub alpha_cutoff: f32,
    pub fog: FogConfig,
    pub background: HexColor,
}
impl Default for StickerConfig {
    fn default() -> Self {
        Self {
            paths: (1..=29).map(|i| format!("stickers/sticker_{i:02}.png")).collect(),
            spread: 6.0,
            spin: 0.005,
            alpha_cutoff: 0.5,
            fog: FogConfig::new(0xc06070, 0.1, 20.0),
            background: 0xc06070,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ModelViewerConfig {
    pub path: String,
    pub animate: bool,
    pub camera_position: [f32; 3],
    pub camera_target: [f32; 3],
    /// Keep the orbit camera above the ground plane.
    pub limit_pitch: bool,
    pub shadows: bool,
    pub fog: Option<FogConfig>,
    pub background: HexColor,
}
impl Default for ModelViewerConfig {
    fn default() -> Self {
        Self {
            path: "models/InterpolationTest.glb".into(),
            animate: false,
            camera_position: [0.0, 1.5, 3.0],
            camera_target: [0.0, 0.0, 0.0],
            limit_pitch: false,
            shadows: false,
            fog: None,
            background: 0xeeeeee,
        }
    }
}
impl ModelViewerConfig {
    fn animated() -> Self {
        Self {
            path: "models/monkey.glb".into(),
            animate: true,
            camera_position: [0.0, 2.0, 5.0],
            camera_target: [0.0, 1.0, 0.0],
            limit_pitch: true,
            shadows: true,
            fog: Some(FogConfig::new(0x151515, 5.0, 20.0)),
            background: 0x151515,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct HelixConfig {
    pub turns: u32,
    pub points_per_turn: u32,
    pub radius: f32,
    pub height: f32,
    pub rung_every: u32,
    pub node_every: u32,
    pub particles: usize,
    pub rotation_rate: f32,
    /// Scene time units per second.
    pub time_scale: f32,
    pub fog: FogConfig,
    pub camera_position: [f32; 3],
}
impl Default for HelixConfig {
    fn default() -> Self {
        Self {
            turns: 4,
            points_per_turn: 40,
            radius: 1.5,
            height: 8.0,
            rung_every: 3,
            node_every: 2,
            particles: 150,
            rotation_rate: 0.3,
            time_scale: 0.5,
            fog: FogConfig::new(0x9a9a9a, 2.0, 20.0),
            camera_position: [8.0, 3.0, 8.0],
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct ArtworkConfig {
    pub window: WindowConfig,
    pub spiked_sphere: SpikedSphereConfig,
    pub classic: ClassicJumpConfig,
    pub balloon: BalloonJumpConfig,
    pub undulating: UndulatingConfig,
    pub brightness: BrightnessConfig,
    pub cluster: ClusterConfig,
    pub stickers: StickerConfig,
    pub model: ModelViewerConfig,
    pub animation: ModelViewerConfig,
    pub helix: HelixConfig,
}
impl Default for ArtworkConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            spiked_sphere: SpikedSphereConfig::default(),
            classic: ClassicJumpConfig::default(),
            balloon: BalloonJumpConfig::default(),
            undulating: UndulatingConfig::default(),
            brightness: BrightnessConfig::default(),
            cluster: ClusterConfig::default(),
            stickers: StickerConfig::default(),
            model: ModelViewerConfig::default(),
            animation: ModelViewerConfig::animated(),
            helix: HelixConfig::default(),
        }
    }
}

impl ArtworkConfig {
    /// Load configuration from a RON file path.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        Self::from_ron_str(&data)
    }

    pub fn from_ron_str(data: &str) -> Result<Self, String> {
        ron::from_str(data).map_err(|e| format!("parse RON: {e}"))
    }

    /// Attempt to load config; on failure returns defaults and the error string.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load several RON files in order, merging maps so later files override earlier ones.
    /// Returns (config, files used, errors). Missing files are reported, never fatal.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        match &mut merged {
                            Some(cur) => merge_value(cur, val),
                            None => merged = Some(val),
                        }
                        used.push(path_ref.as_os_str().to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        let Some(val) = merged else {
            errors.push("no config layers loaded; using defaults".into());
            return (Self::default(), used, errors);
        };
        match val.into_rust::<ArtworkConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!(
                    "failed to deserialize merged config; using defaults: {e}"
                ));
                (Self::default(), used, errors)
            }
        }
    }

    /// Human-readable warnings for suspicious values. Never fatal.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push(format!(
                "window size {}x{} must be positive",
                self.window.width, self.window.height
            ));
        }
        fn check_range_f32(w: &mut Vec<String>, label: &str, r: &SpawnRange<f32>) {
            if r.min > r.max {
                w.push(format!("{label} min ({}) greater than max ({})", r.min, r.max));
            }
        }
        let s = &self.spiked_sphere;
        if s.count == 0 {
            w.push("spiked_sphere.count is 0; nothing can be hit".into());
        }
        if s.count > 20_000 {
            w.push(format!(
                "spiked_sphere.count {} very high; the linear scan runs every frame",
                s.count
            ));
        }
        check_range_f32(&mut w, "spiked_sphere.cone_radius", &s.cone_radius);
        check_range_f32(&mut w, "spiked_sphere.cone_height", &s.cone_height);
        if s.sphere_radius <= 0.0 {
            w.push("spiked_sphere.sphere_radius must be > 0".into());
        }
        if self.classic.jump.speed <= 0.0 {
            w.push("classic.jump.speed must be > 0 or the jump never lands".into());
        }
        if self.classic.jump.height < 0.0 {
            w.push("classic.jump.height negative".into());
        }
        let b = &self.balloon;
        if b.gravity >= 0.0 {
            w.push(format!("balloon.gravity {} should be negative", b.gravity));
        }
        if !(0.0..=1.0).contains(&b.damping) {
            w.push(format!("balloon.damping {} outside 0..1", b.damping));
        }
        if b.max_velocity < b.impulse {
            w.push(format!(
                "balloon.max_velocity {} below impulse {} -> every press clamps",
                b.max_velocity, b.impulse
            ));
        }
        if !(0.0..=1.0).contains(&b.easing) || b.easing == 0.0 {
            w.push(format!("balloon.easing {} outside (0, 1]", b.easing));
        }
        check_range_f32(&mut w, "balloon.hue", &b.hue);
        if self.undulating.segments < 3 {
            w.push("undulating.segments < 3 produces a degenerate sphere".into());
        }
        let br = &self.brightness;
        if br.sample_width == 0 || br.sample_height == 0 {
            w.push("brightness sample size must be non-zero".into());
        }
        if !(0.0..=1.0).contains(&br.smoothing) || br.smoothing == 0.0 {
            w.push(format!("brightness.smoothing {} outside (0, 1]", br.smoothing));
        }
        check_range_f32(&mut w, "brightness.friend_distance", &br.friend_distance);
        let sources = [br.camera.is_some(), br.video.is_some(), br.frames.is_some()];
        if sources.iter().filter(|s| **s).count() > 1 {
            w.push("brightness: more than one of camera/video/frames set; camera wins, then video".into());
        }
        let c = &self.cluster;
        if c.timestep <= 0.0 {
            w.push("cluster.timestep must be > 0".into());
        }
        if c.mass <= 0.0 {
            w.push("cluster.mass must be > 0".into());
        }
        if c.attraction < 0.0 {
            w.push("cluster.attraction negative -> bodies drift away".into());
        }
        if self.stickers.paths.is_empty() {
            w.push("stickers.paths empty; gallery will be blank".into());
        }
        if !(0.0..=1.0).contains(&self.stickers.alpha_cutoff) {
            w.push(format!(
                "stickers.alpha_cutoff {} outside 0..1",
                self.stickers.alpha_cutoff
            ));
        }
        for (label, m) in [("model", &self.model), ("animation", &self.animation)] {
            if m.path.is_empty() {
                w.push(format!("{label}.path empty"));
            }
        }
        if self.helix.points_per_turn == 0 || self.helix.turns == 0 {
            w.push("helix has no points".into());
        }
        if self.helix.rung_every == 0 || self.helix.node_every == 0 {
            w.push("helix.rung_every / node_every must be > 0".into());
        }
        w
    }
}

fn merge_value(base: &mut ron::value::Value, overlay: ron::value::Value) {
    use ron::value::Value;
    match (base, overlay) {
        (Value::Map(bm), Value::Map(om)) => {
            for (k, v) in om.into_iter() {
                let mut incoming = Some(v);
                if let Some((_, ev)) = bm.iter_mut().find(|(ek, _)| **ek == k) {
                    if let Some(val) = incoming.take() {
                        merge_value(ev, val);
                    }
                }
                if let Some(val) = incoming {
                    bm.insert(k, val);
                }
            }
        }
        (b, o) => *b = o,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_unpacks_channels() {
        let c = hex_color(0xff8000).to_srgba();
        assert!((c.red - 1.0).abs() < 1e-6);
        assert!((c.green - 128.0 / 255.0).abs() < 1e-6);
        assert!(c.blue.abs() < 1e-6);
    }

    #[test]
    fn defaults_validate_clean() {
        let w = ArtworkConfig::default().validate();
        assert!(w.is_empty(), "unexpected warnings: {w:?}");
    }

    #[test]
    fn partial_ron_keeps_section_defaults() {
        let cfg = ArtworkConfig::from_ron_str("(balloon: (impulse: 0.1))").unwrap();
        assert_eq!(cfg.balloon.impulse, 0.1);
        assert_eq!(cfg.balloon.rest_height, 3.12);
        assert_eq!(cfg.spiked_sphere.count, 1000);
    }

    #[test]
    fn shipped_file_parses_and_validates() {
        let cfg = ArtworkConfig::from_ron_str(EMBEDDED_ARTWORK_RON).unwrap();
        assert!(cfg.validate().is_empty());
        assert_eq!(cfg.animation, ModelViewerConfig::animated());
        assert_eq!(cfg.stickers.paths.len(), 29);
        assert_eq!(cfg.cluster.count, 400);
    }

    #[test]
    fn competing_brightness_sources_warn() {
        let mut cfg = ArtworkConfig::default();
        cfg.brightness.camera = Some(0);
        cfg.brightness.frames = Some("frames/".into());
        let w = cfg.validate();
        assert!(w.iter().any(|m| m.contains("camera wins")), "{w:?}");
    }

    #[test]
    fn empty_range_sample_returns_min() {
        let mut rng = rand::thread_rng();
        assert_eq!(SpawnRange::new(2.0, 2.0).sample(&mut rng), 2.0);
    }
}
