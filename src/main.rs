use artwork_scenes::app::launch::run_scene;
#[cfg(not(target_arch = "wasm32"))]
use artwork_scenes::app::launch::{config_paths, load_config};
use artwork_scenes::scenes::SceneKind;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "artwork_scenes", version, about = "Launcher for the interactive 3D artwork scenes")]
struct Cli {
    /// Scene name to run (see --list)
    scene: Option<String>,
    /// List available scenes and exit
    #[arg(long, short)]
    list: bool,
    /// Config file to use instead of the layered defaults
    #[arg(long, short)]
    config: Option<std::path::PathBuf>,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.list {
        list_scenes();
        return Ok(());
    }

    let scene = match cli.scene.as_deref() {
        Some(name) => match SceneKind::from_name(name) {
            Some(kind) => kind,
            None => {
                eprintln!("Unknown scene '{name}'. Use --list to see options.");
                std::process::exit(1);
            }
        },
        None => match interactive_select()? {
            Some(kind) => kind,
            None => return Ok(()),
        },
    };

    let paths = config_paths(cli.config);
    let cfg = load_config(&paths, |msg| eprintln!("{msg}"));
    println!("Launching scene: {scene}");
    let exit = run_scene(scene, cfg, paths);
    if exit.is_error() {
        anyhow::bail!("scene '{scene}' exited with {exit:?}");
    }
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn list_scenes() {
    println!("Available scenes:");
    for (i, k) in SceneKind::ALL.iter().enumerate() {
        println!("  [{}] {:20} - {}", i + 1, k.name(), k.description());
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn interactive_select() -> anyhow::Result<Option<SceneKind>> {
    use anyhow::Context;
    use std::io::{self, Write};
    loop {
        list_scenes();
        println!("Select a scene by number (or 'q' to quit):");
        print!("> ");
        io::stdout().flush().context("flushing prompt")?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line).context("reading selection")? == 0 {
            println!("EOF received. Exiting.");
            return Ok(None);
        }
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        if let Ok(idx) = trimmed.parse::<usize>() {
            if let Some(kind) = idx.checked_sub(1).and_then(|i| SceneKind::ALL.get(i)) {
                return Ok(Some(*kind));
            }
        }
        if let Some(kind) = SceneKind::from_name(trimmed) {
            return Ok(Some(kind));
        }
        println!(
            "Invalid selection '{trimmed}'. Please enter a number 1-{} or 'q'.",
            SceneKind::ALL.len()
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    use artwork_scenes::core::config::{ArtworkConfig, EMBEDDED_ARTWORK_RON};
    use artwork_scenes::app::launch::scene_from_query;

    console_error_panic_hook::set_once();
    let search = web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();
    let scene = scene_from_query(&search).unwrap_or(SceneKind::VirusJump);
    let cfg = ArtworkConfig::from_ron_str(EMBEDDED_ARTWORK_RON).unwrap_or_else(|e| {
        web_sys::console::warn_1(&format!("embedded config: {e}").into());
        ArtworkConfig::default()
    });
    run_scene(scene, cfg, Vec::new());
}
