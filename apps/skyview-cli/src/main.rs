use anyhow::bail;
use clap::{Parser, Subcommand};
use glam::Vec3;
use skyview_assets::{SKYBOX_FACE_FILES, TextureSet};
use skyview_camera::Camera;
use skyview_common::ViewerConfig;
use skyview_input::{Flow, InputCollector, InputEvent, Key};
use skyview_render::{DebugTextSink, Face, Scene};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skyview-cli", about = "Headless tools for the skyview viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run the camera for a number of frames with keys held, then report the last frame
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "10")]
        frames: u32,
        /// Keys held for the whole run, e.g. "wd" or "w,space"
        #[arg(short, long, default_value = "")]
        keys: String,
        /// Horizontal mouse motion per frame
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        dx: f32,
        /// Vertical mouse motion per frame
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        dy: f32,
        /// Start position as x,y,z (overrides config)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        start: Option<Vec<f32>>,
        /// Skip the draw report of the final frame
        #[arg(short, long)]
        quiet: bool,
    },
    /// Report which textures load from the asset directory
    CheckAssets {
        /// Asset directory (overrides config)
        #[arg(long)]
        assets: Option<PathBuf>,
    },
}

fn parse_key(name: &str) -> anyhow::Result<Key> {
    Ok(match name.to_ascii_lowercase().as_str() {
        "w" => Key::W,
        "a" => Key::A,
        "s" => Key::S,
        "d" => Key::D,
        "space" => Key::Space,
        "shift" | "lshift" => Key::LeftShift,
        "esc" | "escape" => Key::Escape,
        other => bail!("unknown key '{other}'"),
    })
}

/// Parse a held-key list. Single letters may be run together ("wd");
/// named keys are comma separated ("w,space").
fn parse_keys(list: &str) -> anyhow::Result<Vec<Key>> {
    let mut keys = Vec::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if part.len() > 1 && part.chars().all(|c| "wasd".contains(c.to_ascii_lowercase())) {
            for c in part.chars() {
                keys.push(parse_key(&c.to_string())?);
            }
        } else {
            keys.push(parse_key(part)?);
        }
    }
    Ok(keys)
}

/// Outcome of a simulated run.
struct Simulation {
    camera: Camera,
    frames_run: u32,
    exited: bool,
}

/// Drive the same input -> update loop the desktop viewer runs, one event
/// batch per frame.
fn simulate(mut camera: Camera, keys: &[Key], frames: u32, dx: f32, dy: f32) -> Simulation {
    let input = InputCollector::new();
    let mut frames_run = 0;

    let pressed: Vec<InputEvent> = keys.iter().map(|&k| InputEvent::KeyDown(k)).collect();
    if input.apply_all(pressed, &mut camera) == Flow::Exit {
        return Simulation {
            camera,
            frames_run,
            exited: true,
        };
    }

    for _ in 0..frames {
        if dx != 0.0 || dy != 0.0 {
            input.apply(InputEvent::MouseMotion { dx, dy }, &mut camera);
        }
        camera.update();
        frames_run += 1;
    }
    tracing::debug!(frames_run, position = ?camera.position, "simulation finished");

    Simulation {
        camera,
        frames_run,
        exited: false,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = ViewerConfig::load_or_default(cli.config.as_deref())?;
    tracing::debug!(
        config = ?cli.config,
        asset_root = %config.asset_root.display(),
        "configuration loaded"
    );

    match cli.command {
        Commands::Info => {
            println!("skyview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("camera: {}", skyview_camera::crate_info());
            println!("input: {}", skyview_input::crate_info());
            println!("render: {}", skyview_render::crate_info());
            println!(
                "window: {} {}x{}",
                config.window.title, config.window.width, config.window.height
            );
        }
        Commands::Simulate {
            frames,
            keys,
            dx,
            dy,
            start,
            quiet,
        } => {
            let keys = parse_keys(&keys)?;
            let start = match start.as_deref() {
                Some(&[x, y, z]) => Vec3::new(x, y, z),
                Some(_) => bail!("--start takes exactly three values"),
                None => config.start_position,
            };
            println!("Simulate: frames={frames}, keys={keys:?}, mouse=({dx}, {dy})");

            let camera = Camera::with_settings(start, config.camera);
            let sim = simulate(camera, &keys, frames, dx, dy);
            let cam = &sim.camera;

            println!(
                "Frames: {}{}",
                sim.frames_run,
                if sim.exited { " (exit requested)" } else { "" }
            );
            println!(
                "Position: ({:.3}, {:.3}, {:.3})",
                cam.position.x, cam.position.y, cam.position.z
            );
            println!("Yaw: {:.2}, Pitch: {:.2}", cam.yaw(), cam.pitch());

            if !quiet {
                let textures = TextureSet::load(&config.asset_root);
                let scene = Scene::new(textures.skybox_mask(), textures.has_ground());
                let scene = if config.show_ground {
                    scene
                } else {
                    scene.without_ground()
                };
                print!("{}", scene.draw(cam, &mut DebugTextSink::new()));
            }
        }
        Commands::CheckAssets { assets } => {
            let root = assets.unwrap_or(config.asset_root);
            println!("Asset root: {}", root.display());

            let set = TextureSet::load(&root);
            let mask = set.skybox_mask();
            for (i, face) in Face::ALL.iter().enumerate() {
                println!(
                    "  {:<6} {:<18} {}",
                    face.name(),
                    SKYBOX_FACE_FILES[i],
                    if mask[i] { "ok" } else { "missing (color face)" }
                );
            }
            println!(
                "  ground {:<18} {}",
                skyview_assets::GROUND_FILE,
                if set.has_ground() { "ok" } else { "missing (green)" }
            );
            println!("Loaded: {}/7", set.loaded_count());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_together_letters() {
        assert_eq!(parse_keys("wd").unwrap(), vec![Key::W, Key::D]);
        assert_eq!(
            parse_keys("w, space,shift").unwrap(),
            vec![Key::W, Key::Space, Key::LeftShift]
        );
        assert!(parse_keys("").unwrap().is_empty());
        assert!(parse_keys("q").is_err());
    }

    #[test]
    fn forward_for_ten_frames() {
        let cam = Camera::new(Vec3::new(0.0, 1.0, 0.0));
        let sim = simulate(cam, &[Key::W], 10, 0.0, 0.0);
        assert_eq!(sim.frames_run, 10);
        assert!(!sim.exited);
        assert!((sim.camera.position.z + 2.0).abs() < 1e-4);
        assert!((sim.camera.position.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn descending_stops_at_ground() {
        let cam = Camera::new(Vec3::new(0.0, 1.0, 0.0));
        let sim = simulate(cam, &[Key::LeftShift], 20, 0.0, 0.0);
        assert_eq!(sim.camera.position.y, 0.5);
    }

    #[test]
    fn mouse_motion_accumulates_per_frame() {
        let cam = Camera::new(Vec3::ZERO);
        let sim = simulate(cam, &[], 5, 10.0, 0.0);
        assert!((sim.camera.yaw() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn escape_stops_before_first_frame() {
        let cam = Camera::new(Vec3::ZERO);
        let sim = simulate(cam, &[Key::Escape], 5, 0.0, 0.0);
        assert!(sim.exited);
        assert_eq!(sim.frames_run, 0);
    }
}
