//! Zonecraft world document normalizer
//! Imports a world document, repairs it, and writes the canonical export.
//!
//! Usage: `zonecraft <input.json> [output.json] [--config <path>]`

use bevy::log::LogPlugin;
use bevy::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use zonecraft_editor::config::{EditorConfig, DEFAULT_CONFIG_PATH};
use zonecraft_editor::editor_state::EditorState;
use zonecraft_editor::EditorPlugin;

#[derive(Debug, PartialEq, Eq)]
struct CliArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    config: PathBuf,
}

impl CliArgs {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut positional = Vec::new();
        let mut config = PathBuf::from(DEFAULT_CONFIG_PATH);

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args.next().ok_or("--config needs a path")?;
                    config = PathBuf::from(path);
                }
                flag if flag.starts_with("--") => return Err(format!("Unknown option {}", flag)),
                _ => positional.push(PathBuf::from(arg)),
            }
        }

        let mut positional = positional.into_iter();
        let input = positional.next().ok_or("Missing input document")?;
        let output = positional.next();
        if positional.next().is_some() {
            return Err("Too many arguments".to_string());
        }
        Ok(Self {
            input,
            output,
            config,
        })
    }
}

fn run(app: &mut App, args: &CliArgs) -> Result<(), String> {
    let text = fs::read_to_string(&args.input)
        .map_err(|e| format!("Failed to read {}: {}", args.input.display(), e))?;
    let document: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| format!("{} is not valid JSON: {}", args.input.display(), e))?;

    let exported = {
        let mut state = app.world_mut().resource_mut::<EditorState>();
        state.import_document(&document).map_err(|e| e.to_string())?;

        let world = state.world();
        info!(
            "Imported {} zones, {} palette tiles, {} enemy templates, {} NPCs",
            world.zones().len(),
            world.palette().tiles().len(),
            world.enemy_templates().len(),
            world.npcs().len()
        );
        for (zone_id, transport) in world.dangling_transports() {
            warn!(
                "Transport at {} ({}, {}) points at missing zone {}",
                zone_id, transport.from.x, transport.from.y, transport.to_zone_id
            );
        }

        let exported = state.export_document().map_err(|e| e.to_string())?;
        state.mark_saved();
        exported
    };
    // Publish the import to any listeners
    app.update();

    let json = serde_json::to_string_pretty(&exported)
        .map_err(|e| format!("Failed to serialize world document: {}", e))?;
    match &args.output {
        Some(path) => {
            fs::write(path, json + "\n")
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() -> ExitCode {
    #[cfg(target_family = "wasm")]
    console_error_panic_hook::set_once();

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()));

    let args = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            error!("{}", e);
            eprintln!("Usage: zonecraft <input.json> [output.json] [--config <path>]");
            return ExitCode::from(2);
        }
    };

    let config = match EditorConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    app.add_plugins(EditorPlugin::new(config));

    match run(&mut app, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
