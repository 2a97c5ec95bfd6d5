//! Zonecraft editing engine
//! Palette selection, brush painting, transport linking and the catalog client,
//! wired into Bevy as resources, messages and systems.

pub mod api_client;
pub mod api_events;
pub mod catalog;
pub mod config;
pub mod editor_state;
pub mod events;
pub mod painting;
pub mod selection;
pub mod transport_links;

use bevy::prelude::*;

use api_events::ApiEventsPlugin;
use config::EditorConfig;
use editor_state::EditorState;
use events::{publish_editor_changes, EditorChanged};

/// Registers the editor model, change notifications and catalog requests
#[derive(Default)]
pub struct EditorPlugin {
    pub config: EditorConfig,
}

impl EditorPlugin {
    pub fn new(config: EditorConfig) -> Self {
        Self { config }
    }
}

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .insert_resource(EditorState::from_config(&self.config))
            .add_message::<EditorChanged>()
            .add_plugins(ApiEventsPlugin)
            .add_systems(PostUpdate, publish_editor_changes);

        info!("Editor plugin ready (api: {})", self.config.api.base_url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use editor_state::ClickAction;
    use events::EditorChange;
    use zonecraft_shared::PaletteCell;

    #[derive(Resource, Default)]
    struct CapturedChanges(Vec<EditorChange>);

    fn capture_changes(
        mut changed: MessageReader<EditorChanged>,
        mut captured: ResMut<CapturedChanges>,
    ) {
        for message in changed.read() {
            captured.0.push(message.change.clone());
        }
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(EditorPlugin::default())
            .init_resource::<CapturedChanges>()
            .add_systems(Last, capture_changes);
        app
    }

    #[test]
    fn test_mutations_are_published_once() {
        let mut app = test_app();
        {
            let mut state = app.world_mut().resource_mut::<EditorState>();
            state.add_palette_tile(PaletteCell::new(0, 0), None, true);
            state.create_zone("Town", Some((4, 4)));
            state.palette_press(PaletteCell::new(0, 0));
            state.palette_release();
            state.click_zone_cell(1, 1, ClickAction::Primary);
            state.click_zone_cell(2, 2, ClickAction::Primary);
        }
        app.update();

        let captured = &app.world().resource::<CapturedChanges>().0;
        assert!(captured.contains(&EditorChange::Palette));
        assert!(captured.contains(&EditorChange::ZoneList));
        assert!(captured.contains(&EditorChange::PaletteSelection));
        let zone_updates = captured
            .iter()
            .filter(|c| **c == EditorChange::Zone("town".to_string()))
            .count();
        assert_eq!(zone_updates, 1);
        assert!(!app.world().resource::<EditorState>().has_pending_changes());
    }

    #[test]
    fn test_quiet_frame_publishes_nothing() {
        let mut app = test_app();
        app.update();
        app.world_mut().resource_mut::<CapturedChanges>().0.clear();

        app.update();
        let captured = &app.world().resource::<CapturedChanges>().0;
        assert!(captured.is_empty());
    }

    #[test]
    fn test_config_seeds_state() {
        let mut config = EditorConfig::default();
        config.palette.rows = 6;
        config.brush.size = 5;

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(EditorPlugin::new(config));

        let state = app.world().resource::<EditorState>();
        assert_eq!(state.world().palette().rows(), 6);
        assert_eq!(state.brush().size(), 5);
    }
}
