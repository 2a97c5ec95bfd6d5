//! API Events and Async Task Handling
//! Catalog requests are Bevy messages; each runs as one in-flight task on the IO
//! pool and hands its result back through a shared slot that `poll_api_results`
//! applies on the main schedule.

use bevy::prelude::*;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use zonecraft_shared::{EnemyTemplate, Palette};

use crate::api_client::{ApiClient, ApiConfig};
use crate::catalog::{AbilitySummary, Catalog, EquipmentItem, SpriteAsset};
use crate::editor_state::EditorState;

pub type ResultSlot<T> = Arc<Mutex<Option<Result<T, String>>>>;

/// One kind of request: where its result lands and whether it is still running
pub struct PendingRequest<T> {
    pub result: ResultSlot<T>,
    pub in_flight: bool,
}

impl<T> Default for PendingRequest<T> {
    fn default() -> Self {
        Self {
            result: Arc::new(Mutex::new(None)),
            in_flight: false,
        }
    }
}

impl<T> PendingRequest<T> {
    /// Claim the slot for a new request. `None` while one is already running.
    fn begin(&mut self) -> Option<ResultSlot<T>> {
        if self.in_flight {
            return None;
        }
        self.in_flight = true;
        Some(self.result.clone())
    }

    /// Take a finished result, clearing the in-flight flag
    fn finish(&mut self) -> Option<Result<T, String>> {
        if !self.in_flight {
            return None;
        }
        let result = {
            let mut holder = self.result.lock().unwrap_or_else(PoisonError::into_inner);
            holder.take()
        };
        if result.is_some() {
            self.in_flight = false;
        }
        result
    }
}

/// Pending API operations queue
#[derive(Resource, Default)]
pub struct ApiTaskQueue {
    pub abilities: PendingRequest<Vec<AbilitySummary>>,
    pub equipment: PendingRequest<BTreeMap<String, Vec<EquipmentItem>>>,
    pub sprites: PendingRequest<Vec<SpriteAsset>>,
    pub palette_list: PendingRequest<Vec<Palette>>,
    pub palette_load: PendingRequest<Palette>,
    pub palette_save: PendingRequest<Palette>,
    /// Resolves to the deleted palette id
    pub palette_delete: PendingRequest<String>,
    pub template_list: PendingRequest<Vec<EnemyTemplate>>,
    pub template_save: PendingRequest<EnemyTemplate>,
    pub template_delete: PendingRequest<String>,
}

// ============================================================================
// MESSAGES
// ============================================================================

#[derive(Message)]
pub struct LoadAbilitiesEvent;

#[derive(Message)]
pub struct LoadEquipmentEvent;

#[derive(Message)]
pub struct LoadSpritesEvent;

#[derive(Message)]
pub struct LoadPaletteListEvent;

/// Load a saved palette and make it the world palette
#[derive(Message)]
pub struct LoadPaletteEvent {
    pub palette_id: String,
}

/// Save the world palette
#[derive(Message)]
pub struct SavePaletteEvent;

#[derive(Message)]
pub struct DeletePaletteEvent {
    pub palette_id: String,
}

/// Load saved enemy templates into the world roster
#[derive(Message)]
pub struct LoadEnemyTemplatesEvent;

#[derive(Message)]
pub struct SaveEnemyTemplateEvent {
    pub template_id: String,
}

#[derive(Message)]
pub struct DeleteEnemyTemplateEvent {
    pub template_id: String,
}

pub struct ApiEventsPlugin;

impl Plugin for ApiEventsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ApiTaskQueue>()
            .init_resource::<Catalog>()
            .add_message::<LoadAbilitiesEvent>()
            .add_message::<LoadEquipmentEvent>()
            .add_message::<LoadSpritesEvent>()
            .add_message::<LoadPaletteListEvent>()
            .add_message::<LoadPaletteEvent>()
            .add_message::<SavePaletteEvent>()
            .add_message::<DeletePaletteEvent>()
            .add_message::<LoadEnemyTemplatesEvent>()
            .add_message::<SaveEnemyTemplateEvent>()
            .add_message::<DeleteEnemyTemplateEvent>()
            .add_systems(
                Update,
                (
                    handle_load_catalog,
                    handle_palette_requests,
                    handle_template_requests,
                    poll_api_results,
                )
                    .chain(),
            );
    }
}

// ============================================================================
// TASK SPAWNING
// ============================================================================

fn store_result<T>(slot: &ResultSlot<T>, result: Result<T, String>) {
    let mut holder = slot.lock().unwrap_or_else(PoisonError::into_inner);
    *holder = Some(result);
}

fn client_for(editor_state: &EditorState) -> ApiClient {
    ApiClient::new(ApiConfig {
        base_url: editor_state.api_url.clone(),
        auth_token: None,
    })
}

#[cfg(target_family = "wasm")]
fn spawn_request<T, F, Fut>(slot: ResultSlot<T>, client: ApiClient, request: F)
where
    T: 'static,
    F: FnOnce(ApiClient) -> Fut + 'static,
    Fut: Future<Output = Result<T, String>> + 'static,
{
    wasm_bindgen_futures::spawn_local(async move {
        let result = request(client).await;
        store_result(&slot, result);
    });
}

/// reqwest needs a Tokio reactor, so each request drives its own current-thread
/// runtime on an IO pool thread
#[cfg(not(target_family = "wasm"))]
fn spawn_request<T, F, Fut>(slot: ResultSlot<T>, client: ApiClient, request: F)
where
    T: Send + 'static,
    F: FnOnce(ApiClient) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, String>>,
{
    use bevy::tasks::IoTaskPool;

    IoTaskPool::get()
        .spawn(async move {
            let result = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime.block_on(request(client)),
                Err(e) => Err(format!("Failed to start runtime: {}", e)),
            };
            store_result(&slot, result);
        })
        .detach();
}

// ============================================================================
// REQUEST HANDLERS
// ============================================================================

fn handle_load_catalog(
    mut abilities: MessageReader<LoadAbilitiesEvent>,
    mut equipment: MessageReader<LoadEquipmentEvent>,
    mut sprites: MessageReader<LoadSpritesEvent>,
    mut palette_list: MessageReader<LoadPaletteListEvent>,
    mut task_queue: ResMut<ApiTaskQueue>,
    editor_state: Res<EditorState>,
) {
    for _ in abilities.read() {
        let Some(slot) = task_queue.abilities.begin() else {
            continue; // Already loading
        };
        spawn_request(slot, client_for(&editor_state), |client| async move {
            client.fetch_abilities().await
        });
    }

    for _ in equipment.read() {
        let Some(slot) = task_queue.equipment.begin() else {
            continue;
        };
        spawn_request(slot, client_for(&editor_state), |client| async move {
            client.fetch_equipment().await
        });
    }

    for _ in sprites.read() {
        let Some(slot) = task_queue.sprites.begin() else {
            continue;
        };
        spawn_request(slot, client_for(&editor_state), |client| async move {
            client.fetch_sprites().await
        });
    }

    for _ in palette_list.read() {
        let Some(slot) = task_queue.palette_list.begin() else {
            continue;
        };
        spawn_request(slot, client_for(&editor_state), |client| async move {
            client.list_palettes().await
        });
    }
}

fn handle_palette_requests(
    mut load: MessageReader<LoadPaletteEvent>,
    mut save: MessageReader<SavePaletteEvent>,
    mut delete: MessageReader<DeletePaletteEvent>,
    mut task_queue: ResMut<ApiTaskQueue>,
    editor_state: Res<EditorState>,
) {
    for event in load.read() {
        let Some(slot) = task_queue.palette_load.begin() else {
            continue;
        };
        let palette_id = event.palette_id.clone();
        spawn_request(slot, client_for(&editor_state), |client| async move {
            client.load_palette(&palette_id).await
        });
    }

    for _ in save.read() {
        let Some(slot) = task_queue.palette_save.begin() else {
            continue;
        };
        let palette = editor_state.world().palette().clone();
        spawn_request(slot, client_for(&editor_state), |client| async move {
            client.save_palette(&palette).await
        });
    }

    for event in delete.read() {
        let Some(slot) = task_queue.palette_delete.begin() else {
            continue;
        };
        let palette_id = event.palette_id.clone();
        spawn_request(slot, client_for(&editor_state), |client| async move {
            client.delete_palette(&palette_id).await?;
            Ok(palette_id)
        });
    }
}

fn handle_template_requests(
    mut list: MessageReader<LoadEnemyTemplatesEvent>,
    mut save: MessageReader<SaveEnemyTemplateEvent>,
    mut delete: MessageReader<DeleteEnemyTemplateEvent>,
    mut task_queue: ResMut<ApiTaskQueue>,
    mut editor_state: ResMut<EditorState>,
) {
    for _ in list.read() {
        let Some(slot) = task_queue.template_list.begin() else {
            continue;
        };
        spawn_request(slot, client_for(&editor_state), |client| async move {
            client.list_enemy_templates().await
        });
    }

    for event in save.read() {
        let Some(template) = editor_state
            .world()
            .enemy_template(&event.template_id)
            .cloned()
        else {
            editor_state.status_message = format!("Unknown enemy template: {}", event.template_id);
            continue;
        };
        let Some(slot) = task_queue.template_save.begin() else {
            continue;
        };
        spawn_request(slot, client_for(&editor_state), |client| async move {
            client.save_enemy_template(&template).await
        });
    }

    for event in delete.read() {
        let Some(slot) = task_queue.template_delete.begin() else {
            continue;
        };
        let template_id = event.template_id.clone();
        spawn_request(slot, client_for(&editor_state), |client| async move {
            client.delete_enemy_template(&template_id).await?;
            Ok(template_id)
        });
    }
}

// ============================================================================
// RESULT POLLING
// ============================================================================

/// Apply finished requests. Failures raise an alert and leave the model as it was.
fn poll_api_results(
    mut task_queue: ResMut<ApiTaskQueue>,
    mut editor_state: ResMut<EditorState>,
    mut catalog: ResMut<Catalog>,
) {
    if let Some(result) = task_queue.abilities.finish() {
        match result {
            Ok(abilities) => {
                editor_state.status_message = format!("Loaded {} abilities", abilities.len());
                catalog.abilities = abilities;
            }
            Err(e) => editor_state.raise_alert(format!("Failed to load abilities: {}", e)),
        }
    }

    if let Some(result) = task_queue.equipment.finish() {
        match result {
            Ok(equipment) => {
                let count: usize = equipment.values().map(Vec::len).sum();
                editor_state.status_message = format!("Loaded {} equipment items", count);
                catalog.equipment = equipment;
            }
            Err(e) => editor_state.raise_alert(format!("Failed to load equipment: {}", e)),
        }
    }

    if let Some(result) = task_queue.sprites.finish() {
        match result {
            Ok(sprites) => {
                editor_state.status_message = format!("Loaded {} sprites", sprites.len());
                catalog.sprites = sprites;
            }
            Err(e) => editor_state.raise_alert(format!("Failed to load sprites: {}", e)),
        }
    }

    if let Some(result) = task_queue.palette_list.finish() {
        match result {
            Ok(palettes) => {
                editor_state.status_message = format!("Loaded {} palettes", palettes.len());
                catalog.palettes = palettes;
            }
            Err(e) => editor_state.raise_alert(format!("Failed to load palettes: {}", e)),
        }
    }

    if let Some(result) = task_queue.palette_load.finish() {
        match result {
            Ok(palette) => {
                info!("Loaded palette {:?}", palette.id);
                editor_state.replace_palette(palette);
            }
            Err(e) => editor_state.raise_alert(format!("Failed to load palette: {}", e)),
        }
    }

    if let Some(result) = task_queue.palette_save.finish() {
        match result {
            Ok(saved) => {
                info!("Saved palette {:?}", saved.id);
                editor_state.set_palette_id(saved.id.clone());
                editor_state.status_message = format!("Saved palette {}", saved.name);
                catalog.upsert_palette(saved);
            }
            Err(e) => editor_state.raise_alert(format!("Failed to save palette: {}", e)),
        }
    }

    if let Some(result) = task_queue.palette_delete.finish() {
        match result {
            Ok(palette_id) => {
                catalog.remove_palette(&palette_id);
                if editor_state.world().palette().id.as_deref() == Some(palette_id.as_str()) {
                    editor_state.set_palette_id(None);
                }
                editor_state.status_message = format!("Deleted palette {}", palette_id);
            }
            Err(e) => editor_state.raise_alert(format!("Failed to delete palette: {}", e)),
        }
    }

    if let Some(result) = task_queue.template_list.finish() {
        match result {
            Ok(templates) => {
                let count = templates.len();
                for template in templates {
                    editor_state.upsert_enemy_template(template);
                }
                editor_state.status_message = format!("Loaded {} enemy templates", count);
            }
            Err(e) => editor_state.raise_alert(format!("Failed to load enemy templates: {}", e)),
        }
    }

    if let Some(result) = task_queue.template_save.finish() {
        match result {
            Ok(saved) => {
                info!("Saved enemy template {}", saved.id);
                editor_state.status_message = format!("Saved enemy template {}", saved.name);
                editor_state.upsert_enemy_template(saved);
            }
            Err(e) => editor_state.raise_alert(format!("Failed to save enemy template: {}", e)),
        }
    }

    if let Some(result) = task_queue.template_delete.finish() {
        match result {
            Ok(template_id) => {
                // Already gone locally is fine; the catalog copy was the one deleted
                if editor_state.world().enemy_template(&template_id).is_some() {
                    editor_state.delete_enemy_template(&template_id);
                }
                editor_state.status_message = format!("Deleted enemy template {}", template_id);
            }
            Err(e) => editor_state.raise_alert(format!("Failed to delete enemy template: {}", e)),
        }
    }

    if catalog.is_changed() {
        editor_state.record_catalog_change();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<EditorState>()
            .add_plugins(ApiEventsPlugin);
        app
    }

    #[test]
    fn test_finished_palette_load_replaces_palette() {
        let mut app = test_app();
        let mut palette = Palette::new(3, 3);
        palette.id = Some("forest".to_string());
        palette.name = "Forest".to_string();

        {
            let mut queue = app.world_mut().resource_mut::<ApiTaskQueue>();
            let slot = queue.palette_load.begin().unwrap();
            store_result(&slot, Ok(palette));
        }
        app.update();

        let state = app.world().resource::<EditorState>();
        assert_eq!(state.world().palette().name, "Forest");
        assert_eq!(state.world().palette().rows(), 3);
        assert!(state.alert.is_none());
        assert!(!app.world().resource::<ApiTaskQueue>().palette_load.in_flight);
    }

    #[test]
    fn test_failed_save_raises_alert_and_keeps_model() {
        let mut app = test_app();
        let before = app.world().resource::<EditorState>().world().clone();

        {
            let mut queue = app.world_mut().resource_mut::<ApiTaskQueue>();
            let slot = queue.template_save.begin().unwrap();
            store_result(&slot, Err("Request failed: connection refused".to_string()));
        }
        app.update();

        let state = app.world().resource::<EditorState>();
        assert_eq!(
            state.alert.as_deref(),
            Some("Failed to save enemy template: Request failed: connection refused")
        );
        assert_eq!(*state.world(), before);
    }

    fn request_palette_delete(mut requests: MessageWriter<DeletePaletteEvent>) {
        requests.write(DeletePaletteEvent {
            palette_id: "forest".to_string(),
        });
    }

    #[test]
    fn test_duplicate_request_is_dropped_while_in_flight() {
        let mut app = test_app();
        app.add_systems(Update, request_palette_delete.before(handle_palette_requests));
        app.world_mut()
            .resource_mut::<ApiTaskQueue>()
            .palette_delete
            .in_flight = true;

        app.update();

        let queue = app.world().resource::<ApiTaskQueue>();
        assert!(queue.palette_delete.in_flight);
        let holder = queue.palette_delete.result.lock().unwrap();
        assert!(holder.is_none());
    }

    #[test]
    fn test_template_list_merges_into_world() {
        let mut app = test_app();
        {
            let mut queue = app.world_mut().resource_mut::<ApiTaskQueue>();
            let slot = queue.template_list.begin().unwrap();
            store_result(
                &slot,
                Ok(vec![EnemyTemplate::new("wolf".to_string(), "Wolf".to_string())]),
            );
        }
        app.update();

        let state = app.world().resource::<EditorState>();
        assert_eq!(state.world().template_label("wolf"), "Wolf");
        assert_eq!(state.status_message, "Loaded 1 enemy templates");
    }

    #[test]
    fn test_pending_request_finish_waits_for_result() {
        let mut request = PendingRequest::<u32>::default();
        assert!(request.finish().is_none());

        let slot = request.begin().unwrap();
        assert!(request.begin().is_none());
        assert!(request.finish().is_none());
        assert!(request.in_flight);

        store_result(&slot, Ok(4));
        assert_eq!(request.finish(), Some(Ok(4)));
        assert!(!request.in_flight);
    }
}
