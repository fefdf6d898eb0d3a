use crate::ai::RagClient;
use crate::config::AppConfig;
use crate::controller::RequestController;
use crate::storage::AppStorage;
use crate::store::ConversationStore;
use crate::views::ChatView;
use dioxus::prelude::*;
use tracing::{debug, error, info};

const CHAT_CSS: Asset = asset!("/assets/chat.css");

pub type AppController = RequestController<AppStorage>;

fn load_config() -> AppConfig {
    match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration, using defaults");
            AppConfig::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn open_storage(config: &AppConfig) -> AppStorage {
    AppStorage::new(config.data_dir.clone())
}

#[cfg(target_arch = "wasm32")]
fn open_storage(_config: &AppConfig) -> AppStorage {
    AppStorage::new()
}

fn open_controller(config: &AppConfig) -> AppController {
    let store = ConversationStore::load(open_storage(config), config.storage_key.clone());
    info!(
        backend = %config.backend_url,
        messages = store.len(),
        "conversation restored"
    );
    RequestController::new(store)
}

#[component]
pub fn App() -> Element {
    let config = use_hook(load_config);
    let client = use_context_provider(|| RagClient::new(&config.backend_url));
    let controller = use_signal(|| open_controller(&config));
    debug!(endpoint = %client.endpoint(), "app rendered");

    rsx! {
        document::Link { rel: "stylesheet", href: CHAT_CSS }
        AppHeader { controller }
        ChatView { controller }
    }
}

#[component]
fn AppHeader(controller: Signal<AppController>) -> Element {
    let mut controller = controller;
    let sending = controller.read().is_sending();
    let is_empty = controller.read().messages().is_empty();
    rsx! {
        div { class: "header",
            div { class: "header-content",
                h1 { class: "header-title", "Ask the docs" }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    disabled: sending || is_empty,
                    onclick: move |_| {
                        if let Err(err) = controller.with_mut(|c| c.new_chat()) {
                            debug!(error = %err, "new chat rejected");
                        }
                    },
                    "New chat"
                }
            }
        }
    }
}
