use crate::ai::{RagBackend, RagClient};
use crate::controller::PendingRequest;
use crate::format::{
    AssistantView, SourceDisplay, assistant_view, format_timestamp, markdown_to_html,
};
use crate::types::Message;
use crate::ui::AppController;
use dioxus::events::Key;
use dioxus::prelude::*;
use tracing::debug;

/// Run the backend call for an accepted request and hand the outcome back to
/// the controller.
fn dispatch(controller: Signal<AppController>, pending: PendingRequest) {
    let mut controller = controller;
    let client = consume_context::<RagClient>();
    spawn(async move {
        let outcome = client.ask(&pending.question).await;
        controller.with_mut(|c| {
            c.complete(outcome);
        });
    });
}

fn role_class(msg: &Message) -> &'static str {
    if msg.is_user() { "user" } else { "assistant" }
}

#[component]
pub fn ChatView(controller: Signal<AppController>) -> Element {
    let mut input = use_signal(String::new);

    let mut send_message = {
        let mut controller = controller;
        let mut input_signal = input;
        move |text: String| match controller.with_mut(|c| c.begin_send(&text)) {
            Ok(pending) => {
                input_signal.set(String::new());
                dispatch(controller, pending);
            }
            Err(err) => debug!(error = %err, "submission rejected"),
        }
    };

    let regenerate = {
        let mut controller = controller;
        move |_| match controller.with_mut(|c| c.begin_regenerate()) {
            Ok(pending) => dispatch(controller, pending),
            Err(err) => debug!(error = %err, "regenerate rejected"),
        }
    };

    let (messages_snapshot, sending, regenerate_at) = {
        let state = controller.read();
        (
            state.messages().to_vec(),
            state.is_sending(),
            state.regenerate_anchor(),
        )
    };

    rsx! {
        div { class: "main-container",
            div { class: "chat-wrap",
                div { id: "chat-list", class: "chat-list",
                    if messages_snapshot.is_empty() && !sending {
                        div { class: "empty-state", "Ask a question about the documentation." }
                    }
                    for (i, msg) in messages_snapshot.iter().enumerate() {
                        div { key: "{msg.id()}", class: format_args!("message-row {}", role_class(msg)),
                            if msg.is_assistant() { div { class: "avatar assistant", "R" } }
                            div { class: "message-stack",
                                div { class: format_args!("bubble {}", role_class(msg)),
                                    {match assistant_view(msg) {
                                        Some(AssistantView::Error(text)) => rsx! {
                                            div { class: "bubble-error", "{text}" }
                                        },
                                        Some(AssistantView::Answer { text, sources }) => rsx! {
                                            AssistantBubble { content: text, sources }
                                        },
                                        None => rsx! { "{msg.text()}" },
                                    }}
                                }
                                div { class: format_args!(
                                        "message-meta {}",
                                        if msg.is_user() { "align-end" } else { "align-start" }
                                    ),
                                    if let Some(ts) = format_timestamp(msg.timestamp()) {
                                        span { class: "message-timestamp", "{ts}" }
                                    }
                                    if Some(i) == regenerate_at {
                                        button {
                                            class: "action-btn",
                                            r#type: "button",
                                            title: "Ask again",
                                            onclick: regenerate,
                                            if msg.is_user() { "Retry" } else { "Regenerate" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                    if sending {
                        div { class: "message-row assistant",
                            div { class: "avatar assistant", "R" }
                            div { class: "message-stack",
                                div { class: "shimmer-line",
                                    span { class: "shimmer-text", "Thinking…" }
                                }
                            }
                        }
                    }
                }
            }

            form { class: "composer",
                div { class: "composer-inner",
                    div { class: "hstack",
                        textarea {
                            rows: "1", placeholder: "Ask a question…",
                            value: "{input}", oninput: move |ev| input.set(ev.value()),
                            onkeydown: move |ev| {
                                if ev.key() == Key::Enter && !ev.modifiers().shift() {
                                    ev.prevent_default();
                                    let text = input();
                                    send_message(text);
                                }
                            },
                            disabled: sending, autofocus: true,
                        }
                        button {
                            class: "btn btn-primary", r#type: "button",
                            disabled: sending || input().trim().is_empty(),
                            onclick: move |_| {
                                let text = input();
                                send_message(text);
                            },
                            "Send"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn AssistantBubble(content: String, sources: Vec<SourceDisplay>) -> Element {
    let content_html = markdown_to_html(&content);
    let copy_payload = content.clone();
    let on_copy = move |_| {
        let raw = copy_payload.clone();
        spawn(async move {
            #[cfg(any(feature = "desktop", feature = "mobile"))]
            {
                if let Ok(mut cb) = arboard::Clipboard::new() {
                    let _ = cb.set_text(raw);
                }
            }
            #[cfg(not(any(feature = "desktop", feature = "mobile")))]
            {
                debug!(chars = raw.len(), "clipboard unavailable on this platform");
            }
        });
    };

    rsx! {
        div { class: "bubble-controls",
            div { class: "actions",
                button { class: "action-btn", r#type: "button", title: "Copy answer", onclick: on_copy, "Copy" }
            }
        }
        div { class: "md", dangerous_inner_html: "{content_html}" }
        SourceList { sources }
    }
}

#[component]
fn SourceList(sources: Vec<SourceDisplay>) -> Element {
    rsx! {
        if !sources.is_empty() {
            div { class: "sources",
                span { class: "sources-label", "Sources" }
                ul {
                    for source in sources.iter() {
                        li {
                            {match source {
                                SourceDisplay::Link { href, label } => rsx! {
                                    a { href: "{href}", target: "_blank", rel: "noopener noreferrer", "{label}" }
                                },
                                SourceDisplay::Code(label) => rsx! { code { "{label}" } },
                            }}
                        }
                    }
                }
            }
        }
    }
}
