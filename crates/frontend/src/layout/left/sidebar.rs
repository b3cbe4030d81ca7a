//! Sidebar with the chat reset action

use crate::domain::a002_feedback_chat::ui::details::FeedbackChatVm;
use crate::shared::icons::icon;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn Sidebar() -> impl IntoView {
    let vm = leptos::context::use_context::<FeedbackChatVm>()
        .expect("FeedbackChatVm context not found");

    view! {
        <Flex vertical=true style="height: 100%; padding: 16px; gap: 12px;">
            <Button
                appearance=ButtonAppearance::Secondary
                attr:style="width: 100%; justify-content: flex-start;"
                on_click=move |_| {
                    log::info!("Starting a new chat");
                    vm.reset();
                }
            >
                {icon("plus")}
                " New Chat"
            </Button>

            <div style="margin-top: auto; font-size: 12px; color: var(--colorNeutralForeground3);">
                {move || {
                    let count = vm.transcript.with(|t| t.len());
                    if count == 0 {
                        "No messages yet".to_string()
                    } else {
                        format!("Messages: {}", count)
                    }
                }}
            </div>
        </Flex>
    }
}
