//! Feedback Chat - View Component

use super::message_bubble::{AssistantMessage, UserMessage};
use super::model::send_feedback;
use super::view_model::FeedbackChatVm;
use contracts::shared::format::format_file_size;
use crate::shared::icons::icon;
use leptos::prelude::*;
use thaw::*;

#[component]
#[allow(non_snake_case)]
pub fn FeedbackChat() -> impl IntoView {
    let vm = leptos::context::use_context::<FeedbackChatVm>()
        .expect("FeedbackChatVm context not found");
    let messages_container_ref = NodeRef::<leptos::html::Div>::new();
    let file_input_ref = NodeRef::<leptos::html::Input>::new();

    // Keep the newest message in view
    Effect::new(move |_| {
        vm.transcript.track();
        vm.is_sending.track();
        if let Some(container) = messages_container_ref.get() {
            request_animation_frame(move || {
                container.set_scroll_top(container.scroll_height());
            });
        }
    });

    let handle_send = Callback::new(move |_: ()| {
        let Some(pending) = vm.begin_submit() else {
            return;
        };

        wasm_bindgen_futures::spawn_local(async move {
            let result = send_feedback(&pending.submission.message, &pending.files).await;
            vm.finish_submit(pending.session, result);
        });
    });

    view! {
        <div style="height: 100%; display: flex; flex-direction: column;">
            // Messages area
            <div
                node_ref=messages_container_ref
                style="flex: 1; overflow-y: auto; display: flex; flex-direction: column;"
            >
                {move || {
                    vm.transcript.with(|t| t.is_empty()).then(|| view! {
                        <div style="margin: auto; text-align: center; color: var(--colorNeutralForeground3);">
                            <div style="font-size: 20px; font-weight: 600; margin-bottom: 8px;">"Kosh Agent"</div>
                            <div>"Describe your work or attach files to get feedback."</div>
                        </div>
                    })
                }}

                <For
                    each=move || vm.transcript.with(|t| t.messages().to_vec())
                    key=|msg| msg.id
                    let:msg
                >
                    {if msg.is_user() {
                        view! { <UserMessage message=msg /> }.into_any()
                    } else {
                        view! { <AssistantMessage message=msg /> }.into_any()
                    }}
                </For>

                <Show when=move || vm.is_sending.get()>
                    <div style="padding: 12px 20px; color: var(--colorNeutralForeground3); font-style: italic;">
                        "Kosh Agent is thinking..."
                    </div>
                </Show>
            </div>

            // Input area
            <div style="display: flex; flex-direction: column; gap: 8px; padding: 12px 20px 20px; border-top: 1px solid var(--colorNeutralStroke2);">
                // Staged files
                <Show when=move || vm.staged.with(|s| !s.is_empty())>
                    <div style="font-size: 12px; color: var(--colorNeutralForeground3);">
                        {move || vm.staged.with(|s| format!(
                            "{} file(s), {}",
                            s.len(),
                            format_file_size(s.total_bytes())
                        ))}
                    </div>
                    <Flex style="gap: 8px; flex-wrap: wrap;">
                        <For
                            each=move || vm.staged.with(|s| s.iter().cloned().collect::<Vec<_>>())
                            key=|f| f.id
                            let:file
                        >
                            <div style="padding: 4px 10px; background: var(--colorNeutralBackground2); border: 1px solid var(--colorNeutralStroke2); border-radius: 6px; display: flex; align-items: center; gap: 8px;">
                                <span style="font-size: 13px; display: inline-flex; align-items: center; gap: 4px;">
                                    {icon("document")}
                                    {file.name.clone()}
                                    <span style="color: var(--colorNeutralForeground3);">
                                        {format!("({})", format_file_size(file.size_bytes))}
                                    </span>
                                </span>
                                <button
                                    title="Remove"
                                    style="background: none; border: none; cursor: pointer; padding: 2px; color: var(--colorNeutralForeground3);"
                                    disabled=move || vm.is_sending.get()
                                    on:click={
                                        let file_id = file.id;
                                        move |_| vm.remove_staged(file_id)
                                    }
                                >
                                    {icon("close")}
                                </button>
                            </div>
                        </For>
                    </Flex>
                </Show>

                <Flex style="gap: 8px; align-items: flex-end;">
                    <input
                        node_ref=file_input_ref
                        type="file"
                        multiple=true
                        style="display: none;"
                        on:change=move |ev| {
                            let input = event_target::<web_sys::HtmlInputElement>(&ev);
                            if let Some(files) = input.files() {
                                for i in 0..files.length() {
                                    if let Some(file) = files.get(i) {
                                        vm.stage_file(file);
                                    }
                                }
                            }
                            // Allow picking the same file again
                            input.set_value("");
                        }
                    />

                    <Button
                        appearance=ButtonAppearance::Secondary
                        disabled=vm.is_sending
                        attr:title="Attach files"
                        on_click=move |_| {
                            if let Some(input) = file_input_ref.get() {
                                input.click();
                            }
                        }
                    >
                        {icon("attach")}
                    </Button>

                    <div style="flex: 1;">
                        <Textarea
                            value=vm.input
                            placeholder="Ask Kosh Agent for some feedback!"
                            attr:style="width: 100%; min-height: 48px; max-height: 200px; resize: vertical;"
                            on:keydown=move |ev: web_sys::KeyboardEvent| {
                                // Enter sends, Shift+Enter keeps the newline
                                if ev.key() == "Enter" && !ev.shift_key() {
                                    ev.prevent_default();
                                    handle_send.run(());
                                }
                            }
                        />
                    </div>

                    <Button
                        appearance=ButtonAppearance::Primary
                        disabled=Signal::derive(move || !vm.can_submit())
                        attr:title="Send"
                        on_click=move |_| handle_send.run(())
                    >
                        {icon("send")}
                        " ↵"
                    </Button>
                </Flex>
            </div>
        </div>
    }
}
