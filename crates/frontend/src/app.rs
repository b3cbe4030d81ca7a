use crate::domain::a002_feedback_chat::ui::details::{FeedbackChat, FeedbackChatVm};
use crate::layout::left::Sidebar;
use crate::layout::Shell;
use leptos::prelude::*;
use thaw::ConfigProvider;

#[component]
pub fn App() -> impl IntoView {
    // Chat state is shared by the sidebar ("New Chat") and the chat panel.
    provide_context(FeedbackChatVm::new());

    view! {
        <ConfigProvider>
            <Shell
                left=|| view! { <Sidebar /> }.into_any()
                center=|| view! { <FeedbackChat /> }.into_any()
            />
        </ConfigProvider>
    }
}
