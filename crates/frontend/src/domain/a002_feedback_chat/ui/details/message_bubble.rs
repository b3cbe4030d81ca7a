//! Chat bubbles for the transcript

use super::model::resolve_download_url;
use crate::shared::icons::icon;
use contracts::domain::a002_feedback_chat::{DownloadableFile, TranscriptMessage};
use leptos::prelude::*;

const ROW_STYLE: &str = "display: flex; gap: 12px; align-items: flex-start; padding: 16px 20px;";
const AVATAR_STYLE: &str = "flex: none; width: 36px; height: 36px; border-radius: 50%; display: flex; align-items: center; justify-content: center;";

/// Reply from the agent: avatar, darker row, optional PDF link
#[component]
#[allow(non_snake_case)]
pub fn AssistantMessage(message: TranscriptMessage) -> impl IntoView {
    let text_style = if message.is_error {
        "white-space: pre-wrap; color: var(--colorPaletteRedForeground1);"
    } else {
        "white-space: pre-wrap;"
    };
    let row_style = format!(
        "{} background: var(--colorNeutralBackground3);{}",
        ROW_STYLE,
        if message.is_error {
            " border-left: 3px solid var(--colorPaletteRedBorder2);"
        } else {
            ""
        }
    );
    let avatar_style = format!(
        "{} background: var(--colorBrandBackground); color: var(--colorNeutralForegroundOnBrand);",
        AVATAR_STYLE
    );
    let is_error = message.is_error;
    let class = format!("chat-message chat-message--{}", message.sender.as_str());

    view! {
        <div class=class style=row_style>
            <div style=avatar_style title="Kosh Agent">{icon("agent")}</div>
            <div style="flex: 1; min-width: 0;">
                {is_error.then(|| view! {
                    <div style="display: flex; align-items: center; gap: 6px; margin-bottom: 4px; color: var(--colorPaletteRedForeground1); font-size: 12px; font-weight: 600;">
                        {icon("warning")}
                        "Request failed"
                    </div>
                })}
                <div style=text_style>{message.text}</div>
                {message.download.map(|file| view! { <DownloadLink file=file /> })}
            </div>
        </div>
    }
}

/// Message typed by the user, with the names of files sent along
#[component]
#[allow(non_snake_case)]
pub fn UserMessage(message: TranscriptMessage) -> impl IntoView {
    let avatar_style = format!(
        "{} background: var(--colorNeutralBackground5); color: var(--colorNeutralForeground2);",
        AVATAR_STYLE
    );
    let attachments = message.attachments;
    let class = format!("chat-message chat-message--{}", message.sender.as_str());

    view! {
        <div class=class style=ROW_STYLE>
            <div style=avatar_style title="You">{icon("user")}</div>
            <div style="flex: 1; min-width: 0;">
                <div style="white-space: pre-wrap;">{message.text}</div>
                {(!attachments.is_empty()).then(|| view! {
                    <div style="display: flex; flex-wrap: wrap; gap: 6px; margin-top: 8px;">
                        {attachments
                            .into_iter()
                            .map(|name| view! {
                                <span style="display: inline-flex; align-items: center; gap: 4px; padding: 2px 8px; font-size: 12px; border-radius: 4px; background: var(--colorNeutralBackground2); border: 1px solid var(--colorNeutralStroke2);">
                                    {icon("document")}
                                    {name}
                                </span>
                            })
                            .collect_view()}
                    </div>
                })}
            </div>
        </div>
    }
}

#[component]
#[allow(non_snake_case)]
fn DownloadLink(file: DownloadableFile) -> impl IntoView {
    let href = resolve_download_url(&file.url);

    view! {
        <a
            href=href
            download=file.filename.clone()
            target="_blank"
            rel="noopener"
            style="display: inline-flex; align-items: center; gap: 6px; margin-top: 10px; padding: 6px 12px; border-radius: 6px; background: var(--colorNeutralBackground1); border: 1px solid var(--colorNeutralStroke1); color: var(--colorBrandForeground1); text-decoration: none;"
        >
            {icon("download")}
            {format!("Download {}", file.filename)}
        </a>
    }
}
