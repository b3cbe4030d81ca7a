use super::attachments::FeedbackInput;
use super::FeedbackError;
use contracts::shared::format::format_file_size;
use crate::shared::llm::{ChatMessage, LlmError, LlmProvider};
use contracts::domain::a002_feedback_chat::FeedbackResponse;

const FILES_ONLY_PROMPT: &str = "Please review the attached files.";

/// Собрать сообщения для модели: системный промпт, затем сообщение
/// пользователя со списком приложенных файлов
pub fn build_prompt(system_prompt: &str, input: &FeedbackInput) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);

    if !system_prompt.trim().is_empty() {
        messages.push(ChatMessage::system(system_prompt.trim()));
    }

    let mut content = input.message.trim().to_string();
    if content.is_empty() {
        content = FILES_ONLY_PROMPT.to_string();
    }

    if !input.attachments.is_empty() {
        let listing: Vec<String> = input
            .attachments
            .iter()
            .map(|a| format!("- {} ({})", a.filename, format_file_size(a.size)))
            .collect();
        content.push_str("\n\nAttached files:\n");
        content.push_str(&listing.join("\n"));
    }

    messages.push(ChatMessage::user(content));
    messages
}

/// Отправить сообщение пользователя модели и вернуть ответ для чата
pub async fn ask_feedback(
    provider: &dyn LlmProvider,
    system_prompt: &str,
    input: FeedbackInput,
) -> Result<FeedbackResponse, FeedbackError> {
    if input.is_empty() {
        return Err(FeedbackError::EmptyMessage);
    }

    let messages = build_prompt(system_prompt, &input);

    tracing::info!(
        "Feedback request: {} chars, {} file(s), provider {}",
        input.message.len(),
        input.attachments.len(),
        provider.provider_name()
    );

    let llm_response = provider.chat_completion(messages).await?;

    if llm_response.content.trim().is_empty() {
        return Err(FeedbackError::Llm(LlmError::EmptyResponse));
    }

    tracing::info!(
        "Feedback response from {}: tokens={:?}, finish={:?}",
        llm_response.model,
        llm_response.tokens_used,
        llm_response.finish_reason
    );

    Ok(FeedbackResponse::text(llm_response.content))
}
