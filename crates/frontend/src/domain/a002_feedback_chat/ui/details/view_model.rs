//! Feedback Chat - View Model

use contracts::domain::a002_feedback_chat::{
    FeedbackResponse, StagedFile, StagedFiles, Transcript,
};
use leptos::prelude::*;
use uuid::Uuid;

#[derive(Clone, Copy)]
pub struct FeedbackChatVm {
    pub transcript: RwSignal<Transcript>,
    pub input: RwSignal<String>,
    pub staged: RwSignal<StagedFiles>,
    /// Browser handles for `staged`, same ids
    pub handles: StoredValue<Vec<(Uuid, web_sys::File)>, LocalStorage>,
    pub is_sending: RwSignal<bool>,
    /// Bumped on every reset; replies for an older session are dropped
    pub session: RwSignal<u64>,
}

/// Request started by `FeedbackChatVm::begin_submit`
pub struct PendingRequest {
    pub submission: Submission,
    pub files: Vec<web_sys::File>,
    pub session: u64,
}

impl FeedbackChatVm {
    pub fn new() -> Self {
        Self {
            transcript: RwSignal::new(Transcript::new()),
            input: RwSignal::new(String::new()),
            staged: RwSignal::new(StagedFiles::new()),
            handles: StoredValue::new_local(Vec::new()),
            is_sending: RwSignal::new(false),
            session: RwSignal::new(0),
        }
    }

    pub fn stage_file(&self, file: web_sys::File) {
        let meta = StagedFile::new(file.name(), file.size().max(0.0) as u64);
        let id = meta.id;
        let mut staged = false;
        self.staged.update(|files| staged = files.stage(meta));
        if staged {
            self.handles.update_value(|handles| handles.push((id, file)));
        } else {
            log::debug!("File '{}' is already staged", file.name());
        }
    }

    pub fn remove_staged(&self, id: Uuid) {
        self.staged.update(|files| {
            files.remove(id);
        });
        self.handles
            .update_value(|handles| handles.retain(|(handle_id, _)| *handle_id != id));
    }

    pub fn can_submit(&self) -> bool {
        submission_allowed(
            &self.input.get(),
            self.staged.with(|s| s.len()),
            self.is_sending.get(),
        )
    }

    /// Optimistic half of a submit: user message in, input and staging area out
    pub fn begin_submit(&self) -> Option<PendingRequest> {
        let text = self.input.get_untracked();
        let mut transcript = self.transcript.get_untracked();
        let mut staged = self.staged.get_untracked();

        let submission = begin_submission(
            &mut transcript,
            &mut staged,
            &text,
            self.is_sending.get_untracked(),
        )?;

        self.transcript.set(transcript);
        self.staged.set(staged);
        self.input.set(String::new());
        self.is_sending.set(true);

        let mut handles = Vec::new();
        self.handles
            .update_value(|stored| handles = std::mem::take(stored));
        let files = submission
            .files
            .iter()
            .filter_map(|meta| {
                handles
                    .iter()
                    .find(|(id, _)| *id == meta.id)
                    .map(|(_, file)| file.clone())
            })
            .collect();

        Some(PendingRequest {
            submission,
            files,
            session: self.session.get_untracked(),
        })
    }

    /// Second half: reply or error goes after the user message
    pub fn finish_submit(&self, session: u64, result: Result<FeedbackResponse, String>) {
        if let Err(e) = &result {
            log::error!("Feedback request failed: {}", e);
        }

        let mut transcript = self.transcript.get_untracked();
        if settle(&mut transcript, session, self.session.get_untracked(), result) {
            self.transcript.set(transcript);
            self.is_sending.set(false);
        } else {
            log::debug!("Dropping reply for a chat that was reset");
        }
    }

    /// "New Chat": forget everything, including a reply still in flight
    pub fn reset(&self) {
        self.session.update(|s| *s += 1);
        self.transcript.update(|t| t.clear());
        self.input.set(String::new());
        self.staged.update(|s| s.clear());
        self.handles.set_value(Vec::new());
        self.is_sending.set(false);
    }
}

impl Default for FeedbackChatVm {
    fn default() -> Self {
        Self::new()
    }
}

/// What leaves the input row on submit
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub message: String,
    pub files: Vec<StagedFile>,
}

/// A submission needs text or at least one file, and no request in flight
pub fn submission_allowed(text: &str, staged_count: usize, is_sending: bool) -> bool {
    !is_sending && (!text.trim().is_empty() || staged_count > 0)
}

/// Append the user message (with staged file names) and empty the staging area.
/// `None` leaves both untouched.
pub fn begin_submission(
    transcript: &mut Transcript,
    staged: &mut StagedFiles,
    text: &str,
    is_sending: bool,
) -> Option<Submission> {
    if !submission_allowed(text, staged.len(), is_sending) {
        return None;
    }

    let message = text.trim().to_string();
    let attachments = staged.names();
    let files = staged.take();
    transcript.push_user(message.clone(), attachments);

    Some(Submission { message, files })
}

/// Apply the outcome of a request started in `started_session`.
/// Returns `false` and leaves the transcript alone when the chat was reset since.
pub fn settle(
    transcript: &mut Transcript,
    started_session: u64,
    current_session: u64,
    result: Result<FeedbackResponse, String>,
) -> bool {
    if started_session != current_session {
        return false;
    }

    match result {
        Ok(response) => {
            transcript.apply_response(response);
        }
        Err(e) => {
            transcript.push_error(failure_text(&e));
        }
    }
    true
}

/// Transcript text for a failed request
pub fn failure_text(error: &str) -> String {
    format!("Sorry, something went wrong: {}", error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a002_feedback_chat::ChatSender;

    fn staged_with(names: &[&str]) -> StagedFiles {
        let mut staged = StagedFiles::new();
        for (i, name) in names.iter().enumerate() {
            staged.stage(StagedFile::new(*name, (i as u64 + 1) * 100));
        }
        staged
    }

    #[test]
    fn test_submission_requires_text_or_files() {
        assert!(!submission_allowed("", 0, false));
        assert!(!submission_allowed("   \n", 0, false));
        assert!(submission_allowed("review this", 0, false));
        assert!(submission_allowed("", 2, false));
    }

    #[test]
    fn test_submission_blocked_while_sending() {
        assert!(!submission_allowed("review this", 0, true));
        assert!(!submission_allowed("", 1, true));
    }

    #[test]
    fn test_success_reply_follows_user_message() {
        let mut transcript = Transcript::new();
        let mut staged = staged_with(&["essay.pdf", "notes.txt"]);

        let submission =
            begin_submission(&mut transcript, &mut staged, "  Check this  ", false).unwrap();
        assert_eq!(submission.message, "Check this");
        assert_eq!(submission.files.len(), 2);
        assert!(staged.is_empty());
        assert_eq!(transcript.len(), 1);
        assert_eq!(
            transcript.messages()[0].attachments,
            vec!["essay.pdf", "notes.txt"]
        );

        assert!(settle(
            &mut transcript,
            0,
            0,
            Ok(FeedbackResponse::text("Strong opening."))
        ));
        let messages = transcript.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, ChatSender::User);
        assert_eq!(messages[1].sender, ChatSender::Assistant);
        assert_eq!(messages[1].text, "Strong opening.");
        assert!(!messages[1].is_error);
    }

    #[test]
    fn test_failure_keeps_user_message_and_clears_staging() {
        let mut transcript = Transcript::new();
        let mut staged = staged_with(&["draft.docx"]);

        begin_submission(&mut transcript, &mut staged, "", false).unwrap();
        assert!(staged.is_empty());

        assert!(settle(
            &mut transcript,
            3,
            3,
            Err("HTTP 502: upstream down".into())
        ));
        let messages = transcript.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_user());
        assert_eq!(messages[0].text, "");
        assert!(messages[1].is_error);
        assert_eq!(
            messages[1].text,
            "Sorry, something went wrong: HTTP 502: upstream down"
        );
        assert!(staged.is_empty());
    }

    #[test]
    fn test_reply_after_reset_is_dropped() {
        let mut transcript = Transcript::new();
        let mut staged = StagedFiles::new();
        let started = 0;
        begin_submission(&mut transcript, &mut staged, "hello", false).unwrap();

        // "New Chat" while the request is in flight
        let mut transcript = Transcript::new();
        let current = started + 1;

        assert!(!settle(
            &mut transcript,
            started,
            current,
            Ok(FeedbackResponse::text("late reply"))
        ));
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_nothing_to_send_leaves_state_alone() {
        let mut transcript = Transcript::new();
        let mut staged = StagedFiles::new();
        assert!(begin_submission(&mut transcript, &mut staged, "   ", false).is_none());
        assert!(transcript.is_empty());

        let mut staged = staged_with(&["a.txt"]);
        assert!(begin_submission(&mut transcript, &mut staged, "hi", true).is_none());
        assert!(transcript.is_empty());
        assert_eq!(staged.len(), 1);
    }
}
