//! Feedback Chat Details UI Module (MVVM Standard)
//!
//! Structure:
//! - model.rs: API functions and URL helpers
//! - view_model.rs: FeedbackChatVm with RwSignals
//! - view.rs: Main component FeedbackChat
//! - message_bubble.rs: AssistantMessage / UserMessage bubbles

mod message_bubble;
mod model;
mod view;
mod view_model;

pub use message_bubble::{AssistantMessage, UserMessage};
pub use view::FeedbackChat;
pub use view_model::FeedbackChatVm;
