pub mod a002_feedback_chat;
