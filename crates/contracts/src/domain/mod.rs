pub mod a001_report;
pub mod a002_feedback_chat;
pub mod common;
