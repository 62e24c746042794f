//! Shared test utilities

#![allow(dead_code)]

pub mod fake_git;
pub mod fixtures;
pub mod mock_platform;
pub mod scripted_prompter;

pub use fake_git::FakeGit;
pub use mock_platform::MockHostingService;
pub use scripted_prompter::{Answer, ScriptedPrompter};
