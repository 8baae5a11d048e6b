#![forbid(unsafe_code)]

pub mod checklist_service;
pub mod error;
pub mod events;
pub mod home_view;

pub use onboard_core::Clock;

pub use checklist_service::ChecklistService;
pub use error::{ChecklistError, EventError};
pub use events::{ChecklistEvent, GroupTarget, RenderRequest, SelectedOption};
pub use home_view::{CheckOption, CheckboxGroup, GroupSection, ViewDocument, build_home_view};
