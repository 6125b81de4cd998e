//! UI components for Notefold

pub mod browser;
pub mod forms;
pub mod sidebar;
