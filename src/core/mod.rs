//! Core functionality: the notebook tree, navigation, export and configuration

pub mod config;
pub mod export;
pub mod navigator;
pub mod node;
pub mod store;
