pub mod answer_bridge;
pub mod keymap;
pub mod navigator;
