pub mod clue_list;
pub mod grid;
pub mod progress_bar;
pub mod trainer_panel;
