pub mod checklist;
pub mod status_bar;
pub mod toolbar;
