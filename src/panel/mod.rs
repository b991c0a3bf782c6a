pub mod panel;
pub mod panel_model;
pub mod view;
