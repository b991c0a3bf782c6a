pub mod background;
pub mod relay;
