pub mod api_key_panel;
pub mod comparison;
pub mod input_panel;
pub mod viewport;
pub mod zoom;
