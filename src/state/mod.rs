pub mod app_settings;
pub mod app_state;
pub mod clock;
pub mod deep_link;
pub mod filters;
pub mod grouping;
pub mod messages;
pub mod network;
pub mod view;
