pub mod event_list;
pub mod skeleton;
