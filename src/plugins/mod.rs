pub mod camera_plugin;
pub mod game_plugin;
pub mod ui_plugin;
