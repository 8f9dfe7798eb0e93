pub mod animation;
pub mod camera;
pub mod components;
pub mod events;
pub mod facing;
pub mod input;
pub mod intent;
pub mod interact;
pub mod inventory;
pub mod physics;
pub mod types;
