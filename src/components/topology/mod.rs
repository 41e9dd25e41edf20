//! Force-directed topology canvas: layout, rendering and pointer interaction.

mod camera;
mod canvas;
mod cluster;
mod component;
mod config;
mod error;
mod interaction;
mod render;
mod scheduler;
mod simulation;
mod starfield;
mod store;
mod style;
mod types;
mod view;

pub use component::TopologyCanvas;
pub use types::{Edge, Node};
