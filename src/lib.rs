//! Wavesim library - animated water surface with click ripples

pub mod camera;
pub mod cli;
pub mod controls;
pub mod demo;
pub mod params;
pub mod raster;
pub mod rendering;
pub mod wave;
