pub mod app;
pub mod renderer_wgpu;
pub mod scene_core;
