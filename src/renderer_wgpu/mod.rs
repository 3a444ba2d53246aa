pub mod camera;
pub mod geometry;
pub mod gpu_context;
pub mod material;
pub mod pipeline;
pub mod scene;
pub mod sky_pass;
pub mod sun_control;
pub mod texture;
