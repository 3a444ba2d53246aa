use std::time::Instant;

use anyhow::Result;
use glam::Vec3;
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, WindowEvent};
use winit::window::{CursorGrabMode, Window};

use crate::renderer_wgpu::camera::{CameraController, FlyCamera};
use crate::renderer_wgpu::gpu_context::GpuContext;
use crate::renderer_wgpu::scene::SceneRenderer;
use crate::renderer_wgpu::sun_control::SunController;
use crate::scene_core::config::SceneConfig;
use crate::scene_core::sun::SunAngles;
use crate::scene_core::time_of_day::Lighting;

mod event_loop;

pub use event_loop::run_event_loop;

pub struct AppState {
    pub(crate) window: &'static Window,
    pub(crate) gpu: GpuContext,
    scene_renderer: SceneRenderer,
    camera: FlyCamera,
    camera_controller: CameraController,
    sun: SunAngles,
    sun_controller: SunController,
    pub(crate) focused: bool,
    pub(crate) cursor_captured: bool,
    last_frame: Instant,
    frame_time_ms: f32,
    elapsed_seconds: f32,
    clear_color: wgpu::Color,
}

impl AppState {
    pub async fn new(
        window: &'static Window,
        config: &SceneConfig,
        cursor_captured: bool,
    ) -> Result<Self> {
        let gpu = GpuContext::new(window).await?;

        let scene_renderer = SceneRenderer::new(
            &gpu.device,
            &gpu.queue,
            &gpu.config,
            std::path::Path::new(&config.assets.texture_dir),
        )?;

        let camera = FlyCamera::new(
            Vec3::from_array(config.camera.position),
            config.camera.yaw,
            config.camera.pitch,
        );
        let camera_controller =
            CameraController::new(config.camera.move_speed, config.camera.look_sensitivity);

        let sun = SunAngles::new(config.sun.yaw, config.sun.pitch);
        let sun_controller = SunController::new(config.sun.yaw_rate, config.sun.pitch_rate);

        Ok(Self {
            window,
            gpu,
            scene_renderer,
            camera,
            camera_controller,
            sun,
            sun_controller,
            focused: true,
            cursor_captured,
            last_frame: Instant::now(),
            frame_time_ms: 0.0,
            elapsed_seconds: 0.0,
            clear_color: wgpu::Color::BLACK,
        })
    }

    pub(crate) fn process_window_event(&mut self, event: &WindowEvent) {
        let _ = self.camera_controller.process_window_event(event);
        let _ = self.sun_controller.process_window_event(event);

        if let WindowEvent::Focused(focused) = event {
            self.focused = *focused;
            if !focused {
                self.release_cursor();
            }
        }
    }

    pub(crate) fn process_device_event(&mut self, event: &DeviceEvent) {
        if !(self.focused && self.cursor_captured) {
            return;
        }
        self.camera_controller.process_device_event(event);
    }

    pub(crate) fn capture_cursor(&mut self) {
        self.cursor_captured = try_grab_window_cursor(self.window);
        if self.cursor_captured {
            self.camera_controller.reset_inputs();
            self.sun_controller.reset_inputs();
        }
    }

    pub(crate) fn release_cursor(&mut self) {
        if !self.cursor_captured {
            return;
        }

        release_window_cursor(self.window);
        self.cursor_captured = false;
        self.camera_controller.reset_inputs();
        self.sun_controller.reset_inputs();
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size);
        self.scene_renderer.resize(&self.gpu.device, &self.gpu.config);
    }

    pub(crate) fn update(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.frame_time_ms = self.frame_time_ms * 0.94 + (dt * 1000.0) * 0.06;
        self.elapsed_seconds += dt;

        self.camera_controller.update_camera(
            dt,
            &mut self.camera,
            self.focused && self.cursor_captured,
        );
        self.sun_controller.update(dt, &mut self.sun);

        let lighting = Lighting::from_sun(&self.sun);
        self.clear_color = wgpu::Color {
            r: lighting.sky_color.x as f64,
            g: lighting.sky_color.y as f64,
            b: lighting.sky_color.z as f64,
            a: 1.0,
        };

        let view_proj = self.camera.view_projection(self.gpu.aspect());
        self.scene_renderer.update_frame(
            &self.gpu.queue,
            view_proj,
            self.camera.position,
            &lighting,
            self.elapsed_seconds,
        );

        self.window.set_title(&format!(
            "sun-scene | {:.1}ms ({:.0}fps) | sun yaw: {:.2} pitch: {:.2}",
            self.frame_time_ms,
            1000.0 / self.frame_time_ms.max(0.01),
            self.sun.yaw(),
            self.sun.pitch(),
        ));
    }

    pub(crate) fn render(&mut self) -> Result<(), SurfaceError> {
        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sun-scene-render-encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene-render-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.scene_renderer.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.scene_renderer.render(&mut pass);
        }

        self.gpu.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub fn try_grab_window_cursor(window: &Window) -> bool {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
        .is_ok();

    window.set_cursor_visible(!grabbed);
    grabbed
}

fn release_window_cursor(window: &Window) {
    let _ = window.set_cursor_grab(CursorGrabMode::None);
    window.set_cursor_visible(true);
}
