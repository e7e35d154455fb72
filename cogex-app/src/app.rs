use anyhow::{Context, Result, anyhow, bail};
use cogex_render::{Display, KeyPress, RenderError};
use cogex_timing::{HighPrecisionTimer, Timer};
use pixels::{Pixels, SurfaceTexture};
use std::sync::Arc;
use std::time::Duration;
use tiny_skia::{Color, Pixmap};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Fullscreen, Window, WindowId},
};

/// winit side of the window: surface creation and input collection.
struct WindowState {
    resolution: (u32, u32),
    fullscreen: bool,
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    refresh_rate: Option<f64>,
    keys: Vec<KeyPress>,
    error: Option<anyhow::Error>,
}

impl WindowState {
    fn new(resolution: (u32, u32), fullscreen: bool) -> Self {
        Self {
            resolution,
            fullscreen,
            window: None,
            pixels: None,
            refresh_rate: None,
            keys: Vec::new(),
            error: None,
        }
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let primary_monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .ok_or_else(|| anyhow!("no monitor available"))?;

        self.refresh_rate = primary_monitor
            .refresh_rate_millihertz()
            .map(|rate| rate as f64 / 1000.0);

        let (width, height) = self.resolution;
        let mut window_attributes = Window::default_attributes()
            .with_title("Cogex text draw benchmark")
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(false);
        if self.fullscreen {
            window_attributes = window_attributes
                .with_fullscreen(Some(Fullscreen::Borderless(Some(primary_monitor.clone()))));
        }

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let physical_size = window.inner_size();

        log::info!(
            "window {}x{} (buffer {}x{}), scale factor {:.2}",
            physical_size.width,
            physical_size.height,
            width,
            height,
            window.scale_factor()
        );
        match self.refresh_rate {
            Some(hz) => log::info!("refresh rate {hz:.1} Hz"),
            None => log::warn!("monitor did not report a refresh rate"),
        }

        let surface_texture =
            SurfaceTexture::new(physical_size.width, physical_size.height, window.clone());
        self.pixels = Some(Pixels::new(width, height, surface_texture)?);

        window.set_cursor_visible(false);
        self.window = Some(window);
        Ok(())
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                log::error!("failed to resize surface: {e}");
            }
        }
    }
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                self.error = Some(e.context("creating window and surface"));
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.keys.push(KeyPress::Escape),
            WindowEvent::KeyboardInput { event, .. }
                if event.state.is_pressed() && !event.repeat =>
            {
                let key = match event.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => KeyPress::Escape,
                    _ => KeyPress::Other,
                };
                self.keys.push(key);
            }
            WindowEvent::Resized(size) => self.handle_resize(size),
            _ => {}
        }
    }
}

/// Fullscreen window presenting the benchmark canvas through `pixels`.
///
/// The event loop is pumped from `flip` so the measurement loop keeps
/// control flow.
pub struct WindowDisplay {
    event_loop: EventLoop<()>,
    state: WindowState,
    canvas: Pixmap,
    background: Color,
    timer: HighPrecisionTimer,
}

impl WindowDisplay {
    pub fn new(resolution: (u32, u32), fullscreen: bool, timer: HighPrecisionTimer) -> Result<Self> {
        let mut event_loop = EventLoop::new().context("creating event loop")?;
        let mut state = WindowState::new(resolution, fullscreen);

        while state.pixels.is_none() {
            let status = event_loop.pump_app_events(Some(Duration::from_millis(16)), &mut state);
            if let Some(e) = state.error.take() {
                return Err(e);
            }
            if let PumpStatus::Exit(code) = status {
                bail!("event loop exited ({code}) before the window opened");
            }
        }

        let (width, height) = resolution;
        let mut canvas = Pixmap::new(width, height).ok_or(RenderError::Pixmap { width, height })?;
        let background = Color::BLACK;
        canvas.fill(background);

        Ok(Self {
            event_loop,
            state,
            canvas,
            background,
            timer,
        })
    }

    fn pump(&mut self) {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.state);
        if let PumpStatus::Exit(_) = status {
            self.state.keys.push(KeyPress::Escape);
        }
    }
}

impl Display for WindowDisplay {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn canvas(&mut self) -> &mut Pixmap {
        &mut self.canvas
    }

    fn flush(&mut self) {
        if let Some(pixels) = &self.state.pixels {
            pixels.queue().submit(std::iter::empty());
        }
    }

    fn finish(&mut self) {
        if let Some(pixels) = &self.state.pixels {
            let _ = pixels.device().poll(pixels::wgpu::Maintain::Wait);
        }
    }

    fn flip(&mut self) -> Result<f64, RenderError> {
        let pixels = self
            .state
            .pixels
            .as_mut()
            .ok_or_else(|| RenderError::Display("window surface is gone".to_string()))?;

        pixels.frame_mut().copy_from_slice(self.canvas.data());
        pixels
            .render()
            .map_err(|e| RenderError::Display(e.to_string()))?;
        let now = self.timer.now();

        self.canvas.fill(self.background);
        self.pump();
        Ok(self.timer.seconds(now))
    }

    fn clear_events(&mut self) {
        self.pump();
        self.state.keys.clear();
    }

    fn poll_keys(&mut self) -> Vec<KeyPress> {
        std::mem::take(&mut self.state.keys)
    }

    fn refresh_period(&self) -> Option<Duration> {
        self.state
            .refresh_rate
            .filter(|hz| *hz > 0.0)
            .map(|hz| Duration::from_secs_f64(1.0 / hz))
    }
}

impl Drop for WindowDisplay {
    fn drop(&mut self) {
        if let Some(window) = &self.state.window {
            window.set_cursor_visible(true);
        }
    }
}
