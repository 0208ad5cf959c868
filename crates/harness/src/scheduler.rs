//! Single-threaded frame scheduler.
//!
//! Hosts post resize and pointer events as they arrive and call `refresh`
//! once per display refresh. A refresh first drains the events queued when
//! it started, then runs the pending tick, if any. A tick that asks to
//! continue is marked pending for the next refresh instead of re-entering
//! itself.

use crate::error::HarnessError;
use crate::viewport::Viewport;
use std::collections::VecDeque;
use viewport_common::SurfaceSize;
use viewport_input::PointerAction;
use viewport_render::Renderer;

/// Signal returned by a tick and by a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Another frame is wanted on the next refresh.
    Continue,
    /// Nothing left to draw until someone requests a frame.
    Stop,
}

/// An event task, run between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Task {
    Resize(SurfaceSize),
    Pointer(PointerAction),
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    queue: VecDeque<Task>,
    tick_pending: bool,
    refreshes: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post_resize(&mut self, width: u32, height: u32) {
        self.queue.push_back(Task::Resize(SurfaceSize::new(width, height)));
    }

    pub fn post_pointer(&mut self, action: PointerAction) {
        self.queue.push_back(Task::Pointer(action));
    }

    /// Ask for a tick on the next refresh. At most one tick is ever pending.
    pub fn request_frame(&mut self) {
        self.tick_pending = true;
    }

    pub fn tick_pending(&self) -> bool {
        self.tick_pending
    }

    /// Queued events not yet delivered.
    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    /// Number of refreshes run so far.
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    /// Run one display refresh against the harness.
    ///
    /// Events are applied in arrival order before the tick, so the tick always
    /// sees a fully processed resize. A failed tick is not rescheduled.
    pub fn refresh<R: Renderer>(
        &mut self,
        viewport: &mut Viewport<R>,
    ) -> Result<Flow, HarnessError> {
        self.refreshes += 1;

        let batch = self.queue.len();
        for task in self.queue.drain(..batch) {
            match task {
                Task::Resize(size) => viewport.on_resize(size.width, size.height),
                Task::Pointer(action) => viewport.on_pointer(action),
            }
        }

        if !self.tick_pending {
            return Ok(Flow::Stop);
        }
        self.tick_pending = false;
        let flow = viewport.tick()?;
        self.tick_pending = flow == Flow::Continue;
        Ok(flow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use viewport_common::Color;
    use viewport_render::{DebugTextRenderer, Scene};

    fn viewport(config: HarnessConfig) -> Viewport<DebugTextRenderer> {
        Viewport::initialize(
            Some(DebugTextRenderer::default()),
            SurfaceSize::new(800, 600),
            Scene::single_cube(Color::RED),
            config,
        )
        .unwrap()
    }

    #[test]
    fn one_tick_per_refresh() {
        let mut vp = viewport(HarnessConfig::orbit());
        let mut scheduler = FrameScheduler::new();
        scheduler.request_frame();
        scheduler.request_frame();
        assert!(scheduler.tick_pending());

        for n in 1..=5 {
            assert_eq!(scheduler.refresh(&mut vp).unwrap(), Flow::Continue);
            assert_eq!(vp.renderer().frames_rendered(), n);
            assert!(scheduler.tick_pending());
        }
        assert_eq!(scheduler.refreshes(), 5);
    }

    #[test]
    fn resize_lands_before_the_next_tick() {
        let mut vp = viewport(HarnessConfig::orbit());
        let mut scheduler = FrameScheduler::new();
        scheduler.request_frame();
        scheduler.refresh(&mut vp).unwrap();

        // Event arrives between two ticks.
        scheduler.post_resize(1000, 500);
        scheduler.refresh(&mut vp).unwrap();

        let output = vp.take_output().unwrap();
        assert!(output.contains("1000x500"));
        assert!(output.contains("aspect=2.000"));
    }

    #[test]
    fn events_run_in_arrival_order() {
        let mut vp = viewport(HarnessConfig::orbit());
        let mut scheduler = FrameScheduler::new();
        scheduler.post_resize(1024, 768);
        scheduler.post_resize(640, 480);
        scheduler.refresh(&mut vp).unwrap();
        assert_eq!(vp.state().size, SurfaceSize::new(640, 480));
    }

    #[test]
    fn idle_without_requested_frame() {
        let mut vp = viewport(HarnessConfig::orbit());
        let mut scheduler = FrameScheduler::new();
        scheduler.post_pointer(PointerAction::Zoom(1.0));
        assert_eq!(scheduler.refresh(&mut vp).unwrap(), Flow::Stop);
        assert_eq!(vp.renderer().frames_rendered(), 0);
        assert_eq!(scheduler.pending_tasks(), 0);
    }

    #[test]
    fn single_shot_config_stops_after_one_frame() {
        let mut vp = viewport(HarnessConfig::fixed());
        let mut scheduler = FrameScheduler::new();
        scheduler.request_frame();
        assert_eq!(scheduler.refresh(&mut vp).unwrap(), Flow::Stop);
        assert!(!scheduler.tick_pending());
        assert_eq!(scheduler.refresh(&mut vp).unwrap(), Flow::Stop);
        assert_eq!(vp.renderer().frames_rendered(), 1);
    }

    #[test]
    fn surface_loss_ends_the_loop() {
        let mut vp = viewport(HarnessConfig::orbit());
        let mut scheduler = FrameScheduler::new();
        scheduler.request_frame();
        scheduler.refresh(&mut vp).unwrap();

        vp.renderer_mut().lose_surface();
        scheduler.post_resize(640, 480);
        let err = scheduler.refresh(&mut vp).unwrap_err();
        assert!(err.is_surface_lost());
        assert!(!scheduler.tick_pending());
        assert_eq!(scheduler.pending_tasks(), 0);
        assert_eq!(vp.state().size, SurfaceSize::new(640, 480));
        // Nothing reschedules the failed tick.
        assert_eq!(scheduler.refresh(&mut vp).unwrap(), Flow::Stop);
    }
}
