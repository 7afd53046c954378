//! Window-less rendering backend that drives the frame loop at a fixed pace.

use std::{collections::BTreeMap, time::Duration};

use anyhow::Result;
use los_gemini_rendering::{FrameInput, Presentation, RenderingBackend, Scene};
use los_gemini_system_session::KeyPress;

use crate::script::{Action, Script};

/// Runs a fixed number of frames without presenting anything on screen.
#[derive(Clone, Debug)]
pub(crate) struct HeadlessBackend {
    frames: u64,
    frame_time: Duration,
    inputs: BTreeMap<u64, FrameInput>,
}

impl HeadlessBackend {
    /// Creates a backend that replays the keyboard actions of `script`.
    pub(crate) fn new(frames: u64, frame_time: Duration, script: &Script) -> Self {
        let mut inputs: BTreeMap<u64, FrameInput> = BTreeMap::new();
        for step in script.steps() {
            if let Action::Key(key) = step.action {
                let input = inputs.entry(step.frame).or_default();
                match key {
                    KeyPress::Phone => input.phone = true,
                    KeyPress::Radio => input.radio = true,
                    KeyPress::Escape => input.escape = true,
                }
            }
        }
        Self {
            frames,
            frame_time,
            inputs,
        }
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            mut scene,
            ..
        } = presentation;
        log::info!(
            "{window_title}: headless run of {} frames ({} buildings, {} lights)",
            self.frames,
            scene.buildings.len(),
            scene.light_count()
        );

        for frame in 0..self.frames {
            let input = self.inputs.get(&frame).copied().unwrap_or_default();
            update_scene(self.frame_time, input, &mut scene);
        }

        log::debug!(
            "final scene: {} cars, {} post effects",
            scene.cars.len(),
            scene.effects.len()
        );
        Ok(())
    }
}
