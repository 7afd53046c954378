//! Scripted player input for headless runs.
//!
//! A script is a comma separated list of `<frame>:<action>` entries, e.g.
//! `240:start,300:phone,320:mission,400:density=0.3`.

use los_gemini_core::GraphicsSettings;
use los_gemini_system_session::{KeyPress, SessionEvent};
use thiserror::Error;

/// Script played when none is given on the command line.
pub(crate) const DEFAULT_SCRIPT: &str =
    "240:start,300:phone,320:mission,400:radio,460:radio,520:radio,560:radio,580:talk";

const ENTRY_DELIMITER: char = ',';
const FRAME_DELIMITER: char = ':';
const VALUE_DELIMITER: char = '=';

/// Adjustment made on the settings screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum GraphicsChange {
    /// Toggles bloom.
    Bloom(bool),
    /// Toggles reflective ground.
    Reflections(bool),
    /// Sets the traffic density.
    TrafficDensity(f64),
    /// Sets the vignette darkness.
    Vignette(f64),
}

impl GraphicsChange {
    /// Applies the change on top of `settings`.
    pub(crate) fn apply(self, settings: GraphicsSettings) -> GraphicsSettings {
        match self {
            Self::Bloom(bloom) => GraphicsSettings { bloom, ..settings },
            Self::Reflections(reflections) => GraphicsSettings {
                reflections,
                ..settings
            },
            Self::TrafficDensity(traffic_density) => GraphicsSettings {
                traffic_density,
                ..settings
            },
            Self::Vignette(vignette) => GraphicsSettings { vignette, ..settings },
        }
    }
}

/// Single scripted action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Action {
    /// Keyboard shortcut delivered through the frame input.
    Key(KeyPress),
    /// Menu choice to start playing.
    Start,
    /// Menu choice to open the settings screen.
    Settings,
    /// Settings choice to return to the menu.
    Back,
    /// HUD phone button.
    TogglePhone,
    /// HUD radio button.
    CycleRadio,
    /// Radio power switch.
    RadioPower(bool),
    /// Phone "get work" button.
    RequestMission,
    /// Settings screen adjustment.
    Graphics(GraphicsChange),
    /// Phone "talk" button.
    Talk,
}

impl Action {
    fn parse(text: &str) -> Result<Self, ScriptError> {
        if let Some((name, value)) = text.split_once(VALUE_DELIMITER) {
            let parsed: f64 = value.trim().parse().map_err(|_| ScriptError::InvalidValue {
                action: name.to_owned(),
                value: value.to_owned(),
            })?;
            return match name.trim() {
                "density" => Ok(Self::Graphics(GraphicsChange::TrafficDensity(parsed))),
                "vignette" => Ok(Self::Graphics(GraphicsChange::Vignette(parsed))),
                other => Err(ScriptError::UnknownAction(other.to_owned())),
            };
        }

        let action = match text.trim() {
            "p" | "phone" => Self::Key(KeyPress::Phone),
            "r" | "radio" => Self::Key(KeyPress::Radio),
            "esc" | "escape" => Self::Key(KeyPress::Escape),
            "start" => Self::Start,
            "settings" => Self::Settings,
            "back" => Self::Back,
            "toggle-phone" => Self::TogglePhone,
            "cycle-radio" => Self::CycleRadio,
            "radio-on" => Self::RadioPower(true),
            "radio-off" => Self::RadioPower(false),
            "mission" => Self::RequestMission,
            "bloom-on" => Self::Graphics(GraphicsChange::Bloom(true)),
            "bloom-off" => Self::Graphics(GraphicsChange::Bloom(false)),
            "reflections-on" => Self::Graphics(GraphicsChange::Reflections(true)),
            "reflections-off" => Self::Graphics(GraphicsChange::Reflections(false)),
            "talk" => Self::Talk,
            other => return Err(ScriptError::UnknownAction(other.to_owned())),
        };
        Ok(action)
    }

    /// Session event produced by a non-keyboard action.
    ///
    /// Keyboard actions return `None`; they travel through the frame input.
    pub(crate) fn session_event(self, graphics: GraphicsSettings) -> Option<SessionEvent> {
        match self {
            Self::Start => Some(SessionEvent::StartGame),
            Self::Settings => Some(SessionEvent::OpenSettings),
            Self::Back => Some(SessionEvent::BackToMenu),
            Self::TogglePhone => Some(SessionEvent::TogglePhone),
            Self::CycleRadio => Some(SessionEvent::CycleRadio),
            Self::RadioPower(on) => Some(SessionEvent::SetRadioPower(on)),
            Self::RequestMission => Some(SessionEvent::RequestMission),
            Self::Talk => Some(SessionEvent::TalkToNpc),
            Self::Graphics(change) => Some(SessionEvent::UpdateGraphics(change.apply(graphics))),
            Self::Key(_) => None,
        }
    }
}

/// Scripted action bound to a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Step {
    /// Zero-based frame index the action fires on.
    pub(crate) frame: u64,
    /// Action to perform.
    pub(crate) action: Action,
}

/// Ordered list of scripted actions.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Script {
    steps: Vec<Step>,
}

impl Script {
    /// Parses a script; entries are ordered by frame, ties keep input order.
    pub(crate) fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut steps = Vec::new();
        for entry in text.split(ENTRY_DELIMITER) {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let (frame, action) = entry
                .split_once(FRAME_DELIMITER)
                .ok_or_else(|| ScriptError::MissingFrame(entry.to_owned()))?;
            let frame = frame
                .trim()
                .parse::<u64>()
                .map_err(|_| ScriptError::InvalidFrame(frame.to_owned()))?;
            steps.push(Step {
                frame,
                action: Action::parse(action)?,
            });
        }
        steps.sort_by_key(|step| step.frame);
        Ok(Self { steps })
    }

    /// Actions scheduled for `frame`.
    pub(crate) fn actions_at(&self, frame: u64) -> impl Iterator<Item = Action> + '_ {
        let start = self.steps.partition_point(|step| step.frame < frame);
        self.steps[start..]
            .iter()
            .take_while(move |step| step.frame == frame)
            .map(|step| step.action)
    }

    /// Appends the session events scheduled for `frame` to `out`.
    ///
    /// Settings changes on the same frame stack, each one starting from the
    /// settings left by the previous one.
    pub(crate) fn session_events_at(
        &self,
        frame: u64,
        mut graphics: GraphicsSettings,
        out: &mut Vec<SessionEvent>,
    ) {
        for action in self.actions_at(frame) {
            let Some(event) = action.session_event(graphics) else {
                continue;
            };
            if let SessionEvent::UpdateGraphics(settings) = &event {
                graphics = *settings;
            }
            out.push(event);
        }
    }

    /// Every scheduled step in firing order.
    pub(crate) fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// Errors raised while parsing a script.
#[derive(Debug, Error, PartialEq)]
pub(crate) enum ScriptError {
    /// An entry had no `<frame>:` prefix.
    #[error("script entry '{0}' is missing its frame prefix")]
    MissingFrame(String),
    /// The frame prefix was not a non-negative integer.
    #[error("could not parse frame '{0}'")]
    InvalidFrame(String),
    /// The action name is not recognised.
    #[error("unknown script action '{0}'")]
    UnknownAction(String),
    /// A valued action carried an unparsable value.
    #[error("invalid value '{value}' for action '{action}'")]
    InvalidValue {
        /// Action name.
        action: String,
        /// Offending value.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_script_parses() {
        let script = Script::parse(DEFAULT_SCRIPT).expect("default script parses");
        assert_eq!(script.steps().len(), 8);
        assert_eq!(script.steps()[0].action, Action::Start);
    }

    #[test]
    fn steps_are_ordered_by_frame() {
        let script = Script::parse("30:radio, 10:start ,10:phone,,20:density=0.5").expect("parses");
        let frames: Vec<u64> = script.steps().iter().map(|step| step.frame).collect();
        assert_eq!(frames, vec![10, 10, 20, 30]);

        let at_ten: Vec<Action> = script.actions_at(10).collect();
        assert_eq!(at_ten, vec![Action::Start, Action::Key(KeyPress::Phone)]);
        assert_eq!(script.actions_at(11).count(), 0);
        assert_eq!(
            script.actions_at(20).collect::<Vec<_>>(),
            vec![Action::Graphics(GraphicsChange::TrafficDensity(0.5))]
        );
    }

    #[test]
    fn malformed_entries_are_reported() {
        assert_eq!(
            Script::parse("start"),
            Err(ScriptError::MissingFrame("start".to_owned()))
        );
        assert_eq!(
            Script::parse("-3:start"),
            Err(ScriptError::InvalidFrame("-3".to_owned()))
        );
        assert_eq!(
            Script::parse("1:dance"),
            Err(ScriptError::UnknownAction("dance".to_owned()))
        );
        assert_eq!(
            Script::parse("1:density=lots"),
            Err(ScriptError::InvalidValue {
                action: "density".to_owned(),
                value: "lots".to_owned(),
            })
        );
    }

    #[test]
    fn graphics_changes_build_on_current_settings() {
        let current = GraphicsSettings {
            bloom: false,
            ..GraphicsSettings::default()
        };
        let event = Action::Graphics(GraphicsChange::Vignette(1.5)).session_event(current);
        assert_eq!(
            event,
            Some(SessionEvent::UpdateGraphics(GraphicsSettings {
                bloom: false,
                vignette: 1.5,
                ..GraphicsSettings::default()
            }))
        );
        assert_eq!(Action::Key(KeyPress::Radio).session_event(current), None);
        assert_eq!(
            Action::Talk.session_event(current),
            Some(SessionEvent::TalkToNpc)
        );
    }

    #[test]
    fn settings_changes_on_one_frame_accumulate() {
        let script = Script::parse("0:density=0.3,0:phone,0:bloom-off,1:vignette=0.2")
            .expect("parses");
        let mut events = Vec::new();
        script.session_events_at(0, GraphicsSettings::default(), &mut events);

        assert_eq!(
            events,
            vec![
                SessionEvent::UpdateGraphics(GraphicsSettings {
                    traffic_density: 0.3,
                    ..GraphicsSettings::default()
                }),
                SessionEvent::UpdateGraphics(GraphicsSettings {
                    traffic_density: 0.3,
                    bloom: false,
                    ..GraphicsSettings::default()
                }),
            ]
        );
    }
}
