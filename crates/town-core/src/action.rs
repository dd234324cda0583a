use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ValidTargets;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InteractVerb {
    Use,
    Open,
    Close,
    Take,
    Drop,
}

impl InteractVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            InteractVerb::Use => "USE",
            InteractVerb::Open => "OPEN",
            InteractVerb::Close => "CLOSE",
            InteractVerb::Take => "TAKE",
            InteractVerb::Drop => "DROP",
        }
    }

    /// Lowercase verb for memory descriptions ("uses", "opens", ...).
    pub fn present_tense(self) -> &'static str {
        match self {
            InteractVerb::Use => "uses",
            InteractVerb::Open => "opens",
            InteractVerb::Close => "closes",
            InteractVerb::Take => "takes",
            InteractVerb::Drop => "drops",
        }
    }
}

/// One structured decision for one agent for one tick.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    Idle,
    Move {
        to: String,
    },
    Interact {
        object_id: String,
        verb: InteractVerb,
    },
    Say {
        to_agent_id: String,
        utterance: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
enum ActionKind {
    Idle,
    Move,
    Interact,
    Say,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct MoveArgs {
    to_location_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct InteractArgs {
    object_id: String,
    verb: InteractVerb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SayArgs {
    to_agent_id: String,
    utterance: String,
}

/// Wire shape: `{"kind": "...", "move": {...}, "interact": {...}, "say": {...}}`
/// with exactly the argument block matching `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireAction {
    kind: ActionKind,
    #[serde(rename = "move", default, skip_serializing_if = "Option::is_none")]
    move_args: Option<MoveArgs>,
    #[serde(rename = "interact", default, skip_serializing_if = "Option::is_none")]
    interact_args: Option<InteractArgs>,
    #[serde(rename = "say", default, skip_serializing_if = "Option::is_none")]
    say_args: Option<SayArgs>,
}

impl Action {
    pub fn is_idle(&self) -> bool {
        matches!(self, Action::Idle)
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            Action::Idle => "IDLE",
            Action::Move { .. } => "MOVE",
            Action::Interact { .. } => "INTERACT",
            Action::Say { .. } => "SAY",
        }
    }

    /// Validate a decoded JSON value against the action schema.
    pub fn from_json(value: &Value) -> Option<Action> {
        let wire: WireAction = serde_json::from_value(value.clone()).ok()?;
        match (wire.kind, wire.move_args, wire.interact_args, wire.say_args) {
            (ActionKind::Idle, None, None, None) => Some(Action::Idle),
            (ActionKind::Move, Some(m), None, None) => Some(Action::Move {
                to: m.to_location_id,
            }),
            (ActionKind::Interact, None, Some(i), None) => Some(Action::Interact {
                object_id: i.object_id,
                verb: i.verb,
            }),
            (ActionKind::Say, None, None, Some(s)) => Some(Action::Say {
                to_agent_id: s.to_agent_id,
                utterance: s.utterance,
            }),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        let wire = match self {
            Action::Idle => WireAction {
                kind: ActionKind::Idle,
                move_args: None,
                interact_args: None,
                say_args: None,
            },
            Action::Move { to } => WireAction {
                kind: ActionKind::Move,
                move_args: Some(MoveArgs {
                    to_location_id: to.clone(),
                }),
                interact_args: None,
                say_args: None,
            },
            Action::Interact { object_id, verb } => WireAction {
                kind: ActionKind::Interact,
                move_args: None,
                interact_args: Some(InteractArgs {
                    object_id: object_id.clone(),
                    verb: *verb,
                }),
                say_args: None,
            },
            Action::Say {
                to_agent_id,
                utterance,
            } => WireAction {
                kind: ActionKind::Say,
                move_args: None,
                interact_args: None,
                say_args: Some(SayArgs {
                    to_agent_id: to_agent_id.clone(),
                    utterance: utterance.clone(),
                }),
            },
        };
        serde_json::to_value(wire).unwrap_or(Value::Null)
    }

    /// Any reference outside `targets` turns the action into `Idle`.
    pub fn coerce(self, targets: &ValidTargets) -> Action {
        let in_scope = match &self {
            Action::Idle => true,
            Action::Move { to } => targets.locations.contains(to),
            Action::Interact { object_id, .. } => targets.objects.contains(object_id),
            Action::Say { to_agent_id, .. } => targets.agents.contains(to_agent_id),
        };
        if in_scope {
            self
        } else {
            Action::Idle
        }
    }
}
