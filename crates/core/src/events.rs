//! Listener registration and event dispatch.
//!
//! Stands in for DOM event listeners. The controller registers [`Listener`]s
//! when it initializes a puzzle; the front end turns user input into
//! [`UiEvent`]s and hands them to [`Dispatcher::dispatch`], which returns the
//! matching [`Action`]s for the controller to apply.
//!
//! # Ordering
//!
//! Listeners on the event's own target fire first, in registration order.
//! Key presses then bubble to the document, whose listeners fire in
//! registration order too. Registering the same listener twice makes it
//! fire twice.

/// Something on the page that can receive events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Chip { puzzle: String, index: usize },
    RevealAll { puzzle: String },
    GuessInput { puzzle: String },
    CheckButton { puzzle: String },
    HintButton { puzzle: String },
    Document,
}

/// A key as the front end reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Space,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    /// The value of a text field changed
    Input,
    KeyDown(Key),
}

/// One user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiEvent {
    pub target: Target,
    pub kind: EventKind,
}

impl UiEvent {
    pub fn click(target: Target) -> Self {
        Self {
            target,
            kind: EventKind::Click,
        }
    }

    pub fn input(target: Target) -> Self {
        Self {
            target,
            kind: EventKind::Input,
        }
    }

    pub fn key(target: Target, key: Key) -> Self {
        Self {
            target,
            kind: EventKind::KeyDown(key),
        }
    }
}

/// Which events a listener reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Click,
    Input,
    /// Space or Enter
    Activate,
    Enter,
    /// A letter key, either case
    Letter(char),
}

impl Trigger {
    pub fn matches(self, kind: EventKind) -> bool {
        match (self, kind) {
            (Trigger::Click, EventKind::Click) => true,
            (Trigger::Input, EventKind::Input) => true,
            (Trigger::Activate, EventKind::KeyDown(Key::Space | Key::Enter)) => true,
            (Trigger::Enter, EventKind::KeyDown(Key::Enter)) => true,
            (Trigger::Letter(want), EventKind::KeyDown(Key::Char(got))) => {
                want.eq_ignore_ascii_case(&got)
            }
            _ => false,
        }
    }
}

/// What the controller should do in response to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ToggleChip { puzzle: String, index: usize },
    RevealAll { puzzle: String },
    CheckGuess { puzzle: String, expected: String },
    ClearFeedback { puzzle: String },
    ShowHint { puzzle: String },
    ToggleTheme,
}

/// A registered reaction to events on one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listener {
    pub target: Target,
    pub trigger: Trigger,
    pub action: Action,
    /// Ignore the event while a text field has focus
    pub skip_while_typing: bool,
}

impl Listener {
    pub fn new(target: Target, trigger: Trigger, action: Action) -> Self {
        Self {
            target,
            trigger,
            action,
            skip_while_typing: false,
        }
    }

    /// Document shortcut that must not fire while the user types.
    pub fn shortcut(letter: char, action: Action) -> Self {
        Self {
            target: Target::Document,
            trigger: Trigger::Letter(letter),
            action,
            skip_while_typing: true,
        }
    }

    fn accepts(&self, target: &Target, kind: EventKind, typing: bool) -> bool {
        self.target == *target
            && self.trigger.matches(kind)
            && !(typing && self.skip_while_typing)
    }
}

/// Registry of listeners for one page.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    listeners: Vec<Listener>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listen(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Actions for `event`, target listeners first, then document listeners
    /// for bubbled key presses.
    ///
    /// `typing` is true while a text field has focus.
    pub fn dispatch(&self, event: &UiEvent, typing: bool) -> Vec<Action> {
        let mut actions: Vec<Action> = self
            .listeners
            .iter()
            .filter(|l| l.accepts(&event.target, event.kind, typing))
            .map(|l| l.action.clone())
            .collect();

        let bubbles = matches!(event.kind, EventKind::KeyDown(_)) && event.target != Target::Document;
        if bubbles {
            actions.extend(
                self.listeners
                    .iter()
                    .filter(|l| l.accepts(&Target::Document, event.kind, typing))
                    .map(|l| l.action.clone()),
            );
        }

        actions
    }
}
