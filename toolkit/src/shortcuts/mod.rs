// Document-level keyboard shortcuts. Bindings are written like `Ctrl+S`, where
// `Ctrl` (or `Cmd`/`Meta`) matches either the Control or the Meta key.
use crate::config::ShortcutSettings;
use crate::error::ToolkitError;
use std::str::FromStr;

/// A key press as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyEvent {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyEvent {
    pub fn key(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Self::default()
        }
    }

    pub fn ctrl(key: &str) -> Self {
        Self {
            ctrl: true,
            ..Self::key(key)
        }
    }

    pub fn meta(key: &str) -> Self {
        Self {
            meta: true,
            ..Self::key(key)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    key: String,
    command: bool,
    alt: bool,
    shift: bool,
}

impl KeyChord {
    // Plain chords ignore modifier state, so Escape fires with Shift held too.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if !event.key.eq_ignore_ascii_case(&self.key) {
            return false;
        }
        if !self.command && !self.alt && !self.shift {
            return true;
        }
        self.command == (event.ctrl || event.meta) && self.alt == event.alt && self.shift == event.shift
    }
}

impl FromStr for KeyChord {
    type Err = ToolkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chord = KeyChord {
            key: String::new(),
            command: false,
            alt: false,
            shift: false,
        };
        let parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let (key, modifiers) = parts
            .split_last()
            .ok_or_else(|| ToolkitError::ShortcutError(s.to_string()))?;
        for modifier in modifiers {
            match modifier.to_ascii_lowercase().as_str() {
                "ctrl" | "control" | "cmd" | "meta" => chord.command = true,
                "alt" | "option" => chord.alt = true,
                "shift" => chord.shift = true,
                _ => return Err(ToolkitError::ShortcutError(format!("unknown modifier '{}' in '{}'", modifier, s))),
            }
        }
        if key.is_empty() {
            return Err(ToolkitError::ShortcutError(format!("missing key in '{}'", s)));
        }
        chord.key = key.to_string();
        Ok(chord)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Submit the form that owns the focused element
    SubmitForm,
    /// Hide every open modal
    CloseModals,
    QuickSearch,
}

impl ShortcutAction {
    /// Whether the host's default handling of the key should be suppressed.
    pub fn prevents_default(self) -> bool {
        !matches!(self, ShortcutAction::CloseModals)
    }
}

/// What a page has to offer for shortcuts to act on.
pub trait ShortcutTarget {
    /// Returns false when no form owns the active element.
    fn submit_active_form(&mut self) -> bool;
    /// Returns how many modals were hidden.
    fn close_open_modals(&mut self) -> usize;
    fn open_quick_search(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub action: ShortcutAction,
    pub default_prevented: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    bindings: Vec<(KeyChord, ShortcutAction)>,
}

impl Keymap {
    pub fn from_settings(settings: &ShortcutSettings) -> Result<Self, ToolkitError> {
        Ok(Self {
            bindings: vec![
                (settings.save.parse::<KeyChord>()?, ShortcutAction::SubmitForm),
                (settings.close.parse::<KeyChord>()?, ShortcutAction::CloseModals),
                (settings.quick_search.parse::<KeyChord>()?, ShortcutAction::QuickSearch),
            ],
        })
    }

    pub fn resolve(&self, event: &KeyEvent) -> Option<ShortcutAction> {
        self.bindings
            .iter()
            .find(|(chord, _)| chord.matches(event))
            .map(|(_, action)| *action)
    }

    pub fn handle<T: ShortcutTarget + ?Sized>(&self, event: &KeyEvent, target: &mut T) -> Option<Dispatch> {
        let action = self.resolve(event)?;
        match action {
            ShortcutAction::SubmitForm => {
                let submitted = target.submit_active_form();
                tracing::debug!(submitted, "Save shortcut");
            }
            ShortcutAction::CloseModals => {
                let closed = target.close_open_modals();
                tracing::debug!(closed, "Close shortcut");
            }
            ShortcutAction::QuickSearch => target.open_quick_search(),
        }
        Some(Dispatch {
            action,
            default_prevented: action.prevents_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Page {
        active_form: Option<String>,
        submitted: Vec<String>,
        open_modals: usize,
    }

    impl ShortcutTarget for Page {
        fn submit_active_form(&mut self) -> bool {
            match &self.active_form {
                Some(form) => {
                    self.submitted.push(form.clone());
                    true
                }
                None => false,
            }
        }

        fn close_open_modals(&mut self) -> usize {
            std::mem::take(&mut self.open_modals)
        }
    }

    fn keymap() -> Keymap {
        Keymap::from_settings(&ShortcutSettings::default()).unwrap()
    }

    #[test]
    fn test_ctrl_and_cmd_s_submit_active_form() {
        let keymap = keymap();
        let mut page = Page {
            active_form: Some("budget-form".to_string()),
            ..Page::default()
        };

        let dispatch = keymap.handle(&KeyEvent::ctrl("s"), &mut page).unwrap();
        assert_eq!(dispatch.action, ShortcutAction::SubmitForm);
        assert!(dispatch.default_prevented);
        keymap.handle(&KeyEvent::meta("s"), &mut page).unwrap();
        assert_eq!(page.submitted, vec!["budget-form", "budget-form"]);
    }

    #[test]
    fn test_save_without_active_form_still_prevents_default() {
        let mut page = Page::default();
        let dispatch = keymap().handle(&KeyEvent::ctrl("s"), &mut page).unwrap();
        assert!(dispatch.default_prevented);
        assert!(page.submitted.is_empty());
    }

    #[test]
    fn test_escape_closes_modals_without_preventing_default() {
        let mut page = Page {
            open_modals: 2,
            ..Page::default()
        };
        let dispatch = keymap().handle(&KeyEvent::key("Escape"), &mut page).unwrap();
        assert_eq!(dispatch.action, ShortcutAction::CloseModals);
        assert!(!dispatch.default_prevented);
        assert_eq!(page.open_modals, 0);
    }

    #[test]
    fn test_quick_search_defaults_to_noop() {
        let mut page = Page::default();
        let dispatch = keymap().handle(&KeyEvent::meta("k"), &mut page).unwrap();
        assert_eq!(dispatch.action, ShortcutAction::QuickSearch);
        assert!(dispatch.default_prevented);
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        let mut page = Page::default();
        assert!(keymap().handle(&KeyEvent::key("s"), &mut page).is_none());
        assert!(keymap().handle(&KeyEvent::ctrl("p"), &mut page).is_none());
    }

    #[test]
    fn test_chord_parsing() {
        let chord: KeyChord = "Ctrl+Shift+E".parse().unwrap();
        let mut event = KeyEvent::ctrl("e");
        assert!(!chord.matches(&event));
        event.shift = true;
        assert!(chord.matches(&event));

        assert!("Hyper+S".parse::<KeyChord>().is_err());
        assert!("Ctrl+".parse::<KeyChord>().is_err());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = ShortcutSettings {
            save: "Super+S".to_string(),
            ..ShortcutSettings::default()
        };
        assert!(matches!(Keymap::from_settings(&settings), Err(ToolkitError::ShortcutError(_))));
    }
}
