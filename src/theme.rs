use std::rc::Rc;
use yew::prelude::*;

use crate::error::AppResult;
use crate::storage::SharedStore;

/// Durable slot holding the last chosen display mode
pub const THEME_KEY: &str = "theme";

/// CSS class on `<html>` that switches Tailwind into dark mode
const DARK_CLASS: &str = "dark";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Interpret a stored slot value; anything unrecognized means light
    pub fn from_slot(value: Option<&str>) -> Self {
        match value {
            Some("dark") => ThemeMode::Dark,
            _ => ThemeMode::Light,
        }
    }

    /// Read the persisted mode, defaulting to light when the slot is
    /// missing or unreadable
    pub fn restore(store: &SharedStore) -> Self {
        match store.get(THEME_KEY) {
            Ok(value) => Self::from_slot(value.as_deref()),
            Err(e) => {
                log::warn!("could not read theme preference: {e}");
                ThemeMode::Light
            }
        }
    }

    pub fn persist(self, store: &SharedStore) -> AppResult<()> {
        store.set(THEME_KEY, self.as_str())
    }
}

/// Set or clear the `dark` class on the document root
pub fn apply_to_document(mode: ThemeMode) {
    let root = gloo_utils::document_element();
    if let Err(e) = root.class_list().toggle_with_force(DARK_CLASS, mode.is_dark()) {
        log::warn!("could not update root class list: {e:?}");
    }
}

/// Keeps the durable `theme` slot in step with the current mode. Starts
/// from the restored mode, so mounting writes nothing.
#[derive(Debug)]
pub struct ThemeSlot {
    store: SharedStore,
    written: ThemeMode,
}

impl ThemeSlot {
    pub fn new(store: SharedStore, restored: ThemeMode) -> Self {
        Self {
            store,
            written: restored,
        }
    }

    /// Write `mode` if it differs from what the slot holds; true if written
    pub fn sync(&mut self, mode: ThemeMode) -> bool {
        if mode == self.written {
            return false;
        }
        match mode.persist(&self.store) {
            Ok(()) => {
                self.written = mode;
                true
            }
            Err(e) => {
                log::warn!("could not save theme preference: {e}");
                false
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThemeState {
    pub mode: ThemeMode,
}

pub enum ThemeAction {
    Toggle,
}

impl Reducible for ThemeState {
    type Action = ThemeAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            ThemeAction::Toggle => Rc::new(Self {
                mode: self.mode.toggled(),
            }),
        }
    }
}

/// Shared display-mode state handed to every component that draws
pub type ThemeContext = UseReducerHandle<ThemeState>;

#[derive(Properties, PartialEq)]
pub struct ThemeProviderProps {
    pub store: SharedStore,
    #[prop_or_default]
    pub children: Html,
}

#[function_component(ThemeProvider)]
pub fn theme_provider(props: &ThemeProviderProps) -> Html {
    let theme = {
        let store = props.store.clone();
        use_reducer(move || ThemeState {
            mode: ThemeMode::restore(&store),
        })
    };

    let slot = {
        let store = props.store.clone();
        let restored = theme.mode;
        use_mut_ref(move || ThemeSlot::new(store, restored))
    };

    use_effect_with(theme.mode, move |mode| {
        apply_to_document(*mode);
        slot.borrow_mut().sync(*mode);
        || ()
    });

    html! {
        <ContextProvider<ThemeContext> context={theme}>
            {props.children.clone()}
        </ContextProvider<ThemeContext>>
    }
}

/// Current display mode, light when rendered outside a provider
#[hook]
pub fn use_theme_mode() -> ThemeMode {
    use_context::<ThemeContext>()
        .map(|theme| theme.mode)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_from_slot() {
        assert_eq!(ThemeMode::from_slot(Some("dark")), ThemeMode::Dark);
        assert_eq!(ThemeMode::from_slot(Some("light")), ThemeMode::Light);
        assert_eq!(ThemeMode::from_slot(Some("DARK")), ThemeMode::Light);
        assert_eq!(ThemeMode::from_slot(None), ThemeMode::Light);
    }

    #[test]
    fn test_persist_and_restore() {
        let store = SharedStore::new(MemoryStore::new());
        assert_eq!(ThemeMode::restore(&store), ThemeMode::Light);

        ThemeMode::Dark.persist(&store).unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(ThemeMode::restore(&store), ThemeMode::Dark);
    }

    #[test]
    fn test_slot_untouched_on_mount() {
        let memory = Rc::new(MemoryStore::with_slot(THEME_KEY, "dark"));
        let store = SharedStore::from_rc(memory.clone());
        let restored = ThemeMode::restore(&store);

        let mut slot = ThemeSlot::new(store, restored);
        assert!(!slot.sync(restored));
        assert_eq!(memory.writes(), 0);
    }

    #[test]
    fn test_slot_mirrors_rapid_toggles() {
        let memory = Rc::new(MemoryStore::new());
        let store = SharedStore::from_rc(memory.clone());
        let state = Rc::new(ThemeState {
            mode: ThemeMode::restore(&store),
        });
        let mut slot = ThemeSlot::new(store.clone(), state.mode);

        // two toggles land before a single render
        let state = state.reduce(ThemeAction::Toggle).reduce(ThemeAction::Toggle);
        slot.sync(state.mode);
        assert_eq!(ThemeMode::restore(&store), state.mode);
        assert_eq!(memory.writes(), 0);

        let state = state.reduce(ThemeAction::Toggle);
        assert!(slot.sync(state.mode));
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(ThemeMode::restore(&store), state.mode);
    }

    #[test]
    fn test_toggle_reducer() {
        let state = Rc::new(ThemeState::default());
        let state = state.reduce(ThemeAction::Toggle);
        assert_eq!(state.mode, ThemeMode::Dark);
        let state = state.reduce(ThemeAction::Toggle);
        assert_eq!(state.mode, ThemeMode::Light);
    }
}
