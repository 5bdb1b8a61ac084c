use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use yew::prelude::*;

use crate::chat_panel::ChatPanel;
use crate::components::{Backdrop, ThemeToggle};
use crate::config::AppConfig;
use crate::storage::SharedStore;
use crate::theme::ThemeProvider;
use crate::types::ActiveTab;
use crate::upload_panel::UploadPanel;

#[derive(Clone, Copy, PartialEq)]
struct TabState(ActiveTab);

enum TabAction {
    Select(ActiveTab),
    Toggle,
}

impl Reducible for TabState {
    type Action = TabAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let next = match action {
            TabAction::Select(tab) => tab,
            TabAction::Toggle => self.0.toggled(),
        };
        Rc::new(TabState(next))
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo((), |_| AppConfig::load());
    let store = use_memo((), |_| SharedStore::browser());
    let chat_config = use_memo((), {
        let config = config.clone();
        move |_| config.chat.clone()
    });
    let tabs = use_reducer(|| TabState(ActiveTab::Upload));

    // Keyboard shortcut for Cmd/Ctrl+K
    {
        let tabs = tabs.dispatcher();
        use_effect_with((), move |_| {
            let document = gloo_utils::document();

            let listener = EventListener::new(&document, "keydown", move |event| {
                if let Some(keyboard_event) = event.dyn_ref::<web_sys::KeyboardEvent>() {
                    if (keyboard_event.meta_key() || keyboard_event.ctrl_key())
                        && keyboard_event.key().eq_ignore_ascii_case("k")
                    {
                        keyboard_event.prevent_default();
                        tabs.dispatch(TabAction::Toggle);
                    }
                }
            });

            move || drop(listener)
        });
    }

    let store = (*store).clone();
    let active_tab = tabs.0;

    html! {
        <ThemeProvider store={store.clone()}>
            <Backdrop config={config.backdrop.clone()} />
            <ThemeToggle />
            <main class="min-h-screen px-4 py-12">
                <header class="text-center mb-10">
                    <div class="flex items-center justify-center mb-4">
                        <svg class="w-10 h-10 text-indigo-600 dark:text-indigo-400" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
                            <path d="M22 12h-4l-3 9L9 3l-3 9H2" />
                        </svg>
                    </div>
                    <h1 class="text-4xl font-bold text-gray-900 dark:text-white mb-2">{"HealthAnalyzer AI"}</h1>
                    <p class="text-gray-600 dark:text-gray-300">
                        {"Upload your health report or chat with our AI assistant for instant insights"}
                    </p>
                </header>

                <TabBar active={active_tab} on_select={
                    let tabs = tabs.dispatcher();
                    Callback::from(move |tab: ActiveTab| tabs.dispatch(TabAction::Select(tab)))
                } />

                // Both panels stay mounted so switching tabs keeps their state
                <div class={classes!((active_tab != ActiveTab::Upload).then_some("hidden"))}>
                    <UploadPanel />
                </div>
                <div class={classes!((active_tab != ActiveTab::Chat).then_some("hidden"))}>
                    <ChatPanel store={store} config={Rc::clone(&chat_config)} />
                </div>
            </main>
        </ThemeProvider>
    }
}

#[derive(Properties, PartialEq)]
struct TabBarProps {
    active: ActiveTab,
    on_select: Callback<ActiveTab>,
}

#[function_component(TabBar)]
fn tab_bar(props: &TabBarProps) -> Html {
    let button = |tab: ActiveTab, label: &'static str| {
        let on_select = props.on_select.clone();
        let selected = props.active == tab;
        html! {
            <button
                role="tab"
                aria-selected={selected.to_string()}
                onclick={Callback::from(move |_: MouseEvent| on_select.emit(tab))}
                class={classes!(
                    "flex-1", "px-4", "py-2", "rounded-md", "text-sm", "font-medium", "transition-colors",
                    if selected {
                        "bg-white dark:bg-gray-700 text-indigo-600 dark:text-white shadow"
                    } else {
                        "text-gray-600 dark:text-gray-300 hover:text-gray-900 dark:hover:text-white"
                    }
                )}
            >
                {label}
            </button>
        }
    };

    html! {
        <div role="tablist" class="flex max-w-md mx-auto mb-8 p-1 rounded-lg bg-gray-100/80 dark:bg-gray-800/80 backdrop-blur-sm">
            { button(ActiveTab::Upload, "Upload Report") }
            { button(ActiveTab::Chat, "Chat Assistant") }
        </div>
    }
}
