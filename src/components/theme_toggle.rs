use yew::prelude::*;

use crate::theme::{ThemeAction, ThemeContext, ThemeMode};

/// Fixed top-right button flipping between light and dark display modes
#[function_component(ThemeToggle)]
pub fn theme_toggle() -> Html {
    let Some(theme) = use_context::<ThemeContext>() else {
        log::warn!("ThemeToggle rendered outside ThemeProvider");
        return html! {};
    };

    let onclick = {
        let theme = theme.clone();
        Callback::from(move |_: MouseEvent| theme.dispatch(ThemeAction::Toggle))
    };

    let (label, icon) = match theme.mode {
        ThemeMode::Dark => ("Switch to light mode", sun_icon()),
        ThemeMode::Light => ("Switch to dark mode", moon_icon()),
    };

    html! {
        <button
            {onclick}
            aria-label={label}
            title={label}
            class="fixed top-4 right-4 z-50 p-2 rounded-full bg-white/80 dark:bg-gray-800/80 backdrop-blur-sm shadow-lg hover:bg-white dark:hover:bg-gray-700 transition-colors"
        >
            {icon}
        </button>
    }
}

fn sun_icon() -> Html {
    html! {
        <svg class="w-5 h-5 text-yellow-500" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
            <circle cx="12" cy="12" r="4" />
            <path d="M12 2v2M12 20v2M4.93 4.93l1.41 1.41M17.66 17.66l1.41 1.41M2 12h2M20 12h2M6.34 17.66l-1.41 1.41M19.07 4.93l-1.41 1.41" />
        </svg>
    }
}

fn moon_icon() -> Html {
    html! {
        <svg class="w-5 h-5 text-gray-700" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
            <path d="M12 3a6 6 0 0 0 9 9 9 9 0 1 1-9-9Z" />
        </svg>
    }
}
