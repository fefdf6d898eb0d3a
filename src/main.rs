use ragchat::config::parse_env_defaults;
use tracing_subscriber::EnvFilter;

/// Fallback settings compiled into the binary, used where no `.env` exists
/// (packaged desktop and mobile builds, the browser).
const DEFAULT_ENV: &str = include_str!("../assets/config.env");

fn apply_env_defaults() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if dotenvy::dotenv().is_ok() {
            return;
        }
    }

    for (key, value) in parse_env_defaults(DEFAULT_ENV) {
        if std::env::var_os(&key).is_none() {
            // SAFETY: runs first thing in main, before the UI runtime starts any threads
            unsafe {
                std::env::set_var(key, value);
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ragchat=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() {
    apply_env_defaults();
    init_tracing();
    dioxus::launch(ragchat::ui::App);
}
