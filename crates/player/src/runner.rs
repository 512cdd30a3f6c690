use crate::application::services::SheetService;
use crate::state::Platform;

/// Configuration types for the player runner.
pub mod config {
    use std::path::PathBuf;

    /// Environment variable overriding the desktop storage file
    pub const STORAGE_PATH_ENV: &str = "CHARSHEET_STORAGE_PATH";

    /// Log filter used when `RUST_LOG` is unset
    pub const DEFAULT_LOG_FILTER: &str = "charsheet_player=debug,dioxus=info";

    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct RunnerConfig {
        /// Desktop storage file; `None` uses the platform config directory
        pub storage_path: Option<PathBuf>,
    }

    impl RunnerConfig {
        /// Read configuration from the process environment
        pub fn from_env() -> Self {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        /// Read configuration through `lookup`, which maps variable names to values
        pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
            let storage_path = lookup(STORAGE_PATH_ENV)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map(PathBuf::from);
            Self { storage_path }
        }
    }
}

pub struct RunnerDeps {
    pub platform: Platform,
}

pub fn run(deps: RunnerDeps) {
    let RunnerDeps { platform } = deps;

    #[allow(unused_mut)]
    let mut builder = dioxus::LaunchBuilder::new();

    #[cfg(not(target_arch = "wasm32"))]
    {
        let css = load_sheet_css();
        let head = format!("<style>{}</style>", css);
        let cfg = dioxus_desktop::Config::new()
            .with_custom_head(head)
            .with_window(dioxus_desktop::WindowBuilder::new().with_title("アバターステータス管理"));
        builder = builder.with_cfg(cfg);
    }

    builder
        .with_context(crate::ui::presentation::Services::new(SheetService::new(
            platform,
        )))
        .launch(crate::ui::app);
}

#[cfg(not(target_arch = "wasm32"))]
fn load_sheet_css() -> String {
    const FALLBACK_CSS: &str = "";

    let css_path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("assets")
        .join("css")
        .join("sheet.css");
    std::fs::read_to_string(css_path).unwrap_or_else(|_| FALLBACK_CSS.to_string())
}
