use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

mod app;
mod components;
mod config;
mod error;
mod event;
mod handler;
mod search;
mod theme;
mod tree;
mod tui;
mod ui;

use app::App;
use config::{AppConfig, GeneralConfig, SearchConfig, ThemeConfig};
use error::{AppError, Result};
use event::{Event, EventHandler};
use tui::Tui;

/// Interactive checklist tree picker for the terminal.
#[derive(Parser, Debug)]
#[command(name = "checktree", version, about)]
struct Cli {
    /// JSON file with the tree data (built-in sample when omitted)
    data: Option<PathBuf>,

    /// Path to a config file (overrides the default lookup chain)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Color scheme: dark, light, custom
    #[arg(long)]
    theme: Option<String>,

    /// Debounce quiet period for the search box, in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Disable mouse capture (also disables click-outside panel closing)
    #[arg(long)]
    no_mouse: bool,

    /// Open the selection panel on startup
    #[arg(long)]
    panel_open: bool,
}

impl Cli {
    /// Project the CLI flags into a partial config for the merge chain.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                mouse: self.no_mouse.then_some(false),
                panel_open: self.panel_open.then_some(true),
            },
            search: SearchConfig {
                debounce_ms: self.debounce_ms,
                ..Default::default()
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
                custom: None,
            },
        }
    }
}

/// Load raw tree data from a JSON file, or fall back to the built-in sample.
fn load_data(path: Option<&PathBuf>) -> Result<Vec<serde_json::Value>> {
    match path {
        Some(p) => {
            if !p.is_file() {
                return Err(AppError::InvalidPath(p.display().to_string()));
            }
            let content = std::fs::read_to_string(p)?;
            Ok(serde_json::from_str(&content)?)
        }
        None => Ok(tree::store::sample_raw()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    // Fail on bad data before touching the terminal.
    let raw = load_data(cli.data.as_ref())?;

    tui::install_panic_hook(config.mouse_enabled());
    let mut tui = Tui::new(config.mouse_enabled())?;
    let mut events = EventHandler::new(Duration::from_millis(250));

    let mut app = App::new(&config, events.sender());

    // The store publishes through the event channel; the app reacts to the
    // published tree like any other event.
    let tree_tx = events.sender();
    app.store.subscribe(move |data| {
        let _ = tree_tx.send(Event::TreeData(data.to_vec()));
    });
    app.store.initialize(&raw);

    let result = run(&mut app, &mut tui, &mut events).await;
    tui.restore()?;
    result
}

async fn run(app: &mut App, tui: &mut Tui, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        tui.terminal_mut().draw(|frame| ui::render(app, frame))?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(app, key),
            Event::Mouse(mouse) => handler::handle_mouse_event(app, mouse),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
            Event::TreeData(data) => app.on_tree_data(data),
            Event::SearchReady(value) => {
                if let Some(term) = app.debouncer.accept(value) {
                    app.apply_search(&term);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_map_to_config() {
        let cli = Cli {
            data: None,
            config: None,
            theme: Some("light".into()),
            debounce_ms: Some(200),
            no_mouse: true,
            panel_open: true,
        };
        let overrides = cli.overrides();
        assert!(!overrides.mouse_enabled());
        assert!(overrides.panel_open());
        assert_eq!(overrides.debounce_ms(), 200);
        assert_eq!(overrides.theme_scheme(), "light");
    }

    #[test]
    fn absent_flags_leave_config_untouched() {
        let cli = Cli {
            data: None,
            config: None,
            theme: None,
            debounce_ms: None,
            no_mouse: false,
            panel_open: false,
        };
        let overrides = cli.overrides();
        assert!(overrides.general.mouse.is_none());
        assert!(overrides.general.panel_open.is_none());
        assert!(overrides.search.debounce_ms.is_none());
        assert!(overrides.theme.scheme.is_none());
    }

    #[test]
    fn load_data_falls_back_to_sample() {
        let raw = load_data(None).expect("sample data");
        assert_eq!(raw.len(), 2);
    }

    #[test]
    fn load_data_rejects_missing_file() {
        let path = PathBuf::from("/nonexistent/tree.json");
        assert!(matches!(
            load_data(Some(&path)),
            Err(AppError::InvalidPath(_))
        ));
    }

    #[test]
    fn load_data_reads_json_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tree.json");
        std::fs::write(
            &path,
            r#"[{"id": "g", "name": "Group", "children": [{"id": "l", "name": "Leaf"}]}]"#,
        )
        .expect("write");
        let raw = load_data(Some(&path)).expect("load");
        assert_eq!(raw.len(), 1);
    }

    #[test]
    fn load_data_rejects_malformed_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").expect("write");
        assert!(matches!(load_data(Some(&path)), Err(AppError::Data(_))));
    }
}
