use clap::Parser;
use ink_keypad::common::command::SystemRunner;
use ink_keypad::common::config_files::{install_dir, resolve_config_path};
use ink_keypad::deps::check_dependencies;
use ink_keypad::dispatcher::{KeyDispatcher, RdevInjector};
use ink_keypad::gui::{panel_viewport, PanelApp};
use ink_keypad::layout::{PanelLayout, PanelVariant};
use ink_keypad::session::PanelSession;
use ink_keypad::settings::{Settings, SETTINGS_FILE};
use ink_keypad::shortcut_config::ShortcutConfig;
use ink_keypad::window_manager::WindowResolver;
use std::path::PathBuf;

/// Floating keypad that sends shortcuts to Inkscape.
#[derive(Parser, Debug)]
#[command(name = "ink_keypad", version, about)]
struct Cli {
    /// Panel layout; overrides the settings file.
    #[arg(long, value_enum)]
    variant: Option<PanelVariant>,

    /// Settings file (default: settings.json next to the executable).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();
    let base_dir = install_dir();
    let settings_path = cli
        .settings
        .clone()
        .unwrap_or_else(|| resolve_config_path(&base_dir, SETTINGS_FILE));
    let (settings, settings_error) = match Settings::load(&settings_path) {
        Ok(s) => (s, None),
        Err(e) => (Settings::default(), Some(e)),
    };

    ink_keypad::logging::init(
        cli.debug || settings.debug_logging,
        settings.log_path(&base_dir),
    );
    if let Some(e) = settings_error {
        tracing::error!(
            "failed to load settings from {}: {e}; using defaults",
            settings_path.display()
        );
    } else {
        match settings.write_if_missing(&settings_path) {
            Ok(true) => tracing::info!("created settings file at {}", settings_path.display()),
            Ok(false) => {}
            Err(e) => tracing::warn!("could not write settings file: {e}"),
        }
    }

    let missing = check_dependencies(&SystemRunner);
    if !missing.is_empty() {
        tracing::warn!("falling back to direct key injection where tools are missing");
    }

    let variant = cli.variant.unwrap_or(settings.variant);
    let layout = PanelLayout::for_variant(variant);
    let config = ShortcutConfig::new(settings.mapping_path(&base_dir));
    let session = PanelSession::new(config.load());

    let resolver =
        WindowResolver::new(settings.target_app()).with_geometry(settings.follow_target_monitor);
    let injector = RdevInjector {
        event_delay: settings.fallback_key_delay(),
    };
    let dispatcher = KeyDispatcher::new(SystemRunner, injector, resolver)
        .with_focus_delay(settings.focus_delay());

    let placement = settings
        .follow_target_monitor
        .then(|| settings.placement(layout.width));
    let mut app = PanelApp::new(layout.clone(), session, dispatcher, config)
        .with_placement(placement);
    let position = app.locate_target();

    let native_options = eframe::NativeOptions {
        viewport: panel_viewport(&layout, position),
        ..Default::default()
    };

    tracing::info!(?variant, "starting panel");
    if let Err(e) = eframe::run_native(
        &layout.title,
        native_options,
        Box::new(move |_cc| Box::new(app)),
    ) {
        tracing::error!("panel failed: {e}");
        std::process::exit(1);
    }
    std::process::exit(0);
}
