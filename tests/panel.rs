mod mock_runner;

use eframe::egui::{self, ViewportCommand};
use ink_keypad::dispatcher::KeyDispatcher;
use ink_keypad::gui::{panel_viewport, PanelApp};
use ink_keypad::keys::Modifier;
use ink_keypad::layout::{ButtonAction, PanelLayout, PanelVariant};
use ink_keypad::monitor::PanelPlacement;
use ink_keypad::session::{DisplayMode, PanelSession};
use ink_keypad::shortcut_config::{default_mapping, KeyMappingEntry, ShortcutConfig, MAPPING_FILE};
use ink_keypad::window_manager::{TargetApp, WindowResolver};
use mock_runner::{MockRunner, RecordingInjector};
use std::time::Duration;
use tempfile::tempdir;

const MONITORS: &str = "\
Monitors: 2
 0: +*DP-1 1920/527x1080/296+0+0  DP-1
 1: +HDMI-1 2560/597x1440/336+1920+0  HDMI-1
";

fn app(
    variant: PanelVariant,
    runner: &MockRunner,
    config: ShortcutConfig,
) -> PanelApp<MockRunner, RecordingInjector> {
    let dispatcher = KeyDispatcher::new(
        runner.clone(),
        RecordingInjector::new(),
        WindowResolver::new(TargetApp::default()).with_geometry(true),
    )
    .with_focus_delay(Duration::ZERO);
    PanelApp::new(
        PanelLayout::for_variant(variant),
        PanelSession::new(config.load()),
        dispatcher,
        config,
    )
}

#[test]
fn numpad_mode_button_switches_what_digits_send() {
    let dir = tempdir().unwrap();
    let config = ShortcutConfig::new(dir.path().join(MAPPING_FILE));
    let mut mapping = default_mapping();
    mapping.insert("7".into(), KeyMappingEntry::new("Undo", "ctrl+z", "#888888"));
    config.save(&mapping).unwrap();

    let runner = MockRunner::new();
    let mut panel = app(PanelVariant::Numpad, &runner, config);

    assert!(panel.handle_action(&ButtonAction::ToggleMode).is_empty());
    assert_eq!(panel.session().mode, DisplayMode::Mapped);
    panel.handle_action(&ButtonAction::Key("7".into()));

    assert_eq!(runner.calls().last().unwrap(), "xdotool key control+z");
}

#[test]
fn modifier_buttons_latch() {
    let dir = tempdir().unwrap();
    let runner = MockRunner::new();
    let mut panel = app(
        PanelVariant::Keypad,
        &runner,
        ShortcutConfig::new(dir.path().join(MAPPING_FILE)),
    );

    panel.handle_action(&ButtonAction::ToggleModifier(Modifier::Shift));
    panel.handle_action(&ButtonAction::Key("Tab".into()));

    assert!(panel.session().modifiers.is_latched(Modifier::Shift));
    assert_eq!(runner.calls().last().unwrap(), "xdotool key shift+Tab");
}

#[test]
fn refresh_moves_panel_to_target_monitor() {
    let dir = tempdir().unwrap();
    let runner = MockRunner::new();
    runner.respond(
        "wmctrl -lxG",
        "0x03a00003  0 2000 40 1200 900 org.inkscape.Inkscape  host drawing.svg\n",
    );
    runner.respond("xrandr --listmonitors", MONITORS);
    let mut panel = app(
        PanelVariant::Keypad,
        &runner,
        ShortcutConfig::new(dir.path().join(MAPPING_FILE)),
    )
    .with_placement(Some(PanelPlacement {
        panel_width: 320,
        edge_margin: 50,
        top_offset: 50,
    }));

    let cmds = panel.handle_action(&ButtonAction::RefreshWindow);

    assert_eq!(cmds.len(), 1);
    match &cmds[0] {
        ViewportCommand::OuterPosition(pos) => {
            assert_eq!(*pos, egui::pos2(1920.0 + 2560.0 - 320.0 - 50.0, 50.0))
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn refresh_without_placement_only_relocates_window() {
    let dir = tempdir().unwrap();
    let runner = MockRunner::new();
    runner.respond(
        "wmctrl -lxG",
        "0x03a00003  0 2000 40 1200 900 org.inkscape.Inkscape  host drawing.svg\n",
    );
    let mut panel = app(
        PanelVariant::Basic,
        &runner,
        ShortcutConfig::new(dir.path().join(MAPPING_FILE)),
    );

    assert!(panel.handle_action(&ButtonAction::RefreshWindow).is_empty());
    assert!(panel.dispatcher().window().is_some());
    assert!(!runner.calls().iter().any(|c| c.starts_with("xrandr")));
}

#[test]
fn window_buttons_map_to_viewport_commands() {
    let dir = tempdir().unwrap();
    let runner = MockRunner::new();
    let mut panel = app(
        PanelVariant::Basic,
        &runner,
        ShortcutConfig::new(dir.path().join(MAPPING_FILE)),
    );

    assert!(matches!(
        panel.handle_action(&ButtonAction::Hide).as_slice(),
        [ViewportCommand::Minimized(true)]
    ));
    assert!(matches!(
        panel.handle_action(&ButtonAction::Close).as_slice(),
        [ViewportCommand::Close]
    ));
}

#[test]
fn title_double_click_collapses_to_title_bar() {
    let dir = tempdir().unwrap();
    let runner = MockRunner::new();
    let mut panel = app(
        PanelVariant::Keypad,
        &runner,
        ShortcutConfig::new(dir.path().join(MAPPING_FILE)),
    );
    let width = panel.layout().width;

    match panel.toggle_collapse() {
        ViewportCommand::InnerSize(size) => assert_eq!(size, egui::vec2(width, 40.0)),
        other => panic!("unexpected command {other:?}"),
    }
    assert!(panel.is_collapsed());
    match panel.toggle_collapse() {
        ViewportCommand::InnerSize(size) => assert_eq!(size, egui::vec2(width, 290.0)),
        other => panic!("unexpected command {other:?}"),
    }
    assert!(!panel.is_collapsed());
}

#[test]
fn reload_button_rereads_mapping() {
    let dir = tempdir().unwrap();
    let config = ShortcutConfig::new(dir.path().join(MAPPING_FILE));
    let runner = MockRunner::new();
    let mut panel = app(PanelVariant::Numpad, &runner, config.clone());
    panel.handle_action(&ButtonAction::ToggleMode);

    let mut mapping = default_mapping();
    mapping.insert("0".into(), KeyMappingEntry::new("Zoom", "5", "#888888"));
    config.save(&mapping).unwrap();
    panel.handle_action(&ButtonAction::ReloadConfig);

    assert_eq!(panel.session().button_label("0"), "Zoom");
    assert_eq!(panel.session().mode, DisplayMode::Mapped);
}

#[test]
fn hideable_panels_keep_a_taskbar_entry() {
    let basic = PanelLayout::for_variant(PanelVariant::Basic);
    assert!(basic.can_hide());
    assert_eq!(panel_viewport(&basic, None).taskbar, Some(true));

    for variant in [PanelVariant::Keypad, PanelVariant::Numpad] {
        let layout = PanelLayout::for_variant(variant);
        assert!(!layout.can_hide(), "{variant:?}");
        let viewport = panel_viewport(&layout, Some(egui::pos2(10.0, 20.0)));
        assert_eq!(viewport.taskbar, Some(false));
        assert_eq!(viewport.position, Some(egui::pos2(10.0, 20.0)));
        assert_eq!(viewport.decorations, Some(false));
    }
}
