mod mock_runner;

use ink_keypad::window_manager::{TargetApp, WindowGeometry, WindowHandle, WindowResolver};
use mock_runner::MockRunner;

fn resolver() -> WindowResolver {
    WindowResolver::new(TargetApp::default())
}

#[test]
fn matching_line_wins_among_other_windows() {
    let runner = MockRunner::new();
    runner.respond(
        "wmctrl -lx",
        "\
0x02000007  0 Navigator.firefox  host inkscape tutorial - Mozilla Firefox
0x03a00003  0 inkscape.Inkscape  host drawing.svg - Inkscape
0x04400001  1 xterm.XTerm  host xterm
",
    );

    assert_eq!(
        resolver().find_target_window(&runner),
        Some(WindowHandle::from_id(0x03a00003))
    );
    assert_eq!(runner.calls(), ["wmctrl -lx"]);
}

#[test]
fn search_fallback_is_formatted_like_wmctrl() {
    let runner = MockRunner::new();
    runner.respond("wmctrl -lx", "0x04400001  1 xterm.XTerm  host xterm\n");
    runner.respond("xdotool search --class inkscape", "12345\n");

    let handle = resolver().find_target_window(&runner).unwrap();

    assert_eq!(handle.to_string(), "0x00003039");
    assert_eq!(
        runner.calls(),
        ["wmctrl -lx", "xdotool search --class inkscape"]
    );
}

#[test]
fn missing_wmctrl_goes_straight_to_search() {
    let runner = MockRunner::new();
    runner.uninstall("wmctrl");
    runner.respond("xdotool search --class inkscape", "\n4242\n99\n");

    assert_eq!(
        resolver().find_target_window(&runner),
        Some(WindowHandle::from_id(4242))
    );
}

#[test]
fn nothing_found_is_absent_not_an_error() {
    let runner = MockRunner::new();
    runner.uninstall("wmctrl").uninstall("xdotool");
    assert_eq!(resolver().find_target_window(&runner), None);

    let runner = MockRunner::new();
    assert_eq!(resolver().locate(&runner), None);
}

#[test]
fn geometry_listing_supplies_position() {
    let runner = MockRunner::new();
    runner.respond(
        "wmctrl -lxG",
        "0x03a00003  0 2000 40 1200 900 org.inkscape.Inkscape  host drawing.svg\n",
    );

    let found = resolver().with_geometry(true).locate(&runner).unwrap();

    assert_eq!(found.handle, WindowHandle::from_id(0x03a00003));
    assert_eq!(
        found.geometry,
        Some(WindowGeometry {
            x: 2000,
            y: 40,
            width: 1200,
            height: 900
        })
    );
}

#[test]
fn custom_target_classes() {
    let runner = MockRunner::new();
    runner.respond("wmctrl -lx", "0x00000010  0 gimp.Gimp  host untitled\n");
    let target = TargetApp {
        class_identities: vec!["gimp.Gimp".into()],
        search_class: "gimp".into(),
    };

    assert_eq!(
        WindowResolver::new(target).find_target_window(&runner),
        Some(WindowHandle::from_id(0x10))
    );
}
