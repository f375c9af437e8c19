use crate::common::command::CommandRunner;
use crate::dispatcher::{KeyDispatcher, KeyInjector};
use crate::layout::{
    darken_color, lighten_color, parse_hex_color, ButtonAction, ButtonSpec, PanelLayout, RowItem,
    BUTTON_COLOR,
};
use crate::monitor::{panel_position, query_monitors, PanelPlacement};
use crate::session::PanelSession;
use crate::shortcut_config::ShortcutConfig;
use eframe::egui;
use eframe::egui::{Color32, RichText, ViewportCommand};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum ButtonShade {
    #[default]
    Idle,
    Hovered,
    Pressed,
}

/// The floating panel: one generic renderer for every [`PanelLayout`].
pub struct PanelApp<R, I> {
    layout: PanelLayout,
    session: PanelSession,
    dispatcher: KeyDispatcher<R, I>,
    config: ShortcutConfig,
    /// `None` keeps the panel where the user put it.
    placement: Option<PanelPlacement>,
    collapsed: bool,
}

impl<R: CommandRunner, I: KeyInjector> PanelApp<R, I> {
    pub fn new(
        layout: PanelLayout,
        session: PanelSession,
        dispatcher: KeyDispatcher<R, I>,
        config: ShortcutConfig,
    ) -> Self {
        Self {
            layout,
            session,
            dispatcher,
            config,
            placement: None,
            collapsed: false,
        }
    }

    /// Follow the target window's monitor on refresh.
    pub fn with_placement(mut self, placement: Option<PanelPlacement>) -> Self {
        self.placement = placement;
        self
    }

    pub fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    pub fn session(&self) -> &PanelSession {
        &self.session
    }

    pub fn dispatcher(&self) -> &KeyDispatcher<R, I> {
        &self.dispatcher
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Shrink the panel to its title bar, or restore it.
    pub fn toggle_collapse(&mut self) -> ViewportCommand {
        self.collapsed = !self.collapsed;
        let height = if self.collapsed {
            self.layout.collapsed_height
        } else {
            self.layout.height
        };
        tracing::debug!(collapsed = self.collapsed, "panel resized");
        ViewportCommand::InnerSize(egui::vec2(self.layout.width, height))
    }

    /// Apply a button press. Returns the window commands it requires.
    pub fn handle_action(&mut self, action: &ButtonAction) -> Vec<ViewportCommand> {
        match action {
            ButtonAction::Key(id) => {
                self.dispatcher.dispatch(id, &self.session);
                Vec::new()
            }
            ButtonAction::ToggleModifier(modifier) => {
                self.session.toggle_modifier(*modifier);
                Vec::new()
            }
            ButtonAction::ToggleMode => {
                self.session.toggle_mode();
                Vec::new()
            }
            ButtonAction::ReloadConfig => {
                self.session.reload_mapping(&self.config);
                Vec::new()
            }
            ButtonAction::RefreshWindow => self
                .locate_target()
                .map(ViewportCommand::OuterPosition)
                .into_iter()
                .collect(),
            ButtonAction::Hide => vec![ViewportCommand::Minimized(true)],
            ButtonAction::Close => {
                tracing::info!("closing panel");
                vec![ViewportCommand::Close]
            }
        }
    }

    /// Look the target window up again. Returns where the panel should go
    /// when the window's monitor is known and placement is enabled.
    pub fn locate_target(&mut self) -> Option<egui::Pos2> {
        let found = self.dispatcher.refresh_window();
        let placement = self.placement?;
        let geometry = found?.geometry?;
        let monitors = query_monitors(self.dispatcher.runner());
        let (x, y) = panel_position(&monitors, Some((geometry.x, geometry.y)), placement)?;
        tracing::debug!(x, y, "moving panel next to target window");
        Some(egui::pos2(x as f32, y as f32))
    }

    fn draw(&self, ui: &mut egui::Ui) -> PanelEvents {
        let mut events = PanelEvents::default();

        let background = ui.interact(
            ui.max_rect(),
            egui::Id::new("panel_background"),
            egui::Sense::drag(),
        );
        events.start_drag |= background.drag_started();

        let title = ui.add(
            egui::Label::new(
                RichText::new(&self.layout.title)
                    .color(Color32::WHITE)
                    .strong(),
            )
            .sense(egui::Sense::click_and_drag()),
        );
        if title.double_clicked() {
            events.toggle_collapse = true;
        } else if title.drag_started() {
            events.start_drag = true;
        }
        if self.collapsed {
            return events;
        }

        ui.spacing_mut().item_spacing = egui::vec2(4.0, 4.0);
        for (row_index, row) in self.layout.rows.iter().enumerate() {
            let split = row
                .iter()
                .position(|item| matches!(item, RowItem::Stretch))
                .unwrap_or(row.len());
            let (left, right) = row.split_at(split);
            ui.horizontal(|ui| {
                for (col, item) in left.iter().enumerate() {
                    if let RowItem::Button(spec) = item {
                        let id = egui::Id::new(("panel_button", row_index, col));
                        if draw_button(ui, id, spec, &self.session) {
                            events.clicked = Some(spec.action.clone());
                        }
                    }
                }
                if right.len() > 1 {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        for (col, item) in right.iter().enumerate().skip(1).rev() {
                            if let RowItem::Button(spec) = item {
                                let id = egui::Id::new(("panel_button", row_index, split + col));
                                if draw_button(ui, id, spec, &self.session) {
                                    events.clicked = Some(spec.action.clone());
                                }
                            }
                        }
                    });
                }
            });
        }
        events
    }
}

/// Frameless, transparent, always-on-top window sized for `layout`. It stays
/// off the taskbar unless the layout can minimize itself.
pub fn panel_viewport(layout: &PanelLayout, position: Option<egui::Pos2>) -> egui::ViewportBuilder {
    let viewport = egui::ViewportBuilder::default()
        .with_title(layout.title.clone())
        .with_inner_size([layout.width, layout.height])
        .with_always_on_top()
        .with_decorations(false)
        .with_transparent(true)
        .with_taskbar(layout.can_hide());
    match position {
        Some(pos) => viewport.with_position(pos),
        None => viewport,
    }
}

/// What happened during one frame; handled once drawing is done.
#[derive(Default)]
struct PanelEvents {
    clicked: Option<ButtonAction>,
    toggle_collapse: bool,
    start_drag: bool,
}

fn draw_button(ui: &mut egui::Ui, id: egui::Id, spec: &ButtonSpec, session: &PanelSession) -> bool {
    let base = spec.color_for(session);
    let shade: ButtonShade = ui.ctx().data(|d| d.get_temp(id)).unwrap_or_default();
    let fill = match shade {
        ButtonShade::Idle => base.as_str(),
        ButtonShade::Hovered => lighten_color(&base),
        ButtonShade::Pressed => darken_color(&base),
    };
    let button = egui::Button::new(
        RichText::new(spec.caption_for(session))
            .color(Color32::WHITE)
            .strong(),
    )
    .fill(to_color32(fill))
    .rounding(5.0);
    let response = ui.add_sized(spec.size, button);

    let next = if response.is_pointer_button_down_on() {
        ButtonShade::Pressed
    } else if response.hovered() {
        ButtonShade::Hovered
    } else {
        ButtonShade::Idle
    };
    if next != shade {
        ui.ctx().data_mut(|d| d.insert_temp(id, next));
        ui.ctx().request_repaint();
    }
    response.clicked()
}

fn to_color32(color: &str) -> Color32 {
    let [r, g, b] = parse_hex_color(color)
        .or_else(|| parse_hex_color(BUTTON_COLOR))
        .unwrap_or([0x4a, 0x90, 0xe2]);
    Color32::from_rgb(r, g, b)
}

impl<R: CommandRunner, I: KeyInjector> eframe::App for PanelApp<R, I> {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0; 4]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let frame = egui::Frame::none()
            .fill(Color32::from_rgba_unmultiplied(0, 0, 0, 120))
            .rounding(10.0)
            .inner_margin(egui::Margin::same(8.0));
        let events = egui::CentralPanel::default()
            .frame(frame)
            .show(ctx, |ui| self.draw(ui))
            .inner;

        if events.start_drag {
            ctx.send_viewport_cmd(ViewportCommand::StartDrag);
        }
        if events.toggle_collapse {
            ctx.send_viewport_cmd(self.toggle_collapse());
        }
        if let Some(action) = events.clicked {
            for cmd in self.handle_action(&action) {
                ctx.send_viewport_cmd(cmd);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_colors_fall_back_to_button_blue() {
        assert_eq!(to_color32("#ff8800"), Color32::from_rgb(0xff, 0x88, 0x00));
        assert_eq!(to_color32("orange"), Color32::from_rgb(0x4a, 0x90, 0xe2));
    }
}
