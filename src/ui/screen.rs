use ratatui::Frame;

use crate::{
    app::{App, View},
    ui::{render_help, set_editor_cursor},
};

/// A UI Screen boundary: responsible for rendering one view of the app
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Clock, phase card, controls and notes
pub struct SessionScreen;

impl Screen for SessionScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
        set_editor_cursor(app, f);
    }
}

/// Key bindings overlay
pub struct HelpScreen;

impl Screen for HelpScreen {
    fn render(&self, _app: &App, f: &mut Frame) {
        let area = f.area();
        render_help(area, f.buffer_mut());
    }
}

/// Helper to construct the appropriate screen for the current view
pub fn current_screen(view: &View) -> Box<dyn Screen> {
    match view {
        View::Session => Box::new(SessionScreen),
        View::Help => Box::new(HelpScreen),
    }
}
