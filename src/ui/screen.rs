use ratatui::Frame;

use crate::app::{App, AppState};
use crate::ui::{setup::SetupView, EditorView};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Session configuration form
pub struct SetupScreen;

impl Screen for SetupScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(
            SetupView {
                form: &app.setup,
                fade: app.fade,
            },
            f.area(),
        );
    }
}

/// Writing screen
pub struct EditorScreen;

impl Screen for EditorScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        // the editor is never entered without a session
        if let Some(session) = app.session.as_ref() {
            f.render_widget(EditorView { session }, f.area());
        }
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Setup => Box::new(SetupScreen),
        AppState::Editor => Box::new(EditorScreen),
    }
}
