use ratatui::Frame;
use ratatui::layout::Rect;

/// A dashboard panel.
///
/// Panels receive everything they show as props (struct fields) taken from
/// a `Snapshot`, and render into a `Frame` within a given `Rect`. They never
/// see the shared state, so drawing can't mutate it.
///
/// `render` takes `&mut self` to match Ratatui's `StatefulWidget` shape,
/// though the current panels keep no state between frames.
pub trait Component {
    /// Render the component into the given area.
    fn render(&mut self, frame: &mut Frame, area: Rect);
}
