// Display-side collaborators driven by the session
use crate::application::acoustic_repository::EchogramContent;
use crate::domain::query::EchogramQuery;
use crate::domain::trajectory::{Trajectory, TrajectoryPoint};

/// Draws the trajectory line and point markers and fits the viewport.
pub trait MapAdapter {
    fn draw_trajectory(&mut self, trajectory: &Trajectory) -> anyhow::Result<()>;
}

/// The echogram panel.
pub trait EchogramPresenter: Send {
    /// Coordinates and time of the newly selected point
    fn show_point(&mut self, point: &TrajectoryPoint);

    fn show_loading(&mut self, query: &EchogramQuery);

    fn show_echogram(&mut self, query: &EchogramQuery, content: &EchogramContent) -> anyhow::Result<()>;

    /// Inline, recoverable error text
    fn show_error(&mut self, message: &str);

    fn show_message(&mut self, message: &str);

    /// Drop whatever echogram is currently displayed
    fn clear(&mut self);
}
