// Echogram panel backed by the output directory and the terminal
use crate::application::acoustic_repository::EchogramContent;
use crate::application::collaborators::EchogramPresenter;
use crate::domain::query::EchogramQuery;
use crate::domain::trajectory::TrajectoryPoint;
use anyhow::Context;
use std::path::PathBuf;

pub struct FilePresenter {
    output_dir: PathBuf,
    current: Option<PathBuf>,
}

impl FilePresenter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            current: None,
        }
    }
}

pub fn echogram_file_name(query: &EchogramQuery, extension: &str) -> String {
    let mut name = format!(
        "echogram_{}_{}_{}_{}",
        query.point_index, query.channel_index, query.vmin, query.vmax
    );
    if let Some(window) = &query.window {
        for bound in [&window.start, &window.end] {
            name.push('_');
            name.extend(bound.chars().map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' }));
        }
    }
    format!("{}.{}", name, extension)
}

impl EchogramPresenter for FilePresenter {
    fn show_point(&mut self, point: &TrajectoryPoint) {
        println!(
            "Point {}: {:.4}, {:.4} at {}",
            point.index,
            point.lat,
            point.lng,
            point.time.format("%Y-%m-%d %H:%M:%S")
        );
    }

    fn show_loading(&mut self, query: &EchogramQuery) {
        println!("Loading echogram for point {}...", query.point_index);
    }

    fn show_echogram(&mut self, query: &EchogramQuery, content: &EchogramContent) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))?;
        let path = self.output_dir.join(echogram_file_name(query, content.extension()));
        std::fs::write(&path, &content.body).with_context(|| format!("Failed to write {}", path.display()))?;

        println!("Echogram ready: {}", path.display());
        self.current = Some(path);
        Ok(())
    }

    fn show_error(&mut self, message: &str) {
        println!("Error: {}", message);
    }

    fn show_message(&mut self, message: &str) {
        println!("{}", message.trim_end());
    }

    fn clear(&mut self) {
        if let Some(path) = self.current.take() {
            tracing::debug!("Echogram {} no longer on display", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::selection::SelectionState;
    use bytes::Bytes;

    fn query(window: Option<(&str, &str)>) -> EchogramQuery {
        let mut state = SelectionState::new(1, -80.0, -30.5);
        state.select_point(12);
        if let Some((start, end)) = window {
            state.set_time_range(Some(start), Some(end));
        }
        EchogramQuery::build(&state).unwrap()
    }

    #[test]
    fn test_file_name() {
        assert_eq!(echogram_file_name(&query(None), "html"), "echogram_12_1_-80_-30.5.html");
        assert_eq!(
            echogram_file_name(&query(Some(("2020-01-01T00:00", "2020-01-01T06:00"))), "png"),
            "echogram_12_1_-80_-30.5_2020-01-01T00-00_2020-01-01T06-00.png"
        );
    }

    #[test]
    fn test_show_then_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut presenter = FilePresenter::new(dir.path().join("echograms"));
        let content = EchogramContent::new(Some("text/html".into()), Bytes::from_static(b"<p>ok</p>"));

        presenter.show_echogram(&query(None), &content).unwrap();
        let path = dir.path().join("echograms").join("echogram_12_1_-80_-30.5.html");
        assert_eq!(std::fs::read(&path).unwrap(), b"<p>ok</p>");

        presenter.clear();
        assert!(presenter.current.is_none());
    }
}
