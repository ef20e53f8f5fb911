use druid::{AppLauncher, Widget, WindowDesc};
use log::error;
use mountain::Mountain;
use plotters_druid::Plot;

use crate::error::AppError;
use crate::visualizer::{self, TITLE};

/// Opens the plot window and blocks until it is closed
pub fn render_plot(mountain: Mountain) -> Result<(), AppError> {
    let main_window = WindowDesc::new(move || chart_builder(mountain))
        .title(TITLE)
        .window_size((1200.0, 800.0))
        .resizable(true);

    AppLauncher::with_window(main_window)
        .launch(())
        .map_err(|e| AppError::Window(e.to_string()))
}

fn chart_builder(mountain: Mountain) -> impl Widget<()> {
    // Redrawn on every resize
    Plot::new(move |_size, _data, root| {
        if let Err(e) = visualizer::draw_mountain(root, &mountain) {
            error!("Failed to draw the memory mountain: {e}");
        }
    })
}
