use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, scrollable, text, Column, Container,
    },
    Alignment, Color, Element, Event, Length, Point, Rectangle, Renderer, Size, Subscription,
    Task, Theme,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use wisenscore::config::{SensorId, WiSensConfig};
use wisenscore::math::{grid_from_rows, GridStats};
use wisenscore::prelude::GridDims;
use wisenscore::store::{ConnectionStatus, DashboardSnapshot, InteractionOverlay, Mode};

fn main() -> iced::Result {
    iced::application(Dashboard::boot, Dashboard::update, Dashboard::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Dashboard) -> String {
    "WiSens Dashboard".into()
}

fn application_subscription(_: &Dashboard) -> Subscription<Message> {
    time::every(Duration::from_millis(250)).map(|_| Message::Tick)
}

fn application_theme(_: &Dashboard) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct Dashboard {
    config: Option<WiSensConfig>,
    payload: Option<BridgePayload>,
    overlay: InteractionOverlay,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    SnapshotFetched(Result<BridgePayload, String>),
    ConfigFetched(Result<WiSensConfig, String>),
    ToggleSelect,
    ToggleErase,
    CellPressed(SensorId, usize, usize),
}

impl Dashboard {
    fn boot() -> (Self, Task<Message>) {
        (
            Dashboard {
                config: None,
                payload: None,
                overlay: InteractionOverlay::new(),
                status: "Waiting for telemetry...".into(),
                history: Vec::new(),
            },
            Task::batch(vec![
                Task::perform(fetch_config(), Message::ConfigFetched),
                Task::perform(fetch_snapshot(), Message::SnapshotFetched),
            ]),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                let mut tasks = vec![Task::perform(fetch_snapshot(), Message::SnapshotFetched)];
                if state.config.is_none() {
                    tasks.push(Task::perform(fetch_config(), Message::ConfigFetched));
                }
                Task::batch(tasks)
            }
            Message::SnapshotFetched(Ok(payload)) => {
                state.status = format!(
                    "{} | {} frames applied, {} dropped",
                    match payload.snapshot.connection {
                        ConnectionStatus::Connected => "connected",
                        ConnectionStatus::Disconnected => "disconnected",
                    },
                    payload.frames_applied,
                    payload.frames_dropped
                );
                state.payload = Some(payload);
                Task::none()
            }
            Message::SnapshotFetched(Err(err)) => {
                state.status = format!("Telemetry error: {err}");
                Task::none()
            }
            Message::ConfigFetched(Ok(config)) => {
                state.push_history(format!("config loaded: {} sensors", config.sensors.len()));
                state.config = Some(config);
                Task::none()
            }
            Message::ConfigFetched(Err(err)) => {
                state.status = format!("Config error: {err}");
                Task::none()
            }
            Message::ToggleSelect => {
                state.overlay.toggle_select();
                state.push_history(format!("mode -> {:?}", state.overlay.mode()));
                Task::none()
            }
            Message::ToggleErase => {
                state.overlay.toggle_erase();
                state.push_history(format!("mode -> {:?}", state.overlay.mode()));
                Task::none()
            }
            Message::CellPressed(sensor, cell_row, cell_col) => {
                state.overlay.pointer_event(&sensor, cell_row, cell_col);
                state.push_history(format!(
                    "{:?} sensor {} cell ({}, {})",
                    state.overlay.mode(),
                    sensor,
                    cell_row,
                    cell_col
                ));
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let mode = state.overlay.mode();

        let toolbar = row![
            button(text(if mode == Mode::Select {
                "Select nodes (on)"
            } else {
                "Select nodes"
            }))
            .on_press(Message::ToggleSelect)
            .padding(10),
            button(text(if mode == Mode::Erase {
                "Erase nodes (on)"
            } else {
                "Erase nodes"
            }))
            .on_press(Message::ToggleErase)
            .padding(10),
            text(format!("{} cells selected", state.overlay.selection_count())).size(14),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let step = state
            .payload
            .as_ref()
            .map(|payload| payload.snapshot.step)
            .unwrap_or_default();

        let mut sensors_column = Column::new().spacing(16);
        if let (Some(config), Some(payload)) = (state.config.as_ref(), state.payload.as_ref()) {
            let pitch = config.viz_options.pitch;
            for sensor in &config.sensors {
                let dims = sensor.grid_dims();
                let rows = payload
                    .snapshot
                    .grids
                    .get(&sensor.id)
                    .cloned()
                    .unwrap_or_default();
                let surface = Canvas::new(HeatmapSurface {
                    sensor: sensor.id.clone(),
                    rows,
                    dims,
                    pitch,
                    mode,
                    selected: state.overlay.selected_cells(&sensor.id),
                    erased: state.overlay.erased_cells(&sensor.id),
                })
                .width(Length::Fixed(dims.rows as f32 * pitch))
                .height(Length::Fixed(dims.cols as f32 * pitch));

                sensors_column = sensors_column.push(
                    column![text(format!("Sensor {}", sensor.id)).size(18), surface].spacing(6),
                );
            }
        } else {
            sensors_column = sensors_column.push(text("Waiting for sensor config...").size(14));
        }

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let layout = column![
            toolbar,
            text(format!("Step Count: {}", step)).size(20),
            text(&state.status).size(14),
            scrollable(sensors_column).height(Length::Fill),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(90.0))).padding(6),
        ]
        .spacing(12)
        .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

async fn fetch_snapshot() -> Result<BridgePayload, String> {
    let response = reqwest::get("http://127.0.0.1:9000/snapshot")
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<BridgePayload>()
        .await
        .map_err(|e| e.to_string())
}

async fn fetch_config() -> Result<WiSensConfig, String> {
    let response = reqwest::get("http://127.0.0.1:9000/config")
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<WiSensConfig>()
        .await
        .map_err(|e| e.to_string())
}

#[derive(Debug, Clone, Default, Deserialize)]
struct BridgePayload {
    #[serde(default)]
    snapshot: DashboardSnapshot,
    #[serde(default)]
    frames_applied: usize,
    #[serde(default)]
    frames_dropped: usize,
}

/// One sensor tile: heatmap cells plus the selection/erase overlay.
///
/// Rows lay out along x and columns along y, matching the pitch mapping
/// used for pointer offsets.
struct HeatmapSurface {
    sensor: SensorId,
    rows: Vec<Vec<f32>>,
    dims: GridDims,
    pitch: f32,
    mode: Mode,
    selected: HashSet<(usize, usize)>,
    erased: HashSet<(usize, usize)>,
}

impl HeatmapSurface {
    fn cell_message(&self, cell: (usize, usize)) -> Message {
        Message::CellPressed(self.sensor.clone(), cell.0, cell.1)
    }
}

#[derive(Default)]
struct DragState {
    dragging: bool,
    last_cell: Option<(usize, usize)>,
}

impl canvas::Program<Message> for HeatmapSurface {
    type State = DragState;

    // Captured events stay on the overlay, so no native drag-and-drop or
    // text selection ever sees the gesture.
    fn update(
        &self,
        state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        match event {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                state.dragging = true;
                let cell =
                    InteractionOverlay::cell_at(position.x, position.y, self.pitch, self.dims)?;
                state.last_cell = Some(cell);
                Some(canvas::Action::publish(self.cell_message(cell)).and_capture())
            }
            Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if !state.dragging {
                    return None;
                }
                let position = cursor.position_in(bounds)?;
                let cell =
                    InteractionOverlay::cell_at(position.x, position.y, self.pitch, self.dims)?;
                if state.last_cell == Some(cell) {
                    return None;
                }
                state.last_cell = Some(cell);
                Some(canvas::Action::publish(self.cell_message(cell)).and_capture())
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                state.dragging = false;
                state.last_cell = None;
                Some(canvas::Action::capture())
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let background = Color::from_rgb(0.05, 0.05, 0.08);
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), background);

        let grid = match grid_from_rows(&self.rows, self.dims) {
            Ok(grid) => grid,
            // A stale snapshot against a fresh config paints background only.
            Err(_) => return vec![frame.into_geometry()],
        };
        let stats = GridStats::of(grid.view());

        let cell_size = Size::new(self.pitch - 1.0, self.pitch - 1.0);
        for cell_row in 0..self.dims.rows {
            for cell_col in 0..self.dims.cols {
                let origin = Point::new(
                    cell_row as f32 * self.pitch,
                    cell_col as f32 * self.pitch,
                );
                if self.erased.contains(&(cell_row, cell_col)) {
                    frame.fill_rectangle(origin, cell_size, background);
                    continue;
                }
                let level = stats.normalized(grid[(cell_row, cell_col)]);
                frame.fill_rectangle(origin, cell_size, heat_color(level));
                if self.selected.contains(&(cell_row, cell_col)) {
                    let outline = Path::rectangle(origin, cell_size);
                    frame.stroke(
                        &outline,
                        Stroke::default()
                            .with_width(2.0)
                            .with_color(Color::WHITE),
                    );
                }
            }
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) && self.mode != Mode::Normal {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}

fn heat_color(level: f32) -> Color {
    Color::from_rgb(
        0.10 + 0.85 * level,
        0.15 + 0.55 * level,
        0.50 - 0.30 * level,
    )
}
