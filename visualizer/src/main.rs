use fiscore::tracks::ThreatScore;
use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, scrollable, text, text_input, Column, Container,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Size, Subscription, Task, Theme,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Threat FIS Visualizer".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_secs(1)).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct Visualizer {
    config: ConfigForm,
    payload: Option<ScorePayload>,
    profile: Vec<f64>,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    PayloadFetched(Result<ScorePayload, String>),
    ConfigFieldChanged(ConfigField, String),
    SubmitConfig,
    ConfigSubmitted(Result<String, String>),
}

#[derive(Debug, Clone, Copy)]
enum ConfigField {
    Records,
    Seed,
    Jitter,
    Description,
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        (
            Visualizer {
                config: ConfigForm::default(),
                payload: None,
                profile: Vec::new(),
                status: "Waiting for scores...".into(),
                history: Vec::new(),
            },
            Task::perform(fetch_payload(), Message::PayloadFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(fetch_payload(), Message::PayloadFetched),
            Message::PayloadFetched(Ok(payload)) => {
                state.profile = payload.threat_profile.clone();
                state.payload = Some(payload.clone());
                state.status = format!(
                    "Scores received: {} records, average {:.3}",
                    payload.record_count, payload.average
                );
                state.push_history(format!(
                    "Scores: {} records / average {:.3}",
                    payload.record_count, payload.average
                ));
                Task::none()
            }
            Message::PayloadFetched(Err(err)) => {
                state.status = format!("Score fetch error: {err}");
                Task::none()
            }
            Message::ConfigFieldChanged(field, value) => {
                state.config.update_field(field, value);
                Task::none()
            }
            Message::SubmitConfig => {
                let payload = state.config.to_payload();
                Task::perform(post_config(payload), Message::ConfigSubmitted)
            }
            Message::ConfigSubmitted(Ok(message)) => {
                state.status = message;
                state.push_history("Generator scenario submitted".into());
                Task::none()
            }
            Message::ConfigSubmitted(Err(err)) => {
                state.status = format!("Config error: {err}");
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let threat_scores = state
            .payload
            .as_ref()
            .map(|payload| payload.threat_scores.clone())
            .unwrap_or_default();
        let evaluation_notes = state
            .payload
            .as_ref()
            .map(|payload| payload.evaluation_notes.clone())
            .unwrap_or_default();

        let config_column = column![
            text("Generator Config").size(26),
            text_input("Records", &state.config.records)
                .on_input(|value| Message::ConfigFieldChanged(ConfigField::Records, value))
                .padding(6),
            text_input("Seed", &state.config.seed)
                .on_input(|value| Message::ConfigFieldChanged(ConfigField::Seed, value))
                .padding(6),
            text_input("Jitter", &state.config.jitter)
                .on_input(|value| Message::ConfigFieldChanged(ConfigField::Jitter, value))
                .padding(6),
            text_input("Description", &state.config.description)
                .on_input(|value| Message::ConfigFieldChanged(ConfigField::Description, value))
                .padding(6),
            button("POST scenario")
                .on_press(Message::SubmitConfig)
                .padding(10),
            text(&state.status).size(14),
            column![
                text("Parameter definitions").size(16),
                text("Records: synthetic tracks per batch; each sweeps the variable spans.")
                    .size(12),
                text("Seed: deterministic PRNG seeding so batches replay consistently.")
                    .size(12),
                text("Jitter: fractional noise added to each sweep position.").size(12),
                text("Description: free-text note included in the ingest log.").size(12),
            ]
            .spacing(4)
            .padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(360.0));

        let score_info = if let Some(payload) = &state.payload {
            text(format!(
                "Average threat: {:.3} over {} records",
                payload.average, payload.record_count
            ))
            .size(18)
        } else {
            text("Average threat: n/a").size(18)
        };

        let profile_canvas = Canvas::new(ThreatProfile {
            data: state.profile.clone(),
        })
        .width(Length::Fill)
        .height(Length::Fixed(260.0));

        let board_canvas = Canvas::new(ThreatBoard::new(&threat_scores))
            .width(Length::Fill)
            .height(Length::Fixed(220.0));

        let mut ranked = threat_scores.clone();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        let top_threats = if ranked.is_empty() {
            Column::new().push(text("No scores to rank").size(12))
        } else {
            ranked
                .iter()
                .take(6)
                .fold(Column::new().spacing(4), |col, threat| {
                    col.push(
                        text(format!(
                            "record {}: threat {:.3}",
                            threat.record_index, threat.score
                        ))
                        .size(12),
                    )
                })
        };

        let notes_list = if evaluation_notes.is_empty() {
            Column::new().push(text("No notes yet").size(14))
        } else {
            evaluation_notes
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, note| {
                    col.push(text(note.clone()).size(14))
                })
        };

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

        let scores_column = column![
            text("Threat Scores").size(26),
            score_info,
            text("Threat profile (score per record)").size(18),
            profile_canvas,
            text("Threat board (bar height = score)").size(16),
            board_canvas,
            text("Top threats").size(16),
            Container::new(top_threats).padding(6),
            text("Evaluation notes").size(16),
            Container::new(scrollable(notes_list).height(Length::Fixed(120.0))).padding(6),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(90.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![config_column, scores_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

async fn fetch_payload() -> Result<ScorePayload, String> {
    let response = reqwest::get("http://127.0.0.1:9000/scores")
        .await
        .map_err(|e| e.to_string())?;
    let body = response.text().await.map_err(|e| e.to_string())?;
    serde_json::from_str::<ScorePayload>(&body).map_err(|e| e.to_string())
}

async fn post_config(config: GeneratorPayload) -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post("http://127.0.0.1:9000/ingest-config")
        .json(&config)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        Ok("Generator scenario submitted".into())
    } else {
        let status = response.status();
        let body = response.text().await.unwrap_or_else(|_| "".into());
        Err(format!("{}: {}", status, body))
    }
}

#[derive(Debug, Clone)]
struct ConfigForm {
    records: String,
    seed: String,
    jitter: String,
    description: String,
}

impl Default for ConfigForm {
    fn default() -> Self {
        Self {
            records: "16".into(),
            seed: "312".into(),
            jitter: "0.05".into(),
            description: "Rust visualizer scenario".into(),
        }
    }
}

impl ConfigForm {
    fn update_field(&mut self, field: ConfigField, value: String) {
        match field {
            ConfigField::Records => self.records = value,
            ConfigField::Seed => self.seed = value,
            ConfigField::Jitter => self.jitter = value,
            ConfigField::Description => self.description = value,
        }
    }

    fn to_payload(&self) -> GeneratorPayload {
        GeneratorPayload {
            records: self.records.parse().unwrap_or(16),
            seed: self.seed.parse().unwrap_or(0),
            jitter: self.jitter.parse().unwrap_or(0.05),
            description: if self.description.trim().is_empty() {
                None
            } else {
                Some(self.description.clone())
            },
            scenario: Some("visualizer".into()),
        }
    }
}

#[derive(Debug, Serialize)]
struct GeneratorPayload {
    records: usize,
    seed: u64,
    jitter: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scenario: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ScorePayload {
    #[serde(default)]
    threat_profile: Vec<f64>,
    #[serde(default)]
    record_count: usize,
    #[serde(default)]
    average: f64,
    #[serde(default)]
    threat_scores: Vec<ThreatScore>,
    #[serde(default)]
    evaluation_notes: Vec<String>,
}

fn severity_color(ratio: f32) -> Color {
    let ratio = ratio.clamp(0.0, 1.0);
    Color::from_rgb(0.2 + 0.75 * ratio, 0.75 - 0.55 * ratio, 0.2)
}

#[derive(Clone)]
struct ThreatProfile {
    data: Vec<f64>,
}

impl canvas::Program<Message> for ThreatProfile {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.05, 0.05, 0.05),
        );

        if self.data.len() > 1 {
            let min = self.data.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = self.data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let range = (max - min).max(1.0);
            let width = bounds.width;
            let step = width / (self.data.len() as f32 - 1.0);
            let path = Path::new(|builder| {
                for (i, value) in self.data.iter().enumerate() {
                    let x = i as f32 * step;
                    let normalized = ((value - min) / range) as f32;
                    let y = bounds.height - normalized * bounds.height;
                    if i == 0 {
                        builder.move_to(Point::new(x, y));
                    } else {
                        builder.line_to(Point::new(x, y));
                    }
                }
            });

            frame.stroke(
                &path,
                Stroke::default()
                    .with_width(2.5)
                    .with_color(Color::from_rgb(0.89, 0.45, 0.18)),
            );
        }

        vec![frame.into_geometry()]
    }
}

#[derive(Clone)]
struct ThreatBoard {
    scores: Vec<ThreatScore>,
}

impl ThreatBoard {
    fn new(scores: &[ThreatScore]) -> Self {
        Self {
            scores: scores.to_vec(),
        }
    }
}

impl canvas::Program<Message> for ThreatBoard {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.02, 0.02, 0.04),
        );

        let baseline = Path::new(|builder| {
            builder.move_to(Point::new(0.0, bounds.height - 1.0));
            builder.line_to(Point::new(bounds.width, bounds.height - 1.0));
        });
        frame.stroke(
            &baseline,
            Stroke::default()
                .with_color(Color::from_rgb(0.35, 0.35, 0.45))
                .with_width(1.0),
        );

        if self.scores.is_empty() {
            return vec![frame.into_geometry()];
        }

        let max_score = self
            .scores
            .iter()
            .map(|score| score.score)
            .fold(0.0, f64::max)
            .max(1.0);
        let slot = bounds.width / self.scores.len() as f32;
        let bar_width = (slot * 0.7).max(1.0);

        for (i, score) in self.scores.iter().enumerate() {
            let ratio = (score.score / max_score) as f32;
            let height = ratio * (bounds.height - 6.0);
            let x = i as f32 * slot + (slot - bar_width) / 2.0;
            let y = bounds.height - 1.0 - height;
            frame.fill_rectangle(
                Point::new(x, y),
                Size::new(bar_width, height),
                severity_color(ratio),
            );
        }

        vec![frame.into_geometry()]
    }
}
