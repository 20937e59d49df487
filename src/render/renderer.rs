use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Phase, Snapshot};
use crate::metrics::SessionStats;

/// Width of the status panel, borders included
const STATUS_WIDTH: u16 = 26;

/// What occupies a grid cell in the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Head,
    Body,
    Food,
}

/// Rasterize a snapshot into rows of cells
///
/// Segments outside the grid (a head that just hit the wall) are skipped.
/// The head is written last so it stays visible on top of the body.
pub fn cell_grid(snapshot: &Snapshot<'_>) -> Vec<Vec<Cell>> {
    let mut grid = vec![vec![Cell::Empty; snapshot.grid_width]; snapshot.grid_height];

    let mut put = |x: i32, y: i32, cell: Cell| {
        if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) {
            if let Some(slot) = grid.get_mut(y).and_then(|row| row.get_mut(x)) {
                *slot = cell;
            }
        }
    };

    if let Some(food) = snapshot.food {
        put(food.x, food.y, Cell::Food);
    }

    if snapshot.shows_snake() {
        for segment in snapshot.body.iter().skip(1) {
            put(segment.x, segment.y, Cell::Body);
        }
        if let Some(head) = snapshot.head() {
            put(head.x, head.y, Cell::Head);
        }
    }

    grid
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot<'_>, stats: &SessionStats) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Playfield and status
                Constraint::Length(1), // Controls
            ])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(STATUS_WIDTH)])
            .split(rows[0]);

        frame.render_widget(self.render_grid(snapshot), columns[0]);
        frame.render_widget(self.render_status(snapshot, stats), columns[1]);
        frame.render_widget(self.render_controls(snapshot.phase), rows[1]);
    }

    fn render_grid(&self, snapshot: &Snapshot<'_>) -> Paragraph<'static> {
        let lines: Vec<Line> = cell_grid(snapshot)
            .into_iter()
            .map(|row| {
                Line::from(
                    row.into_iter()
                        .map(|cell| match cell {
                            Cell::Head => Span::styled(
                                "██",
                                Style::default()
                                    .fg(Color::LightGreen)
                                    .add_modifier(Modifier::BOLD),
                            ),
                            Cell::Body => Span::styled("██", Style::default().fg(Color::Green)),
                            Cell::Food => Span::styled("██", Style::default().fg(Color::Red)),
                            Cell::Empty => Span::raw("  "),
                        })
                        .collect::<Vec<_>>(),
                )
            })
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Left)
    }

    fn render_status(&self, snapshot: &Snapshot<'_>, stats: &SessionStats) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

        let mut text = vec![
            Line::from(vec![
                Span::styled("Score: ", label),
                Span::styled(snapshot.score.to_string(), value),
            ]),
            Line::from(""),
        ];

        match snapshot.phase {
            Phase::GameOver => text.push(Line::from(Span::styled(
                "GAME OVER!",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))),
            Phase::Menu => text.push(Line::from("Press START to begin")),
            Phase::Playing => text.push(Line::from(vec![
                Span::styled("Steps: ", label),
                Span::raw(snapshot.steps.to_string()),
            ])),
        }

        text.push(Line::from(""));
        if snapshot.phase != Phase::Playing {
            text.push(Line::from(Span::styled(
                "[ START Game ]",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
            text.push(Line::from(Span::styled(
                "Enter / Space",
                Style::default().fg(Color::DarkGray),
            )));
            text.push(Line::from(""));
        }

        text.push(Line::from(vec![
            Span::styled("Time: ", label),
            Span::raw(stats.format_time()),
        ]));
        text.push(Line::from(vec![
            Span::styled("Best: ", label),
            Span::raw(stats.best_score.to_string()),
        ]));
        text.push(Line::from(vec![
            Span::styled("Games: ", label),
            Span::raw(stats.games_played.to_string()),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Snake Status "),
        )
    }

    fn render_controls(&self, phase: Phase) -> Paragraph<'static> {
        let mut spans = vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
        ];
        if phase != Phase::Playing {
            spans.push(Span::styled("Enter", Style::default().fg(Color::Green)));
            spans.push(Span::raw(" to start | "));
        }
        spans.push(Span::styled("Q", Style::default().fg(Color::Red)));
        spans.push(Span::raw(" to quit"));

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
