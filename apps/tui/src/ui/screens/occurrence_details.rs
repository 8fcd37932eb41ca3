use crate::app::App;
use crate::ui::widgets::map_canvas::level_color;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_occurrence_details(app: &App, f: &mut Frame<'_>) {
    let area = f.area();

    let Some(occurrence) = app.selected_occurrence() else {
        let paragraph = Paragraph::new("No occurrence selected.")
            .block(Block::default().title("Details").borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9), // Record
            Constraint::Min(4),    // Evaluations
            Constraint::Length(4), // New evaluation
            Constraint::Length(2), // Help
        ])
        .split(area);

    let affects = occurrence
        .disability_types()
        .iter()
        .map(|d| d.label())
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = vec![
        TextLine::from(vec![
            Span::styled(
                &occurrence.title,
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                occurrence.level.label(),
                Style::default().fg(level_color(occurrence.level)),
            ),
        ]),
        TextLine::from(format!(
            "Location: {:.6}, {:.6}",
            occurrence.latitude, occurrence.longitude
        )),
        TextLine::from(format!(
            "Category: {}   Problem: {}",
            occurrence.category.label(),
            occurrence.problem_label()
        )),
        TextLine::from(format!("Affects: {affects}")),
        TextLine::from(format!("Reported: {}", occurrence.created_at)),
    ];
    if let Some(description) = &occurrence.description {
        lines.push(TextLine::from(format!("Notes: {description}")));
    }
    if let Some(photo_url) = &occurrence.photo_url {
        lines.push(TextLine::from(format!("Photo: {photo_url}")));
    }

    f.render_widget(
        Paragraph::new(lines)
            .block(Block::default().title("Details").borders(Borders::ALL))
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    render_evaluations(app, f, chunks[1]);
    render_new_evaluation(app, f, chunks[2]);

    let help = Paragraph::new("←/→ rating   c comment   Enter submit   Esc back")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(help, chunks[3]);
}

fn render_evaluations(app: &App, f: &mut Frame<'_>, area: ratatui::layout::Rect) {
    let average = if app.detail_evaluations.is_empty() {
        "no evaluations yet".to_string()
    } else {
        #[allow(clippy::cast_precision_loss)]
        let avg = app.detail_evaluations.iter().map(|e| e.rating).sum::<i64>() as f64
            / app.detail_evaluations.len() as f64;
        format!(
            "{} evaluation(s), average {avg:.1}",
            app.detail_evaluations.len()
        )
    };

    let lines: Vec<TextLine<'_>> = app
        .detail_evaluations
        .iter()
        .map(|evaluation| {
            let stars = stars(evaluation.rating);
            let comment = evaluation.comment.as_deref().unwrap_or("");
            TextLine::from(vec![
                Span::styled(stars, Style::default().fg(Color::Yellow)),
                Span::raw(format!("  {} {comment}", evaluation.user_id)),
            ])
        })
        .collect();

    f.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .title(format!("Evaluations ({average})"))
                    .borders(Borders::ALL),
            )
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_new_evaluation(app: &App, f: &mut Frame<'_>, area: ratatui::layout::Rect) {
    let comment = if app.comment_editing {
        format!("{}_", app.comment_input)
    } else {
        app.comment_input.clone()
    };

    let lines = vec![
        TextLine::from(vec![
            Span::raw("Your rating: "),
            Span::styled(
                stars(app.rating_input),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        TextLine::from(vec![Span::raw("Comment: "), Span::raw(comment)]),
    ];

    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title("Evaluate this occurrence")
                .borders(Borders::ALL),
        ),
        area,
    );
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn stars(rating: i64) -> String {
    let filled = rating.clamp(0, 5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}
