use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, Tabs};

use crate::output::{format_delta, format_score, goodness};
use crate::scoring::{explain_metrics, Candidate, MetricKind, Verdict};
use crate::tui::app::{App, Field, InputMode, View};
use crate::tui::theme::ThemeColors;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 16 || area.width < 60 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    match app.current_view {
        View::Configurator => render_configurator(frame, chunks[2], app),
        View::Leaderboard => render_leaderboard(frame, chunks[2], app),
    }
    render_status_bar(frame, chunks[3], app);

    match app.input_mode {
        InputMode::Help => render_help_popup(frame, &app.colors),
        InputMode::Breakdown => render_breakdown_popup(frame, app),
        InputMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let title = "Warehouse Design Lab";
    let mut spans = vec![Span::styled(
        title,
        Style::default().fg(app.colors.title_color).bold(),
    )];

    let score_text = format!("Your efficiency: {}", format_score(app.human.score()));
    let padding_len = (area.width as usize).saturating_sub(title.len() + score_text.len());
    spans.push(Span::raw(" ".repeat(padding_len)));
    spans.push(Span::styled(score_text, Style::default().fg(app.colors.muted)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let selected = match app.current_view {
        View::Configurator => 0,
        View::Leaderboard => 1,
    };

    let tabs = Tabs::new(vec!["Configurator", "Leaderboard"])
        .select(selected)
        .style(app.colors.tab_inactive_style)
        .highlight_style(app.colors.tab_active_style.reversed())
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_configurator(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([Constraint::Length(5), Constraint::Fill(1)]).split(area);

    render_selectors(frame, chunks[0], app);

    let panels =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(chunks[1]);
    render_human_panel(frame, panels[0], app);
    render_ai_panel(frame, panels[1], app);
}

fn render_selectors(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::bordered().title(" Your choices ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = Field::ALL
        .iter()
        .map(|field| {
            let is_active = *field == app.selected_field;
            let marker = if is_active { "> " } else { "  " };
            let label_style = if is_active {
                app.colors.selector_active
            } else {
                Style::default().fg(app.colors.muted)
            };

            let mut spans = vec![
                Span::styled(marker, label_style),
                Span::styled(format!("{:<18}", field.label()), label_style),
            ];

            let (labels, chosen) = app.option_labels(*field);
            for (i, label) in labels.iter().enumerate() {
                let style = if i == chosen {
                    app.colors.option_selected
                } else {
                    Style::default().fg(app.colors.muted)
                };
                spans.push(Span::styled(format!(" {} ", label), style));
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn metric_bar_spans(value: f64, width: usize, color: Color, empty: Color) -> Vec<Span<'static>> {
    let ratio = (value / 100.0).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    let rest = width.saturating_sub(filled);

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled("█".repeat(filled), Style::default().fg(color)));
    }
    if rest > 0 {
        spans.push(Span::styled("░".repeat(rest), Style::default().fg(empty)));
    }
    spans
}

fn candidate_lines(candidate: &Candidate, colors: &ThemeColors, bar_width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(candidate.design.storage_model.label()),
        Line::from(candidate.design.fulfilment_logic.label()),
        Line::from(candidate.design.automation_level.label()),
        Line::from(""),
    ];

    for kind in MetricKind::ALL {
        let value = candidate.metrics.value(kind);
        let color = colors.goodness_color(goodness(kind, value));
        let mut spans = vec![
            Span::styled(format!("{:<18}", kind.label()), Style::default().fg(colors.muted)),
            Span::raw(format!("{:>4.0} ", value)),
        ];
        spans.extend(metric_bar_spans(value, bar_width, color, colors.bar_empty));
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("Efficiency index  "),
        Span::styled(format_score(candidate.score()), Style::default().bold()),
    ]));
    lines
}

/// Bar width that fits a panel: label(18) + value(5) + borders(2)
fn panel_bar_width(area: Rect) -> usize {
    (area.width as usize).saturating_sub(25).min(30)
}

fn render_human_panel(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::bordered()
        .title(" Your design ")
        .border_style(Style::default().fg(app.colors.human_accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = candidate_lines(&app.human, &app.colors, panel_bar_width(area));
    if let Some(comparison) = &app.comparison {
        lines.push(Line::from(Span::styled(
            format!("Rank {} of {}", comparison.human_rank, comparison.total_designs),
            Style::default().fg(app.colors.muted),
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_ai_panel(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::bordered()
        .title(" AI design ")
        .border_style(Style::default().fg(app.colors.ai_accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let comparison = match &app.comparison {
        Some(c) if !app.is_thinking() => c,
        _ => {
            let spinner = SPINNER[app.spinner_frame % SPINNER.len()];
            let thinking = Paragraph::new(format!("{} Thinking...", spinner))
                .alignment(Alignment::Center)
                .style(Style::default().fg(app.colors.ai_accent));
            frame.render_widget(thinking, inner);
            return;
        }
    };

    let mut lines = candidate_lines(&comparison.recommended, &app.colors, panel_bar_width(area));
    let verdict_color = match comparison.verdict {
        Verdict::Improved => app.colors.fair,
        Verdict::Matched => app.colors.ai_accent,
        Verdict::Optimal => app.colors.good,
    };
    lines.push(Line::from(Span::styled(
        format!(
            "{} ({})",
            comparison.verdict.message(),
            format_delta(comparison.delta)
        ),
        Style::default().fg(verdict_color).bold(),
    )));
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_leaderboard(frame: &mut Frame, area: Rect, app: &mut App) {
    let colors = app.colors.clone();
    let human = app.human.design;

    let rows: Vec<Row> = app
        .ranked
        .iter()
        .enumerate()
        .map(|(idx, candidate)| {
            let score = candidate.score();
            let mut score_spans = vec![Span::styled(
                format!("{:>6} ", format_score(score)),
                Style::default().fg(colors.goodness_color(score)),
            )];
            score_spans.extend(metric_bar_spans(score, 10, colors.goodness_color(score), colors.bar_empty));

            let is_human = candidate.design == human;
            let design_cell = if is_human {
                Cell::from(format!("{}  <- you", candidate.design.summary()))
                    .style(Style::default().fg(colors.human_accent).bold())
            } else {
                Cell::from(candidate.design.summary())
            };

            let row_style = if idx % 2 == 1 {
                Style::default().bg(colors.row_alt_bg)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(format!("{}.", idx + 1)).style(Style::default().fg(colors.index_color)),
                Cell::from(Line::from(score_spans)),
                design_cell,
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(18),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Efficiency", "Design"])
                .style(colors.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(colors.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.colors;
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Failed") {
            colors.flash_error
        } else if msg.starts_with("Saved") || msg.starts_with("Adopted") || msg.starts_with("Loaded") {
            colors.flash_success
        } else {
            Color::White
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let hints: &[(&str, &str)] = match app.current_view {
            View::Configurator => &[
                ("j/k", ":field "),
                ("h/l", ":option "),
                ("a", ":adopt AI "),
                ("b", ":breakdown "),
                ("s", ":save "),
                ("Tab", ":leaderboard "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
            View::Leaderboard => &[
                ("j/k", ":nav "),
                ("Enter", ":load "),
                ("Tab", ":configurator "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
        };

        let mut spans = Vec::new();
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(colors.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(colors.status_bar_bg)),
        area,
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

fn render_help_popup(frame: &mut Frame, colors: &ThemeColors) {
    let popup_area = centered_rect_fixed(52, 16, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Keyboard Shortcuts ", colors.popup_title))
        .border_style(Style::default().fg(colors.popup_border));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(colors.status_key_color).bold();
    let entries = [
        ("j / Down      ", "Next field / row"),
        ("k / Up        ", "Previous field / row"),
        ("l / Right     ", "Next option"),
        ("h / Left      ", "Previous option"),
        ("a             ", "Adopt the AI design"),
        ("b             ", "Show score breakdown"),
        ("s             ", "Save design to config"),
        ("Enter         ", "Load leaderboard design"),
        ("Tab           ", "Toggle Configurator/Leaderboard"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*desc)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(colors.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}

fn render_breakdown_popup(frame: &mut Frame, app: &App) {
    let colors = &app.colors;
    let breakdown = explain_metrics(&app.human.design);
    let height = 10 + breakdown.clamps.len() as u16;
    let popup_area = centered_rect_fixed(64, height, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Score Breakdown ", colors.popup_title))
        .border_style(Style::default().fg(colors.popup_border));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let fmt_row = |label: String, values: [f64; 5], signed: bool| -> Line<'static> {
        let cells: Vec<String> = values
            .iter()
            .map(|v| if signed { format!("{:>+5}", v) } else { format!("{:>5}", v) })
            .collect();
        Line::from(format!("{:<34}{}", label, cells.join("")))
    };
    let values = |v: &crate::scoring::MetricVector| -> [f64; 5] {
        [v.throughput, v.cost_index, v.congestion_risk, v.scalability, v.labor_sensitivity]
    };

    let mut lines = vec![Line::from(Span::styled(
        format!("{:<34}{:>5}{:>5}{:>5}{:>5}{:>5}", "", "thru", "cost", "cong", "scal", "labr"),
        Style::default().fg(colors.muted),
    ))];
    lines.push(fmt_row("Baseline".to_string(), values(&breakdown.baseline), false));
    for factor in &breakdown.factors {
        lines.push(fmt_row(
            format!("{}: {}", factor.decision, factor.option),
            values(&factor.delta),
            true,
        ));
    }
    lines.push(fmt_row("Raw total".to_string(), values(&breakdown.raw), false));
    for clamp in &breakdown.clamps {
        lines.push(Line::from(Span::styled(
            format!("{} clamped {} -> {}", clamp.metric.label(), clamp.raw, clamp.clamped),
            Style::default().fg(colors.fair),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("Efficiency index  "),
        Span::styled(format_score(breakdown.metrics.efficiency_index), Style::default().bold()),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}
