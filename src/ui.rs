use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};

use crate::presentation::FormView;

pub struct UiContext<'a> {
    pub view: FormView<'a>,
    pub section_index: usize,
    pub field_index: usize,
    pub status_message: &'a str,
    pub dirty: bool,
    pub submitting: bool,
    pub error_count: usize,
    pub help: Option<&'a str>,
}

pub fn draw(frame: &mut Frame<'_>, ctx: UiContext<'_>) {
    let definition = ctx.view.definition();
    let header_constraint = if definition.description.is_some() {
        Constraint::Length(5)
    } else {
        Constraint::Length(4)
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([header_constraint, Constraint::Min(5), Constraint::Length(3)])
        .split(frame.area());

    render_header(frame, chunks[0], &ctx);
    render_body(frame, chunks[1], &ctx);
    render_footer(frame, chunks[2], &ctx);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let definition = ctx.view.definition();
    let block = Block::default().title("Form").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let mut lines = vec![Line::from(Span::styled(
        definition.title.clone().unwrap_or_else(|| "Form".to_string()),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))];
    if let Some(description) = &definition.description {
        lines.push(Line::from(Span::raw(description.clone())));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), rows[0]);

    let completion = ctx.view.completion();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .percent(u16::from(completion))
        .label(format!("{completion}% complete"));
    frame.render_widget(gauge, rows[1]);
}

fn render_body(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let sections = &ctx.view.definition().sections;
    if sections.is_empty() {
        let placeholder = Paragraph::new("No editable fields in form")
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(placeholder, area);
        return;
    }

    if sections.len() > 1 {
        let body_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);
        render_tabs(frame, body_chunks[0], ctx);
        render_fields(frame, body_chunks[1], ctx);
    } else {
        render_fields(frame, area, ctx);
    }
}

fn render_tabs(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let errors_in = |index: usize| {
        ctx.view.definition().sections[index]
            .fields
            .iter()
            .any(|field| ctx.view.context(field, false, 0).error.is_some())
    };
    let titles: Vec<Line<'static>> = ctx
        .view
        .definition()
        .sections
        .iter()
        .enumerate()
        .map(|(index, section)| {
            if errors_in(index) {
                Line::from(vec![
                    Span::raw(section.title.clone()),
                    Span::styled(" !", Style::default().fg(Color::Red)),
                ])
            } else {
                Line::from(section.title.clone())
            }
        })
        .collect();
    let tabs = Tabs::new(titles)
        .select(ctx.section_index)
        .block(Block::default().borders(Borders::ALL).title("Sections"))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_fields(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let width = area.width.saturating_sub(4) as usize;
    let Some(section) = ctx
        .view
        .section(ctx.section_index, Some(ctx.field_index), width)
    else {
        let placeholder =
            Paragraph::new("No section selected").block(Block::default().borders(Borders::ALL));
        frame.render_widget(placeholder, area);
        return;
    };

    let mut field_area = area;
    if let Some(description) = &section.description {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(2)])
            .split(area);
        let details = Paragraph::new(description.clone())
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Details").borders(Borders::ALL));
        frame.render_widget(details, chunks[0]);
        field_area = chunks[1];
    }

    if section.fields.is_empty() {
        let placeholder = Paragraph::new("This section has no fields")
            .block(Block::default().title(section.title).borders(Borders::ALL));
        frame.render_widget(placeholder, field_area);
        return;
    }

    let selected = ctx.field_index.min(section.fields.len().saturating_sub(1));
    let items: Vec<ListItem<'static>> = section.fields.into_iter().map(ListItem::new).collect();
    let mut list_state = ListState::default();
    list_state.select(Some(selected));

    let list = List::new(items)
        .block(Block::default().title(section.title).borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, field_area, &mut list_state);
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let mut status = ctx.status_message.to_string();
    if ctx.submitting {
        status.push_str(" • submitting…");
    }
    if ctx.dirty {
        status.push_str(" • unsaved changes");
    }
    if ctx.error_count > 0 {
        status.push_str(&format!(" • {} error(s)", ctx.error_count));
    }
    if status.trim().is_empty() {
        status = "Ready".to_string();
    }

    let status_widget = Paragraph::new(status)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status_widget, chunks[0]);

    let help_text = ctx.help.unwrap_or(" ");
    let help_widget = Paragraph::new(help_text.to_string())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Actions"));
    frame.render_widget(help_widget, chunks[1]);
}
