pub mod table;

use std::sync::OnceLock;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, EditField, Popup};
use crate::theme::Theme;
use table::{SimulationsTableProps, TableAction};

// Theme colors loaded once at startup
static THEME: OnceLock<Theme> = OnceLock::new();

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::load)
}

// Helper functions to get theme colors
pub(crate) fn accent() -> Color { theme().accent }
pub(crate) fn danger() -> Color { theme().danger }
pub(crate) fn success() -> Color { theme().success }
pub(crate) fn warning() -> Color { theme().warning }
pub(crate) fn text() -> Color { theme().text }
pub(crate) fn text_dim() -> Color { theme().text_dim }
pub(crate) fn bg_selected() -> Color { theme().bg_selected }
pub(crate) fn inactive() -> Color { theme().inactive }
pub(crate) fn header() -> Color { theme().header }

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info line
            Constraint::Min(4),    // Simulations table
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    draw_info_line(f, app, chunks[0]);
    draw_table(f, app, chunks[1]);
    draw_footer(f, chunks[2]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f),
        Popup::Confirm => draw_confirm_popup(f, app),
        Popup::EditForm => draw_edit_form(f, app),
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(ref status) = app.status_message {
        Line::from(Span::styled(status, Style::default().fg(warning())))
    } else {
        let count = app.store.len();
        let summary = match count {
            0 => "No simulations".to_string(),
            1 => "1 simulation".to_string(),
            n => format!("{} simulations", n),
        };
        Line::from(Span::styled(summary, Style::default().fg(text_dim())))
    };

    let info = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(info, area);
}

fn draw_table(f: &mut Frame, app: &mut App, area: Rect) {
    let border_color = if app.popup == Popup::None { accent() } else { inactive() };
    let block = Block::default()
        .title(Span::styled(
            " Simulations ",
            Style::default().fg(accent()).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let App {
        store,
        selected,
        table,
        ..
    } = app;

    let props = SimulationsTableProps {
        simulations: (!store.is_empty()).then(|| store.simulations()),
        selected: *selected,
        block: Some(block),
        style: Style::default().fg(text()),
        on_select: TableAction::Select,
        on_edit: TableAction::Edit,
        on_delete: TableAction::Delete,
    };

    table.render(f, area, props);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let hints: [(&str, &str); 8] = [
        ("↑↓", "Nav"),
        ("Enter", "Select"),
        ("e", "Edit"),
        ("n", "New"),
        ("d", "Del"),
        ("R", "Reload"),
        ("h", "Help"),
        ("q", "Quit"),
    ];

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 {
        4
    } else if area.width < 80 {
        6
    } else {
        hints.len()
    };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(accent())),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_dim())),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn draw_help_popup(f: &mut Frame) {
    let popup_area = centered_rect(60, 60, f.area());

    f.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled(
            "═══ Navigation ═══",
            Style::default().fg(header()).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("  ↑/↓ j/k   ", Style::default().fg(accent())),
            Span::raw("Move up/down in the table"),
        ]),
        Line::from(vec![
            Span::styled("  Enter     ", Style::default().fg(accent())),
            Span::raw("Select the highlighted simulation"),
        ]),
        Line::from(vec![
            Span::styled("  Esc       ", Style::default().fg(accent())),
            Span::raw("Clear the selection"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "═══ Actions ═══",
            Style::default().fg(header()).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("  e         ", Style::default().fg(accent())),
            Span::raw("Edit the selected simulation"),
        ]),
        Line::from(vec![
            Span::styled("  n         ", Style::default().fg(accent())),
            Span::raw("Create a new simulation"),
        ]),
        Line::from(vec![
            Span::styled("  d         ", Style::default().fg(accent())),
            Span::raw("Delete the selected simulation"),
        ]),
        Line::from(vec![
            Span::styled("  R         ", Style::default().fg(accent())),
            Span::raw("Reload the collection from disk"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "═══ Mouse ═══",
            Style::default().fg(header()).add_modifier(Modifier::BOLD),
        )),
        Line::from("  Click a name to select, or the 󰏫 / 󰅖 icons"),
        Line::from("  to edit or delete that row."),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("h", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text).block(
        Block::default()
            .title(Span::styled(" 󰋖 simboard Help ", Style::default().fg(accent())))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent())),
    );

    f.render_widget(help, popup_area);
}

fn draw_confirm_popup(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(40, 20, f.area());

    f.render_widget(Clear, popup_area);

    let message = app.status_message.as_deref().unwrap_or("Confirm?");

    let confirm = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(warning()))),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y", Style::default().fg(success()).add_modifier(Modifier::BOLD)),
            Span::raw(" Yes   "),
            Span::styled("n", Style::default().fg(danger()).add_modifier(Modifier::BOLD)),
            Span::raw(" No"),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" Confirm ", Style::default().fg(warning())))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(warning())),
    )
    .alignment(Alignment::Center);

    f.render_widget(confirm, popup_area);
}

fn draw_edit_form(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(50, 40, f.area());

    f.render_widget(Clear, popup_area);

    let title = if app.edit_target.is_some() {
        " Edit Simulation "
    } else {
        " New Simulation "
    };
    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(accent())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent()));
    f.render_widget(block, popup_area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Name
            Constraint::Length(3), // Status
            Constraint::Length(1), // Hint line
        ])
        .split(popup_area);

    draw_form_input(f, inner[0], "Name", &app.input_name, app.edit_field == EditField::Name);
    draw_form_input(
        f,
        inner[1],
        "Status",
        &app.input_status,
        app.edit_field == EditField::Status,
    );

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("Enter", Style::default().fg(success())),
        Span::raw(" save │ "),
        Span::styled("Tab", Style::default().fg(accent())),
        Span::raw(" switch │ "),
        Span::styled("Esc", Style::default().fg(danger())),
        Span::raw(" cancel"),
    ]))
    .alignment(Alignment::Center)
    .style(Style::default().fg(text_dim()));
    f.render_widget(hint, inner[2]);
}

fn draw_form_input(f: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let border = if focused { accent() } else { inactive() };
    let cursor = if focused { "_" } else { "" };

    let input = Paragraph::new(format!("{}{}", value, cursor))
        .style(Style::default().fg(text()))
        .block(
            Block::default()
                .title(Span::styled(
                    format!(" {} ", label),
                    Style::default().fg(if focused { accent() } else { header() }),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
    f.render_widget(input, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
