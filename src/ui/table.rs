//! The simulations table component.
//!
//! A pure props-driven component: every input it renders from (the record
//! collection, the selected index, the three callbacks, passthrough
//! presentation) arrives through `SimulationsTableProps`. The component
//! itself only keeps the geometry of its last render so mouse clicks can be
//! resolved back to rows and cells.
//!
//! Callbacks map an activation to an app-level action: the name cell yields
//! `on_select` with the row's positional index, while the edit and delete
//! icon cells yield `on_edit`/`on_delete` with the record's own id. The
//! index/id asymmetry on select is kept as observed upstream behavior.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Paragraph, Row, Table},
    Frame,
};

use super::{accent, bg_selected, danger, header, success, text, text_dim};
use crate::models::Simulation;

/// What a click or keypress on the table resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAction {
    /// Name cell activated; carries the row's positional index.
    Select(usize),
    /// Edit icon activated; carries the record's own id.
    Edit(u64),
    /// Delete icon activated; carries the record's own id.
    Delete(u64),
}

/// All inputs for one render or hit test. Recognized inputs are explicit
/// fields; `block` and `style` are forwarded verbatim onto the root element.
pub struct SimulationsTableProps<'a, S, E, D> {
    /// Absent or empty shows the empty-state message instead of a table.
    pub simulations: Option<&'a [Simulation]>,
    /// Row to mark with the selected background, if any.
    pub selected: Option<usize>,
    pub block: Option<Block<'a>>,
    pub style: Style,
    pub on_select: S,
    pub on_edit: E,
    pub on_delete: D,
}

const EMPTY_MESSAGE: &str = "Please add a new simulation.";

/// name | status | edit | delete
const COLUMN_WIDTHS: [Constraint; 4] = [
    Constraint::Percentage(55),
    Constraint::Percentage(25),
    Constraint::Length(6),
    Constraint::Length(6),
];

#[derive(Debug, Default)]
pub struct SimulationsTable {
    /// Inner area of the last render, for hit testing.
    inner: Option<Rect>,
}

impl SimulationsTable {
    pub fn render<S, E, D>(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        props: SimulationsTableProps<S, E, D>,
    ) {
        let inner = match &props.block {
            Some(block) => block.inner(area),
            None => area,
        };
        self.inner = Some(inner);

        let sims = props.simulations.filter(|s| !s.is_empty());
        let Some(sims) = sims else {
            let mut message = Paragraph::new(Span::styled(
                EMPTY_MESSAGE,
                Style::default().fg(text_dim()),
            ))
            .style(props.style);
            if let Some(block) = props.block {
                message = message.block(block);
            }
            frame.render_widget(message, area);
            return;
        };

        let header_row = Row::new(vec![
            Span::styled("Name", Style::default().fg(header())),
            Span::styled("Status", Style::default().fg(header())),
            Span::styled("(e)dit", Style::default().fg(header())),
            Span::styled("(d)el", Style::default().fg(header())),
        ]);

        let rows: Vec<Row> = sims
            .iter()
            .enumerate()
            .map(|(i, sim)| {
                let status_color = match sim.status.as_str() {
                    "ready" => success(),
                    "running" => accent(),
                    "error" | "failed" => danger(),
                    _ => text_dim(),
                };

                let row_style = if props.selected == Some(i) {
                    Style::default().bg(bg_selected()).fg(text())
                } else {
                    Style::default()
                };

                Row::new(vec![
                    Span::styled(sim.name.as_str(), Style::default().fg(text())),
                    Span::styled(sim.status.as_str(), Style::default().fg(status_color)),
                    Span::styled("󰏫", Style::default().fg(accent())),
                    Span::styled("󰅖", Style::default().fg(danger())),
                ])
                .style(row_style)
            })
            .collect();

        let mut table = Table::new(rows, COLUMN_WIDTHS)
            .header(header_row)
            .column_spacing(1)
            .style(props.style);
        if let Some(block) = props.block {
            table = table.block(block);
        }
        frame.render_widget(table, area);
    }

    /// Resolve a mouse event against the last render. Returns the action the
    /// matching callback produced, or None for misses, status cells, and
    /// anything that isn't a left-button press.
    pub fn handle_mouse<A, S, E, D>(
        &self,
        event: &MouseEvent,
        props: SimulationsTableProps<S, E, D>,
    ) -> Option<A>
    where
        S: Fn(usize) -> A,
        E: Fn(u64) -> A,
        D: Fn(u64) -> A,
    {
        if !matches!(event.kind, MouseEventKind::Down(MouseButton::Left)) {
            return None;
        }

        let inner = self.inner?;
        let sims = props.simulations.filter(|s| !s.is_empty())?;

        let pos = Position::new(event.column, event.row);
        if !inner.contains(pos) {
            return None;
        }

        // First body row sits below the single-line header
        let index = event.row.checked_sub(inner.y + 1)? as usize;
        let sim = sims.get(index)?;

        let cols = Self::column_rects(inner);
        if cols[0].contains(pos) {
            Some((props.on_select)(index))
        } else if cols[2].contains(pos) {
            Some((props.on_edit)(sim.id))
        } else if cols[3].contains(pos) {
            Some((props.on_delete)(sim.id))
        } else {
            None
        }
    }

    /// Same column geometry the table renders with, so render and hit
    /// testing can never disagree.
    fn column_rects(inner: Rect) -> [Rect; 4] {
        let rects = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(COLUMN_WIDTHS)
            .spacing(1)
            .split(inner);
        [rects[0], rects[1], rects[2], rects[3]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, buffer::Buffer, widgets::Borders, Terminal};

    const AREA: Rect = Rect {
        x: 0,
        y: 0,
        width: 60,
        height: 10,
    };

    type Props<'a> = SimulationsTableProps<
        'a,
        fn(usize) -> TableAction,
        fn(u64) -> TableAction,
        fn(u64) -> TableAction,
    >;

    fn sims() -> Vec<Simulation> {
        vec![
            Simulation::new(5, "alpha", "ready"),
            Simulation::new(9, "beta", "error"),
        ]
    }

    fn props(simulations: Option<&[Simulation]>, selected: Option<usize>) -> Props<'_> {
        SimulationsTableProps {
            simulations,
            selected,
            block: Some(Block::default().borders(Borders::ALL)),
            style: Style::default(),
            on_select: TableAction::Select,
            on_edit: TableAction::Edit,
            on_delete: TableAction::Delete,
        }
    }

    fn draw(
        table: &mut SimulationsTable,
        simulations: Option<&[Simulation]>,
        selected: Option<usize>,
    ) -> Buffer {
        let backend = TestBackend::new(AREA.width, AREA.height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| table.render(f, AREA, props(simulations, selected)))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell((x, y)).unwrap().symbol())
            .collect()
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn inner() -> Rect {
        Block::default().borders(Borders::ALL).inner(AREA)
    }

    #[test]
    fn test_renders_one_row_per_record() {
        let records = sims();
        let buf = draw(&mut SimulationsTable::default(), Some(&records), None);

        // header, then one body row per record in collection order
        assert!(row_text(&buf, 1).contains("Name"));
        assert!(row_text(&buf, 2).contains("alpha"));
        assert!(row_text(&buf, 2).contains("ready"));
        assert!(row_text(&buf, 3).contains("beta"));
        assert!(row_text(&buf, 3).contains("error"));
        assert!(!row_text(&buf, 4).contains("alpha"));
    }

    #[test]
    fn test_absent_collection_shows_message() {
        let buf = draw(&mut SimulationsTable::default(), None, None);

        assert!(row_text(&buf, 1).contains("Please add a new simulation."));
        assert!(!row_text(&buf, 1).contains("Name"));
    }

    #[test]
    fn test_empty_collection_shows_message() {
        let buf = draw(&mut SimulationsTable::default(), Some(&[]), None);
        assert!(row_text(&buf, 1).contains("Please add a new simulation."));
    }

    #[test]
    fn test_only_selected_row_is_highlighted() {
        let records = sims();
        let buf = draw(&mut SimulationsTable::default(), Some(&records), Some(1));

        let unselected = buf.cell((2, 2)).unwrap().style();
        let selected = buf.cell((2, 3)).unwrap().style();
        assert_ne!(selected.bg, unselected.bg);
    }

    #[test]
    fn test_click_name_cell_selects_by_index() {
        let records = sims();
        let mut table = SimulationsTable::default();
        draw(&mut table, Some(&records), None);

        let cols = SimulationsTable::column_rects(inner());
        let action = table.handle_mouse(&click(cols[0].x + 1, inner().y + 1), props(Some(&records), None));
        assert_eq!(action, Some(TableAction::Select(0)));
    }

    #[test]
    fn test_click_edit_icon_uses_record_id() {
        let records = sims();
        let mut table = SimulationsTable::default();
        draw(&mut table, Some(&records), None);

        let cols = SimulationsTable::column_rects(inner());
        let action = table.handle_mouse(&click(cols[2].x, inner().y + 2), props(Some(&records), None));
        assert_eq!(action, Some(TableAction::Edit(9)));
    }

    #[test]
    fn test_click_delete_icon_uses_record_id() {
        let records = sims();
        let mut table = SimulationsTable::default();
        draw(&mut table, Some(&records), None);

        let cols = SimulationsTable::column_rects(inner());
        let action = table.handle_mouse(&click(cols[3].x, inner().y + 2), props(Some(&records), None));
        assert_eq!(action, Some(TableAction::Delete(9)));
    }

    #[test]
    fn test_click_status_cell_is_ignored() {
        let records = sims();
        let mut table = SimulationsTable::default();
        draw(&mut table, Some(&records), None);

        let cols = SimulationsTable::column_rects(inner());
        let action: Option<TableAction> =
            table.handle_mouse(&click(cols[1].x + 1, inner().y + 1), props(Some(&records), None));
        assert_eq!(action, None);
    }

    #[test]
    fn test_click_header_and_past_end_are_ignored() {
        let records = sims();
        let mut table = SimulationsTable::default();
        draw(&mut table, Some(&records), None);

        let cols = SimulationsTable::column_rects(inner());
        let on_header: Option<TableAction> =
            table.handle_mouse(&click(cols[0].x, inner().y), props(Some(&records), None));
        assert_eq!(on_header, None);

        let past_end: Option<TableAction> =
            table.handle_mouse(&click(cols[0].x, inner().y + 5), props(Some(&records), None));
        assert_eq!(past_end, None);
    }

    #[test]
    fn test_mouse_before_first_render_is_ignored() {
        let records = sims();
        let table = SimulationsTable::default();
        let action: Option<TableAction> =
            table.handle_mouse(&click(5, 2), props(Some(&records), None));
        assert_eq!(action, None);
    }
}
