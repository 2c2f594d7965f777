use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell as TableCell, Paragraph, Row, Sparkline, Table, Wrap},
};

use crate::core::system_monitor::MetricsHistory;

use super::layout::{Banner, Cell, DashboardLayout, Panel, PanelBody, TableView};

/// Rows needed under the metrics table before the sparklines are drawn
const SPARKLINE_MIN_HEIGHT: u16 = 4;

/// Paint a rendered layout onto the frame
pub fn draw_dashboard(frame: &mut Frame, layout: &DashboardLayout, history: &MetricsHistory) {
    let area = frame.area();
    frame.render_widget(Block::default().style(layout.background), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Footer
        ])
        .split(area);

    draw_header(frame, chunks[0], &layout.header);

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(2, 3), Constraint::Ratio(1, 3)])
        .split(chunks[1]);

    let upper = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(body[0]);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(body[1]);

    draw_metrics(frame, upper[0], &layout.metrics, history);
    draw_panel(frame, upper[1], &layout.services);
    draw_panel(frame, lower[0], &layout.kernel_logs);
    draw_panel(frame, lower[1], &layout.middleware_logs);
    draw_panel(frame, lower[2], &layout.system_logs);

    let footer = Paragraph::new(layout.footer.text.as_str())
        .style(layout.footer.style)
        .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[2]);
}

fn draw_header(frame: &mut Frame, area: Rect, header: &Banner) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(header.style);
    let para = Paragraph::new(header.text.as_str())
        .style(header.style)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(para, area);
}

fn panel_block(panel: &Panel) -> Block<'_> {
    Block::default()
        .title(format!(" {} ", panel.title))
        .borders(Borders::ALL)
        .border_style(panel.border_style)
}

fn draw_panel(frame: &mut Frame, area: Rect, panel: &Panel) {
    let block = panel_block(panel);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    draw_body(frame, inner, &panel.body);
}

fn draw_body(frame: &mut Frame, area: Rect, body: &PanelBody) {
    match body {
        PanelBody::Table(table) => frame.render_widget(build_table(table), area),
        PanelBody::Notice(cell) => {
            let para = Paragraph::new(cell_text(cell))
                .style(cell.style)
                .wrap(Wrap { trim: true });
            frame.render_widget(para, area);
        }
    }
}

/// Metrics panel with usage sparklines under the table when the
/// terminal is tall enough
fn draw_metrics(frame: &mut Frame, area: Rect, panel: &Panel, history: &MetricsHistory) {
    let block = panel_block(panel);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let table_height = match &panel.body {
        PanelBody::Table(table) => table_height(table),
        PanelBody::Notice(cell) => cell.height() as u16,
    };

    if history.is_empty() || inner.height < table_height + SPARKLINE_MIN_HEIGHT {
        draw_body(frame, inner, &panel.body);
        return;
    }

    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(table_height), Constraint::Min(0)])
        .split(inner);
    draw_body(frame, split[0], &panel.body);

    let sparks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(split[1]);

    let (sent, recv) = history.network_as_u64();
    // percent series are scaled by 10; byte series scale to their own peak
    let series = [
        (" CPU ", history.cpu_as_u64(), Some(1000)),
        (" Memory ", history.memory_as_u64(), Some(1000)),
        (" Disk ", history.disk_as_u64(), Some(1000)),
        (" Net sent ", sent, None),
        (" Net recv ", recv, None),
    ];
    for ((title, data, max), area) in series.into_iter().zip(sparks.iter()) {
        let mut spark = Sparkline::default()
            .block(Block::default().title(title).borders(Borders::TOP))
            .data(data)
            .style(panel.border_style);
        if let Some(max) = max {
            spark = spark.max(max);
        }
        frame.render_widget(spark, *area);
    }
}

fn table_height(table: &TableView) -> u16 {
    let separator = usize::from(table.row_separators);
    let rows: usize = table.rows.iter().map(|row| row.height() + separator).sum();
    // header line
    (rows + 1).min(u16::MAX as usize) as u16
}

fn build_table(table: &TableView) -> Table<'_> {
    let header = Row::new(
        table
            .columns
            .iter()
            .map(|column| TableCell::from(column.title.as_str()).style(column.style)),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let margin = u16::from(table.row_separators);
    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|row| {
            let cells = row
                .cells
                .iter()
                .map(|cell| TableCell::from(cell_text(cell)).style(cell.style));
            Row::new(cells)
                .height(row.height() as u16)
                .bottom_margin(margin)
        })
        .collect();

    let widths: Vec<Constraint> = table
        .columns
        .iter()
        .map(|column| match column.width {
            Some(width) => Constraint::Length(width),
            None => Constraint::Fill(1),
        })
        .collect();

    Table::new(rows, widths).header(header).column_spacing(1)
}

fn cell_text(cell: &Cell) -> Text<'_> {
    Text::from(
        cell.lines
            .iter()
            .map(|line| Line::from(line.as_str()))
            .collect::<Vec<_>>(),
    )
}
