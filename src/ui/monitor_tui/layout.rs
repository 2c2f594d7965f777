//! Dashboard layout as plain data.
//!
//! [`render_dashboard`](super::render::render_dashboard) builds a
//! [`DashboardLayout`] every cycle and [`draw`](super::draw) paints it. The
//! split keeps rendering decisions testable without a terminal.

use ratatui::style::Style;

use crate::core::ThemeKind;

use super::palette::StyleTag;

/// Named regions of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Header,
    Metrics,
    Services,
    KernelLogs,
    MiddlewareLogs,
    SystemLogs,
    Footer,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::Header,
        Region::Metrics,
        Region::Services,
        Region::KernelLogs,
        Region::MiddlewareLogs,
        Region::SystemLogs,
        Region::Footer,
    ];

    /// Dotted path of the region in the layout tree
    pub fn path(self) -> &'static str {
        match self {
            Region::Header => "header",
            Region::Metrics => "body.upper.metrics",
            Region::Services => "body.upper.services",
            Region::KernelLogs => "body.lower.kernel",
            Region::MiddlewareLogs => "body.lower.middleware",
            Region::SystemLogs => "body.lower.system",
            Region::Footer => "footer",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|region| region.path() == path)
    }
}

/// One styled cell; multi-line when its text was wrapped
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub lines: Vec<String>,
    pub tag: StyleTag,
    pub style: Style,
}

impl Cell {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn height(&self) -> usize {
        self.lines.len().max(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub title: String,
    pub style: Style,
    /// Fixed width in columns, `None` to share the remaining space
    pub width: Option<u16>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<Cell>,
}

impl TableRow {
    pub fn height(&self) -> usize {
        self.cells.iter().map(Cell::height).max().unwrap_or(1)
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub columns: Vec<Column>,
    pub rows: Vec<TableRow>,
    /// Blank separator line between rows
    pub row_separators: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelBody {
    Table(TableView),
    Notice(Cell),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub border_style: Style,
    pub body: PanelBody,
}

impl Panel {
    pub fn table(&self) -> Option<&TableView> {
        match &self.body {
            PanelBody::Table(table) => Some(table),
            PanelBody::Notice(_) => None,
        }
    }

    pub fn notice(&self) -> Option<&Cell> {
        match &self.body {
            PanelBody::Notice(cell) => Some(cell),
            PanelBody::Table(_) => None,
        }
    }
}

/// Single-line strip (header and footer)
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub text: String,
    pub style: Style,
}

/// Either kind of region content
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegionContent<'a> {
    Banner(&'a Banner),
    Panel(&'a Panel),
}

/// The whole dashboard for one refresh
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardLayout {
    pub theme: ThemeKind,
    pub background: Style,
    pub header: Banner,
    pub metrics: Panel,
    pub services: Panel,
    pub kernel_logs: Panel,
    pub middleware_logs: Panel,
    pub system_logs: Panel,
    pub footer: Banner,
}

impl DashboardLayout {
    pub fn region(&self, region: Region) -> RegionContent<'_> {
        match region {
            Region::Header => RegionContent::Banner(&self.header),
            Region::Metrics => RegionContent::Panel(&self.metrics),
            Region::Services => RegionContent::Panel(&self.services),
            Region::KernelLogs => RegionContent::Panel(&self.kernel_logs),
            Region::MiddlewareLogs => RegionContent::Panel(&self.middleware_logs),
            Region::SystemLogs => RegionContent::Panel(&self.system_logs),
            Region::Footer => RegionContent::Banner(&self.footer),
        }
    }

    pub fn region_by_path(&self, path: &str) -> Option<RegionContent<'_>> {
        Region::from_path(path).map(|region| self.region(region))
    }

    pub fn panel(&self, region: Region) -> Option<&Panel> {
        match self.region(region) {
            RegionContent::Panel(panel) => Some(panel),
            RegionContent::Banner(_) => None,
        }
    }
}
