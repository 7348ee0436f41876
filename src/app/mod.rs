mod popups;
mod state;

use crossterm::event::KeyCode;

use crate::types::RecordKind;

pub use popups::{AddInput, AddPopup, ConfirmPopup, FilterPopup, MultiSelectPopup, NoticePopup};
pub use state::App;

/// Possible input events the app reacts to.
pub enum AppEvent {
    Tick,
    KeyPress(KeyCode),
    Resize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppView {
    NewShift,
    Table(RecordKind),
    Help,
}

impl AppView {
    pub fn title(self) -> &'static str {
        match self {
            AppView::NewShift => "New Shift",
            AppView::Table(kind) => crate::schema::schema_for(kind).title,
            AppView::Help => "Help",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusMode {
    TabBar,
    Content,
}

pub const TABS: [AppView; 8] = [
    AppView::NewShift,
    AppView::Table(RecordKind::Shift),
    AppView::Table(RecordKind::Section),
    AppView::Table(RecordKind::ShiftTime),
    AppView::Table(RecordKind::WorkLeader),
    AppView::Table(RecordKind::ConstructionLeader),
    AppView::Table(RecordKind::Staff),
    AppView::Table(RecordKind::Inventory),
];
