mod browse;
mod compare;
mod images;

pub(super) use browse::{BrowseEntry, BrowseView};
pub(super) use compare::{CompareView, SharedState};
pub(super) use images::ImagesView;
