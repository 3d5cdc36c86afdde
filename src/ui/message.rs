use crate::playback::WidgetId;

#[derive(Debug, Clone, PartialEq)]
pub enum AppMessage {
    Quit,
    Search(String),
    PreviousPage,
    NextPage,
    TogglePlayback(WidgetId),
    None,
}
