pub mod coordinator;
pub mod error;
pub mod progress;
pub mod resource;
pub mod ticker;
pub mod widget;

pub use coordinator::PlaybackCoordinator;
pub use error::PlaybackError;
pub use resource::{AudioResource, PlayerEvent, ResourceFactory};
pub use widget::{PlayerWidget, WidgetId};
