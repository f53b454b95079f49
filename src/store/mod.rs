pub mod colors;
pub mod counters;
pub mod gifs;
pub mod panels;

pub use colors::EmbedColorStore;
pub use counters::{CounterKind, JoinLeaveStore, UserCounters};
pub use gifs::GifStore;
pub use panels::{Panel, PanelStore};
