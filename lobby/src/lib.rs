pub mod clock;
pub mod config;
pub mod error;
pub mod gameplay;
pub mod handlers;
pub mod logging;
pub mod persistence;
pub mod services;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LobbyConfig;
pub use handlers::{Lobby, LobbyStatus, LobbyView, SceneTransition};
pub use persistence::SaveFile;
