//! Configuration for navigation sessions.
//!
//! [`NavigationOptions`] is the single options record consulted by every
//! component of a session. It can be built in code or loaded from an INI file
//! at `~/.navtrack/config.ini`:
//!
//! ```ini
//! [navigation]
//! maneuver_zone_radius = 40
//! snap_to_route = true
//!
//! [off_route]
//! enabled = true
//!
//! [faster_route]
//! enabled = false
//! check_interval = 120
//! ```
//!
//! # Example
//!
//! ```
//! use navtrack::config::NavigationOptions;
//!
//! let options = NavigationOptions::new()
//!     .with_max_turn_completion_offset(25.0)
//!     .with_arrival_radius(15.0);
//! ```

mod defaults;
mod file;
mod options;
mod parser;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use options::NavigationOptions;
