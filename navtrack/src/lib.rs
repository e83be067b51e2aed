//! navtrack - route progress tracking for turn-by-turn navigation
//!
//! Given a precomputed route and a stream of position fixes, navtrack works
//! out where along the route the traveler is, how far remains, whether they
//! have left the route, and when guidance (voice, banner, custom milestones)
//! is due.
//!
//! # High-Level API
//!
//! For most use cases, the [`engine`] module provides the entry point:
//!
//! ```ignore
//! use navtrack::config::NavigationOptions;
//! use navtrack::engine::NavigationEngine;
//! use navtrack::location::ReplayRouteLocationSource;
//! use navtrack::route::Route;
//!
//! let route = Arc::new(Route::from_json(&json)?);
//! let source = Arc::new(ReplayRouteLocationSource::new(&route, 14.0, Duration::from_secs(1))?);
//!
//! let engine = NavigationEngine::new(NavigationOptions::load()?);
//! engine.add_milestone_listener(Arc::new(|_: &RouteProgress, text: &str, _: &dyn Milestone| {
//!     println!("{text}");
//! }));
//! engine.start_navigation(route, source).await?;
//! ```
//!
//! The lower layers are usable on their own: [`navigation::NavigationRouteProcessor`]
//! computes progress for one fix at a time without any runtime.

pub mod config;
pub mod engine;
pub mod geometry;
pub mod location;
pub mod logging;
pub mod milestone;
pub mod navigation;
pub mod route;

/// Version of the navtrack library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
