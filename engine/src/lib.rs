//! Editing engine for the Folio vector drawing surface.
//!
//! The crate owns everything between raw input events and the scene: the
//! element model and its per-kind behaviors, the gesture state machine,
//! hit-testing, selection and group rules, and the undo/redo log. Painting
//! is left to the host, which reads a display list built by [`render`] and
//! reacts to the [`engine::Action`]s every entry point returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Command surface: input dispatch and editor commands |
//! | [`input`] | Tools, modifiers and the gesture state machine types |
//! | [`scene`] | Ordered element store with document-level state |
//! | [`element`] | Element data model and generic field access |
//! | [`registry`] | Per-kind behaviors behind a closed dispatch table |
//! | [`history`] | Linear undo/redo log |
//! | [`selection`] | Bounds, marquee and group queries |
//! | [`hit`] | Body and handle hit-testing |
//! | [`geom`] | Geometry kernel: dashes, paths, hatching, simplification |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`render`] | Display list for hosts to paint |
//! | [`file`] | `.folio` file codec |
//! | [`config`] | Editor settings from the environment |
//! | [`consts`] | Shared constants (zoom limits, minimum sizes, defaults) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod element;
pub mod engine;
pub mod file;
pub mod geom;
pub mod history;
pub mod hit;
pub mod input;
pub mod registry;
pub mod render;
pub mod scene;
pub mod selection;
