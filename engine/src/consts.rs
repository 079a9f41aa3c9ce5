//! Shared numeric and string constants for the editing engine.

// ── File format ─────────────────────────────────────────────────

/// Value of the `type` marker at the top of a `.folio` document.
pub const FILE_TYPE: &str = "folio";

/// Schema version written by [`crate::file::FolioFile::from_scene`].
pub const FILE_VERSION: &str = "1";

/// Default canvas background color.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

// ── Camera ──────────────────────────────────────────────────────

/// Smallest zoom factor the camera accepts.
pub const ZOOM_MIN: f64 = 0.1;

/// Largest zoom factor the camera accepts.
pub const ZOOM_MAX: f64 = 5.0;

/// Multiplicative zoom step for keyboard and wheel zoom.
pub const ZOOM_STEP: f64 = 1.1;

// ── Grid and nudging ────────────────────────────────────────────

/// Grid spacing in world units.
pub const GRID_SIZE: f64 = 20.0;

/// Arrow-key nudge distance in world units.
pub const NUDGE_STEP: f64 = 1.0;

/// Arrow-key nudge distance with Shift held.
pub const NUDGE_STEP_LARGE: f64 = 10.0;

/// Offset applied to pasted and duplicated elements.
pub const PASTE_OFFSET: f64 = 20.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for handles and thin strokes.
pub const HIT_TOLERANCE_PX: f64 = 8.0;

/// Number of segments used to sample a quadratic curve for hit-testing.
pub const CURVE_SAMPLES: usize = 24;

// ── Element sizing ──────────────────────────────────────────────

/// Minimum width and height of a shape; also the size of a click-created shape.
pub const SHAPE_MIN_SIZE: f64 = 20.0;

/// Minimum extent of any other box element.
pub const ELEMENT_MIN_SIZE: f64 = 1.0;

/// Side length of a sticky note created by a click.
pub const NOTE_SIZE: f64 = 200.0;

/// Minimum side length of a sticky note.
pub const NOTE_MIN_SIZE: f64 = 80.0;

/// Length given to an arrow created without dragging.
pub const ARROW_DEFAULT_LENGTH: f64 = 100.0;

/// Minimum width of a text element while it is empty.
pub const TEXT_MIN_WIDTH: f64 = 8.0;

/// Smallest font size a text resize may choose.
pub const TEXT_SIZE_MIN: f64 = 8.0;

/// Largest font size a text resize may choose.
pub const TEXT_SIZE_MAX: f64 = 400.0;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f64 = 1.2;

/// Average glyph advance as a multiple of the font size (approximate measure).
pub const GLYPH_ADVANCE: f64 = 0.6;

// ── Stroke styling ──────────────────────────────────────────────

/// Dash length as a multiple of the stroke width for `dashed` strokes.
pub const DASH_FACTOR: f64 = 4.0;

/// Spacing between hatch lines as a multiple of the stroke width.
pub const HATCH_GAP_FACTOR: f64 = 4.0;

/// Smallest spacing between hatch lines, in world units.
pub const HATCH_GAP_MIN: f64 = 2.0;

/// Most hatch lines generated for one fill.
pub const HATCH_MAX_LINES: f64 = 4096.0;

/// Angle of hatch lines in degrees.
pub const HATCH_ANGLE_DEG: f64 = -45.0;

/// Tolerance for simplifying freehand strokes, in world units.
pub const SIMPLIFY_TOLERANCE: f64 = 0.5;

/// Color value meaning "no stroke".
pub const TRANSPARENT: &str = "transparent";

// ── Style defaults ──────────────────────────────────────────────

pub const DEFAULT_STROKE_COLOR: &str = "#0d0f0e";
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
pub const DEFAULT_FILL_COLOR: &str = "#ffffff";
pub const DEFAULT_TEXT_COLOR: &str = "#0d0f0e";
pub const DEFAULT_TEXT_FONT: &str = "sans";
pub const DEFAULT_TEXT_SIZE: f64 = 16.0;
pub const DEFAULT_NOTE_COLOR: &str = "#fff9b1";
