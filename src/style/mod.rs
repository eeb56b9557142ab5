//! Dimension style snapshot (dimvars)
//!
//! A `DimStyle` is the resolved, read-only parameter set a recompute call
//! receives. Field names keep the classic dimvar spellings so the mapping
//! to drawing headers stays obvious. The engine treats the snapshot as
//! immutable for the duration of a call, with one documented exception: the
//! two per-half dimension-line suppression flags may be cleared through
//! [`DimStyle::set_suppress_dim_line1`] / [`DimStyle::set_suppress_dim_line2`]
//! when a merged dimension line cannot honor a single-half suppression.

use crate::types::{Color, Handle, LineWeight};
use bitflags::bitflags;
use once_cell::sync::Lazy;

pub mod arrow;

pub use arrow::ArrowType;

/// Angular unit format (DIMAUNIT)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngularFormat {
    /// Decimal degrees
    #[default]
    DecimalDegrees,
    /// Degrees/minutes/seconds
    DegreesMinutesSeconds,
    /// Gradians
    Gradians,
    /// Radians
    Radians,
}

/// Vertical text placement relative to the dimension line (DIMTAD)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextVertical {
    /// Centered on the dimension line, splitting it
    Centered,
    /// Above the dimension line
    #[default]
    Above,
    /// On the side away from the defining points
    Outside,
    /// JIS placement (above, unconditionally)
    Jis,
}

/// Horizontal text justification along the dimension line (DIMJUST)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextJustification {
    /// Centered between the extension lines
    #[default]
    Center,
    /// Next to the first extension line
    FirstExtension,
    /// Next to the second extension line
    SecondExtension,
}

/// Strategy order when text and arrows do not both fit (DIMATFIT)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitPolicy {
    /// Move both text and arrows outside
    BothOutside,
    /// Move arrows outside first
    ArrowsFirst,
    /// Move text outside first
    TextFirst,
    /// Move whichever fits worse
    #[default]
    BestFit,
}

/// What moves when dimension text is dragged (DIMTMOVE)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMovePolicy {
    /// The dimension line moves with the text
    #[default]
    MoveLine,
    /// A leader connects the text to the dimension line
    AddLeader,
    /// Text floats freely without a leader
    FreeText,
}

/// Arc-length symbol placement (DIMARCSYM)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArcSymbol {
    /// Symbol precedes the measurement text
    #[default]
    Preceding,
    /// Symbol above the text (rendered preceding in this engine)
    Above,
    /// No symbol
    None,
}

bitflags! {
    /// Zero-suppression options (DIMZIN / DIMAZIN / DIMTZIN)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ZeroSuppression: u8 {
        /// No suppression
        const NONE = 0x0;
        /// Suppress the zero before the decimal separator
        const LEADING = 0x1;
        /// Suppress trailing zeros after the decimal separator
        const TRAILING = 0x2;
    }
}

/// A resolved dimension style snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct DimStyle {
    /// Style name
    pub name: String,

    // ─── Dimension line ───
    /// Dimension line color (DIMCLRD)
    pub dimclrd: Color,
    /// Dimension line extension past oblique/tick arrows (DIMDLE)
    pub dimdle: f64,
    /// Gap between the dimension line and the text box (DIMGAP)
    pub dimgap: f64,
    /// Dimension line weight (DIMLWD)
    pub dimlwd: LineWeight,
    /// Suppress the first dimension-line half (DIMSD1)
    pub dimsd1: bool,
    /// Suppress the second dimension-line half (DIMSD2)
    pub dimsd2: bool,
    /// Dimension line linetype (DIMLTYPE)
    pub dimltype: Handle,

    // ─── Extension lines ───
    /// Extension line color (DIMCLRE)
    pub dimclre: Color,
    /// Extension line extension past the dimension line (DIMEXE)
    pub dimexe: f64,
    /// Extension line offset from the defining point (DIMEXO)
    pub dimexo: f64,
    /// Extension line weight (DIMLWE)
    pub dimlwe: LineWeight,
    /// Suppress the first extension line (DIMSE1)
    pub dimse1: bool,
    /// Suppress the second extension line (DIMSE2)
    pub dimse2: bool,
    /// Fixed extension line length (DIMFXL)
    pub dimfxl: f64,
    /// Fixed extension line length enabled (DIMFXLON)
    pub dimfxlon: bool,
    /// First extension line linetype (DIMLTEX1)
    pub dimltex1: Handle,
    /// Second extension line linetype (DIMLTEX2)
    pub dimltex2: Handle,

    // ─── Arrows ───
    /// Arrow size (DIMASZ)
    pub dimasz: f64,
    /// Generic arrowhead (DIMBLK)
    pub dimblk: ArrowType,
    /// First arrowhead override (DIMBLK1, used when DIMSAH is set)
    pub dimblk1: ArrowType,
    /// Second arrowhead override (DIMBLK2, used when DIMSAH is set)
    pub dimblk2: ArrowType,
    /// Leader arrowhead (DIMLDRBLK)
    pub dimldrblk: ArrowType,
    /// Use the per-end arrowhead overrides (DIMSAH)
    pub dimsah: bool,
    /// Center mark size; >0 mark, <0 full lines, 0 none (DIMCEN)
    pub dimcen: f64,
    /// Tick size; nonzero replaces arrowheads with ticks (DIMTSZ)
    pub dimtsz: f64,

    // ─── Text ───
    /// Text color (DIMCLRT)
    pub dimclrt: Color,
    /// Text height (DIMTXT)
    pub dimtxt: f64,
    /// Horizontal justification (DIMJUST)
    pub dimjust: TextJustification,
    /// Vertical placement (DIMTAD)
    pub dimtad: TextVertical,
    /// Vertical offset factor for centered text (DIMTVP)
    pub dimtvp: f64,
    /// Force text between the extension lines (DIMTIX)
    pub dimtix: bool,
    /// Suppress arrows when they land outside (DIMSOXD)
    pub dimsoxd: bool,
    /// Text movement policy (DIMTMOVE)
    pub dimtmove: TextMovePolicy,
    /// Text style name (DIMTXSTY)
    pub dimtxsty: String,

    // ─── Scale / units ───
    /// Overall scale applied to sizes and offsets (DIMSCALE)
    pub dimscale: f64,
    /// Linear measurement scale factor (DIMLFAC)
    pub dimlfac: f64,
    /// Linear decimal places (DIMDEC)
    pub dimdec: u8,
    /// Rounding increment, 0 disables (DIMRND)
    pub dimrnd: f64,
    /// Decimal separator (DIMDSEP)
    pub dimdsep: char,
    /// Linear zero suppression (DIMZIN)
    pub dimzin: ZeroSuppression,

    // ─── Angular ───
    /// Angular unit format (DIMAUNIT)
    pub dimaunit: AngularFormat,
    /// Angular decimal places (DIMADEC)
    pub dimadec: u8,
    /// Angular zero suppression (DIMAZIN)
    pub dimazin: ZeroSuppression,

    // ─── Alternate units ───
    /// Alternate units enabled (DIMALT)
    pub dimalt: bool,
    /// Alternate unit scale factor (DIMALTF)
    pub dimaltf: f64,
    /// Alternate unit decimal places (DIMALTD)
    pub dimaltd: u8,
    /// Alternate unit suffix (DIMAPOST)
    pub dimapost: String,

    // ─── Tolerances ───
    /// Append tolerances (DIMTOL)
    pub dimtol: bool,
    /// Generate limits instead of a value (DIMLIM)
    pub dimlim: bool,
    /// Plus tolerance (DIMTP)
    pub dimtp: f64,
    /// Minus tolerance (DIMTM)
    pub dimtm: f64,
    /// Tolerance decimal places (DIMTDEC)
    pub dimtdec: u8,
    /// Tolerance text height factor (DIMTFAC)
    pub dimtfac: f64,
    /// Tolerance zero suppression (DIMTZIN)
    pub dimtzin: ZeroSuppression,

    // ─── Fit ───
    /// Fit strategy order (DIMATFIT)
    pub dimatfit: FitPolicy,
    /// Always draw the line between the extension lines (DIMTOFL)
    pub dimtofl: bool,

    // ─── Formatting ───
    /// Prefix/suffix pattern with `<>` as the value placeholder (DIMPOST)
    pub dimpost: String,
    /// Arc-length symbol mode (DIMARCSYM)
    pub dimarcsym: ArcSymbol,
    /// Jog slant angle for large-radius jogs (DIMJOGANG)
    pub dimjogang: f64,
}

impl DimStyle {
    /// Create a new dimension style with standard defaults
    pub fn new(name: impl Into<String>) -> Self {
        DimStyle {
            name: name.into(),
            // Dimension line
            dimclrd: Color::ByBlock,
            dimdle: 0.0,
            dimgap: 0.625,
            dimlwd: LineWeight::ByBlock,
            dimsd1: false,
            dimsd2: false,
            dimltype: Handle::NULL,
            // Extension lines
            dimclre: Color::ByBlock,
            dimexe: 1.25,
            dimexo: 0.625,
            dimlwe: LineWeight::ByBlock,
            dimse1: false,
            dimse2: false,
            dimfxl: 1.0,
            dimfxlon: false,
            dimltex1: Handle::NULL,
            dimltex2: Handle::NULL,
            // Arrows
            dimasz: 2.5,
            dimblk: ArrowType::ClosedFilled,
            dimblk1: ArrowType::ClosedFilled,
            dimblk2: ArrowType::ClosedFilled,
            dimldrblk: ArrowType::ClosedFilled,
            dimsah: false,
            dimcen: 2.5,
            dimtsz: 0.0,
            // Text
            dimclrt: Color::ByBlock,
            dimtxt: 2.5,
            dimjust: TextJustification::Center,
            dimtad: TextVertical::Above,
            dimtvp: 0.0,
            dimtix: false,
            dimsoxd: false,
            dimtmove: TextMovePolicy::MoveLine,
            dimtxsty: "Standard".to_string(),
            // Scale/units
            dimscale: 1.0,
            dimlfac: 1.0,
            dimdec: 2,
            dimrnd: 0.0,
            dimdsep: '.',
            dimzin: ZeroSuppression::TRAILING,
            // Angular
            dimaunit: AngularFormat::DecimalDegrees,
            dimadec: 0,
            dimazin: ZeroSuppression::NONE,
            // Alternate units
            dimalt: false,
            dimaltf: 25.4,
            dimaltd: 3,
            dimapost: String::new(),
            // Tolerances
            dimtol: false,
            dimlim: false,
            dimtp: 0.0,
            dimtm: 0.0,
            dimtdec: 2,
            dimtfac: 1.0,
            dimtzin: ZeroSuppression::NONE,
            // Fit
            dimatfit: FitPolicy::BestFit,
            dimtofl: false,
            // Formatting
            dimpost: String::new(),
            dimarcsym: ArcSymbol::Preceding,
            dimjogang: std::f64::consts::FRAC_PI_4,
        }
    }

    /// Create the standard dimension style
    pub fn standard() -> Self {
        STANDARD.clone()
    }

    // ─── Scaled size accessors ───
    // Every size-like dimvar participates in the overall DIMSCALE.

    /// Arrow size scaled by DIMSCALE
    pub fn arrow_size(&self) -> f64 {
        self.dimasz * self.dimscale
    }

    /// Text height scaled by DIMSCALE
    pub fn text_height(&self) -> f64 {
        self.dimtxt * self.dimscale
    }

    /// Text gap scaled by DIMSCALE
    pub fn text_gap(&self) -> f64 {
        self.dimgap * self.dimscale
    }

    /// Extension-line overshoot scaled by DIMSCALE
    pub fn ext_extension(&self) -> f64 {
        self.dimexe * self.dimscale
    }

    /// Extension-line start offset scaled by DIMSCALE
    pub fn ext_offset(&self) -> f64 {
        self.dimexo * self.dimscale
    }

    /// Dimension-line extension past tick arrows scaled by DIMSCALE
    pub fn line_extension(&self) -> f64 {
        self.dimdle * self.dimscale
    }

    /// Center mark size scaled by DIMSCALE, sign preserved
    pub fn center_mark(&self) -> f64 {
        self.dimcen * self.dimscale
    }

    /// Tick size scaled by DIMSCALE
    pub fn tick_size(&self) -> f64 {
        self.dimtsz * self.dimscale
    }

    /// Fixed extension length scaled by DIMSCALE
    pub fn fixed_ext_length(&self) -> f64 {
        self.dimfxl * self.dimscale
    }

    /// Arrowhead for the first dimension-line end
    pub fn first_arrow(&self) -> ArrowType {
        if self.dimtsz > 0.0 {
            ArrowType::Oblique
        } else if self.dimsah {
            self.dimblk1
        } else {
            self.dimblk
        }
    }

    /// Arrowhead for the second dimension-line end
    pub fn second_arrow(&self) -> ArrowType {
        if self.dimtsz > 0.0 {
            ArrowType::Oblique
        } else if self.dimsah {
            self.dimblk2
        } else {
            self.dimblk
        }
    }

    // ─── Documented mutable accessors ───

    /// Clear or set the first dimension-line-half suppression flag.
    ///
    /// One of the two style writes a recompute call is allowed to make: when
    /// the dimension line renders as a single merged segment, a lone per-half
    /// suppression cannot apply and both flags are rewritten.
    pub fn set_suppress_dim_line1(&mut self, suppress: bool) {
        self.dimsd1 = suppress;
    }

    /// Clear or set the second dimension-line-half suppression flag.
    ///
    /// See [`DimStyle::set_suppress_dim_line1`].
    pub fn set_suppress_dim_line2(&mut self, suppress: bool) {
        self.dimsd2 = suppress;
    }
}

impl Default for DimStyle {
    fn default() -> Self {
        DimStyle::new("Standard")
    }
}

/// Shared standard style snapshot
static STANDARD: Lazy<DimStyle> = Lazy::new(|| DimStyle::new("Standard"));
