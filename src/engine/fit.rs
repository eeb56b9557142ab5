//! Text/arrow fit negotiation
//!
//! One decision function owns the interaction between the fit policy, the
//! forced-inside and outside-arrow-suppression flags, the text-move policy
//! and a user-dragged text position. Keeping the truth table in one place is
//! deliberate; the original behavior was scattered over boolean overrides.

use crate::style::{FitPolicy, TextMovePolicy};
use tracing::trace;

/// Inputs of a fit negotiation
#[derive(Debug, Clone, Copy)]
pub struct FitInput {
    /// Usable span between the extension lines (or along the arc)
    pub span: f64,
    /// Text box width including no margins
    pub text_width: f64,
    /// Arrowhead length consumed at each end
    pub arrow_size: f64,
    /// Text gap margin
    pub gap: f64,
    /// Strategy order when not everything fits
    pub policy: FitPolicy,
    /// DIMTIX: keep text between the extension lines regardless
    pub force_text_inside: bool,
    /// DIMSOXD: hide arrows that would land outside
    pub suppress_outside_arrows: bool,
    /// DIMTOFL: always draw the line between the extension lines
    pub force_inner_line: bool,
    /// Text position was dragged by the user
    pub user_positioned: bool,
    /// For a user position: whether it lies between the extension lines
    pub user_inside: bool,
    /// DIMTMOVE: what follows the text when it leaves the line
    pub text_move: TextMovePolicy,
}

/// Outcome of a fit negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitOutcome {
    /// Text sits between the extension lines
    pub text_inside: bool,
    /// Arrows sit between the extension lines
    pub arrows_inside: bool,
    /// Arrows are drawn at all (outside arrows may be suppressed)
    pub arrows_drawn: bool,
    /// Detached text gets a leader back to the dimension line
    pub needs_leader: bool,
    /// Draw the segment between the extension lines even with everything
    /// outside
    pub draw_inner_line: bool,
}

/// Negotiate placement of text and arrows for a measured span
pub fn negotiate(input: &FitInput) -> FitOutcome {
    let arrows_room = 2.0 * input.arrow_size;
    let text_room = input.text_width + 2.0 * input.gap;
    let fits_both = input.span >= arrows_room + text_room;
    let fits_text = input.span >= text_room;
    let fits_arrows = input.span >= arrows_room;

    let (mut text_inside, arrows_inside) = if input.user_positioned {
        // The dragged position is authoritative; only the arrows adapt.
        let arrows_inside = if input.user_inside {
            fits_both
        } else {
            fits_arrows
        };
        (input.user_inside, arrows_inside)
    } else {
        match input.policy {
            FitPolicy::BothOutside => {
                if fits_both {
                    (true, true)
                } else {
                    (false, false)
                }
            }
            FitPolicy::ArrowsFirst => {
                if fits_both {
                    (true, true)
                } else if fits_text {
                    (true, false)
                } else {
                    (false, false)
                }
            }
            FitPolicy::TextFirst => {
                if fits_both {
                    (true, true)
                } else if fits_arrows {
                    (false, true)
                } else {
                    (false, false)
                }
            }
            FitPolicy::BestFit => {
                if fits_both {
                    (true, true)
                } else if fits_text {
                    (true, false)
                } else if fits_arrows {
                    (false, true)
                } else {
                    (false, false)
                }
            }
        }
    };

    // A dragged position is authoritative; the forced-inside flag only
    // steers default placement.
    if input.force_text_inside && !input.user_positioned {
        text_inside = true;
    }

    let arrows_drawn = arrows_inside || !input.suppress_outside_arrows;
    let needs_leader =
        !text_inside && !input.user_positioned && input.text_move == TextMovePolicy::AddLeader
            || input.user_positioned
                && !input.user_inside
                && input.text_move == TextMovePolicy::AddLeader;
    let draw_inner_line = arrows_inside || input.force_inner_line;

    let outcome = FitOutcome {
        text_inside,
        arrows_inside,
        arrows_drawn,
        needs_leader,
        draw_inner_line,
    };
    trace!(?outcome, span = input.span, "fit negotiated");
    outcome
}
