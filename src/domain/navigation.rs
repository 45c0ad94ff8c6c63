//! Keyboard navigation over a calendar grid.
//!
//! A reducer from one key event to a grid transition. The state it acts on
//! is the pair of focusable date and base (page) date; everything else is
//! derived by the widgets.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};

use crate::domain::date::{Granularity, TextDirection};
use crate::domain::focus::{DisabledReasonFn, is_focusable};
use crate::domain::grid::in_page;
use crate::domain::movement::{EnabledPredicate, move_day, move_month};

/// Outcome of reducing one key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// The key is not part of grid navigation; the event is not consumed.
    Ignored,
    /// The focusable date was activated. The only outcome with an external
    /// change effect.
    Selected(NaiveDate),
    /// Focus moves to a new date. When `page_changed` is set the candidate
    /// left the displayed page: apply the base-date change first, then the
    /// focus update.
    Focused {
        /// The new focus target.
        date: NaiveDate,
        /// Whether the candidate falls outside the displayed page.
        page_changed: bool,
    },
}

/// Logical movement axes after direction resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    /// Toward the start of reading order.
    InlineStart,
    /// Toward the end of reading order.
    InlineEnd,
    /// Up one grid row.
    BlockStart,
    /// Down one grid row.
    BlockEnd,
}

/// Maps a key code to a logical move, resolving left/right against the
/// explicit text direction: "left" always means "toward the start of
/// reading order".
fn resolve_move(code: KeyCode, direction: TextDirection) -> Option<Move> {
    let rtl = direction == TextDirection::RightToLeft;
    match code {
        KeyCode::Up => Some(Move::BlockStart),
        KeyCode::Down => Some(Move::BlockEnd),
        KeyCode::Left => Some(if rtl { Move::InlineEnd } else { Move::InlineStart }),
        KeyCode::Right => Some(if rtl { Move::InlineStart } else { Move::InlineEnd }),
        _ => None,
    }
}

/// Grid step for a logical move, in the granularity's units. Block moves
/// jump a full grid row: seven days or a three-month row.
const fn step_for(movement: Move, granularity: Granularity) -> i32 {
    let row = match granularity {
        Granularity::Day => 7,
        Granularity::Month => 3,
    };
    match movement {
        Move::InlineStart => -1,
        Move::InlineEnd => 1,
        Move::BlockStart => -row,
        Move::BlockEnd => row,
    }
}

/// Reduces one key event against the `(focusable, base)` state.
///
/// Activation (Enter/Space) selects the focusable date when it is enabled;
/// a disabled-with-reason date may hold focus but never selection. Arrows
/// move focus across *focusable* dates via bounded movement, reporting
/// whether the candidate left the displayed page. Any other key is ignored
/// and the event is not consumed.
#[must_use]
pub fn reduce(
    key: &KeyEvent,
    granularity: Granularity,
    direction: TextDirection,
    base: NaiveDate,
    focusable: Option<NaiveDate>,
    is_enabled: EnabledPredicate<'_>,
    disabled_reason: DisabledReasonFn<'_>,
) -> NavOutcome {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => match focusable {
            Some(date) if is_enabled(date) => NavOutcome::Selected(date),
            _ => NavOutcome::Ignored,
        },
        code => {
            let Some(movement) = resolve_move(code, direction) else {
                return NavOutcome::Ignored;
            };
            let Some(origin) = focusable else {
                return NavOutcome::Ignored;
            };
            let step = step_for(movement, granularity);
            let can_focus = |date: NaiveDate| is_focusable(date, is_enabled, disabled_reason);
            let candidate = match granularity {
                Granularity::Day => move_day(origin, &can_focus, i64::from(step)),
                Granularity::Month => move_month(origin, &can_focus, step),
            };
            NavOutcome::Focused {
                date: candidate,
                page_changed: !in_page(candidate, base, granularity),
            }
        }
    }
}
