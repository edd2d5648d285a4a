//! Cell sequencing.
//!
//! Two contracts live here:
//! - `next_cell`: which *open* cell (active and not yet answered) to ask for
//!   after the current one, walking either along periods or down groups.
//! - `adjacent_cell`: literal visual neighbour for arrow-key movement. It may
//!   land on a solved cell and only skips inactive cells.
//!
//! The f-block series are the irregular part: they have no group, sit in two
//! detached rows, and rejoin the main table after their last member.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{
    self, ACTINIDE_END, ACTINIDE_START, Category, ELEMENTS, Element, LANTHANIDE_END,
    LANTHANIDE_START,
};

/// Persisted per-user traversal policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavDirection {
    /// Period by period, left to right.
    #[default]
    Horizontal,
    /// Group by group, top to bottom.
    Vertical,
}

impl NavDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            NavDirection::Horizontal => "horizontal",
            NavDirection::Vertical => "vertical",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "horizontal" | "period" => Some(NavDirection::Horizontal),
            "vertical" | "group" => Some(NavDirection::Vertical),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Accepts `up` / `ArrowUp` style key names.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim();
        let key = key.strip_prefix("Arrow").unwrap_or(key);
        match key.to_ascii_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Number of columns in each f-block row.
const F_SERIES_LEN: u8 = LANTHANIDE_END - LANTHANIDE_START + 1;

/// Visual column of the first f-block cell in the detached rows.
const F_ROW_FIRST_COLUMN: u8 = 4;

// --- Next open cell -----------------------------------------------------------

/// Next cell to ask for, given the active and solved sets.
pub fn next_cell(
    current: &Element,
    nav: NavDirection,
    active: &BTreeSet<u8>,
    solved: &BTreeSet<u8>,
) -> Option<&'static Element> {
    next_cell_where(current, nav, |n| active.contains(&n) && !solved.contains(&n))
}

/// Same as [`next_cell`] with a caller-supplied notion of "open" (recall mode
/// also treats buffered answers as closed).
pub fn next_cell_where(
    current: &Element,
    nav: NavDirection,
    open: impl Fn(u8) -> bool,
) -> Option<&'static Element> {
    let scanned = match nav {
        NavDirection::Horizontal => next_by_period(current, &open),
        NavDirection::Vertical => next_by_group(current, &open),
    };
    scanned.or_else(|| {
        log::debug!(
            "no {} successor for {}, falling back to first open cell",
            nav.as_str(),
            current.symbol
        );
        first_open(&open)
    })
}

/// Lowest-numbered open cell anywhere on the table.
pub fn first_open(open: impl Fn(u8) -> bool) -> Option<&'static Element> {
    first_where(&open, |_| true)
}

// ELEMENTS is ordered by atomic number, so the first hit is the lowest one.
fn first_where(
    open: &impl Fn(u8) -> bool,
    pred: impl Fn(&Element) -> bool,
) -> Option<&'static Element> {
    ELEMENTS
        .iter()
        .find(|e| open(e.atomic_number) && pred(e))
}

fn next_by_period(current: &Element, open: &impl Fn(u8) -> bool) -> Option<&'static Element> {
    let atomic = current.atomic_number;
    match current.category {
        Category::Lanthanide => first_where(open, |e| {
            e.category == Category::Lanthanide && e.atomic_number > atomic
        })
        .or_else(|| first_where(open, |e| e.period == 6 && e.atomic_number > LANTHANIDE_END)),
        Category::Actinide => first_where(open, |e| {
            e.category == Category::Actinide && e.atomic_number > atomic
        })
        .or_else(|| first_where(open, |e| e.period == 7 && e.atomic_number > ACTINIDE_END)),
        // noble gases close their row
        _ if current.group == Some(18) => first_where(open, |e| e.period == current.period + 1),
        _ => first_where(open, |e| e.period == current.period && e.atomic_number > atomic)
            .or_else(|| first_where(open, |e| e.period == current.period + 1)),
    }
}

fn next_by_group(current: &Element, open: &impl Fn(u8) -> bool) -> Option<&'static Element> {
    if let Some(offset) = current.f_series_offset() {
        // Each f-block column is a lanthanide with its actinide underneath.
        if current.category == Category::Lanthanide && open(ACTINIDE_START + offset) {
            return catalog::element(ACTINIDE_START + offset);
        }
        let next_column = offset + 1;
        if next_column >= F_SERIES_LEN {
            return None;
        }
        return [LANTHANIDE_START + next_column, ACTINIDE_START + next_column]
            .into_iter()
            .find(|n| open(*n))
            .and_then(catalog::element);
    }

    let group = current.group?;
    first_where(open, |e| e.group == Some(group) && e.period > current.period).or_else(|| {
        if group < 18 {
            first_where(open, |e| e.group == Some(group + 1))
        } else {
            None
        }
    })
}

// --- Arrow-key adjacency ------------------------------------------------------

/// Visual neighbour of `current` among active cells.
pub fn adjacent_cell(
    current: &Element,
    direction: Direction,
    active: &BTreeSet<u8>,
) -> Option<&'static Element> {
    let is_active = |e: &&'static Element| active.contains(&e.atomic_number);
    match direction {
        Direction::Left | Direction::Right => {
            let row: Vec<&'static Element> = ELEMENTS
                .iter()
                .filter(is_active)
                .filter(|e| {
                    if current.category.is_f_series() {
                        e.category == current.category
                    } else {
                        // f-block cells are drawn in their own rows
                        e.period == current.period && !e.category.is_f_series()
                    }
                })
                .collect();
            step_within(&row, current, direction == Direction::Right)
        }
        Direction::Up | Direction::Down => {
            if let Some(offset) = current.f_series_offset() {
                let target = match (current.category, direction) {
                    (Category::Lanthanide, Direction::Down) => {
                        return find_active(ACTINIDE_START + offset, active);
                    }
                    (Category::Actinide, Direction::Up) => {
                        return find_active(LANTHANIDE_START + offset, active);
                    }
                    (Category::Lanthanide, Direction::Up) => offset + F_ROW_FIRST_COLUMN,
                    // bottom of the table
                    _ => return None,
                };
                return ELEMENTS
                    .iter()
                    .filter(is_active)
                    .find(|e| e.period == 7 && e.group == Some(target));
            }

            let group = current.group?;
            let column: Vec<&'static Element> = ELEMENTS
                .iter()
                .filter(is_active)
                .filter(|e| e.group == Some(group))
                .collect();
            let down = direction == Direction::Down;
            step_within(&column, current, down).or_else(|| {
                // period 7 drops into the lanthanide row under the same column
                let below_main = down
                    && current.period == 7
                    && (F_ROW_FIRST_COLUMN..=18).contains(&group);
                if below_main {
                    find_active(LANTHANIDE_START + group - F_ROW_FIRST_COLUMN, active)
                } else {
                    None
                }
            })
        }
    }
}

fn step_within(
    line: &[&'static Element],
    current: &Element,
    forward: bool,
) -> Option<&'static Element> {
    let idx = line
        .iter()
        .position(|e| e.atomic_number == current.atomic_number)?;
    let next = if forward { idx.checked_add(1)? } else { idx.checked_sub(1)? };
    line.get(next).copied()
}

fn find_active(atomic: u8, active: &BTreeSet<u8>) -> Option<&'static Element> {
    if active.contains(&atomic) {
        catalog::element(atomic)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all() -> BTreeSet<u8> {
        catalog::all_atomic_numbers().collect()
    }

    fn el(n: u8) -> &'static Element {
        catalog::element(n).unwrap()
    }

    fn next_h(n: u8, solved: &BTreeSet<u8>) -> Option<u8> {
        next_cell(el(n), NavDirection::Horizontal, &all(), solved).map(|e| e.atomic_number)
    }

    fn next_v(n: u8, solved: &BTreeSet<u8>) -> Option<u8> {
        next_cell(el(n), NavDirection::Vertical, &all(), solved).map(|e| e.atomic_number)
    }

    #[test]
    fn period_mode_walks_left_to_right() {
        let none = BTreeSet::new();
        assert_eq!(next_h(1, &none), Some(2));
        assert_eq!(next_h(4, &none), Some(5));
        assert_eq!(next_h(20, &none), Some(21));
    }

    #[test]
    fn noble_gas_wraps_to_next_period() {
        let none = BTreeSet::new();
        assert_eq!(next_h(10, &none), Some(11));
        assert_eq!(next_h(2, &none), Some(3));
        assert_eq!(next_h(86, &none), Some(87));
    }

    #[test]
    fn f_series_rejoin_main_table() {
        let none = BTreeSet::new();
        assert_eq!(next_h(56, &none), Some(57));
        assert_eq!(next_h(71, &none), Some(72));
        assert_eq!(next_h(103, &none), Some(104));
        assert_eq!(next_h(88, &none), Some(89));
    }

    #[test]
    fn solved_cells_are_skipped() {
        let solved: BTreeSet<u8> = [11, 12, 13].into_iter().collect();
        assert_eq!(next_h(10, &solved), Some(14));
        // rest of period 3 solved -> next period
        let solved: BTreeSet<u8> = (12..=18).collect();
        assert_eq!(next_h(11, &solved), Some(19));
    }

    #[test]
    fn last_cell_falls_back_to_first_open() {
        let none = BTreeSet::new();
        assert_eq!(next_h(118, &none), Some(1));
        let solved: BTreeSet<u8> = (1..=5).collect();
        assert_eq!(next_h(118, &solved), Some(6));
    }

    #[test]
    fn exhausted_table_has_no_next() {
        let solved = all();
        assert_eq!(next_h(50, &solved), None);
        assert_eq!(next_v(50, &solved), None);
    }

    #[test]
    fn group_mode_walks_down_then_next_group() {
        let none = BTreeSet::new();
        assert_eq!(next_v(1, &none), Some(3));
        assert_eq!(next_v(3, &none), Some(11));
        assert_eq!(next_v(87, &none), Some(4));
        // group 3 holds only Sc and Y in the main table
        assert_eq!(next_v(39, &none), Some(22));
        // bottom of group 18: nothing further, wrap to first open
        assert_eq!(next_v(118, &none), Some(1));
    }

    #[test]
    fn group_mode_pairs_f_series_columns() {
        let none = BTreeSet::new();
        assert_eq!(next_v(57, &none), Some(89));
        assert_eq!(next_v(58, &none), Some(90));
        assert_eq!(next_v(89, &none), Some(58));
        assert_eq!(next_v(103, &none), Some(1));
        let solved: BTreeSet<u8> = [90].into_iter().collect();
        assert_eq!(next_v(58, &solved), Some(59));
    }

    #[test]
    fn inactive_cells_are_never_chosen() {
        let active: BTreeSet<u8> = [1, 2, 10, 18].into_iter().collect();
        let none = BTreeSet::new();
        let next = next_cell(el(10), NavDirection::Horizontal, &active, &none);
        assert_eq!(next.map(|e| e.atomic_number), Some(18));
    }

    #[test]
    fn arrows_follow_visual_grid() {
        let active = all();
        let go = |n: u8, d: Direction| adjacent_cell(el(n), d, &active).map(|e| e.atomic_number);
        assert_eq!(go(56, Direction::Right), Some(72));
        assert_eq!(go(72, Direction::Left), Some(56));
        assert_eq!(go(1, Direction::Left), None);
        assert_eq!(go(2, Direction::Down), Some(10));
        assert_eq!(go(5, Direction::Up), None);
        assert_eq!(go(57, Direction::Down), Some(89));
        assert_eq!(go(90, Direction::Up), Some(58));
        assert_eq!(go(89, Direction::Down), None);
        assert_eq!(go(57, Direction::Up), Some(104));
        assert_eq!(go(104, Direction::Down), Some(57));
        assert_eq!(go(88, Direction::Down), None);
        assert_eq!(go(60, Direction::Right), Some(61));
        assert_eq!(go(71, Direction::Right), None);
    }

    #[test]
    fn arrows_skip_inactive_cells() {
        let mut active = all();
        active.remove(&11);
        let up = adjacent_cell(el(19), Direction::Up, &active);
        assert_eq!(up.map(|e| e.atomic_number), Some(3));
    }

    #[test]
    fn parses_arrow_key_names() {
        assert_eq!(Direction::parse("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::parse("down"), Some(Direction::Down));
        assert_eq!(Direction::parse("Enter"), None);
        assert_eq!(NavDirection::parse("vertical"), Some(NavDirection::Vertical));
    }
}
