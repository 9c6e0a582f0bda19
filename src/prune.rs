//! Early rejection of (rotor 1, rotor 2) start pairs from the first sample digit.
//!
//! With weights 1, 2, 4, 8 and 10, twenty of the 26 digits can only be formed
//! with rotors 1 and 2 reading the same raw cam, or only with them reading
//! different cams. At tick 0 those two rotors are in one of two states:
//! untouched, or moved by the gated cascade of phases I and II. A pair is
//! rejected when neither state gives the relation the first digit needs.

use super::machine::{READ, SENSE};
use super::rotor::Rotor;

/// Digits only produced when rotors 1 and 2 read identical cams
pub const EQUAL_DIGITS: [u8; 10] = [0, 3, 4, 7, 8, 17, 18, 21, 22, 25];

/// Digits only produced when rotors 1 and 2 read differing cams
pub const DIFFER_DIGITS: [u8; 10] = [1, 2, 5, 6, 9, 16, 19, 20, 23, 24];

/// Relation between the cams of rotors 1 and 2 imposed by a digit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constraint {
    RequireEqual,
    RequireDiffer,
    NoConstraint,
}

/// Cams read by rotors 1 and 2 in both reachable tick 0 states
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcomes {
    /// rotor 6 inactive, nothing moved
    pub still: (bool, bool),
    /// rotor 6 active, rotor 1 moved once and rotor 2 once or twice
    pub stepped: (bool, bool),
}

impl Outcomes {
    pub fn read(r1: &Rotor, r2: &Rotor) -> Outcomes {
        // rotor 2 takes its extra step when rotor 1 senses an active cam
        let extra = r1.peek(SENSE) as isize;
        Outcomes {
            still: (r1.peek(READ), r2.peek(READ)),
            stepped: (r1.peek(READ - 1), r2.peek(READ - 1 - extra)),
        }
    }
}

impl Constraint {
    pub fn classify(digit: u8) -> Constraint {
        if EQUAL_DIGITS.contains(&digit) {
            Constraint::RequireEqual
        } else if DIFFER_DIGITS.contains(&digit) {
            Constraint::RequireDiffer
        } else {
            Constraint::NoConstraint
        }
    }

    /// **return** false only if no reachable tick 0 state satisfies the constraint
    pub fn admits(self, outcomes: &Outcomes) -> bool {
        let equal = |(a, b): (bool, bool)| a == b;
        match self {
            Constraint::RequireEqual => equal(outcomes.still) || equal(outcomes.stepped),
            Constraint::RequireDiffer => !equal(outcomes.still) || !equal(outcomes.stepped),
            Constraint::NoConstraint => true,
        }
    }
}
