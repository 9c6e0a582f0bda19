use std::fmt;
use std::str::FromStr;

use super::error::Error;
use super::machine::{ROTORS, SCHEDULE};

/// Letter ring of rotors 1 to 4 (no J)
pub static LETTER_RING: [&str; 25] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "K", "L", "M", "N",
    "O", "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z",
];

/// Number ring of rotor 5
pub static NUMBER_RING: [&str; 24] = [
    "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12",
    "13", "14", "15", "16", "17", "18", "19", "20", "21", "22", "23", "24",
];

/// Dial markings of rotor 6
pub static DIAL_RING: [&str; 24] = [
    "00", "02", "05", "07", "10", "12", "15", "17", "20", "22", "25", "27",
    "30", "32", "35", "37", "40", "42", "45", "47", "50", "52", "55", "57",
];

/// Start positions of the six rotors, the external key of the machine
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key([usize; ROTORS]);

impl Key {
    pub fn new(positions: [usize; ROTORS]) -> Result<Key, Error> {
        for (i, (&position, &size)) in positions.iter().zip(SCHEDULE.iter()).enumerate() {
            if position >= size {
                return Err(Error::configuration(format!(
                    "rotor {} cannot be set to position {}, it has {} positions",
                    i + 1,
                    position,
                    size
                )));
            }
        }
        Ok(Key(positions))
    }

    /// Key built by the search loops, which only produce in-range positions
    pub(crate) fn from_trusted(positions: [usize; ROTORS]) -> Key {
        debug_assert!(positions.iter().zip(SCHEDULE.iter()).all(|(p, s)| p < s));
        Key(positions)
    }

    pub fn positions(&self) -> &[usize; ROTORS] {
        &self.0
    }

    /// **return** the printed ring marking of rotor `i` at `position`
    pub fn label(i: usize, position: usize) -> &'static str {
        ring(i)[position]
    }
}

fn ring(i: usize) -> &'static [&'static str] {
    match i {
        0..=3 => &LETTER_RING[..SCHEDULE[i]],
        4 => &NUMBER_RING,
        _ => &DIAL_RING,
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, &position) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(" ")?;
            }
            f.write_str(Key::label(i, position))?;
        }
        Ok(())
    }
}

impl FromStr for Key {
    type Err = Error;

    /// Parse ring markings such as "A B C D 01 00"
    fn from_str(s: &str) -> Result<Key, Error> {
        let labels = s.split_whitespace().collect::<Vec<_>>();
        if labels.len() != ROTORS {
            return Err(Error::configuration(format!(
                "a key has {} markings, got {} in {:?}",
                ROTORS,
                labels.len(),
                s
            )));
        }

        let mut positions = [0; ROTORS];
        for (i, label) in labels.iter().enumerate() {
            let upper = label.to_uppercase();
            positions[i] = ring(i)
                .iter()
                .position(|&mark| mark == upper)
                .ok_or_else(|| Error::configuration(format!("rotor {} has no marking {:?}", i + 1, label)))?;
        }

        Ok(Key(positions))
    }
}
