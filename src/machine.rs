use std::convert::TryInto;

use super::error::Error;
use super::key::Key;
use super::rotor::Rotor;

/// Number of rotors
pub const ROTORS: usize = 6;

/// Size of each rotor, left (slow) to right (fast)
pub const SCHEDULE: [usize; ROTORS] = [25, 25, 23, 23, 24, 24];

/// Weights of the five digit rotors
pub const WEIGHTS: [u8; 5] = [1, 2, 4, 8, 10];

/// Largest digit the machine can produce
pub const MAX_DIGIT: u8 = 25;

/// Offset of the cams sensed for stepping
pub const SENSE: isize = 5;

/// Offset of the cams read to form a digit
pub const READ: isize = -8;

/// The six rotors of the machine and the stepping logic driving them
#[derive(Clone, Debug)]
pub struct Machine {
    rotors: [Rotor; ROTORS],
}

impl Machine {
    /// Constructor, checking the rotors against the fixed size schedule
    pub fn new(rotors: Vec<Rotor>) -> Result<Machine, Error> {
        let rotors: [Rotor; ROTORS] = rotors
            .try_into()
            .map_err(|r: Vec<Rotor>| Error::configuration(format!("expected {} rotors, got {}", ROTORS, r.len())))?;

        for (i, (rotor, &size)) in rotors.iter().zip(SCHEDULE.iter()).enumerate() {
            if rotor.size() != size {
                return Err(Error::configuration(format!(
                    "rotor {} must have {} cams, got {}",
                    i + 1,
                    size,
                    rotor.size()
                )));
            }
        }

        Ok(Machine { rotors })
    }

    /// Build a machine from six cam pattern strings
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Machine, Error> {
        let rotors = patterns
            .iter()
            .map(|p| Rotor::from_pattern(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Machine::new(rotors)
    }

    pub fn rotor(&self, i: usize) -> &Rotor {
        &self.rotors[i]
    }

    pub fn rotors(&self) -> &[Rotor; ROTORS] {
        &self.rotors
    }

    /// **return** the current rotor positions
    pub fn key(&self) -> Key {
        let mut positions = [0; ROTORS];
        for (p, rotor) in positions.iter_mut().zip(self.rotors.iter()) {
            *p = rotor.position();
        }
        Key::from_trusted(positions)
    }

    /// Turn every rotor to the position given by the key
    pub fn set_key(&mut self, key: &Key) {
        for (rotor, &position) in self.rotors.iter_mut().zip(key.positions().iter()) {
            // a Key is always within the schedule the machine was checked against
            let _ = rotor.set_position(position);
        }
    }

    /// One stepping pass, right to left: every rotor steps once, and once more
    /// if the cam sensed on its left neighbour is active
    #[inline]
    pub fn cascade(&mut self) {
        for i in (0..ROTORS).rev() {
            if i != 0 && self.rotors[i - 1].peek(SENSE) {
                self.rotors[i].step();
            }
            self.rotors[i].step();
        }
    }

    /// Phases I and II: cascade only if the sensed cam of rotor 6 is active
    #[inline]
    pub fn gated_cascade(&mut self) {
        if self.rotors[ROTORS - 1].peek(SENSE) {
            self.cascade();
        }
    }

    /// **return** the digit read from the current state, in [0, 25]
    #[inline]
    pub fn digit(&self) -> u8 {
        let invert = self.rotors[ROTORS - 1].peek(READ);
        self.rotors
            .iter()
            .zip(WEIGHTS.iter())
            .map(|(rotor, &weight)| if invert ^ rotor.peek(READ) { weight } else { 0 })
            .sum()
    }

    /// Run one full tick and **return** the digit it produced
    pub fn tick(&mut self) -> u8 {
        self.gated_cascade();
        let digit = self.digit();
        // phases III and IV
        self.cascade();
        digit
    }

    /// **return** an endless iterator over the digits produced from the current state
    pub fn keystream(&mut self) -> Keystream {
        Keystream { machine: self }
    }
}

/// Digits produced by a machine, tick after tick
pub struct Keystream<'a> {
    machine: &'a mut Machine,
}

impl<'a> Iterator for Keystream<'a> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        Some(self.machine.tick())
    }
}
