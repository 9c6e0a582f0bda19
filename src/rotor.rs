use super::error::Error;

/// Sizes a rotor can be built with
pub const SIZES: [usize; 3] = [23, 24, 25];

/// A cam wheel: fixed circular cam pattern and a rotating position
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rotor {
    cams: Vec<bool>,
    position: usize,
}

impl Rotor {
    /// Constructor, at position 0
    pub fn new(cams: Vec<bool>) -> Result<Rotor, Error> {
        if !SIZES.contains(&cams.len()) {
            return Err(Error::configuration(format!(
                "a rotor must carry 23, 24 or 25 cams, got {}",
                cams.len()
            )));
        }

        Ok(Rotor { cams, position: 0 })
    }

    /// Build a rotor from a string of '0' and '1' cams, e.g. "0001101011000100010001101"
    pub fn from_pattern(pattern: &str) -> Result<Rotor, Error> {
        let cams = pattern
            .trim()
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(Error::configuration(format!("illegal cam '{}' in pattern {:?}", c, pattern))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Rotor::new(cams)
    }

    pub fn size(&self) -> usize {
        self.cams.len()
    }

    pub fn cams(&self) -> &[bool] {
        &self.cams
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn set_position(&mut self, position: usize) -> Result<(), Error> {
        if position >= self.size() {
            return Err(Error::configuration(format!(
                "position {} is out of range for a rotor of size {}",
                position,
                self.size()
            )));
        }
        self.position = position;
        Ok(())
    }

    /// Advance by one slot
    #[inline]
    pub fn step(&mut self) {
        self.position += 1;
        if self.position == self.cams.len() {
            self.position = 0;
        }
    }

    /// **return** the cam `offset` slots behind the current position
    /// **note** negative offsets look ahead, and any offset wraps around
    #[inline]
    pub fn peek(&self, offset: isize) -> bool {
        let size = self.cams.len() as isize;
        self.cams[(self.position as isize - offset).rem_euclid(size) as usize]
    }
}
