use std::str::FromStr;

use super::error::Error;
use super::machine::MAX_DIGIT;

/// Known fragment of the machine's digit stream
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sample {
    digits: Vec<u8>,
}

impl Sample {
    /// Constructor, rejecting empty samples and values outside [0, 25]
    pub fn new(values: &[i64]) -> Result<Sample, Error> {
        if values.is_empty() {
            return Err(Error::sample("the sample is empty"));
        }

        let digits = values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                if value < 0 || value > MAX_DIGIT as i64 {
                    Err(Error::sample(format!("value {} at index {} is not in [0, {}]", value, i, MAX_DIGIT)))
                } else {
                    Ok(value as u8)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Sample { digits })
    }

    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    pub fn first(&self) -> u8 {
        self.digits[0]
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }
}

impl FromStr for Sample {
    type Err = Error;

    /// Parse values separated by whitespace and/or commas
    fn from_str(s: &str) -> Result<Sample, Error> {
        let values = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(|token| {
                token
                    .parse::<i64>()
                    .map_err(|_| Error::sample(format!("{:?} is not a number", token)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Sample::new(&values)
    }
}
