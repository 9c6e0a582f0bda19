use std::fs;
use std::path::Path;

use failure::{Error, ResultExt};

use super::machine::Machine;
use super::sample::Sample;

/// Cam patterns of the six rotors in the published 1941 setting
pub const REFERENCE_WIRING: [&str; 6] = [
    "0001101011000100010001101",
    "0110100100001011100101100",
    "11001001000100100100010",
    "01001000111010001110010",
    "001001001010000101011010",
    "011001100110001011010100",
];

/// Digits produced by the reference wiring from key A B C D 01 00
pub const REFERENCE_SAMPLE: [u8; 32] = [
    6, 6, 2, 9, 11, 3, 13, 25, 23, 16, 6, 13, 18, 23, 11, 3, 10,
    25, 0, 11, 15, 7, 25, 15, 4, 0, 1, 9, 13, 12, 23, 9,
];

pub fn reference_machine() -> Machine {
    match Machine::from_patterns(&REFERENCE_WIRING[..]) {
        Ok(machine) => machine,
        Err(e) => unreachable!("reference wiring rejected: {}", e),
    }
}

pub fn reference_sample() -> Sample {
    let values = REFERENCE_SAMPLE.iter().map(|&d| d as i64).collect::<Vec<_>>();
    match Sample::new(&values) {
        Ok(sample) => sample,
        Err(e) => unreachable!("reference sample rejected: {}", e),
    }
}

/// Parse six cam patterns, one per line
/// **note** blank lines and lines starting with '#' are skipped
pub fn parse_wiring(text: &str) -> Result<Machine, Error> {
    let patterns = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect::<Vec<_>>();

    Ok(Machine::from_patterns(&patterns[..])?)
}

pub fn load_wiring<P: AsRef<Path>>(path: P) -> Result<Machine, Error> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|_| format!("could not read wiring file {}", path.display()))?;
    Ok(parse_wiring(&text).with_context(|_| format!("in wiring file {}", path.display()))?)
}

/// Load a sample, skipping '#' comments
pub fn load_sample<P: AsRef<Path>>(path: P) -> Result<Sample, Error> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|_| format!("could not read sample file {}", path.display()))?;
    let digits = text
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" ");

    Ok(digits.parse::<Sample>().with_context(|_| format!("in sample file {}", path.display()))?)
}
