use failure::Fail;

/// Failures raised while building a machine or a sample.
///
/// A digit mismatch during the search is not an error; see `attack::Verdict`.
#[derive(Debug, Fail, PartialEq, Eq)]
pub enum Error {
    #[fail(display = "invalid configuration: {}", reason)]
    InvalidConfiguration { reason: String },

    #[fail(display = "malformed sample: {}", reason)]
    MalformedSample { reason: String },
}

impl Error {
    pub fn configuration<S: Into<String>>(reason: S) -> Error {
        Error::InvalidConfiguration { reason: reason.into() }
    }

    pub fn sample<S: Into<String>>(reason: S) -> Error {
        Error::MalformedSample { reason: reason.into() }
    }
}
