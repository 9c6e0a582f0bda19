use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

use failure::Error;
use rayon::prelude::*;

use super::key::Key;
use super::machine::{Machine, ROTORS, SCHEDULE};
use super::prune::{Constraint, Outcomes};
use super::sample::Sample;

/// Outcome of replaying a sample from one candidate key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    FullMatch,
    /// first tick whose digit differs from the sample
    Mismatch(usize),
}

/// What a search found, and how much of the key space it went through
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    /// accepted keys, in lexicographic order
    pub keys: Vec<Key>,
    /// (rotor 1, rotor 2) pairs eliminated before expanding rotors 3 to 6
    pub pruned_pairs: usize,
    /// candidates replayed against the sample
    pub verified: u64,
}

impl Report {
    /// **return** the number of candidates covered, verified or eliminated
    pub fn considered(&self) -> u64 {
        self.verified + self.pruned_pairs as u64 * Attack::PAIR_SPAN
    }

    fn merge(mut self, other: Report) -> Report {
        self.keys.extend(other.keys);
        self.pruned_pairs += other.pruned_pairs;
        self.verified += other.verified;
        self
    }
}

/// Exhaustive wheelsetting attack: every key reproducing the sample
pub struct Attack<'a> {
    machine: &'a Machine,
    sample: &'a Sample,
    constraint: Constraint,
}

impl<'a> Attack<'a> {
    /// Number of (rotor 1, rotor 2) start pairs
    pub const PAIRS: usize = SCHEDULE[0] * SCHEDULE[1];

    /// Candidates sharing one (rotor 1, rotor 2) pair
    pub const PAIR_SPAN: u64 = (SCHEDULE[2] * SCHEDULE[3] * SCHEDULE[4] * SCHEDULE[5]) as u64;

    /// Size of the whole key space
    pub const SPACE: u64 = Self::PAIRS as u64 * Self::PAIR_SPAN;

    pub fn new(machine: &'a Machine, sample: &'a Sample) -> Attack<'a> {
        let constraint = Constraint::classify(sample.first());
        debug!("first digit {} gives {:?}", sample.first(), constraint);

        Attack { machine, sample, constraint }
    }

    /// Enable or disable the early rejection of start pairs
    pub fn pruning(mut self, enabled: bool) -> Attack<'a> {
        self.constraint = if enabled {
            Constraint::classify(self.sample.first())
        } else {
            Constraint::NoConstraint
        };
        self
    }

    /// Replay the sample from the machine's current state
    /// **note** the machine is left wherever the replay stopped
    pub fn verify(machine: &mut Machine, sample: &Sample) -> Verdict {
        for (tick, &expected) in sample.digits().iter().enumerate() {
            machine.gated_cascade();
            if machine.digit() != expected {
                return Verdict::Mismatch(tick);
            }
            machine.cascade();
        }
        Verdict::FullMatch
    }

    /// Search the whole key space on the calling thread
    pub fn carry_out(&self) -> Report {
        self.carry_out_with_progress(|_, _| ())
    }

    /// Search the whole key space on the calling thread, reporting each finished pair
    pub fn carry_out_with_progress<F: FnMut(usize, usize)>(&self, progress: F) -> Report {
        self.search(0..Attack::PAIRS, progress)
    }

    /// Search the whole key space on `jobs` worker threads
    pub fn carry_out_parallel<F>(&self, jobs: usize, progress: F) -> Result<Report, Error>
    where
        F: Fn(usize, usize) + Sync,
    {
        self.search_parallel(0..Attack::PAIRS, jobs, progress)
    }

    /// Search the keys whose pair index `r1 * 25 + r2` lies in `pairs`
    pub fn search<F: FnMut(usize, usize)>(&self, pairs: Range<usize>, mut progress: F) -> Report {
        let pairs = clamp(pairs);
        let total = pairs.len();
        let mut machine = self.machine.clone();
        let mut report = Report::default();

        for (done, pair) in pairs.enumerate() {
            self.explore_pair(&mut machine, pair / SCHEDULE[1], pair % SCHEDULE[1], &mut report);
            progress(done + 1, total);
        }

        report
    }

    /// Same as `search`, split over `jobs` worker threads
    /// **note** keys are sorted, so the report matches the sequential one
    pub fn search_parallel<F>(&self, pairs: Range<usize>, jobs: usize, progress: F) -> Result<Report, Error>
    where
        F: Fn(usize, usize) + Sync,
    {
        let pairs = clamp(pairs);
        let total = pairs.len();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| format_err!("could not start {} workers: {}", jobs, e))?;
        let done = AtomicUsize::new(0);

        let mut report = pool.install(|| {
            pairs
                .into_par_iter()
                .map_init(
                    || self.machine.clone(),
                    |machine, pair| {
                        let mut report = Report::default();
                        self.explore_pair(machine, pair / SCHEDULE[1], pair % SCHEDULE[1], &mut report);
                        progress(done.fetch_add(1, Ordering::Relaxed) + 1, total);
                        report
                    },
                )
                .reduce(Report::default, Report::merge)
        });

        report.keys.sort();
        Ok(report)
    }

    fn explore_pair(&self, machine: &mut Machine, r1: usize, r2: usize, report: &mut Report) {
        machine.set_key(&Key::from_trusted([r1, r2, 0, 0, 0, 0]));
        if !self.constraint.admits(&Outcomes::read(machine.rotor(0), machine.rotor(1))) {
            trace!("pair ({}, {}) pruned", r1, r2);
            report.pruned_pairs += 1;
            return;
        }

        let mut positions = [r1, r2, 0, 0, 0, 0];
        for r3 in 0..SCHEDULE[2] {
            positions[2] = r3;
            for r4 in 0..SCHEDULE[3] {
                positions[3] = r4;
                for r5 in 0..SCHEDULE[4] {
                    positions[4] = r5;
                    for r6 in 0..SCHEDULE[ROTORS - 1] {
                        positions[5] = r6;

                        let key = Key::from_trusted(positions);
                        machine.set_key(&key);
                        report.verified += 1;
                        if Attack::verify(machine, self.sample) == Verdict::FullMatch {
                            debug!("key {} reproduces the sample", key);
                            report.keys.push(key);
                        }
                    }
                }
            }
        }
    }
}

fn clamp(pairs: Range<usize>) -> Range<usize> {
    let end = pairs.end.min(Attack::PAIRS);
    pairs.start.min(end)..end
}

#[cfg(test)]
mod tests {
    use super::{Attack, Report, Verdict};
    use crate::key::Key;
    use crate::sample::Sample;
    use crate::wiring;

    #[test]
    fn space() {
        assert_eq!(625, Attack::PAIRS);
        assert_eq!(304_704, Attack::PAIR_SPAN);
        assert_eq!(190_440_000, Attack::SPACE);
    }

    #[test]
    fn verify() {
        let mut machine = wiring::reference_machine();
        let sample = wiring::reference_sample();

        machine.set_key(&Key::new([0, 1, 2, 3, 0, 0]).unwrap());
        assert_eq!(Verdict::FullMatch, Attack::verify(&mut machine, &sample));

        // [0, 0, 0, 0, 0, 0] starts with 6, 12
        machine.set_key(&Key::new([0, 0, 0, 0, 0, 0]).unwrap());
        assert_eq!(Verdict::Mismatch(1), Attack::verify(&mut machine, &sample));

        let short = Sample::new(&[6, 12, 8]).unwrap();
        machine.set_key(&Key::new([0, 0, 0, 0, 0, 0]).unwrap());
        assert_eq!(Verdict::FullMatch, Attack::verify(&mut machine, &short));
    }

    #[test]
    fn verify_stops_at_first_mismatch() {
        let mut machine = wiring::reference_machine();
        let sample = Sample::new(&[6, 6, 2, 9, 11, 25, 0]).unwrap();

        machine.set_key(&Key::new([0, 1, 2, 3, 0, 0]).unwrap());
        assert_eq!(Verdict::Mismatch(5), Attack::verify(&mut machine, &sample));
    }

    #[test]
    fn merge() {
        let a = Report { keys: vec![Key::new([1, 0, 0, 0, 0, 0]).unwrap()], pruned_pairs: 2, verified: 10 };
        let b = Report { keys: vec![Key::new([0, 0, 0, 0, 0, 0]).unwrap()], pruned_pairs: 1, verified: 5 };
        let merged = a.merge(b);
        assert_eq!(2, merged.keys.len());
        assert_eq!(3, merged.pruned_pairs);
        assert_eq!(15, merged.verified);
        assert_eq!(15 + 3 * Attack::PAIR_SPAN, merged.considered());
    }

    #[test]
    fn search_slice() {
        let machine = wiring::reference_machine();
        let sample: Sample = "6 6 2 9 11".parse().unwrap();
        let attack = Attack::new(&machine, &sample);

        // pair 0 is A A, pair 1 is A B, pair 8 is A I
        let report = attack.search(0..9, |_, _| ());
        let keys = report.keys.iter().map(|k| k.to_string()).collect::<Vec<_>>();
        assert_eq!(
            vec![
                "A B C D 01 00", "A B C T 02 00", "A B C T 14 00", "A B F C 02 00", "A B F S 01 00",
                "A B Q D 01 00", "A B Q T 02 00", "A B Q T 14 00", "A B T O 12 22", "A I G S 01 00",
            ],
            keys
        );
        assert_eq!(9 * Attack::PAIR_SPAN, report.considered());
    }

    #[test]
    fn search_clamps_range() {
        let machine = wiring::reference_machine();
        let sample = wiring::reference_sample();
        let attack = Attack::new(&machine, &sample);

        assert_eq!(Report::default(), attack.search(700..800, |_, _| ()));
        assert_eq!(Attack::PAIR_SPAN, attack.search(624..1000, |_, _| ()).considered());
    }

    #[test]
    fn pruning_keeps_every_key() {
        let machine = wiring::reference_machine();
        let sample: Sample = "6 6 2".parse().unwrap();

        let pruned = Attack::new(&machine, &sample).search(0..25, |_, _| ());
        let full = Attack::new(&machine, &sample).pruning(false).search(0..25, |_, _| ());

        assert!(pruned.pruned_pairs > 0);
        assert_eq!(0, full.pruned_pairs);
        assert!(pruned.verified < full.verified);
        assert_eq!(full.keys, pruned.keys);
        assert_eq!(full.considered(), pruned.considered());
    }

    #[test]
    fn parallel_matches_sequential() {
        let machine = wiring::reference_machine();
        let sample: Sample = "6 6 2 9".parse().unwrap();
        let attack = Attack::new(&machine, &sample);

        let sequential = attack.search(0..30, |_, _| ());
        let parallel = attack.search_parallel(0..30, 4, |_, _| ()).unwrap();
        assert!(!sequential.keys.is_empty());
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn progress_reaches_every_pair() {
        let machine = wiring::reference_machine();
        let sample = wiring::reference_sample();
        let mut calls = 0;
        let mut last = (0, 0);
        Attack::new(&machine, &sample).search(10..20, |done, total| {
            calls += 1;
            last = (done, total);
        });
        assert_eq!(10, calls);
        assert_eq!((10, 10), last);
    }
}
