#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

mod attack;
mod error;
mod key;
mod machine;
mod prune;
mod rotor;
mod sample;

pub mod wiring;

pub use self::attack::{Attack, Report, Verdict};
pub use self::error::Error;
pub use self::key::Key;
pub use self::machine::{Keystream, Machine, MAX_DIGIT, ROTORS, SCHEDULE};
pub use self::prune::{Constraint, Outcomes};
pub use self::rotor::Rotor;
pub use self::sample::Sample;

#[inline]
pub fn progress(done: usize, total: usize) {
    eprint!("\r{:.2} % ({} / {})", done as f32 / total as f32 * 100.0, done, total);
}

#[cfg(test)]
mod tests {
    use super::{wiring, Attack, Key, Machine, Verdict};

    #[test]
    fn crack() {
        let machine = wiring::load_wiring("./fixtures/reference.wiring").unwrap();
        let sample = wiring::load_sample("./fixtures/reference.sample").unwrap();

        let report = Attack::new(&machine, &sample).carry_out();

        assert_eq!(vec![Key::new([0, 1, 2, 3, 0, 0]).unwrap()], report.keys);
        assert_eq!("A B C D 01 00", report.keys[0].to_string());
        assert_eq!(166, report.pruned_pairs);
        assert_eq!(Attack::SPACE, report.considered());

        // every reported key replays the whole sample
        for key in &report.keys {
            let mut replay = machine.clone();
            replay.set_key(key);
            assert_eq!(sample.digits(), &replay.keystream().take(sample.len()).collect::<Vec<_>>()[..]);
        }
    }

    #[test]
    fn deterministic() {
        let machine = wiring::reference_machine();
        let sample = wiring::reference_sample();
        let attack = Attack::new(&machine, &sample);
        assert_eq!(attack.search(0..5, |_, _| ()), attack.search(0..5, |_, _| ()));
    }

    #[test]
    fn mutated_cam_breaks_key() {
        let sample = wiring::reference_sample();
        let key = Key::new([0, 1, 2, 3, 0, 0]).unwrap();

        for &(rotor, cam) in &[(0, 0), (0, 13), (1, 4), (2, 0), (3, 22), (4, 8), (5, 1), (5, 23)] {
            let mut patterns = wiring::REFERENCE_WIRING.iter().map(|p| p.to_string()).collect::<Vec<_>>();
            let flipped = if patterns[rotor].as_bytes()[cam] == b'0' { "1" } else { "0" };
            patterns[rotor].replace_range(cam..=cam, flipped);

            let mut machine = Machine::from_patterns(&patterns[..]).unwrap();
            machine.set_key(&key);
            match Attack::verify(&mut machine, &sample) {
                Verdict::Mismatch(tick) => assert!(tick < sample.len()),
                Verdict::FullMatch => panic!("cam {} of rotor {} flipped and key still matches", cam, rotor),
            }
        }
    }

    #[test]
    #[ignore]
    fn pruning_is_sound() {
        // replays all 190440000 candidates
        let machine = wiring::reference_machine();
        let sample = wiring::reference_sample();

        let pruned = Attack::new(&machine, &sample).carry_out();
        let full = Attack::new(&machine, &sample).pruning(false).carry_out();

        assert_eq!(pruned.keys, full.keys);
        assert_eq!(0, full.pruned_pairs);
        assert_eq!(Attack::SPACE, full.verified);
    }
}
