#[macro_use]
extern crate clap;
#[macro_use]
extern crate failure;
extern crate chrono;

use std::ops::Range;
use std::process;

use chrono::Local;
use clap::{App, ArgMatches};
use failure::Error;
use sgcrack::{wiring, Attack, Key, Sample, Verdict};

fn now() -> String {
    Local::now().format("%T").to_string()
}

fn main() {
    let yaml = load_yaml!("../cli.yml");
    let matches = App::from_yaml(yaml).get_matches();

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if matches.is_present("verbose") {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.format_timestamp(Some(env_logger::TimestampPrecision::Seconds)).init();

    if let Err(e) = run(&matches) {
        eprintln!("Error: {}", e);
        for cause in e.iter_causes() {
            eprintln!("  caused by: {}", cause);
        }
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    // load rotors and known digits
    let machine = match matches.value_of("wiring") {
        Some(path) => wiring::load_wiring(path)?,
        None => wiring::reference_machine(),
    };
    let sample = match (matches.value_of("sample"), matches.value_of("stream")) {
        (Some(path), _) => wiring::load_sample(path)?,
        (None, Some(digits)) => digits.parse::<Sample>()?,
        (None, None) => wiring::reference_sample(),
    };

    if let Some(key) = matches.value_of("replay") {
        let key = key.parse::<Key>()?;
        let mut replay = machine.clone();
        replay.set_key(&key);
        let digits = replay.keystream().take(sample.len()).map(|d| d.to_string()).collect::<Vec<_>>();
        println!("{}", digits.join(" "));

        replay.set_key(&key);
        match Attack::verify(&mut replay, &sample) {
            Verdict::FullMatch => eprintln!("[{}] Key {} reproduces the {} known digits", now(), key, sample.len()),
            Verdict::Mismatch(tick) => eprintln!("[{}] Key {} differs from the known digits at tick {}", now(), key, tick),
        }
        return Ok(());
    }

    let pairs = match matches.value_of("pairs") {
        Some(pairs) => parse_pairs(pairs)?,
        None => 0..Attack::PAIRS,
    };
    let jobs = value_t!(matches, "jobs", usize).unwrap_or_else(|e| e.exit());
    if jobs == 0 {
        return Err(format_err!("at least one worker is needed"));
    }
    let pruning = !matches.is_present("no-prune");

    let attack = Attack::new(&machine, &sample).pruning(pruning);
    eprintln!(
        "[{}] Attack on {} candidates from pairs {}..{} using {} known digits ({} pruning, {} thread{})",
        now(),
        pairs.len() as u64 * Attack::PAIR_SPAN,
        pairs.start,
        pairs.end,
        sample.len(),
        if pruning { "with" } else { "without" },
        jobs,
        if jobs > 1 { "s" } else { "" }
    );

    let report = if jobs == 1 {
        attack.search(pairs, sgcrack::progress)
    } else {
        attack.search_parallel(pairs, jobs, sgcrack::progress)?
    };
    eprintln!();

    eprintln!(
        "[{}] {} pairs pruned, {} candidates replayed, {} key{} found",
        now(),
        report.pruned_pairs,
        report.verified,
        report.keys.len(),
        if report.keys.len() == 1 { "" } else { "s" }
    );
    for key in &report.keys {
        println!("{}", key);
    }

    Ok(())
}

/// Parse a "FROM:TO" pair range
fn parse_pairs(s: &str) -> Result<Range<usize>, Error> {
    let mut bounds = s.splitn(2, ':').map(str::trim);
    let from = bounds.next().unwrap_or("");
    let to = bounds.next().ok_or_else(|| format_err!("pairs must be given as FROM:TO, got {:?}", s))?;

    let from = if from.is_empty() { 0 } else { from.parse::<usize>()? };
    let to = if to.is_empty() { Attack::PAIRS } else { to.parse::<usize>()? };
    if from >= to || to > Attack::PAIRS {
        return Err(format_err!("pair range {}..{} is not within 0..{}", from, to, Attack::PAIRS));
    }

    Ok(from..to)
}
