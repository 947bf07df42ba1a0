use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};
use structopt::StructOpt;

use std::time;

use obst::{Avl, Rbt};

/// Command line options.
#[derive(Clone, StructOpt)]
pub struct Opt {
    #[structopt(long = "seed")]
    seed: Option<u64>,

    #[structopt(long = "loads", default_value = "1000000")] // default 1M
    loads: usize,

    #[structopt(long = "searches", default_value = "1000000")] // default 1M
    searches: usize,
}

fn main() {
    let opts = Opt::from_args();
    let seed = opts.seed.unwrap_or_else(random);
    println!("perf seed {}", seed);

    perf_avl(seed, &opts);
    perf_rbt(seed, &opts);
}

fn perf_avl(seed: u64, opts: &Opt) {
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index: Avl<u64> = Avl::new();

    let start = time::Instant::now();
    for _i in 0..opts.loads {
        index.insert(rng.gen::<u64>());
    }
    println!("avl loaded {} items in {:?}", opts.loads, start.elapsed());

    let start = time::Instant::now();
    let mut hits = 0_usize;
    for _i in 0..opts.searches {
        if index.search(&rng.gen::<u64>()) {
            hits += 1;
        }
    }
    println!(
        "avl searched {} items in {:?}, {} hits",
        opts.searches,
        start.elapsed(),
        hits
    );
}

fn perf_rbt(seed: u64, opts: &Opt) {
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index: Rbt<u64> = Rbt::new();

    let start = time::Instant::now();
    for _i in 0..opts.loads {
        index.insert(rng.gen::<u64>());
    }
    println!("rbt loaded {} items in {:?}", opts.loads, start.elapsed());

    let start = time::Instant::now();
    let mut hits = 0_usize;
    for _i in 0..opts.searches {
        if index.search(&rng.gen::<u64>()) {
            hits += 1;
        }
    }
    println!(
        "rbt searched {} items in {:?}, {} hits",
        opts.searches,
        start.elapsed(),
        hits
    );
}
