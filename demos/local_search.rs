use clap::Parser;
use log::info;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use sls_bv::bitvect::BitVect;
use sls_bv::valuation::Valuation;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Target value of `x + y`.
    #[arg(value_name = "INT", default_value = "1000")]
    target: u64,

    /// Bit-width of both variables.
    #[clap(long, value_name = "INT", default_value = "12")]
    width: usize,

    /// Maximum number of search steps.
    #[clap(long, value_name = "INT", default_value = "1000")]
    steps: usize,

    /// Random seed.
    #[clap(long, value_name = "INT", default_value = "42")]
    seed: u64,
}

/// Solves `x + y == target (mod 2^width)` where
/// - `x` is odd and lies in `[10, 2^(width-1))`,
/// - `y` has bit 1 clear and lies in the wrapping window `[2^width - 100, 300)`.
fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);
    let bw = args.width;
    if !(10..=64).contains(&bw) {
        color_eyre::eyre::bail!("width must be in 10..=64, got {}", bw);
    }

    let mut x = Valuation::new(bw);
    x.add_range(10, 1u128 << (bw - 1));
    x.fix_bit(0, true);
    x.tighten();

    let mut y = Valuation::new(bw);
    y.add_range(-100, 300);
    y.fix_bit(1, false);
    y.tighten();

    println!("x: {}", x.info());
    println!("y: {}", y.info());

    let target = BitVect::from_u64(bw, args.target);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mut solved = None;
    for step in 0..args.steps {
        let (sum, _) = x.bits().overflowing_add(y.bits());
        if sum == target {
            solved = Some(step);
            break;
        }

        // Flip the other variable's value into a target for this one.
        let (var, other) = if rng.random_bool(0.5) { (&mut x, &y) } else { (&mut y, &x) };
        let (desired, _) = target.overflowing_sub(other.bits());

        let staged = match rng.random_range(0..4) {
            0 => var.set_random_at_most(&desired, &mut rng),
            1 => var.set_random_at_least(&desired, &mut rng),
            _ => {
                var.repair(rng.random_bool(0.5), &desired);
                true
            }
        };
        if staged && var.commit() {
            info!("step {}: x = {}, y = {}", step, x, y);
        }
    }

    match solved {
        Some(step) => println!(
            "Solved in {} steps: x = {} ({}), y = {} ({})",
            step,
            x.bits(),
            x.to_nat(u64::MAX),
            y.bits(),
            y.to_nat(u64::MAX)
        ),
        None => println!("No solution found in {} steps", args.steps),
    }

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
