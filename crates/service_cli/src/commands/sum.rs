//! Sum command implementation
//!
//! Sums `[1, a, a, ..., a]` naively and with Kahan compensation for each
//! addend `a` and prints the gap.

use sampler_core::summation::{kahan_sum, naive_sum};
use tracing::info;

use crate::{CliError, Result};

/// Run the sum command
pub fn run(len: usize, addends: &[f64]) -> Result<()> {
    if len == 0 {
        return Err(CliError::InvalidArgument(
            "len must be at least 1".to_string(),
        ));
    }
    info!("Comparing summation over {} values", len);

    let mut values = vec![0.0; len];
    for &addend in addends {
        let (naive, kahan) = compare(&mut values, addend);
        println!("naiveSum[1 + {} x {}]: {}", addend, len, naive);
        println!("kahanSum[1 + {} x {}]: {}", addend, len, kahan);
        println!("delta: {:e}", naive - kahan);
    }
    Ok(())
}

fn compare(values: &mut [f64], addend: f64) -> (f64, f64) {
    values.fill(addend);
    values[0] = 1.0;
    (naive_sum(values), kahan_sum(values))
}
