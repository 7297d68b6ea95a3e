//! Validation report shared between the CLI driver and the
//! integration tests (spec.md §6/§8): max relative per-particle
//! potential difference and relative energy error against the
//! all-pairs reference.

use std::fmt;

use crate::direct::energy;

#[derive(Debug, Clone, Copy)]
pub struct Report {
    pub max_relative_potential_diff: f64,
    pub relative_energy_error: f64,
    pub eng: f64,
    pub eng_direct: f64,
}

impl Report {
    pub fn compute(pot: &[f64], pot_direct: &[f64], q: &[f64]) -> Self {
        let mut max_diff = 0.0_f64;
        for (p, pd) in pot.iter().zip(pot_direct) {
            if pd.abs() > 0.0 {
                let diff = ((p - pd) / pd).abs();
                if diff > max_diff {
                    max_diff = diff;
                }
            }
        }

        let eng = energy(q, pot);
        let eng_direct = energy(q, pot_direct);
        let relative_energy_error = if eng_direct.abs() > 0.0 {
            ((eng - eng_direct) / eng_direct).abs()
        } else {
            (eng - eng_direct).abs()
        };

        Self {
            max_relative_potential_diff: max_diff,
            relative_energy_error,
            eng,
            eng_direct,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "===== Max potential difference = {:e} =====",
            self.max_relative_potential_diff
        )?;
        write!(
            f,
            "===== Total FMM vs. direct energies & error = {:e} {:e} {:e} =====",
            self.eng, self.eng_direct, self.relative_energy_error
        )
    }
}
