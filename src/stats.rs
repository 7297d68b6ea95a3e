//! Wall-clock and advisory FLOP bookkeeping (spec.md §6: "The driver
//! reports... wall-clock times, and FLOP counters").

use std::time::Duration;

#[derive(Debug, Clone, Copy, Default)]
pub struct Stats {
    pub p2m_time: Duration,
    pub upward_time: Duration,
    pub downward_time: Duration,
    pub leaf_eval_time: Duration,
    pub direct_time: Duration,
    pub fmm_flops: u64,
    pub direct_flops: u64,
}

impl Stats {
    pub fn fmm_time(&self) -> Duration {
        self.p2m_time + self.upward_time + self.downward_time + self.leaf_eval_time
    }

    pub fn fmm_gflops(&self) -> f64 {
        let secs = self.fmm_time().as_secs_f64();
        if secs > 0.0 {
            self.fmm_flops as f64 / secs / 1e9
        } else {
            0.0
        }
    }

    pub fn direct_gflops(&self) -> f64 {
        let secs = self.direct_time.as_secs_f64();
        if secs > 0.0 {
            self.direct_flops as f64 / secs / 1e9
        } else {
            0.0
        }
    }
}
