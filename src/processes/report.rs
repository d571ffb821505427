// Description:     Prints per-account pending-job counts for one pipeline
//                  stage without touching the queue.

use crate::{
    error::BalanceError,
    queue,
    slurm::{Scheduler, Slurm},
};
use clap::Args;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Pipeline stage keyword used to match job names in the queue (e.g.
    /// trim, bwa, mark)
    pub stage: String,

    #[arg(short, long, env = "USER")]
    /// User whose pending jobs are counted
    pub user: String,
}

pub fn report_process(args: &ReportArgs) -> Result<(), BalanceError> {
    run_report(&Slurm, args)
}

pub fn run_report<S: Scheduler>(scheduler: &S, args: &ReportArgs) -> Result<(), BalanceError> {
    if let Some(ledger) = queue::fetch_ledger(scheduler, &args.user, &args.stage, true)? {
        queue::announce(&ledger, true);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::slurm::testing::{listing_line, FakeSlurm};

    fn args(stage: &str) -> ReportArgs {
        ReportArgs {
            stage: stage.to_owned(),
            user: "lindb".to_owned(),
        }
    }

    #[test]
    fn report_never_mutates_the_queue() {
        let fake = FakeSlurm::new(vec![vec![
            listing_line(101, "def-alpha", "trim_lane1", "Priority"),
            listing_line(102, "def-alpha", "trim_lane2", "Priority"),
            listing_line(201, "def-beta", "trim_lane3", "Priority"),
        ]]);

        run_report(&fake, &args("trim")).unwrap();
        assert!(fake.moved().is_empty());
    }

    #[test]
    fn corrupt_listing_still_aborts_a_report() {
        let fake = FakeSlurm::new(vec![vec![
            "slurm_load_jobs error: Socket timed out on send/recv operation".to_owned(),
        ]]);

        let err = run_report(&fake, &args("trim")).unwrap_err();
        assert!(matches!(err, BalanceError::QueueCorrupt { .. }));
    }
}
