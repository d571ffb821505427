// Description:     Evenly redistributes priority-pending jobs for one
//                  pipeline stage across the two billing accounts, moving
//                  surplus jobs from the fuller account to the other one.

use crate::{
    error::BalanceError,
    queue::{self, plan::plan_moves},
    slurm::{Scheduler, Slurm},
};
use clap::Args;
use log::{info, warn};

/// Accounts the pipeline submits under when nothing else is configured.
pub const DEFAULT_ACCOUNTS: [&str; 2] = ["def-saitken", "def-yeaman"];

#[derive(Args, Debug)]
pub struct BalanceArgs {
    /// Pipeline stage keyword used to match job names in the queue (e.g.
    /// trim, bwa, mark)
    pub stage: String,

    #[arg(short, long, env = "USER")]
    /// User whose pending jobs are balanced
    pub user: String,

    #[arg(long, num_args = 2, default_values_t = DEFAULT_ACCOUNTS.map(String::from))]
    /// The two billing accounts jobs may move between
    pub accounts: Vec<String>,
}

pub fn balance_process(args: &BalanceArgs) -> Result<(), BalanceError> {
    run_balance(&Slurm, args)
}

/// One full balancing run against any scheduler backend: fetch and group the
/// pending queue, move the giver's surplus to the taker, then re-fetch for
/// the final report instead of trusting the stale ledger.
pub fn run_balance<S: Scheduler>(scheduler: &S, args: &BalanceArgs) -> Result<(), BalanceError> {
    let [first, second] = args.accounts.as_slice() else {
        return Err(BalanceError::AccountPair(args.accounts.len()));
    };
    let pair = [first.as_str(), second.as_str()];

    let Some(ledger) = queue::fetch_ledger(scheduler, &args.user, &args.stage, false)? else {
        return Ok(());
    };
    queue::announce(&ledger, false);

    let Some(plan) = plan_moves(&ledger, pair) else {
        warn!(
            "pending jobs sit on an account outside {}/{}; leaving queue as-is",
            pair[0], pair[1],
        );
        return Ok(());
    };
    info!(
        "giver {} has {} pending jobs (target {}); giving {} to {}",
        plan.giver,
        ledger.count(&plan.giver),
        plan.target,
        plan.job_ids.len(),
        plan.taker,
    );

    if plan.job_ids.is_empty() {
        info!("giver sees that taker has enough, so giver is not giving");
    } else {
        for job_id in &plan.job_ids {
            scheduler.reassign(&plan.taker, *job_id)?;
        }
        info!(
            "redistributed {} jobs from {} to {}",
            plan.job_ids.len(),
            plan.giver,
            plan.taker,
        );
    }

    if let Some(finale) = queue::fetch_ledger(scheduler, &args.user, &args.stage, true)? {
        queue::announce(&finale, true);
    }

    Ok(())
}
