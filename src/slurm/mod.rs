// Description:     Boundary to the SLURM CLI. Everything the balancer knows
//                  about the cluster comes through the `Scheduler` trait;
//                  `Slurm` is the production implementation shelling out to
//                  squeue and scontrol.

use crate::error::BalanceError;
use log::{debug, trace};
use std::process::{Command, Stdio};

const SQUEUE: &str = "squeue";
const SCONTROL: &str = "scontrol";

/// Billing sub-suffix the cluster appends to CPU accounts. Grouping strips
/// it from queue listings, so reassignment has to put it back.
pub const ACCOUNT_SUFFIX: &str = "_cpu";

/// The two scheduler operations a balancing run performs.
pub trait Scheduler {
    /// One raw listing line per pending job belonging to `user`, header
    /// suppressed, in the scheduler's reporting order.
    fn pending_jobs(&self, user: &str) -> Result<Vec<String>, BalanceError>;

    /// Move `job_id` onto `account`'s billing. Fire-and-forget: individual
    /// success is not confirmed; callers re-fetch the queue afterwards
    /// instead of trusting their ledger.
    fn reassign(&self, account: &str, job_id: u64) -> Result<(), BalanceError>;
}

/// Production scheduler backed by the SLURM command-line tools.
pub struct Slurm;


impl Scheduler for Slurm {
    fn pending_jobs(&self, user: &str) -> Result<Vec<String>, BalanceError> {
        debug!("querying pending jobs for {user} with {SQUEUE}");

        let output = Command::new(SQUEUE)
            .args(["-u", user, "-h", "-t", "PD"])
            .output()
            .map_err(|source| BalanceError::QueueUnavailable {
                command: SQUEUE,
                source,
            })?;

        if !output.status.success() {
            return Err(BalanceError::QueueCommandFailed {
                command: SQUEUE,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_owned)
            .collect())
    }

    fn reassign(&self, account: &str, job_id: u64) -> Result<(), BalanceError> {
        trace!("{SCONTROL} update Account={account}{ACCOUNT_SUFFIX} JobId={job_id}");

        // The child is deliberately not waited on. The final report re-fetches
        // the queue, which is the only source of truth after a reassignment.
        Command::new(SCONTROL)
            .arg("update")
            .arg(format!("Account={account}{ACCOUNT_SUFFIX}"))
            .arg(format!("JobId={job_id}"))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| BalanceError::QueueUnavailable {
                command: SCONTROL,
                source,
            })?;

        Ok(())
    }
}
