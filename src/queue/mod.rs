// Description:     Queue snapshot handling: validation of raw squeue output,
//                  keyword filtering, and grouping into a per-account ledger.

mod ledger;
pub mod plan;

pub use ledger::{announce, AccountLedger};

use crate::{error::BalanceError, slurm::Scheduler};
use log::info;

/// Pending-reason keyword for jobs waiting on account priority. Only those
/// jobs are worth moving; everything else is pending for its own reasons.
pub const PRIORITY_REASON: &str = "Priority";

/// State code for completing jobs, which look pending but are on their way
/// out and must not be reassigned.
const COMPLETING_STATE: &str = "CG";

/// Rejects snapshots the scheduler mangled before anything acts on them.
/// A "socket" marker anywhere means a transient communication fault; a
/// non-integer leading field means the listing format is not what we think
/// it is. Either way the whole run aborts, no partial action.
pub fn validate_snapshot(lines: &[String]) -> Result<(), BalanceError> {
    if lines.is_empty() {
        return Err(BalanceError::QueueCorrupt {
            reason: "queue listing is empty".to_owned(),
        });
    }

    for line in lines {
        if line.to_lowercase().contains("socket") {
            return Err(BalanceError::QueueCorrupt {
                reason: format!("scheduler socket fault in listing: {line}"),
            });
        }
        match line.split_whitespace().next() {
            Some(first) if first.parse::<u64>().is_ok() => {}
            Some(first) => {
                return Err(BalanceError::QueueCorrupt {
                    reason: format!("leading field {first:?} is not an integer job id"),
                });
            }
            None => {
                return Err(BalanceError::QueueCorrupt {
                    reason: "blank line in queue listing".to_owned(),
                });
            }
        }
    }

    Ok(())
}

/// Keeps lines where every keyword case-insensitively matches a substring of
/// some whitespace-delimited field, dropping completing (`CG`) jobs.
pub fn filter_lines<'a>(lines: &'a [String], keywords: &[&str]) -> Vec<&'a str> {
    let keywords: Vec<String> = keywords.iter().map(|kw| kw.to_lowercase()).collect();

    lines
        .iter()
        .map(String::as_str)
        .filter(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.contains(&COMPLETING_STATE) {
                return false;
            }
            keywords
                .iter()
                .all(|kw| fields.iter().any(|field| field.to_lowercase().contains(kw)))
        })
        .collect()
}

/// Fetches, validates, filters, and groups the pending queue for one stage.
///
/// Returns `Ok(None)` on the normal nothing-to-do terminations: an empty
/// queue, no line matching the stage keywords, or (outside the final
/// report) every account of the pair already holding priority-pending jobs,
/// which means balancing cannot help. More than two accounts holding
/// priority-pending jobs is an abort, not a termination: the two-account
/// move has no defined giver/taker there.
pub fn fetch_ledger<S>(
    scheduler: &S,
    user: &str,
    stage: &str,
    finale: bool,
) -> Result<Option<AccountLedger>, BalanceError>
where
    S: Scheduler + ?Sized,
{
    let lines = scheduler.pending_jobs(user)?;
    if lines.is_empty() {
        info!("no jobs in queue to balance");
        return Ok(None);
    }

    validate_snapshot(&lines)?;

    let matched = filter_lines(&lines, &[stage, PRIORITY_REASON]);
    if matched.is_empty() {
        info!("no pending {stage} jobs held on priority; nothing to balance");
        return Ok(None);
    }

    let ledger = AccountLedger::from_lines(matched);
    if ledger.num_accounts() > 2 && !finale {
        // Nothing actionable with a third account in play; abort before
        // any reassignment rather than guess at a giver/taker split.
        return Err(BalanceError::TooManyAccounts(ledger.num_accounts()));
    }
    if ledger.num_accounts() == 2 && !finale {
        info!("all accounts have low priority, leaving queue as-is");
        announce(&ledger, true);
        return Ok(None);
    }

    Ok(Some(ledger))
}
