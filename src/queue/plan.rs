// Description:     Pure balancing arithmetic: pick the giver, derive the
//                  taker from the account pair, and decide which job ids
//                  move. No scheduler contact happens here.

use super::AccountLedger;

/// The reassignments one balancing run intends to issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    pub giver: String,
    pub taker: String,
    /// Per-account share the run aims for.
    pub target: usize,
    /// Job ids to reassign, newest first.
    pub job_ids: Vec<u64>,
}

/// Per-account share after balancing: the combined total split across the
/// accounts, rounded up.
pub fn balance_target(total: usize, accounts: usize) -> usize {
    total.div_ceil(accounts)
}

/// Account holding the most pending jobs. Ties go to the lexicographically
/// smaller name so repeated runs agree on the giver.
pub fn select_giver(ledger: &AccountLedger) -> Option<&str> {
    let mut best: Option<(&str, usize)> = None;
    for (account, count) in ledger.counts() {
        best = match best {
            Some((held, max)) if count < max || (count == max && account > held) => {
                Some((held, max))
            }
            _ => Some((account, count)),
        };
    }
    best.map(|(account, _)| account)
}

/// The member of the two-account pair that is not the giver.
pub fn select_taker<'a>(pair: [&'a str; 2], giver: &str) -> Option<&'a str> {
    pair.into_iter().find(|account| *account != giver)
}

/// Decides what this run should move. Jobs are taken from the tail of the
/// giver's listing (newest submissions) so older jobs are not perpetually
/// pushed back by repeated reassignment. A lone pending job still moves
/// even though it already sits at the target, otherwise it would be
/// stranded on a saturated account while the other sits idle.
///
/// Returns `None` when the ledger is empty or when the fullest account is
/// not a member of the pair; jobs on foreign accounts are never touched.
pub fn plan_moves(ledger: &AccountLedger, pair: [&str; 2]) -> Option<MovePlan> {
    let giver = select_giver(ledger)?.to_owned();
    if !pair.contains(&giver.as_str()) {
        return None;
    }
    let taker = select_taker(pair, &giver)?.to_owned();

    let target = balance_target(ledger.total_jobs(), pair.len());
    let pids = ledger.job_ids(&giver);

    let mut numtotake = pids.len().saturating_sub(target);
    if target == 1 && pids.len() == 1 {
        numtotake = 1;
    }

    let job_ids = pids.into_iter().rev().take(numtotake).collect();

    Some(MovePlan {
        giver,
        taker,
        target,
        job_ids,
    })
}
