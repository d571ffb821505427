use indexmap::IndexMap;
use log::{info, trace};

/// One pending job as reported by the queue listing. Held only for the
/// duration of a single balancing decision, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub job_id: u64,
    /// Billing account with any `_cpu`-style sub-suffix stripped.
    pub account: String,
    /// Every whitespace-delimited field of the listing line, in the
    /// scheduler's reporting order.
    pub fields: Vec<String>,
}

impl QueueEntry {
    /// Parses one listing line. Returns `None` for lines without an integer
    /// job id or an account field; validated snapshots never produce those.
    pub fn parse(line: &str) -> Option<QueueEntry> {
        let fields: Vec<String> = line.split_whitespace().map(str::to_owned).collect();
        let job_id = fields.first()?.parse().ok()?;
        let account = truncate_account(fields.get(2)?);

        Some(QueueEntry {
            job_id,
            account,
            fields,
        })
    }

    /// The job's memory request with its unit suffix, e.g. "4000M".
    pub fn memory(&self) -> Option<&str> {
        self.fields
            .iter()
            .map(String::as_str)
            .find(|field| {
                field
                    .strip_suffix('M')
                    .is_some_and(|prefix| prefix.parse::<u64>().is_ok())
            })
    }
}

/// Account names are reported with a billing sub-suffix (`def-lab_cpu`);
/// everything from the first underscore on is noise for balancing.
pub fn truncate_account(raw: &str) -> String {
    match raw.split_once('_') {
        Some((name, _)) => name.to_owned(),
        None => raw.to_owned(),
    }
}

/// Point-in-time grouping of pending jobs by billing account. Insertion
/// order is queue listing order, which makes "newest jobs" the tail of each
/// account's map. Stale after any reassignment: re-fetch, do not mutate.
#[derive(Debug, Default)]
pub struct AccountLedger {
    accounts: IndexMap<String, IndexMap<u64, QueueEntry>>,
}

impl AccountLedger {
    pub fn from_lines<'a, I>(lines: I) -> AccountLedger
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut ledger = AccountLedger::default();
        for line in lines {
            if let Some(entry) = QueueEntry::parse(line) {
                trace!(
                    "job {} on {} requesting {}",
                    entry.job_id,
                    entry.account,
                    entry.memory().unwrap_or("unknown memory"),
                );
                ledger
                    .accounts
                    .entry(entry.account.clone())
                    .or_default()
                    .insert(entry.job_id, entry);
            }
        }
        ledger
    }

    pub fn num_accounts(&self) -> usize {
        self.accounts.len()
    }

    pub fn total_jobs(&self) -> usize {
        self.accounts.values().map(IndexMap::len).sum()
    }

    pub fn count(&self, account: &str) -> usize {
        self.accounts.get(account).map_or(0, IndexMap::len)
    }

    /// Job ids for `account` in listing order (oldest first).
    pub fn job_ids(&self, account: &str) -> Vec<u64> {
        self.accounts
            .get(account)
            .map(|jobs| jobs.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Account names with their job counts, in listing order.
    pub fn counts(&self) -> impl Iterator<Item = (&str, usize)> {
        self.accounts
            .iter()
            .map(|(account, jobs)| (account.as_str(), jobs.len()))
    }
}

/// One line per account with its job count, tagged as the first or final
/// look at the queue so a balancing run is auditable from the logs.
pub fn announce(ledger: &AccountLedger, finale: bool) {
    info!(
        "{} job counts",
        if finale { "final" } else { "first" }
    );
    for (account, count) in ledger.counts() {
        info!("{count} jobs on {account}");
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn entry_parses_id_account_and_memory() {
        let entry = QueueEntry::parse(
            "8812345 lindb def-alpha_cpu trim_lane3 PD 0:00 1-00:00:00 1 32 4000M (Priority)",
        )
        .unwrap();

        assert_eq!(entry.job_id, 8812345);
        assert_eq!(entry.account, "def-alpha");
        assert_eq!(entry.memory(), Some("4000M"));
        assert_eq!(entry.fields.len(), 11);
    }

    #[test]
    fn entry_rejects_non_integer_id() {
        assert!(QueueEntry::parse("JOBID USER ACCOUNT NAME ST").is_none());
    }

    #[test]
    fn memory_skips_non_numeric_m_fields() {
        let entry =
            QueueEntry::parse("1 lindb def-alpha_cpu markM PD 0:00 4:00:00 1 8 8000M (Priority)")
                .unwrap();
        assert_eq!(entry.memory(), Some("8000M"));
    }

    #[test]
    fn account_truncates_at_first_underscore() {
        assert_eq!(truncate_account("def-alpha_cpu"), "def-alpha");
        assert_eq!(truncate_account("rrg-beta_gpu_x"), "rrg-beta");
        assert_eq!(truncate_account("def-alpha"), "def-alpha");
    }

    #[test]
    fn ledger_groups_by_account_in_listing_order() {
        let lines = [
            "101 u def-alpha_cpu trim PD 0:00 1:00 1 4 4000M (Priority)",
            "102 u def-beta_cpu trim PD 0:00 1:00 1 4 4000M (Priority)",
            "103 u def-alpha_cpu trim PD 0:00 1:00 1 4 4000M (Priority)",
        ];
        let ledger = AccountLedger::from_lines(lines);

        assert_eq!(ledger.num_accounts(), 2);
        assert_eq!(ledger.total_jobs(), 3);
        assert_eq!(ledger.count("def-alpha"), 2);
        assert_eq!(ledger.job_ids("def-alpha"), vec![101, 103]);
        assert_eq!(ledger.job_ids("def-gamma"), Vec::<u64>::new());

        let order: Vec<_> = ledger.counts().map(|(a, _)| a).collect();
        assert_eq!(order, vec!["def-alpha", "def-beta"]);
    }
}
